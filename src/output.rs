// src/output.rs
// =============================================================================
// Prints results as tables or JSON, and saves them to a file.
// =============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use sara::crawl::{PageResult, ScriptResult, SeedReport};
use sara::enumerate::ProbeResult;

// Writes JSON to `output` if given, then prints either JSON or the table
pub fn emit<T, F>(results: &T, json: bool, output: Option<&Path>, print_table: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T),
{
    if let Some(path) = output {
        save_json(path, results)?;
    }

    if json {
        let json_output = serde_json::to_string_pretty(results)?;
        println!("{}", json_output);
    } else {
        print_table(results);
    }

    if let Some(path) = output {
        if !json {
            println!("💾 Results saved to {}", path.display());
        }
    }
    Ok(())
}

fn save_json<T: Serialize + ?Sized>(path: &Path, results: &T) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    fs::write(path, json_output)
        .with_context(|| format!("failed to write results to {}", path.display()))
}

pub fn print_crawl_table(reports: &[SeedReport]) {
    for report in reports {
        println!("\n🌐 {}", report.seed);
        println!(
            "{:<60} {:<6} {:<8} {:<6} {:<8} {:<7}",
            "URL", "DEPTH", "STATUS", "LINKS", "SCRIPTS", "ISSUES"
        );
        println!("{}", "=".repeat(100));

        for page in &report.pages {
            let status = format_status(page.status_code(), page.error().is_some());
            match page {
                PageResult::Page(report) => println!(
                    "{:<60} {:<6} {:<8} {:<6} {:<8} {:<7}",
                    shorten(&report.url, 57),
                    report.depth,
                    status,
                    report.links.len(),
                    report.script_urls.len() + report.inline_script_count,
                    report.header_issues.len()
                ),
                PageResult::Failed(failure) => println!(
                    "{:<60} {:<6} {:<8} {}",
                    shorten(&failure.url, 57),
                    failure.depth,
                    status,
                    failure.error
                ),
            }
        }

        print_findings(&report.pages);
    }

    println!();
    let pages: Vec<&PageResult> = reports.iter().flat_map(|r| r.pages.iter()).collect();
    let failed = pages.iter().filter(|page| page.error().is_some()).count();

    println!("📊 Summary:");
    println!("   ✅ Analyzed: {}", pages.len() - failed);
    println!("   ❌ Failed: {}", failed);
    println!("   📋 Total: {}", pages.len());
}

// Keyword hits and sample comments from scripts, per page
fn print_findings(pages: &[PageResult]) {
    for page in pages.iter().filter_map(PageResult::as_page) {
        for script in &page.script_analyses {
            if let ScriptResult::Analyzed(analysis) = script {
                if analysis.keywords_found.is_empty() && analysis.comments.is_empty() {
                    continue;
                }
                println!("   📜 {}", shorten(&analysis.url, 90));
                if !analysis.keywords_found.is_empty() {
                    println!("      🔑 keywords: {}", analysis.keywords_found.join(", "));
                }
                for comment in &analysis.comments {
                    println!("      💬 {}", comment);
                }
                if analysis.total_comments > analysis.comments.len() {
                    println!(
                        "      ... {} more comment(s)",
                        analysis.total_comments - analysis.comments.len()
                    );
                }
            }
        }
    }
}

pub fn print_probe_table(results: &[ProbeResult]) {
    println!("{:<70} {:<10}", "URL", "STATUS");
    println!("{}", "=".repeat(82));

    for result in results {
        match result {
            ProbeResult::Responded { url, status_code } => {
                println!("{:<70} {:<10}", shorten(url, 67), status_code)
            }
            ProbeResult::Failed { url, error } => {
                println!("{:<70} ⚠️  {}", shorten(url, 67), error)
            }
        }
    }

    let responded = results.iter().filter(|r| r.status_code().is_some()).count();
    println!();
    println!("📊 Summary:");
    println!("   ✅ Responded: {}", responded);
    println!("   ❌ No response: {}", results.len() - responded);
    println!("   📋 Total: {}", results.len());
}

fn format_status(status: Option<u16>, failed: bool) -> String {
    match (status, failed) {
        (Some(code), _) => code.to_string(),
        (None, true) => "ERROR".to_string(),
        (None, false) => "N/A".to_string(),
    }
}

// Truncates for display on a char boundary
fn shorten(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
