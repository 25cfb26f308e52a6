// src/cli.rs
// =============================================================================
// Command-line interface, built with clap's derive API.
//
// Three subcommands, one per mode:
//   sara crawl <targets>...   recursive crawl and page inspection
//   sara dirs <url>           directory enumeration
//   sara subs <domain>        subdomain enumeration
//
// Output and logging flags are global and work with every subcommand.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use sara::fetch::Method;

#[derive(Parser, Debug)]
#[command(
    name = "sara",
    version,
    about = "Security Assistant Researcher Analyzer: crawl, inspect and enumerate web applications",
    long_about = "sara crawls web applications and reports security-relevant signals \
                  (missing security headers, comments and keywords in JavaScript, inline scripts), \
                  or brute-forces directories and subdomains from a wordlist.",
    after_help = "Examples:\n  \
                  sara crawl https://example.com\n  \
                  sara crawl urls.txt -H headers.txt -k keywords.txt --max-depth 2\n  \
                  sara crawl https://example.com --without-js --without-headers-analysis\n  \
                  sara dirs https://example.com --wordlist dirs.txt\n  \
                  sara subs example.com --http\n  \
                  sara crawl https://example.com -o results.json"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print results as JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// Also save the results as JSON to this file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Do not show the progress spinner
    #[arg(long, global = true)]
    pub no_progress: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl URLs and analyze every page, its headers and its scripts
    ///
    /// Example: sara crawl https://example.com --max-depth 2
    Crawl(CrawlArgs),

    /// Enumerate directories under a URL
    ///
    /// Example: sara dirs https://example.com --wordlist dirs.txt
    Dirs(DirsArgs),

    /// Enumerate subdomains of a domain
    ///
    /// Example: sara subs example.com
    Subs(SubsArgs),
}

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// URLs to crawl, or files with one URL per line
    #[arg(required = true, num_args = 1..)]
    pub targets: Vec<String>,

    /// Request header "Name: value", or a file of them (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Keyword to look for in JavaScript files, or a file of keywords (repeatable)
    #[arg(short, long = "keyword", value_name = "KEYWORD")]
    pub keywords: Vec<String>,

    /// Maximum crawl depth; 1 = only the given pages
    #[arg(long, default_value_t = 1, value_parser = parse_depth)]
    pub max_depth: usize,

    /// No depth limit: ask before following the links of each page
    #[arg(long, conflicts_with = "max_depth")]
    pub ask: bool,

    /// Answer yes to every --ask prompt
    #[arg(long, requires = "ask")]
    pub yes: bool,

    /// Only follow links on the same host as the starting URL
    #[arg(long)]
    pub same_host: bool,

    /// Render pages in headless Chromium (needs the `headless` build feature)
    #[arg(long)]
    pub headless: bool,

    /// Skip analysis of JavaScript files
    #[arg(long = "without-js")]
    pub without_js: bool,

    /// Skip analysis of response headers
    #[arg(long = "without-headers-analysis")]
    pub without_headers_analysis: bool,

    /// HTTP method for page requests
    #[arg(short = 'X', long, value_enum, ignore_case = true, default_value_t = Method::Get)]
    pub method: Method,

    /// Request body sent with every page request
    #[arg(short, long, value_name = "BODY")]
    pub data: Option<String>,

    /// Delay between starting sibling page fetches, in milliseconds
    #[arg(long, default_value_t = 0, value_name = "MS")]
    pub delay_ms: u64,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, default_value_t = 10, value_name = "SECS")]
    pub timeout: u64,

    /// Timeout for each headless render, in seconds
    #[arg(long, default_value_t = 30, value_name = "SECS")]
    pub render_timeout: u64,
}

// Options shared by both enumeration modes
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// File with one entry per line (default: built-in list)
    #[arg(short, long, value_name = "FILE")]
    pub wordlist: Option<PathBuf>,

    /// Request header "Name: value", or a file of them (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Shortest pause after each request, in milliseconds
    #[arg(long, default_value_t = 1_000, value_name = "MS")]
    pub min_delay_ms: u64,

    /// Longest pause after each request, in milliseconds
    #[arg(long, default_value_t = 5_000, value_name = "MS")]
    pub max_delay_ms: u64,

    /// Timeout for each request, in seconds
    #[arg(long, default_value_t = 10, value_name = "SECS")]
    pub timeout: u64,
}

#[derive(Args, Debug)]
pub struct DirsArgs {
    /// Base URL (or a file holding exactly one URL)
    #[arg(required = true, num_args = 1..)]
    pub targets: Vec<String>,

    #[command(flatten)]
    pub probe: ProbeArgs,
}

#[derive(Args, Debug)]
pub struct SubsArgs {
    /// Bare domain such as example.com (or a file holding exactly one)
    #[arg(required = true, num_args = 1..)]
    pub targets: Vec<String>,

    /// Probe subdomains over http instead of https
    #[arg(long)]
    pub http: bool,

    #[command(flatten)]
    pub probe: ProbeArgs,
}

fn parse_depth(value: &str) -> Result<usize, String> {
    let depth: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if depth == 0 {
        return Err("depth starts at 1 (the starting page)".to_string());
    }
    Ok(depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_crawl_defaults() {
        let cli = Cli::try_parse_from(["sara", "crawl", "https://example.com"]).unwrap();
        let Commands::Crawl(args) = cli.command else {
            panic!("expected crawl");
        };
        assert_eq!(args.targets, vec!["https://example.com"]);
        assert_eq!(args.max_depth, 1);
        assert_eq!(args.method, Method::Get);
        assert!(!args.ask);
        assert_eq!(args.timeout, 10);
    }

    #[test]
    fn test_crawl_full_options() {
        let cli = Cli::try_parse_from([
            "sara", "crawl", "https://a.test", "https://b.test", "-H", "Cookie: x=1", "-k", "token", "-k",
            "secret", "--max-depth", "3", "-X", "post", "-d", "q=1", "--without-js", "--json", "-o",
            "out.json",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        let Commands::Crawl(args) = cli.command else {
            panic!("expected crawl");
        };
        assert_eq!(args.targets.len(), 2);
        assert_eq!(args.keywords, vec!["token", "secret"]);
        assert_eq!(args.max_depth, 3);
        assert_eq!(args.method, Method::Post);
        assert_eq!(args.data.as_deref(), Some("q=1"));
        assert!(args.without_js);
    }

    #[test]
    fn test_depth_zero_rejected() {
        assert!(Cli::try_parse_from(["sara", "crawl", "https://a.test", "--max-depth", "0"]).is_err());
    }

    #[test]
    fn test_ask_conflicts_with_max_depth() {
        assert!(Cli::try_parse_from(["sara", "crawl", "https://a.test", "--ask", "--max-depth", "2"]).is_err());
        assert!(Cli::try_parse_from(["sara", "crawl", "https://a.test", "--ask", "--yes"]).is_ok());
        assert!(Cli::try_parse_from(["sara", "crawl", "https://a.test", "--yes"]).is_err());
    }

    #[test]
    fn test_subs_options() {
        let cli = Cli::try_parse_from([
            "sara", "subs", "example.com", "--http", "--min-delay-ms", "0", "--max-delay-ms", "0",
        ])
        .unwrap();
        let Commands::Subs(args) = cli.command else {
            panic!("expected subs");
        };
        assert!(args.http);
        assert_eq!(args.probe.max_delay_ms, 0);
        assert!(args.probe.wordlist.is_none());
    }
}
