// src/main.rs
// =============================================================================
// Entry point of the sara CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, written to stderr)
// 3. Turn raw arguments into validated inputs (targets, headers, keywords)
// 4. Dispatch to the crawl / dirs / subs handler
// 5. Print or save the results
// 6. Exit with a code: 0 = success, 1 = bad input, 2 = unexpected error
//
// Rust concepts used:
// - async/await: many pages are fetched concurrently
// - Arc<dyn Trait>: the crawler does not care which fetcher it gets
// - anyhow::Error::downcast_ref: recover the typed error to pick an exit code
// =============================================================================

mod cli;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, CrawlArgs, DirsArgs, SubsArgs};
use progress::Progress;
use sara::crawl::{
    Confirm, CrawlRequest, CrawlScope, Crawler, DepthLimit, FixedAnswer, SeedReport, StdinConfirm,
};
use sara::enumerate::{
    enumerate_directories, enumerate_subdomains, DelayRange, Scheme, DEFAULT_DIRECTORIES,
    DEFAULT_SUBDOMAINS,
};
use sara::error::InputError;
use sara::fetch::{Fetcher, HttpFetcher};
use sara::input;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Bad input is the user's to fix; anything else is on us
            if let Some(input_error) = e.downcast_ref::<InputError>() {
                error!("{}", input_error);
                1
            } else {
                error!("{:#}", e);
                2
            }
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let show_progress = !cli.no_progress && !cli.quiet;

    match &cli.command {
        Commands::Crawl(args) => handle_crawl(&cli, args, show_progress).await,
        Commands::Dirs(args) => handle_dirs(&cli, args, show_progress).await,
        Commands::Subs(args) => handle_subs(&cli, args, show_progress).await,
    }
}

// RUST_LOG wins when set; otherwise -v / -q pick the level for our own
// crate and everything else stays at warn
fn init_logging(verbose: bool, quiet: bool) {
    let level = match (verbose, quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sara={},warn", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// Handles the 'crawl' subcommand
async fn handle_crawl(cli: &Cli, args: &CrawlArgs, show_progress: bool) -> Result<i32> {
    let targets = input::load_targets(&args.targets)?;
    let seeds = input::require_urls(&targets, "crawl")?;
    let headers = input::load_headers(&args.headers)?;
    let keywords = input::load_keywords(&args.keywords)?;

    let depth_limit = if args.ask {
        DepthLimit::AskToContinue
    } else {
        DepthLimit::Bounded(args.max_depth)
    };
    let scope = if args.same_host {
        CrawlScope::SameHost
    } else {
        CrawlScope::AnyHost
    };

    info!(seeds = seeds.len(), depth = ?depth_limit, "starting crawl");
    debug!(?keywords, headers = headers.len(), "crawl inputs");

    // Scripts are always fetched directly, even when pages are rendered
    let scripts: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(Duration::from_secs(args.timeout))?);
    let pages: Arc<dyn Fetcher> = if args.headless {
        headless_fetcher(Duration::from_secs(args.render_timeout)).await?
    } else {
        scripts.clone()
    };
    let confirm: Arc<dyn Confirm> = if args.yes {
        Arc::new(FixedAnswer(true))
    } else {
        Arc::new(StdinConfirm::new())
    };

    let crawler = Crawler::new(pages, scripts)
        .with_confirm(confirm)
        .with_sibling_delay(Duration::from_millis(args.delay_ms));

    let requests = seeds.iter().map(|seed| CrawlRequest {
        url: seed.clone(),
        method: args.method,
        headers: headers.clone(),
        body: args.data.as_ref().map(|data| data.clone().into_bytes()),
        depth_limit,
        skip_js_analysis: args.without_js,
        skip_header_analysis: args.without_headers_analysis,
        keywords: keywords.clone(),
        scope,
    });

    // A spinner would fight with the --ask prompts for the terminal
    let progress = Progress::start(show_progress && !args.ask, format!("Crawling {} target(s)", seeds.len()));
    let started = Instant::now();

    // Every seed is crawled independently and at the same time
    let outcomes = join_all(requests.map(|request| crawler.crawl(request))).await;
    progress.finish();

    let reports: Vec<SeedReport> = seeds
        .into_iter()
        .zip(outcomes)
        .map(|(seed, pages)| SeedReport { seed, pages })
        .collect();

    output::emit(reports.as_slice(), cli.json, cli.output.as_deref(), output::print_crawl_table)?;

    report_elapsed(cli.json, started);
    Ok(0)
}

#[cfg(feature = "headless")]
async fn headless_fetcher(timeout: Duration) -> Result<Arc<dyn Fetcher>> {
    let fetcher = sara::fetch::HeadlessFetcher::launch(timeout).await?;
    Ok(Arc::new(fetcher))
}

#[cfg(not(feature = "headless"))]
async fn headless_fetcher(_timeout: Duration) -> Result<Arc<dyn Fetcher>> {
    Err(InputError::HeadlessUnavailable.into())
}

// Handles the 'dirs' subcommand
async fn handle_dirs(cli: &Cli, args: &DirsArgs, show_progress: bool) -> Result<i32> {
    let targets = input::load_targets(&args.targets)?;
    let base_url = input::require_single_url(&targets, "dirs")?;
    let headers = input::load_headers(&args.probe.headers)?;
    let wordlist = input::load_wordlist(args.probe.wordlist.as_deref(), &DEFAULT_DIRECTORIES)?;

    let fetcher = HttpFetcher::new(Duration::from_secs(args.probe.timeout))?;
    let delay = DelayRange::from_millis(args.probe.min_delay_ms, args.probe.max_delay_ms);

    let progress = Progress::start(show_progress, format!("Probing {} path(s)", wordlist.len()));
    let started = Instant::now();
    let results = enumerate_directories(&fetcher, &base_url, &wordlist, &headers, delay).await;
    progress.finish();

    output::emit(results.as_slice(), cli.json, cli.output.as_deref(), output::print_probe_table)?;
    report_elapsed(cli.json, started);
    Ok(0)
}

// Handles the 'subs' subcommand
async fn handle_subs(cli: &Cli, args: &SubsArgs, show_progress: bool) -> Result<i32> {
    let targets = input::load_targets(&args.targets)?;
    let domain = input::require_single_domain(&targets, "subs")?;
    let headers = input::load_headers(&args.probe.headers)?;
    let wordlist = input::load_wordlist(args.probe.wordlist.as_deref(), &DEFAULT_SUBDOMAINS)?;
    let scheme = if args.http { Scheme::Http } else { Scheme::Https };

    let fetcher = HttpFetcher::new(Duration::from_secs(args.probe.timeout))?;
    let delay = DelayRange::from_millis(args.probe.min_delay_ms, args.probe.max_delay_ms);

    let progress = Progress::start(show_progress, format!("Probing {} subdomain(s)", wordlist.len()));
    let started = Instant::now();
    let results = enumerate_subdomains(&fetcher, &domain, &wordlist, scheme, &headers, delay).await;
    progress.finish();

    output::emit(results.as_slice(), cli.json, cli.output.as_deref(), output::print_probe_table)?;
    report_elapsed(cli.json, started);
    Ok(0)
}

// Kept out of JSON output so stdout stays parseable
fn report_elapsed(json: bool, started: Instant) {
    if !json {
        println!("⏱️  Finished in {:.2}s", started.elapsed().as_secs_f64());
    }
}
