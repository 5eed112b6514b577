//! Text front-end over the discovery engine.
//!
//! Scans once per invocation (on the store's worker thread), then answers a
//! single query: list categories, page through a category, search, show
//! statistics, or launch an entry by exact name. `--json` switches every
//! listing to machine-readable output.

use anyhow::{Context, Result, bail};
use appdeck::config::parse_cap;
use appdeck::entry::truncate_chars;
use appdeck::logging::{self, LogOptions};
use appdeck::{
    AppEntry, Catalog, CatalogStore, DEFAULT_PAGE_SIZE, Launcher, Page, ScanConfig, ScanReport,
    Scope, paginate,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "appdeck")]
#[command(about = "Discover, categorize, search and launch installed applications")]
struct Cli {
    /// Descriptor directory to scan instead of the defaults (repeatable).
    #[arg(long = "manifest-dir", global = true)]
    manifest_dirs: Vec<PathBuf>,
    /// Maximum number of executables taken from the search path.
    #[arg(long, global = true, value_parser = parse_cap)]
    path_cap: Option<usize>,
    /// Skip the search-path scan entirely.
    #[arg(long, global = true)]
    no_path_scan: bool,
    /// Emit JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    /// Log level: trace, debug, info, warn, error.
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List non-empty categories with their entry counts.
    Categories,
    /// Show one page of a category (default: All).
    List {
        category: Option<String>,
        #[command(flatten)]
        paging: Paging,
    },
    /// Search names, descriptions and commands.
    Search {
        query: String,
        /// Restrict the search to one category.
        #[arg(long)]
        category: Option<String>,
        #[command(flatten)]
        paging: Paging,
    },
    /// Start an entry, detached, by its exact name.
    Launch { name: String },
    /// Totals, largest categories and scan diagnostics.
    Stats,
}

#[derive(clap::Args, Debug)]
struct Paging {
    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
}

impl Paging {
    fn index(&self) -> Result<usize> {
        if self.page == 0 {
            bail!("--page starts at 1");
        }
        Ok(self.page - 1)
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&LogOptions {
        level: cli.log_level.clone(),
        verbose: cli.verbose,
        quiet: cli.quiet,
    });

    let config = build_config(&cli)?;
    let launcher = Launcher::from_env();
    let store = CatalogStore::new(config);
    let report = store
        .request_scan()
        .context("starting application scan")?
        .wait()
        .context("waiting for application scan")?;
    let catalog = store.current();

    match &cli.command {
        Command::Categories => print_categories(&catalog, cli.json),
        Command::List { category, paging } => {
            let scope = Scope::parse(category.as_deref().unwrap_or(appdeck::ALL_SCOPE));
            let entries: Vec<&AppEntry> = catalog.scope(&scope).iter().collect();
            print_page(scope.name(), &entries, paging, cli.json)
        }
        Command::Search {
            query,
            category,
            paging,
        } => {
            let scope = Scope::parse(category.as_deref().unwrap_or(appdeck::ALL_SCOPE));
            let hits = catalog.search(&scope, query);
            if hits.is_empty() && !cli.json {
                println!("No applications found in {} for '{query}'", scope.name());
                return Ok(());
            }
            print_page(scope.name(), &hits, paging, cli.json)
        }
        Command::Launch { name } => {
            let Some(entry) = catalog.find(name) else {
                bail!("no application named '{name}'");
            };
            let launched = launcher.launch(entry)?;
            if cli.json {
                println!(
                    "{}",
                    json!({"name": launched.name, "program": launched.program, "pid": launched.pid})
                );
            } else {
                println!("Launched {} (pid {})", launched.name, launched.pid);
            }
            Ok(())
        }
        Command::Stats => print_stats(&catalog, &report, cli.json),
    }
}

fn build_config(cli: &Cli) -> Result<ScanConfig> {
    let mut config = ScanConfig::from_env()?;
    if !cli.manifest_dirs.is_empty() {
        config.manifest_dirs = cli.manifest_dirs.clone();
    }
    if let Some(cap) = cli.path_cap {
        config.path_cap = cap;
    }
    if cli.no_path_scan {
        config.search_path = None;
    }
    Ok(config)
}

fn print_categories(catalog: &Catalog, as_json: bool) -> Result<()> {
    let listed = catalog.list_categories();
    if as_json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }
    if catalog.is_empty() {
        println!("No applications found.");
        return Ok(());
    }
    for (idx, summary) in listed.iter().enumerate() {
        println!("{:2}. {:<20} ({} apps)", idx + 1, summary.name, summary.count);
    }
    Ok(())
}

fn print_page(scope: &str, entries: &[&AppEntry], paging: &Paging, as_json: bool) -> Result<()> {
    let page: Page<'_, &AppEntry> = paginate(entries, paging.page_size, paging.index()?)?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    println!(
        "{scope} ({} applications, page {} of {})",
        page.total_items,
        page.index + 1,
        page.total_pages.max(1)
    );
    for (offset, entry) in page.items.iter().enumerate() {
        println!(
            "{:3}. {:<40} [{}] {}",
            page.first_ordinal() + offset,
            truncate_chars(&entry.name, 40),
            entry.provenance.display_hint(),
            entry.truncated_description(30)
        );
    }
    if page.has_next() {
        println!("  more: --page {}", page.index + 2);
    }
    Ok(())
}

fn print_stats(catalog: &Catalog, report: &ScanReport, as_json: bool) -> Result<()> {
    let stats = catalog.stats();
    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({"catalog": stats, "scan": report}))?
        );
        return Ok(());
    }

    println!("Total applications: {}", stats.total);
    println!("Categories: {}", stats.categories);
    println!("Desktop applications: {}", stats.manifest_entries);
    println!("Command line tools: {}", stats.path_entries);
    println!("Top categories:");
    for (name, count) in stats.top(4) {
        println!("  {name}: {count}");
    }
    if report.cap_reached {
        println!("Search-path scan stopped at its cap.");
    }
    if !report.issues.is_empty() {
        println!("Skipped inputs: {}", report.issues.len());
    }
    Ok(())
}
