//! Catalog Harvester main entry point
//!
//! This is the command-line interface for the catalog harvester.

use anyhow::Context;
use catalog_harvester::config::{load_config_with_hash, Config};
use catalog_harvester::crawler::{build_http_client, HttpRenderer};
use catalog_harvester::output::{print_summary, read_url_list, CsvOutput};
use catalog_harvester::DiscoveryPipeline;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Catalog Harvester: product and variant URL discovery
///
/// Crawls the configured category listings to collect every product URL,
/// then expands each product into its size and color variant URLs.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvester")]
#[command(version)]
#[command(about = "Product and variant URL discovery for e-commerce catalogs", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Skip category crawling and expand the products listed in FILE
    #[arg(long, value_name = "FILE")]
    product_list: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config, cli.product_list.as_deref());
        return Ok(());
    }

    let result = match &cli.product_list {
        Some(path) => handle_variants_only(&config, path).await,
        None => handle_harvest(&config).await,
    };

    if let Err(e) = &result {
        tracing::error!("Harvest failed: {:#}", e);
    }
    result
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvester=info,warn"),
            1 => EnvFilter::new("catalog_harvester=debug,info"),
            2 => EnvFilter::new("catalog_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config, product_list: Option<&Path>) {
    println!("=== Catalog Harvester Dry Run ===\n");

    println!("Site: {}", config.site.base_url);
    println!("User agent: {}", config.user_agent.header_value());

    println!("\nCrawler:");
    println!("  Page timeout: {}s", config.crawler.page_timeout_secs);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Inter-page delay: {}ms", config.crawler.inter_page_delay_ms);

    println!("\nAPI:");
    println!("  Facets: {}", config.api.facet_endpoint);
    println!("  Resolution: {}", config.api.resolve_endpoint);
    println!(
        "  Facet names: size '{}', color '{}'",
        config.api.size_facet, config.api.color_facet
    );

    println!("\nOutput:");
    println!("  Products: {}", config.output.products_path);
    println!("  Variants: {}", config.output.variants_path);

    match product_list {
        Some(path) => {
            println!("\n✓ Configuration is valid");
            println!("✓ Would expand the products listed in {}", path.display());
        }
        None => {
            println!("\nCategories ({}):", config.categories.len());
            for category in &config.categories {
                println!("  - {}", category);
            }
            println!("\n✓ Configuration is valid");
            println!(
                "✓ Would crawl {} categories",
                config.categories.len()
            );
        }
    }
}

/// Handles the default mode: both stages
async fn handle_harvest(config: &Config) -> anyhow::Result<()> {
    let categories = config
        .categories
        .iter()
        .map(|c| Url::parse(c).with_context(|| format!("invalid category URL {}", c)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let client = build_http_client(&config.user_agent)?;
    let renderer = HttpRenderer::new(client.clone());
    let mut pipeline = DiscoveryPipeline::from_config(config, renderer, client)?;
    let mut output = CsvOutput::new(&config.output.products_path, &config.output.variants_path);

    let summary = pipeline.run(&categories, &mut output).await?;
    tracing::info!("Harvest completed successfully");
    print_summary(&summary);

    Ok(())
}

/// Handles the --product-list mode: variant stage only
async fn handle_variants_only(config: &Config, product_list: &Path) -> anyhow::Result<()> {
    let products = read_url_list(product_list)?;
    tracing::info!(
        "Loaded {} product URLs from {}",
        products.len(),
        product_list.display()
    );

    let client = build_http_client(&config.user_agent)?;
    let renderer = HttpRenderer::new(client.clone());
    let mut pipeline = DiscoveryPipeline::from_config(config, renderer, client)?;
    let mut output = CsvOutput::new(&config.output.products_path, &config.output.variants_path);

    let summary = pipeline.run_variants_only(products, &mut output).await?;
    tracing::info!("Variant expansion completed successfully");
    print_summary(&summary);

    Ok(())
}
