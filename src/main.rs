//! CLI entry point for catpress

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catpress::commands::list::ListKind;

#[derive(Parser)]
#[command(name = "catpress")]
#[command(version)]
#[command(about = "Generate a static site from category- and tag-indexed Markdown", long_about = None)]
struct Cli {
    /// Directory holding one sub-directory per content item
    content_dir: PathBuf,

    /// Directory the site is written to
    publish_dir: PathBuf,

    /// Site configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory with templates overriding the built-in ones
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Directory copied to <PUBLISH_DIR>/static (defaults to ./static next to CONTENT_DIR)
    #[arg(short, long)]
    static_dir: Option<PathBuf>,

    /// Delete the publish directory before generating
    #[arg(long)]
    clean: bool,

    /// Print the site's pages, categories or tags instead of publishing
    #[arg(short, long, value_enum)]
    list: Option<ListKind>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "catpress=debug,info"
    } else {
        "catpress=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut press = catpress::Press::new(&cli.content_dir, &cli.publish_dir)?;
    if let Some(config) = &cli.config {
        press = press
            .with_config_file(config)
            .with_context(|| format!("Failed to load config {:?}", config))?;
    }
    if let Some(templates) = cli.templates {
        press = press.with_templates_dir(templates)?;
    }
    if let Some(static_dir) = cli.static_dir {
        press = press.with_static_dir(static_dir)?;
    }

    if let Some(kind) = cli.list {
        catpress::commands::list::run(&press, kind)?;
        return Ok(());
    }

    tracing::info!("Generating {:?} -> {:?}", press.content_dir, press.publish_dir);
    let summary = catpress::commands::generate::run_with_options(&press, cli.clean)
        .context("Generation failed")?;

    println!(
        "Generated {} pages, {} categories, {} tags. Done in {:.2}s",
        summary.pages,
        summary.categories,
        summary.tags,
        summary.elapsed.as_secs_f64()
    );

    Ok(())
}
