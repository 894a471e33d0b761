use anyhow::{bail, Context};
use std::str::FromStr;
use std::time::Duration;

use wallery::catalog::{Catalog, Category, ListRequest, PublicLinks};
use wallery::config::Config;
use wallery::ingest::{ingest_artwork, IngestOptions};
use wallery::scheduler::RegenScheduler;

const USAGE: &str = "usage: wallery <command>

commands:
  ingest <file> <name> <category>   add an artwork and extract its colors
  palette                           regenerate the combined palette sheet
  list [page]                       print a page of artwork summaries as JSON
  stats                             print per-category artwork counts";

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::load_or_default()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("ingest") => {
            let [_, file, name, category] = args.as_slice() else {
                bail!("usage: wallery ingest <file> <name> <category>");
            };
            cmd_ingest(&config, file, name, category)
        }
        Some("palette") => cmd_palette(&config),
        Some("list") => {
            let page = match args.get(1) {
                Some(raw) => raw.parse().context("page must be an integer")?,
                None => 1,
            };
            cmd_list(&config, page)
        }
        Some("stats") => cmd_stats(&config),
        _ => {
            eprintln!("{USAGE}");
            Ok(())
        }
    }
}

fn cmd_ingest(config: &Config, file: &str, name: &str, category: &str) -> anyhow::Result<()> {
    let category = Category::from_str(category)?;
    let bytes = std::fs::read(file).with_context(|| format!("reading {file}"))?;

    let runtime = tokio::runtime::Runtime::new()?;
    let mut catalog = Catalog::open(&config.db_path)?;
    let scheduler = RegenScheduler::new(
        runtime.handle().clone(),
        config.db_path.clone(),
        config.assets_dir.clone(),
        Duration::from_secs(config.palette.debounce_secs),
        config.palette.tolerance,
    );

    let mut opts = IngestOptions::new(name, category);
    opts.count = config.extract.count;
    opts.quality = config.extract.quality;
    let artwork = ingest_artwork(&mut catalog, &scheduler, &config.assets_dir, &bytes, &opts)?;
    println!("ingested {} as {}", file, artwork.slug);

    // One-shot process: regenerate now instead of waiting out the debounce
    scheduler.cancel();
    cmd_palette(config)
}

fn cmd_palette(config: &Config) -> anyhow::Result<()> {
    match RegenScheduler::run_once(&config.db_path, &config.assets_dir, config.palette.tolerance)? {
        Some(path) => println!("palette written to {}", path.display()),
        None => println!("catalog is empty, nothing to render"),
    }
    Ok(())
}

fn cmd_list(config: &Config, page: i64) -> anyhow::Result<()> {
    let catalog = Catalog::open(&config.db_path)?;
    let links = PublicLinks::from_config(config);
    let req = ListRequest {
        page,
        ..ListRequest::default()
    };
    let res = catalog.list(&req, &links)?;
    println!("{}", serde_json::to_string_pretty(&res)?);
    Ok(())
}

fn cmd_stats(config: &Config) -> anyhow::Result<()> {
    let catalog = Catalog::open(&config.db_path)?;
    let stats = catalog.stats()?;
    if stats.is_empty() {
        println!("catalog is empty");
        return Ok(());
    }
    for (category, count) in stats {
        println!("{category:>10}  {count}");
    }
    Ok(())
}
