use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use clap::Args;
use slctrips::catalog::{
    discover, load_destinations, pick_featured_scored, Destination, DiscoveryQuery, ScoredPick,
    DEFAULT_FEATURED_LIMIT, DEFAULT_PAGE_SIZE,
};
use slctrips::config::AppConfig;
use slctrips::error::AppError;
use slctrips::store::{DestinationStore, SupabaseStore};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct DiscoverArgs {
    /// CSV or JSON fixture holding the destinations
    #[arg(long)]
    pub(crate) seed: PathBuf,
    /// Free-text search over names, categories and descriptions
    #[arg(long)]
    pub(crate) query: Option<String>,
    #[arg(long)]
    pub(crate) category: Option<String>,
    #[arg(long)]
    pub(crate) subcategory: Option<String>,
    /// Drive-time band label, e.g. "90 minutes"
    #[arg(long)]
    pub(crate) band: Option<String>,
    /// name_asc, rating_desc or drive_time_asc
    #[arg(long)]
    pub(crate) sort: Option<String>,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub(crate) page_size: usize,
}

#[derive(Args, Debug)]
pub(crate) struct PicksArgs {
    /// CSV or JSON fixture holding the destinations
    #[arg(long)]
    pub(crate) seed: PathBuf,
    /// Date to score against (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    #[arg(long, default_value_t = DEFAULT_FEATURED_LIMIT)]
    pub(crate) limit: usize,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV or JSON file to upsert
    #[arg(long)]
    pub(crate) file: PathBuf,
}

pub(crate) fn run_discover(args: DiscoverArgs) -> Result<(), AppError> {
    let DiscoverArgs {
        seed,
        query,
        category,
        subcategory,
        band,
        sort,
        page_size,
    } = args;

    let destinations = load_destinations(&seed)?;
    let criteria = DiscoveryQuery {
        query,
        category,
        subcategory,
        band,
        sort,
    };
    let page = discover(&destinations, &criteria, page_size.max(1));

    println!(
        "Discovery ({} of {} destinations, sort {})",
        page.len(),
        destinations.len(),
        criteria.sort_key().as_str()
    );
    for line in render_destinations(&page) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_picks(args: PicksArgs) -> Result<(), AppError> {
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    let candidates = load_destinations(&args.seed)?;
    let picks = pick_featured_scored(&candidates, today, args.limit);

    println!("Today's picks for {today}");
    for line in render_picks(&picks) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) async fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = SupabaseStore::from_config(&config.supabase)?;
    let destinations = load_destinations(&args.file)?;
    let total = destinations.len();

    for destination in destinations {
        let name = destination.name.clone();
        store.upsert(destination).await?;
        println!("  upserted {name}");
    }

    info!(file = %args.file.display(), total, "destinations imported");
    println!("Imported {total} destinations");
    Ok(())
}

fn render_destinations(destinations: &[Destination]) -> Vec<String> {
    if destinations.is_empty() {
        return vec!["  No destinations match these filters.".to_string()];
    }

    destinations
        .iter()
        .enumerate()
        .map(|(index, destination)| {
            let rating = destination
                .rating
                .map(|rating| format!("{rating:.1}"))
                .unwrap_or_else(|| "unrated".to_string());
            format!(
                "  {:>2}. {} [{} / {}] {} min, {}",
                index + 1,
                destination.name,
                destination.category,
                destination.subcategory,
                destination.drive_time_minutes,
                rating
            )
        })
        .collect()
}

fn render_picks(picks: &[ScoredPick]) -> Vec<String> {
    picks
        .iter()
        .enumerate()
        .map(|(index, pick)| {
            format!(
                "  {:>2}. {} (score {:.1})",
                index + 1,
                pick.destination.name,
                pick.score
            )
        })
        .collect()
}
