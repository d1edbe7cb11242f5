use std::env;
use std::process::ExitCode;
use std::time::Instant;

use pricedb::{NameTimeProjection, PriceDb};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::filter;
use tracing_subscriber::prelude::*;

fn main() -> ExitCode {
    let fmt_layer = tracing_subscriber::fmt::layer().compact();
    let filter_layer =
        filter::EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: pricedb <prices.csv> [card name]");
        return ExitCode::FAILURE;
    };
    let card = args.next();

    let mut db = PriceDb::new();
    let started = Instant::now();
    let rows = match db.ingest_csv(&path) {
        Ok(rows) => rows,
        Err(err) => {
            error!("ingest of {path} failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!(rows, elapsed = ?started.elapsed(), "loaded {path}");

    // A taste of the query surface: whole-column aggregate, a price band
    // and the projection-backed latest-group lookup.
    println!("rows ingested:     {rows}");
    println!("total cents:       {}", db.prices.sum());

    let started = Instant::now();
    let mut band = db.prices.more(1_000_000);
    band.and(&db.prices.less(1_100_000));
    println!(
        "$10k..$11k prices: {} ({:?})",
        band.count_ones(),
        started.elapsed()
    );

    if let Some(name) = card {
        let started = Instant::now();
        let projection = NameTimeProjection::from_price_db(&db);
        info!(elapsed = ?started.elapsed(), "built (name, time) projection");

        let started = Instant::now();
        let query = projection.latest(&name);
        let mut group = projection.materialize_from_bools(&query);
        group.sort_unstable_by_key(|t| t.price);

        println!("latest group for '{name}' ({:?}):", started.elapsed());
        if group.is_empty() {
            println!("  no such card");
        }
        for tuple in group.iter().rev() {
            println!(
                "  {} cents  {}  {}",
                tuple.price,
                tuple.time.format("%Y-%m-%d %H:%M:%S"),
                tuple.set
            );
        }
    }

    ExitCode::SUCCESS
}
