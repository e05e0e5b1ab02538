//! Catalog API demonstrating searched, sorted, paged and shaped listings
//!
//! Run with `cargo run --example catalog_api`, then try:
//!
//! ```text
//! GET /coins?search=pesos&orderBy=Year desc&fields=Id,Type,Year
//! GET /collections?orderBy=OwnerAge&pageSize=1&page=2
//! GET /collections/{id}/coins?orderBy=Value desc
//! ```
//!
//! Set `SHELF_CONFIG` to a YAML file to override page limits.

use chrono::TimeZone;
use shelf::prelude::*;
use tracing_subscriber::EnvFilter;

fn born(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .ok_or_else(|| anyhow::anyhow!("invalid date {}-{}-{}", year, month, day))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,shelf=debug")),
        )
        .init();

    let config = match std::env::var("SHELF_CONFIG") {
        Ok(path) => QueryConfig::from_yaml_file(path)?,
        Err(_) => QueryConfig::default(),
    };

    // Seed collections
    let americas = Collection::new("Americas", "Ana", "Ruiz", born(1985, 3, 2)?)
        .with_description("Coins and notes from the Americas");
    let europe = Collection::new("Europe", "Jonas", "Berg", born(1962, 11, 20)?)
        .with_description("Pre-euro currencies");

    let coins = vec![
        Coin::new(americas.id, "Pesos", "Mexico", 1.0)
            .with_year(1921)
            .with_metal("Silver"),
        Coin::new(americas.id, "Dollars", "Canada", 2.0).with_year(1996),
        Coin::new(americas.id, "Centavos", "Brazil", 50.0).with_year(1994),
        Coin::new(europe.id, "Francs", "France", 10.0)
            .with_year(1987)
            .with_metal("Nickel"),
        Coin::new(europe.id, "Marks", "Germany", 5.0).with_year(1975),
    ];

    let banknotes = vec![
        Banknote::new(americas.id, "Dollars", "Canada", 20.0)
            .with_year(2012)
            .with_serial_number("FTV1234567"),
        Banknote::new(europe.id, "Lire", "Italy", 1000.0).with_year(1990),
    ];

    let collection_ids = (americas.id, europe.id);
    let server = ServerBuilder::new(catalog_mappings()?)
        .with_config(config)
        .register_resource::<Collection, CollectionDto>(InMemoryDataService::with_entities([
            americas, europe,
        ]))
        .register_nested_resource::<Coin, CoinDto>(
            InMemoryDataService::with_entities(coins),
            "collections",
            "collection_id",
        )
        .register_nested_resource::<Banknote, BanknoteDto>(
            InMemoryDataService::with_entities(banknotes),
            "collections",
            "collection_id",
        );

    tracing::info!(
        americas = %collection_ids.0,
        europe = %collection_ids.1,
        "seeded catalog"
    );

    server.serve("127.0.0.1:3000").await
}
