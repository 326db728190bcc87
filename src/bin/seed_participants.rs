use dotenvy::dotenv;
use std::env;

use roster::config::Config;
use roster::database;
use roster::services::participant_service;

// Usage: seed_participants <count>   (or SEED_COUNT=<count>)
#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            std::process::exit(2);
        }
    };

    let raw = env::args()
        .nth(1)
        .or_else(|| env::var("SEED_COUNT").ok())
        .unwrap_or_else(|| "1".to_string());
    let Ok(count) = raw.trim().parse::<i64>() else {
        eprintln!("count must be an integer, got {:?}", raw);
        std::process::exit(2);
    };

    let pool = match database::connect(&config.database_url).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("cannot open store: {}", e);
            std::process::exit(1);
        }
    };

    let result = participant_service::add_batch(&pool, count, config.max_batch).await;
    database::close(pool).await;

    match result {
        Ok(outcome) => println!(
            "seeded {} participants ({})",
            outcome.count(),
            outcome.range_label()
        ),
        Err(e) => {
            eprintln!("seeding failed: {}", e);
            std::process::exit(1);
        }
    }
}
