use std::io;

use anyhow::{Context, Result};
use log::LevelFilter;
use route_finder::{AppConfig, Menu, QueryCatalog, RouteRepository};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let conn = config
        .sqlite()
        .open()
        .with_context(|| format!("cannot use database {}", config.db_path.display()))?;
    let mut repo = RouteRepository::new(conn, QueryCatalog::new());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = Menu::new(&mut repo, stdin.lock(), stdout.lock(), config.invalid_choice).run();

    let closed = repo.close();
    outcome?;
    closed?;
    Ok(())
}
