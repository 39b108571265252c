use ingredient_shop::config::AppConfig;
use ingredient_shop::infrastructure::session_store::DieselSessionStore;
use ingredient_shop::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Loads `.env` first so RUST_LOG from it applies.
    let config = AppConfig::from_env()?;
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let pool = create_pool(&config.database_url, config.db_pool_size)?;
    run_migrations(&pool)?;

    let purged = DieselSessionStore::new(pool.clone(), config.session_ttl).purge_expired()?;
    if purged > 0 {
        log::info!("purged {} expired cart session(s)", purged);
    }

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = AppState::from_pool(pool, config.session_ttl);
    build_server(state, &config.host, config.port)?.await?;
    Ok(())
}
