use anyhow::Context;

use supplyline_app::AppContext;
use supplyline_backend::BackendConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Endpoint values may come from a .env during development.
    let _ = dotenvy::dotenv();
    supplyline_observability::init();

    // Fail fast: without both endpoint values there is nothing to run.
    let config = BackendConfig::from_env().context("backend configuration")?;
    let app = AppContext::bootstrap(config).await;

    log_session(&app).await;

    // Headless shell: follow identity changes until interrupted; every
    // change re-resolves the profile and rebuilds the menu, exactly as the
    // rendering shell would.
    let mut session = app.session().clone();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = session.changed() => log_session(&app).await,
        }
    }

    tracing::info!("shutting down");
    Ok(())
}

async fn log_session(app: &AppContext) {
    match app.profile().await {
        Some(profile) => {
            tracing::info!("signed in as {} ({})", profile.full_name, profile.role);
        }
        None => tracing::info!("signed out"),
    }
    for item in app.menu().await {
        tracing::info!("menu: {} -> {}", item.label, item.route.path());
    }
}
