use std::sync::Arc;

use anyhow::Context;

use gatekeeper_api::app::services::{InMemoryUserStore, NewUser};
use gatekeeper_api::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gatekeeper_observability::init();

    let settings = Settings::from_env()?;
    let users = Arc::new(InMemoryUserStore::new());

    if let Some(email) = &settings.admin_email {
        let admin = users
            .create(NewUser::new(email, "Admin", "User").admin().verified())
            .context("failed to seed admin account")?;
        tracing::info!(user_id = %admin.id, "seeded admin account");
    }

    let app = gatekeeper_api::app::build_app(&settings, users);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
