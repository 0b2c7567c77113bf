/**
 * VIGIL KERNEL - Point d'entrée du service de gestion des postes
 *
 * RÔLE : Bootstrap des modules : config, registre, dispatcher, inhibit,
 * notifier, serveur HTTP. Gestion d'erreurs et logging au démarrage.
 *
 * ARCHITECTURE : Registre en mémoire + relais HTTP vers les agents des
 * postes. La couche de présentation consomme l'API REST et polle la
 * révision du registre.
 */

mod config;
mod dispatch;
mod http;
mod inhibit;
mod models;
mod notify;
mod registry;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::dispatch::ActionDispatcher;
use crate::inhibit::InhibitController;
use crate::notify::Notifier;
use crate::registry::HostRegistry;
use crate::state::new_state;

#[tokio::main]
async fn main() -> Result<()> {
    // Variables d'environnement depuis .env (si présent)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = config::load_config().await;

    // registre partagé + coeur
    let registry = new_state(HostRegistry::new());
    let dispatcher = ActionDispatcher::new();
    let inhibit = InhibitController::new(registry.clone(), dispatcher.clone());
    let notifier = Notifier::new();

    let app_state = http::AppState { registry, dispatcher, inhibit, notifier };
    let app = http::build_router(app_state);

    let addr: SocketAddr = format!("{}:{}", cfg.http.host, cfg.http.port)
        .parse()
        .context("invalid http bind address")?;
    info!("vigil kernel listening on http://{addr}");

    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind http listener")?;
    axum::serve(listener, app)
        .await
        .context("http server terminated")?;

    Ok(())
}
