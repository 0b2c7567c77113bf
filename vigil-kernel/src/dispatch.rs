/**
 * ACTION DISPATCHER - Relais des actions idle vers les agents des postes
 *
 * RÔLE : Traduit un nom d'action symbolique en requête HTTP vers l'agent
 * du poste ciblé. Une tentative unique, succès ou échec, rien d'autre.
 *
 * FONCTIONNEMENT :
 * - Table statique action -> (méthode, chemin) : source de vérité unique
 * - Action inconnue : échec immédiat, aucune requête émise
 * - Requête avec Content-Type application/json, corps vide
 * - Statut hors 2xx -> RequestFailed, faute transport -> NetworkError
 *
 * Le dispatcher ne mutera jamais le registre : les changements d'état
 * appartiennent aux appelants (cf. contrôleur inhibit).
 */

use crate::models::Host;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("agent returned status {0}")]
    RequestFailed(u16),
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("invalid notification: {0}")]
    InvalidNotification(&'static str),
}

/// Table statique des actions supportées par les agents.
/// Les chemins font partie du contrat agent : ne pas les modifier.
pub fn resolve(action: &str) -> Option<(Method, &'static str)> {
    match action {
        "lock" => Some((Method::POST, "/idle/lock")),
        "unlock" => Some((Method::POST, "/idle/unlock")),
        "simulate-activity" => Some((Method::POST, "/idle/simulate_user_activity")),
        "inhibit" => Some((Method::POST, "/idle/inhibit")),
        "uninhibit" => Some((Method::POST, "/idle/uninhibit")),
        _ => None,
    }
}

#[derive(Clone, Default)]
pub struct ActionDispatcher {
    client: reqwest::Client,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exécute une action sur l'agent d'un hôte. Une seule tentative,
    /// pas de retry, pas de timeout configuré.
    pub async fn execute(&self, host: &Host, action: &str) -> Result<(), DispatchError> {
        let Some((method, path)) = resolve(action) else {
            return Err(DispatchError::UnknownAction(action.to_string()));
        };

        let url = format!("{}{}", host.base_url(), path);
        info!("executing {} on {} ({})", action, host.name, url);

        let response = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| DispatchError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            warn!("{} on {} rejected by agent: {}", action, host.name, status);
            Err(DispatchError::RequestFailed(status.as_u16()))
        }
    }
}
