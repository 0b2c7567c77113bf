/**
 * NOTIFIER - Envoi de notifications bureau vers un poste
 *
 * RÔLE : Relais fire-and-forget vers l'endpoint /notify de l'agent.
 * Même taxinomie d'erreurs que le dispatcher, aucune file, aucun retry.
 *
 * CONTRAT AGENT : POST {base}/notify avec un corps JSON
 * { "summary", "body", "urgency", "timeout", "id" }, timeout en
 * millisecondes. Le champ id est le handle de remplacement de l'agent;
 * il est obligatoire côté agent et toujours envoyé à 0 (pas de
 * remplacement), le kernel ne l'expose pas.
 */

use crate::dispatch::DispatchError;
use crate::models::{Host, Notification};
use serde_json::json;
use tracing::{info, warn};

#[derive(Clone, Default)]
pub struct Notifier {
    client: reqwest::Client,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn send(&self, host: &Host, notification: &Notification) -> Result<(), DispatchError> {
        if notification.title.trim().is_empty() || notification.message.trim().is_empty() {
            // refus avant toute I/O
            return Err(DispatchError::InvalidNotification(
                "title and message are required",
            ));
        }

        let url = format!("{}/notify", host.base_url());
        info!(
            "sending notification \"{}\" to {} ({})",
            notification.title, host.name, url
        );

        let payload = json!({
            "summary": notification.title,
            "body": notification.message,
            "urgency": notification.urgency,
            "timeout": notification.timeout_ms,
            "id": 0,
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DispatchError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            warn!("notification to {} rejected by agent: {}", host.name, status);
            Err(DispatchError::RequestFailed(status.as_u16()))
        }
    }
}
