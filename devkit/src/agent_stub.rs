/*!
Stub d'agent HTTP pour développement sans poste de travail réel

Accepte n'importe quelle route, enregistre chaque requête reçue
(méthode, chemin, corps) et répond avec un statut configurable.
Peut retenir ses réponses pour observer l'état optimiste en vol.
*/

use anyhow::Result;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Router;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::Notify;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

#[derive(Clone)]
struct StubState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: Arc<AtomicU16>,
    held: Arc<AtomicBool>,
    gate: Arc<Notify>,
}

/// Agent factice qui simule l'API HTTP d'un poste géré
pub struct AgentStub {
    addr: SocketAddr,
    state: StubState,
}

impl AgentStub {
    /// Démarre le stub sur un port éphémère local (répond 200 par défaut).
    pub async fn spawn() -> Result<Self> {
        env_logger::try_init().ok(); // init logging pour tests

        let state = StubState {
            requests: Arc::new(Mutex::new(Vec::new())),
            status: Arc::new(AtomicU16::new(200)),
            held: Arc::new(AtomicBool::new(false)),
            gate: Arc::new(Notify::new()),
        };

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                log::error!("[stub] agent stub terminated: {e}");
            }
        });

        log::info!("[stub] agent stub listening on {addr}");
        Ok(Self { addr, state })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Statut renvoyé aux prochaines requêtes (ex: 500 pour simuler un refus).
    pub fn set_status(&self, status: u16) {
        self.state.status.store(status, Ordering::SeqCst);
    }

    /// Retient les réponses en vol jusqu'à release_responses().
    pub fn hold_responses(&self) {
        self.state.held.store(true, Ordering::SeqCst);
    }

    pub fn release_responses(&self) {
        self.state.held.store(false, Ordering::SeqCst);
        self.state.gate.notify_waiters();
    }

    /// Toutes les requêtes reçues (pour assertions de tests).
    pub fn received(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Nombre de requêtes reçues sur un chemin donné.
    pub fn count_for(&self, path: &str) -> usize {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    /// Reset des requêtes enregistrées.
    pub fn clear(&self) {
        self.state.requests.lock().unwrap().clear();
    }
}

async fn handle(State(state): State<StubState>, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, 1024 * 1024)
        .await
        .unwrap_or_default();

    let record = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        body: bytes.to_vec(),
    };
    log::debug!("[stub] {} {} ({} bytes)", record.method, record.path, record.body.len());
    state.requests.lock().unwrap().push(record);

    // la requête est enregistrée avant la rétention : les tests peuvent
    // observer l'état pendant que la réponse est retenue
    while state.held.load(Ordering::SeqCst) {
        state.gate.notified().await;
    }

    let code = StatusCode::from_u16(state.status.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Response::builder()
        .status(code)
        .body(Body::empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_records_requests() {
        let stub = AgentStub::spawn().await.unwrap();
        let client = reqwest::Client::new();

        let res = client
            .post(format!("{}/idle/lock", stub.base_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);

        let received = stub.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].method, "POST");
        assert_eq!(received[0].path, "/idle/lock");
        assert_eq!(stub.count_for("/idle/lock"), 1);
        assert_eq!(stub.count_for("/idle/unlock"), 0);
    }

    #[tokio::test]
    async fn test_stub_configurable_status() {
        let stub = AgentStub::spawn().await.unwrap();
        stub.set_status(503);
        let client = reqwest::Client::new();

        let res = client
            .post(format!("{}/idle/lock", stub.base_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 503);
    }

    #[tokio::test]
    async fn test_stub_records_body() {
        let stub = AgentStub::spawn().await.unwrap();
        let client = reqwest::Client::new();

        client
            .post(format!("{}/notify", stub.base_url()))
            .json(&serde_json::json!({ "summary": "s", "body": "b" }))
            .send()
            .await
            .unwrap();

        let received = stub.received();
        let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(body["summary"], "s");
    }

    #[tokio::test]
    async fn test_hold_then_release() {
        let stub = AgentStub::spawn().await.unwrap();
        stub.hold_responses();
        let client = reqwest::Client::new();

        let url = format!("{}/idle/inhibit", stub.base_url());
        let task = tokio::spawn(async move { client.post(url).send().await });

        // la requête arrive mais la réponse est retenue
        for _ in 0..200 {
            if stub.count_for("/idle/inhibit") > 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(stub.count_for("/idle/inhibit"), 1);
        assert!(!task.is_finished());

        stub.release_responses();
        let res = task.await.unwrap().unwrap();
        assert_eq!(res.status().as_u16(), 200);
    }
}
