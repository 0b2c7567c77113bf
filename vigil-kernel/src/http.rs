/**
 * API REST VIGIL - Surface HTTP du kernel
 *
 * RÔLE :
 * Interface entre la couche de présentation (dashboard web, CLI, curl)
 * et le coeur : registre, dispatcher, contrôleur inhibit, notifier.
 *
 * FONCTIONNEMENT :
 * - Serveur Axum, routes /health, /hosts, /hosts/{id}/...
 * - GET /hosts renvoie la révision du registre : la présentation la polle
 *   et re-rend à chaque changement (add, select, bascule inhibit, revert)
 * - Erreurs JSON standardisées {"error": "..."} (400, 404, 502)
 *
 * Un échec d'action reste local à sa requête : rien n'est fatal au process.
 */

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::dispatch::{ActionDispatcher, DispatchError};
use crate::inhibit::InhibitController;
use crate::models::{Host, Notification};
use crate::notify::Notifier;
use crate::state::SharedRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: SharedRegistry,
    pub dispatcher: ActionDispatcher,
    pub inhibit: InhibitController,
    pub notifier: Notifier,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/hosts", get(list_hosts).post(add_host))
        .route("/hosts/current", get(get_current))
        .route("/hosts/{id}", get(get_host))
        .route("/hosts/{id}/select", post(select_host))
        .route("/hosts/{id}/action/{action}", post(host_action))
        .route("/hosts/{id}/inhibit", post(set_inhibit))
        .route("/hosts/{id}/notify", post(notify_host))
        .with_state(app_state)
}

#[derive(Serialize)]
struct HostsView {
    revision: u64,
    selected: Option<String>,
    hosts: Vec<Host>,
}

#[derive(Debug, Deserialize)]
struct AddHostIn {
    name: String,
    address: String,
}

#[derive(Debug, Deserialize)]
struct InhibitIn {
    inhibited: bool,
}

fn error_body(msg: impl std::fmt::Display) -> Json<Value> {
    Json(json!({ "error": msg.to_string() }))
}

// GET /hosts (liste + révision pour le polling de la présentation)
async fn list_hosts(State(app): State<AppState>) -> Json<HostsView> {
    let registry = app.registry.lock();
    Json(HostsView {
        revision: registry.revision(),
        selected: registry.selected_id().map(str::to_string),
        hosts: registry.list().to_vec(),
    })
}

// POST /hosts (ajout, 400 si nom/adresse vide)
async fn add_host(
    State(app): State<AppState>,
    Json(input): Json<AddHostIn>,
) -> Result<(StatusCode, Json<Host>), (StatusCode, Json<Value>)> {
    match app.registry.lock().add(&input.name, &input.address) {
        Some(host) => Ok((StatusCode::CREATED, Json(host))),
        None => Err((
            StatusCode::BAD_REQUEST,
            error_body("name and address are required"),
        )),
    }
}

// GET /hosts/{id} (détail)
async fn get_host(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Host>, StatusCode> {
    let registry = app.registry.lock();
    let Some(host) = registry.get(&id) else {
        return Err(StatusCode::NOT_FOUND);
    };
    Ok(Json(host.clone()))
}

// GET /hosts/current (hôte sélectionné)
async fn get_current(State(app): State<AppState>) -> Result<Json<Host>, StatusCode> {
    let registry = app.registry.lock();
    match registry.current() {
        Some(host) => Ok(Json(host.clone())),
        None => Err(StatusCode::NOT_FOUND),
    }
}

// POST /hosts/{id}/select (sélection, sans validation d'existence)
async fn select_host(State(app): State<AppState>, Path(id): Path<String>) -> StatusCode {
    app.registry.lock().select(&id);
    StatusCode::NO_CONTENT
}

// POST /hosts/{id}/action/{action} (relais vers l'agent)
async fn host_action(
    State(app): State<AppState>,
    Path((id, action)): Path<(String, String)>,
) -> (StatusCode, Json<Value>) {
    let host = match app.registry.lock().get(&id) {
        Some(h) => h.clone(),
        None => return (StatusCode::NOT_FOUND, error_body("unknown host")),
    };

    match app.dispatcher.execute(&host, &action).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e @ DispatchError::UnknownAction(_)) => (StatusCode::BAD_REQUEST, error_body(e)),
        Err(e) => (StatusCode::BAD_GATEWAY, error_body(e)),
    }
}

// POST /hosts/{id}/inhibit (bascule optimiste)
async fn set_inhibit(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<InhibitIn>,
) -> (StatusCode, Json<Value>) {
    let host = match app.registry.lock().get(&id) {
        Some(h) => h.clone(),
        None => return (StatusCode::NOT_FOUND, error_body("unknown host")),
    };

    match app.inhibit.set_inhibited(&host, input.inhibited).await {
        Ok(value) => (StatusCode::OK, Json(json!({ "inhibited": value }))),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": e.to_string(), "inhibited": !input.inhibited })),
        ),
    }
}

// POST /hosts/{id}/notify (notification bureau)
async fn notify_host(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(notification): Json<Notification>,
) -> (StatusCode, Json<Value>) {
    let host = match app.registry.lock().get(&id) {
        Some(h) => h.clone(),
        None => return (StatusCode::NOT_FOUND, error_body("unknown host")),
    };

    match app.notifier.send(&host, &notification).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "sent" }))),
        Err(e @ DispatchError::InvalidNotification(_)) => (StatusCode::BAD_REQUEST, error_body(e)),
        Err(e) => (StatusCode::BAD_GATEWAY, error_body(e)),
    }
}
