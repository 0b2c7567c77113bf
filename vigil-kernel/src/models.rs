use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    Online,
    Offline,
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Host {
    pub id: String,
    pub name: String,
    pub address: String,
    pub status: HostStatus,
    pub inhibited: bool,
    pub added_at: String, // format RFC3339 pour l'API
}

impl Host {
    /// URL de base pour joindre l'agent du poste.
    /// L'adresse peut être donnée avec ou sans schéma; http par défaut.
    pub fn base_url(&self) -> String {
        let addr = self.address.trim_end_matches('/');
        if addr.contains("://") {
            addr.to_string()
        } else {
            format!("http://{addr}")
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    Critical,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Notification {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u32,
}

fn default_timeout_ms() -> u32 {
    5000
}
