use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::warn;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct KernelConfig {
    #[serde(default)]
    pub http: HttpConf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpConf {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for HttpConf {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

/// Charge la config service depuis VIGIL_KERNEL_CONFIG (défaut vigil.yaml).
/// Fichier absent ou invalide : valeurs par défaut. La liste des hôtes
/// n'est volontairement pas configurable ici, le registre vit en mémoire.
pub async fn load_config() -> KernelConfig {
    let path = std::env::var("VIGIL_KERNEL_CONFIG").unwrap_or_else(|_| "vigil.yaml".into());
    if Path::new(&path).exists() {
        let txt = match fs::read_to_string(&path).await {
            Ok(txt) => txt,
            Err(e) => {
                warn!("failed to read config {path}: {e}, using defaults");
                return KernelConfig::default();
            }
        };
        if txt.trim().is_empty() {
            return KernelConfig::default();
        }
        serde_yaml::from_str(&txt).unwrap_or_else(|e| {
            warn!("invalid config {path}: {e}, using defaults");
            KernelConfig::default()
        })
    } else {
        KernelConfig::default()
    }
}
