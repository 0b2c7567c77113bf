/**
 * HOST REGISTRY - Registre en mémoire des postes de travail gérés
 *
 * RÔLE : Collection ordonnée des hôtes + sélection courante.
 * Le registre vit le temps du process : pas de persistance, pas de suppression.
 *
 * FONCTIONNEMENT :
 * - add() génère un id unique (UUID v4), statut unknown, non inhibé
 * - select() pose la sélection sans valider l'existence de l'id
 * - current() tolère une sélection vide ou orpheline (renvoie None)
 * - revision() compteur monotone incrémenté à chaque mutation,
 *   pollé par la couche de présentation pour savoir quand re-rendre
 *
 * UTILITÉ DANS VIGIL :
 * 🎯 Source de vérité unique de l'état des hôtes pour l'API REST
 * 🎯 Seul point de mutation du flag inhibited (via le contrôleur inhibit)
 */

use crate::models::{Host, HostStatus};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Default)]
pub struct HostRegistry {
    hosts: Vec<Host>, // ordre d'insertion = ordre d'affichage
    selected: Option<String>,
    revision: u64,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute un hôte. Refuse (None, aucune mutation) si le nom ou
    /// l'adresse est vide après trim. Les doublons sont permis.
    pub fn add(&mut self, name: &str, address: &str) -> Option<Host> {
        let name = name.trim();
        let address = address.trim();
        if name.is_empty() || address.is_empty() {
            return None;
        }

        let host = Host {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            address: address.to_string(),
            status: HostStatus::Unknown,
            inhibited: false,
            added_at: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
        };
        self.hosts.push(host.clone());
        self.revision += 1;
        Some(host)
    }

    /// Pose la sélection courante. Aucune validation d'existence :
    /// une sélection orpheline donne simplement current() == None.
    pub fn select(&mut self, id: &str) {
        self.selected = Some(id.to_string());
        self.revision += 1;
    }

    pub fn current(&self) -> Option<&Host> {
        let id = self.selected.as_deref()?;
        self.hosts.iter().find(|h| h.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Host> {
        self.hosts.iter().find(|h| h.id == id)
    }

    /// Mise à jour in-place du flag inhibited. Réservé au contrôleur inhibit.
    pub fn update_inhibited(&mut self, id: &str, value: bool) {
        if let Some(host) = self.hosts.iter_mut().find(|h| h.id == id) {
            host.inhibited = value;
            self.revision += 1;
        }
    }

    pub fn list(&self) -> &[Host] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
