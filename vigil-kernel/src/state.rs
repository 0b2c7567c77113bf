use parking_lot::Mutex;
use std::sync::Arc;

/// Etat mutable partagé entre les handlers HTTP et le contrôleur inhibit.
/// Le mutex sérialise toutes les mutations du registre; il ne doit jamais
/// être tenu à travers un await.
pub type Shared<T> = Arc<Mutex<T>>;

pub type SharedRegistry = Shared<crate::registry::HostRegistry>;

pub fn new_state<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}
