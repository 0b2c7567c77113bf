/**
 * INHIBIT CONTROLLER - Bascule optimiste de l'inhibition idle
 *
 * RÔLE : Seule action booléenne réversible du système. Le flag est appliqué
 * dans le registre AVANT l'appel réseau pour une UI réactive, puis reverté
 * si l'agent refuse ou ne répond pas.
 *
 * LIMITE CONNUE : deux bascules concurrentes sur le même hôte ne sont pas
 * sérialisées; le revert d'un appel en retard peut écraser une valeur
 * optimiste plus récente. Comportement assumé, voir DESIGN.md.
 */

use crate::dispatch::{ActionDispatcher, DispatchError};
use crate::models::Host;
use crate::state::SharedRegistry;
use tracing::warn;

#[derive(Clone)]
pub struct InhibitController {
    registry: SharedRegistry,
    dispatcher: ActionDispatcher,
}

impl InhibitController {
    pub fn new(registry: SharedRegistry, dispatcher: ActionDispatcher) -> Self {
        Self { registry, dispatcher }
    }

    /// Applique `desired` dans le registre, dispatch inhibit/uninhibit,
    /// revert en cas d'échec. Renvoie la valeur finale du flag.
    pub async fn set_inhibited(&self, host: &Host, desired: bool) -> Result<bool, DispatchError> {
        // application optimiste, verrou relâché avant l'await
        self.registry.lock().update_inhibited(&host.id, desired);

        let action = if desired { "inhibit" } else { "uninhibit" };
        match self.dispatcher.execute(host, action).await {
            Ok(()) => Ok(desired),
            Err(e) => {
                self.registry.lock().update_inhibited(&host.id, !desired);
                warn!("failed to {} idle on {}: {}", action, host.name, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HostRegistry;
    use crate::state::new_state;
    use std::time::Duration;
    use vigil_devkit::AgentStub;

    fn setup(registry: &SharedRegistry) -> InhibitController {
        InhibitController::new(registry.clone(), ActionDispatcher::new())
    }

    #[tokio::test]
    async fn test_optimistic_apply_is_visible_before_resolution() {
        let stub = AgentStub::spawn().await.unwrap();
        stub.hold_responses();

        let registry = new_state(HostRegistry::new());
        let host = registry.lock().add("ws", &stub.base_url()).unwrap();
        let controller = setup(&registry);

        let task = {
            let controller = controller.clone();
            let host = host.clone();
            tokio::spawn(async move { controller.set_inhibited(&host, true).await })
        };

        // attendre que la requête soit en vol chez le stub
        for _ in 0..200 {
            if stub.count_for("/idle/inhibit") > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(stub.count_for("/idle/inhibit"), 1);
        // le flag est déjà posé alors que l'appel réseau n'est pas résolu
        assert!(registry.lock().get(&host.id).unwrap().inhibited);

        stub.release_responses();
        let result = task.await.unwrap();
        assert!(result.unwrap());
        assert!(registry.lock().get(&host.id).unwrap().inhibited);
    }

    #[tokio::test]
    async fn test_revert_on_agent_failure() {
        let stub = AgentStub::spawn().await.unwrap();
        stub.set_status(500);

        let registry = new_state(HostRegistry::new());
        let host = registry.lock().add("ws", &stub.base_url()).unwrap();
        let controller = setup(&registry);

        let err = controller.set_inhibited(&host, true).await.unwrap_err();
        assert!(matches!(err, DispatchError::RequestFailed(500)));
        assert!(!registry.lock().get(&host.id).unwrap().inhibited);
    }

    #[tokio::test]
    async fn test_revert_on_unreachable_agent() {
        let registry = new_state(HostRegistry::new());
        let host = registry.lock().add("ws", "http://127.0.0.1:1").unwrap();
        let controller = setup(&registry);

        let err = controller.set_inhibited(&host, true).await.unwrap_err();
        assert!(matches!(err, DispatchError::NetworkError(_)));
        assert!(!registry.lock().get(&host.id).unwrap().inhibited);
    }

    #[tokio::test]
    async fn test_no_extra_mutation_on_success() {
        let stub = AgentStub::spawn().await.unwrap();
        let registry = new_state(HostRegistry::new());
        let host = registry.lock().add("ws", &stub.base_url()).unwrap();
        let controller = setup(&registry);

        controller.set_inhibited(&host, true).await.unwrap();
        let revision = registry.lock().revision();
        assert!(registry.lock().get(&host.id).unwrap().inhibited);
        // une seule mutation (l'application optimiste), pas de revert
        assert_eq!(revision, 2);
    }

    #[tokio::test]
    async fn test_disable_maps_to_uninhibit() {
        let stub = AgentStub::spawn().await.unwrap();
        let registry = new_state(HostRegistry::new());
        let host = registry.lock().add("ws", &stub.base_url()).unwrap();
        registry.lock().update_inhibited(&host.id, true);
        let controller = setup(&registry);

        controller.set_inhibited(&host, false).await.unwrap();
        assert_eq!(stub.count_for("/idle/uninhibit"), 1);
        assert!(!registry.lock().get(&host.id).unwrap().inhibited);
    }
}
