/*!
# Vigil DevKit - Stubs et Utilitaires pour Développement

Bibliothèque facilitant le développement du kernel Vigil avec:
- Stub d'agent HTTP pour tests sans poste de travail réel
- Enregistrement des requêtes reçues pour assertions
- Statut de réponse configurable et rétention des réponses en vol
*/

pub mod agent_stub;

pub use agent_stub::{AgentStub, RecordedRequest};
