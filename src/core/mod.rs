// ─── Horizon Core ───
// Modular backend architecture for the Horizon build launcher.
//
// Architecture:
//   core/
//     registry/   — Build model + persisted registry + version detection
//     resolver    — Version → required-asset mapping (pure)
//     download/   — Concurrent acquisition with progress aggregation
//     auth        — Session token → single-use exchange code
//     catalog     — Hosted build catalog (versions + chunk manifests)
//     launch/     — State machine, running-build monitor, lifecycle states
//     capability/ — Injected file/process/notification seams
//     state/      — Application context + persisted settings

pub mod auth;
pub mod capability;
pub mod catalog;
pub mod download;
pub mod error;
pub mod http;
pub mod launch;
pub mod registry;
pub mod resolver;
pub mod state;
