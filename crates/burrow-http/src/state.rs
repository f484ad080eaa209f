use std::sync::Arc;

use burrow_bus::BusHandle;
use burrow_eval::EvalConfig;
use burrow_model::ClusterId;

/// Shared state handed to every axum handler (`spec.md` §6's HTTP frontend is "a pass-through to
/// the Evaluator", reading through the same [`BusHandle`] every other producer/consumer uses).
pub struct AppState {
    pub bus: BusHandle,
    pub clusters: Vec<ClusterId>,
    pub eval_cfg: EvalConfig,
    /// Echoed into every response envelope's `request.host` (`spec.md` §6).
    pub host: String,
}

pub type SharedState = Arc<AppState>;
