//! The HTTP query frontend: a pass-through to the Evaluator over the same [`burrow_bus::BusHandle`]
//! every producer uses. See `spec.md` §6 and `SPEC_FULL.md` §6.

pub mod envelope;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;

pub use envelope::{Envelope, RequestInfo};
pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, SharedState};
