//! The message bus: typed per-shard request channels and the producer-facing [`BusHandle`].
//! See `spec.md` §4.1 and `SPEC_FULL.md` §4.1.

pub mod error;
pub mod handle;
pub mod request;

pub use error::{BurrowError, Result};
pub use handle::BusHandle;
pub use request::{ClusterStatus, StoreRequest};
