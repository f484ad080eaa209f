//! The Coordinator: lifecycle glue that configures, starts, and stops the store, the
//! collaborator modules, the notifiers, and the HTTP frontend in dependency order. See
//! `spec.md` §4.5 and `SPEC_FULL.md` §4.5.

pub mod coordinator;
pub mod module;

pub use coordinator::Coordinator;
pub use module::{Module, ModuleRegistry};
