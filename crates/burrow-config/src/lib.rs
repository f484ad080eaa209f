//! Configuration loading for the core: CLI flags (`clap`) layered over a TOML settings file.
//! See `spec.md` §6 and `SPEC_FULL.md` §6/§9.

pub mod cli;
pub mod file;
pub mod merged;

pub use cli::Cli;
pub use file::{FileConfig, FileNotifier, FileSink};
pub use merged::{BurrowConfig, NotifierSetup};
