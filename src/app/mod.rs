//! Application wiring for the `nitter-dl` binary.

pub(crate) mod config_manager;
pub(crate) mod output;
pub(crate) mod progress_manager;
pub(crate) mod runtime;
pub(crate) mod terminal;
