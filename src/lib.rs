// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod caps;
pub mod config;
pub mod controller;
pub mod keys;
pub mod logging;
pub mod presenter;
pub mod quotes;
pub mod runtime;
pub mod session;
pub mod stats;
