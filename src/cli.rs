mod runner;
mod types;

pub use runner::{init_tracing, run_cli};
