//! CLI command handlers, one per file.

mod config;
mod extract;
mod fetch;
mod install;
mod locate;

pub use config::run_config;
pub use extract::run_extract;
pub use fetch::run_fetch;
pub use install::{run_install, InstallArgs};
pub use locate::run_locate;
