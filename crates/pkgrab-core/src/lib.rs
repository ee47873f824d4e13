pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod install;
pub mod locate;
pub mod logging;
pub mod url_model;

pub use error::InstallError;
