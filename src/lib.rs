pub mod args;
mod backup;
pub mod commands;
mod config;
mod error;
mod ledger;
pub mod model;
mod store;
#[cfg(test)]
mod test;
mod utils;

pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use ledger::Ledger;
pub use store::{Mode, TEST_MODE_VAR};
