mod api;
pub mod args;
pub mod codec;
pub mod commands;
mod config;
mod error;
pub mod ledger;
pub mod model;
pub mod report;
mod utils;

#[cfg(test)]
mod test;

pub use api::{Api, Mode};
pub use config::Config;
pub use error::Error;
pub use error::ErrorType;
pub use error::Result;
