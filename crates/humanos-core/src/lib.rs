pub mod catalog;
pub mod defaults;
pub mod error;
pub mod io;
pub mod migrations;
pub mod paths;
pub mod routine;
pub mod runner;
pub mod schedule;
pub mod settings;
pub mod status;
pub mod store;
pub mod types;

#[cfg(test)]
mod test_support;

pub use error::{HumanosError, Result};
