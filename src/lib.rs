// Stackwright - multi-agent full-stack code generation
// Library exports

pub mod agents;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod ingest;
pub mod logging;
pub mod pipeline;
pub mod providers;
pub mod server;
pub mod workspace;

#[cfg(test)]
mod test_support;

pub use error::{ForgeError, Result};
