pub mod cli;
pub mod dependencies;
pub mod document;
pub mod error;
pub mod guide;
pub mod identity;
pub mod logging;
pub mod mcp;
pub mod priority;
pub mod project;
pub mod scheduler;
pub mod service;
pub mod status;
pub mod tasks;

#[cfg(test)]
pub mod test_utils;
