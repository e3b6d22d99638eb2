//! MCP (Model Context Protocol) server
//!
//! Exposes the scheduler operations as tools over JSON-RPC 2.0 on stdio.

pub mod server;

pub use server::{run, serve};
