//! Integration tests for the PRAX CLI

mod cli_binary;
mod config_integration;
mod render_determinism;
mod user_commands;
mod workflow_commands;
