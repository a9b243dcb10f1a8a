//! PRAX: command-line client for the Oceanum PRAX service
//!
//! Lists, describes, submits, retries and terminates pipelines, tasks and
//! builds, streams their run logs, and manages routes, notebooks and user
//! secrets. Records returned by the service are projected through field
//! paths and rendered as tables, plain listings, YAML or JSON.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod render;
