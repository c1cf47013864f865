#![doc = "The `tasklet` library crate."]
#![doc = ""]
#![doc = "Domain models, the credential and task stores, session-token handling,"]
#![doc = "the HTTP routes with their authorization gate, and a typed client that"]
#![doc = "keeps a local session and task list in sync with the server."]
#![doc = "The binary (`main.rs`) only wires configuration, the pool and the server."]

pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::config::Config;
pub use crate::error::AppError;
