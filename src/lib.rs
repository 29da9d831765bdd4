// src/lib.rs
pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod loader;
pub mod logging;
pub mod pages;
pub mod podcast;
pub mod query_cache;
pub mod router;
pub mod routes;
pub mod shell;
