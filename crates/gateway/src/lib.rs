pub mod app;
pub mod config;
pub mod error;
mod handlers;
pub mod logging;
