pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod fake_backend;
pub mod forms;
pub mod http_client;
pub mod listing;
pub mod model;
pub mod state;
pub mod statistics;
pub mod worker;
