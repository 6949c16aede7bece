pub mod analytics;
pub mod gate;
pub mod models;
pub mod repositories;
pub mod server;
pub mod services;
pub mod session;
pub mod settings;
pub mod store;
