pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod services;
pub mod sessions;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::DashboardService;
