pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod tabular;

pub use config::AppConfig;
pub use error::ReportError;
pub use service::ReportService;
