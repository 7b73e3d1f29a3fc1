pub mod handlers;
pub mod import;
pub mod models;
pub mod service;

pub use handlers::batch_config;
pub use service::BatchService;
