pub mod handlers;
pub mod import;
pub mod models;
pub mod service;

pub use handlers::program_config;
pub use service::ProgramService;
