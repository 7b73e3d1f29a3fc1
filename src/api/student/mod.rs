pub mod handlers;
pub mod import;
pub mod models;
pub mod service;

pub use handlers::student_config;
pub use service::StudentService;
