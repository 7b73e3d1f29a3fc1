pub mod handlers;
pub mod import;
pub mod models;
pub mod service;

pub use handlers::faculty_config;
pub use service::FacultyService;
