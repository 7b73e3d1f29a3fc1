pub mod handlers;
pub mod import;
pub mod models;
pub mod service;

pub use handlers::course_config;
pub use service::CourseService;
