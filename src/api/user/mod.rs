pub mod handlers;
pub mod models;
pub mod service;

pub use handlers::user_config;
pub use service::UserService;
