use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

mod api;
mod config;
mod db;
mod import;
mod shutdown;
mod store;

use crate::api::{
    batch::{batch_config, BatchService},
    course::{course_config, CourseService},
    faculty::{faculty_config, FacultyService},
    health::health_config,
    program::{program_config, ProgramService},
    progress::import_config,
    student::{student_config, StudentService},
    user::{user_config, UserService},
    validation,
};
use crate::import::ImportTracker;
use crate::shutdown::ShutdownCoordinator;
use crate::store::{PgStore, SharedStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = config::Config::from_env().expect("Failed to load configuration");

    std::fs::create_dir_all(&config.log_dir).expect("Failed to create logs directory");
    std::fs::create_dir_all(&config.upload_dir).expect("Failed to create uploads directory");

    // File-based logging with daily rotation and level separation, e.g.
    // logs/info.2026-08-06.log, logs/error.2026-08-06.log.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_file = tracing_appender::rolling::daily(&config.log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(&config.log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(&config.log_dir, "error.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .init();

    let pool = db::get_connection(&config.database_url, config.max_db_connections)
        .await
        .expect("Failed to connect to database");

    info!("Starting college-backend");
    info!("Configuration loaded successfully:");
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("  - Upload dir: {}", config.upload_dir);
    info!("  - Job retention: {} minutes", config.job_retention_minutes);
    info!("Database connection pool established");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let store: SharedStore = Arc::new(PgStore::new(pool.clone()));
    let tracker = ImportTracker::new();

    // Shutdown channel shared with the background sweeper.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let retention = Duration::from_secs(config.job_retention_minutes * 60);
    let sweeper_handle = tokio::spawn(tracker.clone().run_sweeper(retention, shutdown_rx));
    info!("Spawned import job sweeper");

    let server_pool = pool.clone();
    let server_store = store.clone();
    let server_tracker = tracker.clone();
    let server_config = config.clone();

    let server = HttpServer::new(move || {
        let payload_config = web::PayloadConfig::default().limit(server_config.max_payload_size);

        App::new()
            .app_data(web::Data::new(server_pool.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(web::Data::new(server_tracker.clone()))
            .app_data(web::Data::new(ProgramService::new(server_store.clone())))
            .app_data(web::Data::new(CourseService::new(server_store.clone())))
            .app_data(web::Data::new(BatchService::new(server_store.clone())))
            .app_data(web::Data::new(FacultyService::new(server_store.clone())))
            .app_data(web::Data::new(StudentService::new(server_store.clone())))
            .app_data(web::Data::new(UserService::new(server_store.clone())))
            .app_data(payload_config)
            .app_data(validation::json_config())
            .configure(health_config)
            .configure(program_config)
            .configure(course_config)
            .configure(batch_config)
            .configure(faculty_config)
            .configure(student_config)
            .configure(user_config)
            .configure(import_config)
    });

    info!("Server starting on http://127.0.0.1:8080");

    let server = server.bind(("127.0.0.1", 8080))?.run();
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(
        server_handle,
        server_task,
        sweeper_handle,
        shutdown_tx,
        pool,
    );

    coordinator.wait_for_shutdown().await
}
