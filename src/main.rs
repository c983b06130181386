use axum::{
    routing::{get, post},
    Router,
};
use quiz_console_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware, routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let admin_api = Router::new()
        .route(
            "/api/admin/quizzes",
            get(routes::quiz::list_quizzes).post(routes::quiz::create_quiz),
        )
        .route(
            "/api/admin/quizzes/:id",
            get(routes::quiz::get_quiz)
                .patch(routes::quiz::update_quiz)
                .delete(routes::quiz::delete_quiz),
        )
        .route(
            "/api/admin/quizzes/:id/questions",
            get(routes::question::list_questions).post(routes::question::create_question),
        )
        .route(
            "/api/admin/questions/:id",
            get(routes::question::get_question)
                .patch(routes::question::update_question)
                .delete(routes::question::delete_question),
        )
        .route(
            "/api/admin/questions/:id/driver",
            post(routes::question::generate_driver_code),
        )
        .route(
            "/api/admin/quizzes/:id/attempts",
            get(routes::attempt::list_attempts),
        )
        .route(
            "/api/admin/quizzes/:id/export",
            get(routes::export::export_results_csv),
        )
        .route(
            "/api/admin/quizzes/:id/export.xlsx",
            get(routes::export::export_results_xlsx),
        )
        .layer(axum::middleware::from_fn(middleware::auth::require_admin))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::RateLimiter::new(config.admin_rps),
            middleware::rate_limit::rps_middleware,
        ));

    let public_api = Router::new()
        .route(
            "/api/public/quizzes/:id/attempts",
            post(routes::attempt::submit_attempt),
        )
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::RateLimiter::new(config.public_rps),
            middleware::rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(admin_api)
        .merge(public_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
