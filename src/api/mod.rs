pub mod handlers;
pub mod state;

use axum::{
    Router,
    routing::{get, post, put, delete},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let uploads_dir = settings.storage.uploads_dir.clone();
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // Admin API routes
        .nest("/api", api_routes())

        // Public routes (for website integration)
        .nest("/public", public_routes())

        // Locally stored objects (certificate images)
        .nest_service("/uploads", ServeDir::new(uploads_dir))

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/events", event_routes())
        .nest("/registrations", registration_routes())
        .nest("/announcements", announcement_routes())
        .nest("/blog", blog_routes())
        .nest("/members", member_routes())
        .nest("/resources", resource_routes())
        .nest("/reports", report_routes())
        .nest("/testimonials", testimonial_routes())
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::events::list))
        .route("/", post(handlers::events::create))
        .route("/:id", get(handlers::events::get))
        .route("/:id", put(handlers::events::update))
        .route("/:id", delete(handlers::events::delete))
        .route("/:id/registrations", get(handlers::registrations::list_by_event))
        .route("/:id/registrations", post(handlers::registrations::create))
}

fn registration_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/attendance", put(handlers::registrations::set_attendance))
        .route("/:id/certificate", post(handlers::registrations::issue_certificate))
        .route("/:id", delete(handlers::registrations::delete))
}

fn announcement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::announcements::list))
        .route("/", post(handlers::announcements::create))
        .route("/:id", get(handlers::announcements::get))
        .route("/:id", put(handlers::announcements::update))
        .route("/:id", delete(handlers::announcements::delete))
        .route("/:id/activate", post(handlers::announcements::activate))
        .route("/:id/deactivate", post(handlers::announcements::deactivate))
}

fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::blog::list))
        .route("/", post(handlers::blog::create))
        .route("/draft", post(handlers::blog::draft))
        .route("/:id", get(handlers::blog::get))
        .route("/:id", put(handlers::blog::update))
        .route("/:id", delete(handlers::blog::delete))
}

fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::members::list))
        .route("/", post(handlers::members::create))
        .route("/:id", get(handlers::members::get))
        .route("/:id", put(handlers::members::update))
        .route("/:id", delete(handlers::members::delete))
}

fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::resources::list))
        .route("/", post(handlers::resources::create))
        .route("/:id", get(handlers::resources::get))
        .route("/:id", put(handlers::resources::update))
        .route("/:id", delete(handlers::resources::delete))
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::reports::list))
        .route("/", post(handlers::reports::create))
        .route("/:id", get(handlers::reports::get))
        .route("/:id", put(handlers::reports::update))
        .route("/:id", delete(handlers::reports::delete))
}

fn testimonial_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::testimonials::list))
        .route("/", post(handlers::testimonials::create))
        .route("/:id", get(handlers::testimonials::get))
        .route("/:id", put(handlers::testimonials::update))
        .route("/:id", delete(handlers::testimonials::delete))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/announcement", get(handlers::public::active_announcement))
        .route("/events", get(handlers::public::list_events))
        .route("/events/:id", get(handlers::public::get_event))
        .route("/events/:id/register", post(handlers::public::register))
        .route("/blog", get(handlers::public::list_blog))
        .route("/blog/:slug", get(handlers::public::get_blog_post))
        .route("/members", get(handlers::public::list_members))
        .route("/resources", get(handlers::public::list_resources))
        .route("/reports", get(handlers::public::list_reports))
        .route("/testimonials", get(handlers::public::list_testimonials))
}
