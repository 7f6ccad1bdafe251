use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::db::DbPool;
use crate::handlers::{
    auth as auth_handlers, friends as friend_handlers, leaderboard as leaderboard_handlers,
    spots as spot_handlers, users as user_handlers,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
}

// Protection is per-handler: anything taking an `AuthUser` argument rejects
// unauthenticated requests in the extractor.
pub fn create_router(db: DbPool, config: Config) -> Router {
    let state = AppState { db, config };

    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .route("/refresh", post(auth_handlers::refresh))
        .route("/me", get(auth_handlers::me));

    let spot_routes = Router::new()
        .route("/", post(spot_handlers::create_spot))
        .route("/recent", get(spot_handlers::recent_spots))
        .route("/upload-url", post(spot_handlers::upload_url));

    let user_routes = Router::new()
        .route("/me", get(user_handlers::me))
        .route("/username", put(user_handlers::set_username));

    let friend_routes = Router::new()
        .route("/", get(friend_handlers::list_friends))
        .route("/", post(friend_handlers::add_friend))
        .route("/:friend_id", delete(friend_handlers::remove_friend));

    let leaderboard_routes = Router::new()
        .route("/", get(leaderboard_handlers::leaderboard))
        .route("/rival", get(leaderboard_handlers::next_rival));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/spots", spot_routes)
        .nest("/users", user_routes)
        .nest("/friends", friend_routes)
        .nest("/leaderboard", leaderboard_routes)
        .route("/stats/me", get(spot_handlers::my_stats));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
