use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::controllers::agency::{get_agencies, get_agency, login_agency};
use crate::controllers::healthcheck;
use crate::controllers::post::{
	create_post,
	delete_post,
	get_post,
	get_posts,
	redirect_to_chat,
	update_post,
};
use crate::controllers::region::get_regions;
use crate::controllers::review::{
	create_review,
	get_agency_reviews,
	get_review,
	get_reviews,
};

/// Uploads may carry up to five photos
const MULTIPART_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// Get the app router
pub fn get_app_router(state: AppState) -> Router {
	let api_routes = Router::new()
		.route("/healthcheck", get(healthcheck))
		.route("/regions", get(get_regions))
		.nest("/posts", post_routes())
		.nest("/reviews", review_routes())
		.nest("/agencies", agency_routes());

	Router::new()
		.merge(api_routes)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(TimeoutLayer::new(Duration::from_secs(10)))
				.layer(CompressionLayer::new())
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

/// Companion board routes
fn post_routes() -> Router<AppState> {
	Router::new()
		.route("/", get(get_posts).post(create_post))
		.route(
			"/{id}",
			get(get_post).patch(update_post).delete(delete_post),
		)
		.route("/{id}/chat", get(redirect_to_chat))
}

/// Review board routes
fn review_routes() -> Router<AppState> {
	Router::new()
		.route("/", get(get_reviews).post(create_review))
		.route("/{id}", get(get_review))
		.layer(DefaultBodyLimit::max(MULTIPART_BODY_LIMIT))
}

/// Agency directory routes
fn agency_routes() -> Router<AppState> {
	Router::new()
		.route("/", get(get_agencies))
		.route("/login", post(login_agency))
		.route("/{id}", get(get_agency))
		.route("/{id}/reviews", get(get_agency_reviews))
}
