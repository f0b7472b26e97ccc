//! Router-level tests for everything that answers without touching the
//! database: the region catalog and request validation.

use axum::http::StatusCode;
use axum_test::TestServer;
use gomongol::{AppState, Config, routes};
use serde_json::{Value, json};
use url::Url;

/// Get a test server backed by a pool that never has to connect
fn get_test_app() -> TestServer {
	let config = Config {
		production:        false,
		database_url:      "postgres://localhost/unused".to_string(),
		file_storage_path: std::env::temp_dir().join("gomongol-test-files"),
		static_url:        Url::parse("http://localhost/static/").unwrap(),
	};

	let database_pool = config.create_database_pool();

	let state = AppState { config, database_pool };
	let app = routes::get_app_router(state);

	TestServer::builder().build(app).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn regions_catalog_is_served() {
	let app = get_test_app();

	let response = app.get("/regions").await;

	assert_eq!(response.status_code(), StatusCode::OK);

	let body = response.json::<Vec<Value>>();

	assert_eq!(body.len(), 3);
	assert_eq!(body[0]["id"], "gobi");
	assert!(!body[0]["spots"].as_array().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn post_creation_rejects_out_of_catalog_spots() {
	let app = get_test_app();

	let response = app
		.post("/posts")
		.json(&json!({
			"title": "Gobi in June",
			"schedule": {
				"startDate": "2026-06-15",
				"nights": 5,
				"people": 4,
				"regions": ["gobi"],
				"spots": ["Khuvsgul Lake"]
			},
			"author": {
				"username": "winnie99",
				"password": "steppe1234",
				"nickname": "Winnie"
			}
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test(flavor = "multi_thread")]
async fn post_creation_rejects_short_passwords() {
	let app = get_test_app();

	let response = app
		.post("/posts")
		.json(&json!({
			"title": "Gobi in June",
			"schedule": {
				"startDate": "2026-06-15",
				"nights": 5,
				"people": 4,
				"regions": ["gobi"],
				"spots": ["Yolyn Am"]
			},
			"author": {
				"username": "winnie99",
				"password": "short1",
				"nickname": "Winnie"
			}
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test(flavor = "multi_thread")]
async fn oversized_pages_are_rejected() {
	let app = get_test_app();

	let response = app.get("/posts?page=1&perPage=100").await;

	assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_post_updates_are_rejected() {
	let app = get_test_app();

	let response = app
		.patch("/posts/1")
		.json(&json!({ "password": "steppe1234" }))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}
