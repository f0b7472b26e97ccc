#[macro_use]
extern crate tracing;

use gomongol::{AppState, Config, routes};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::signal::unix::SignalKind;
use tracing::Level;

#[tokio::main]
async fn main() {
	// Set up the configuration.
	let config = Config::from_env();

	let max_level =
		if config.production { Level::INFO } else { Level::DEBUG };

	tracing_subscriber::fmt()
		.pretty()
		.with_thread_names(true)
		.with_max_level(max_level)
		.init();

	// Set up the database connection pool.
	let database_pool = config.create_database_pool();

	let state = AppState { config, database_pool };
	let app = routes::get_app_router(state);

	let listener = TcpListener::bind("0.0.0.0:80").await.unwrap();
	debug!("listening on {}", listener.local_addr().unwrap());
	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_handler())
		.await
		.unwrap();
}

async fn shutdown_handler() {
	let ctrl_c = async {
		signal::ctrl_c().await.expect("COULD NOT INSTALL CTRL+C HANDLER");
	};

	let terminate = async {
		signal::unix::signal(SignalKind::terminate())
			.expect("COULD NOT INSTALL TERMINATE SIGNAL HANDLER")
			.recv()
			.await;
	};

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}
}
