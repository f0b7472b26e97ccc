//! Controllers for companion [`Post`]s

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, NoContent, Redirect};

use crate::error::Error;
use crate::models::{Post, PostFilter};
use crate::schemas::pagination::PaginationOptions;
use crate::schemas::post::{
	CreatePostRequest,
	DeletePostRequest,
	PostResponse,
	UpdatePostRequest,
};
use crate::DbPool;

/// Create a new companion post from the itinerary builder output.
///
/// The schedule, the authoring travel user, and the post itself are written
/// in a single transaction.
#[instrument(skip(pool, request))]
pub(crate) async fn create_post(
	State(pool): State<DbPool>,
	Json(request): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, Error> {
	let new_post = request.to_insertable()?;

	let conn = pool.get().await?;

	let post = new_post.create(&conn).await?;
	let response: PostResponse = post.into();

	Ok((StatusCode::CREATED, Json(response)))
}

/// Get a filtered, paginated page of the companion board.
#[instrument(skip(pool))]
pub(crate) async fn get_posts(
	State(pool): State<DbPool>,
	Query(filter): Query<PostFilter>,
	Query(p_opts): Query<PaginationOptions>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let (total, posts) =
		Post::search(filter, p_opts.limit(), p_opts.offset(), &conn).await?;

	let data: Vec<PostResponse> =
		posts.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(p_opts.paginate(total, data))))
}

/// Get a single post with its schedule and author nickname.
#[instrument(skip(pool))]
pub(crate) async fn get_post(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let post = Post::get_by_id(id, &conn).await?;
	let response: PostResponse = post.into();

	Ok((StatusCode::OK, Json(response)))
}

/// Update a post after verifying the author password.
///
/// An incorrect password leaves the post untouched.
#[instrument(skip(pool, request))]
pub(crate) async fn update_post(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
	Json(request): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, Error> {
	let (password, update) = request.to_changeset()?;

	let conn = pool.get().await?;

	let post = Post::get_by_id(id, &conn).await?;
	post.author.verify_password(&password)?;

	let updated = update.apply_to(id, &conn).await?;
	let response: PostResponse = updated.into();

	info!("updated post {id}");

	Ok((StatusCode::OK, Json(response)))
}

/// Soft-delete a post after verifying the author password.
#[instrument(skip(pool, request))]
pub(crate) async fn delete_post(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
	Json(request): Json<DeletePostRequest>,
) -> Result<NoContent, Error> {
	let conn = pool.get().await?;

	let post = Post::get_by_id(id, &conn).await?;
	post.author.verify_password(&request.password)?;

	Post::soft_delete(id, &conn).await?;

	Ok(NoContent)
}

/// Redirect to the open-chat room of a post.
#[instrument(skip(pool))]
pub(crate) async fn redirect_to_chat(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<Redirect, Error> {
	let conn = pool.get().await?;

	let post = Post::get_by_id(id, &conn).await?;

	let Some(chat_link) = post.post.chat_link else {
		return Err(Error::NotFound(
			"this post has no chat room yet".to_string(),
		));
	};

	Ok(Redirect::temporary(&chat_link))
}
