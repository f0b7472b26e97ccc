use chrono::NaiveDateTime;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

use crate::models::{NewSchedule, Schedule, TravelUser};
use crate::schema::{post, schedule, travel_user};
use crate::{DbConn, Error};

mod filter;

pub use filter::*;

pub type JoinedPostData = (PrimitivePost, Schedule, TravelUser);

/// Lifecycle of a companion post
#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, Eq, PartialEq, Serialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::PostStatus"]
#[serde(rename_all = "camelCase")]
pub enum PostStatus {
	/// Still looking for companions
	#[default]
	Open,
	FlightsBooked,
	AgencyConfirmed,
	DepartureConfirmed,
}

/// Which gender a post is recruiting for
#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, Eq, PartialEq, Serialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::TargetGender"]
#[serde(rename_all = "camelCase")]
pub enum TargetGender {
	#[default]
	Any,
	Female,
	Male,
}

/// A companion post joined with its schedule and author
#[derive(Clone, Debug, Queryable, Serialize)]
pub struct Post {
	pub post:     PrimitivePost,
	pub schedule: Schedule,
	pub author:   TravelUser,
}

#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[serde(rename_all = "camelCase")]
#[diesel(table_name = post)]
#[diesel(check_for_backend(Pg))]
pub struct PrimitivePost {
	pub id:             i32,
	#[serde(skip)]
	pub schedule_id:    i32,
	#[serde(skip)]
	pub author_id:      i32,
	pub title:          String,
	pub status:         PostStatus,
	pub description:    Option<String>,
	pub chat_link:      Option<String>,
	pub target_gender:  TargetGender,
	pub target_ages:    Vec<String>,
	pub current_people: i32,
	#[serde(skip)]
	pub is_deleted:     bool,
	pub created_at:     NaiveDateTime,
	pub updated_at:     NaiveDateTime,
}

impl Post {
	/// Build a query with all required joins to select a full post data tuple
	#[diesel::dsl::auto_type(no_type_alias)]
	fn joined_query() -> _ {
		post::table
			.inner_join(schedule::table.on(schedule::id.eq(post::schedule_id)))
			.inner_join(
				travel_user::table.on(travel_user::id.eq(post::author_id)),
			)
	}

	/// Construct a full [`Post`] struct from the data returned by a joined
	/// query
	fn from_joined(data: JoinedPostData) -> Self {
		Self { post: data.0, schedule: data.1, author: data.2 }
	}

	/// Get a visible [`Post`] given its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(p_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let query = Self::joined_query();

		let data = conn
			.interact(move |conn| {
				query
					.filter(post::id.eq(p_id))
					.filter(post::is_deleted.eq(false))
					.select((
						PrimitivePost::as_select(),
						Schedule::as_select(),
						TravelUser::as_select(),
					))
					.first(conn)
			})
			.await??;

		Ok(Self::from_joined(data))
	}

	/// Search through all visible [`Post`]s with a given [`PostFilter`],
	/// newest first
	///
	/// Returns the total number of matches alongside the requested page.
	#[instrument(skip(conn))]
	pub async fn search(
		post_filter: PostFilter,
		limit: i64,
		offset: i64,
		conn: &DbConn,
	) -> Result<(i64, Vec<Self>), Error> {
		let count_filter = post_filter.clone();

		let (total, data) = conn
			.interact(move |conn| -> QueryResult<(i64, Vec<JoinedPostData>)> {
				let total = Self::joined_query()
					.filter(visibility_condition(count_filter))
					.count()
					.get_result(conn)?;

				let data = Self::joined_query()
					.filter(visibility_condition(post_filter))
					.order(post::created_at.desc())
					.limit(limit)
					.offset(offset)
					.select((
						PrimitivePost::as_select(),
						Schedule::as_select(),
						TravelUser::as_select(),
					))
					.get_results(conn)?;

				Ok((total, data))
			})
			.await??;

		let posts = data.into_iter().map(Self::from_joined).collect();

		Ok((total, posts))
	}

	/// Soft-delete a [`Post`] given its id
	#[instrument(skip(conn))]
	pub async fn soft_delete(p_id: i32, conn: &DbConn) -> Result<(), Error> {
		conn.interact(move |conn| {
			diesel::update(post::table.find(p_id))
				.set(post::is_deleted.eq(true))
				.execute(conn)
		})
		.await??;

		info!("soft-deleted post {p_id}");

		Ok(())
	}
}

/// The output of the itinerary builder, written as a single transaction
///
/// The schedule, the authoring travel user, and the post row are inserted
/// together, so a failure halfway can never leave an orphaned schedule or
/// user row behind.
#[derive(Clone, Debug)]
pub struct NewCompanionPost {
	pub schedule: NewSchedule,

	pub author_username: String,
	pub author_password: String,
	pub author_nickname: String,

	pub title:         String,
	pub status:        PostStatus,
	pub description:   Option<String>,
	pub chat_link:     Option<String>,
	pub target_gender: TargetGender,
	pub target_ages:   Vec<String>,
}

impl NewCompanionPost {
	/// Insert this [`NewCompanionPost`]
	///
	/// Inserts the schedule, finds or creates the authoring travel user, and
	/// inserts the post row referencing both. An existing author must present
	/// the correct password, a mismatch rolls the whole write back.
	#[instrument(skip_all)]
	pub async fn create(self, conn: &DbConn) -> Result<Post, Error> {
		let data = conn
			.interact(move |conn| {
				conn.transaction::<JoinedPostData, Error, _>(|conn| {
					let inserted_schedule = self.schedule.insert_sync(conn)?;

					let author = TravelUser::find_or_create_sync(
						&self.author_username,
						&self.author_password,
						&self.author_nickname,
						conn,
					)?;

					let inserted_post = diesel::insert_into(post::table)
						.values((
							post::schedule_id.eq(inserted_schedule.id),
							post::author_id.eq(author.id),
							post::title.eq(self.title),
							post::status.eq(self.status),
							post::description.eq(self.description),
							post::chat_link.eq(self.chat_link),
							post::target_gender.eq(self.target_gender),
							post::target_ages.eq(self.target_ages),
						))
						.returning(PrimitivePost::as_returning())
						.get_result(conn)?;

					Ok((inserted_post, inserted_schedule, author))
				})
			})
			.await??;

		let post = Post::from_joined(data);

		info!("created post {} by {}", post.post.id, post.author.nickname);

		Ok(post)
	}
}

#[derive(AsChangeset, Clone, Debug, Deserialize, Serialize)]
#[diesel(table_name = post)]
#[diesel(check_for_backend(Pg))]
pub struct PostUpdate {
	pub title:          Option<String>,
	pub status:         Option<PostStatus>,
	pub description:    Option<String>,
	pub chat_link:      Option<String>,
	pub current_people: Option<i32>,
}

impl PostUpdate {
	/// Apply this update to the visible [`Post`] with the given id
	#[instrument(skip(conn))]
	pub async fn apply_to(
		self,
		p_id: i32,
		conn: &DbConn,
	) -> Result<Post, Error> {
		let data = conn
			.interact(move |conn| {
				conn.transaction::<JoinedPostData, Error, _>(|conn| {
					let p_id: i32 = diesel::update(
						post::table
							.find(p_id)
							.filter(post::is_deleted.eq(false)),
					)
					.set(self)
					.returning(post::id)
					.get_result(conn)?;

					let data = post::table
						.find(p_id)
						.inner_join(
							schedule::table
								.on(schedule::id.eq(post::schedule_id)),
						)
						.inner_join(
							travel_user::table
								.on(travel_user::id.eq(post::author_id)),
						)
						.select((
							PrimitivePost::as_select(),
							Schedule::as_select(),
							TravelUser::as_select(),
						))
						.get_result(conn)?;

					Ok(data)
				})
			})
			.await??;

		Ok(Post::from_joined(data))
	}
}
