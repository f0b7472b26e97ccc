use chrono::NaiveDateTime;
use diesel::dsl::InnerJoinQuerySource;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Nullable};
use serde::{Deserialize, Serialize};

use crate::models::Agency;
use crate::schema::{agency, review, review_photo};
use crate::{DbConn, Error};

pub type JoinedReviewData = (PrimitiveReview, Agency);

type Source = InnerJoinQuerySource<
	review::table,
	agency::table,
	diesel::dsl::Eq<agency::id, review::agency_id>,
>;

type BoxedCondition =
	Box<dyn BoxableExpression<Source, Pg, SqlType = Nullable<Bool>>>;

/// Combine the soft-delete guard with an optional region tag filter
fn visibility_condition(region: Option<String>) -> BoxedCondition {
	let mut condition: BoxedCondition =
		Box::new(review::is_deleted.eq(false).nullable());

	if let Some(region) = region {
		condition = Box::new(
			condition
				.and(review::regions.overlaps_with(vec![region]).nullable()),
		);
	}

	condition
}

/// A travel review joined with the agency it covers
#[derive(Clone, Debug, Queryable, Serialize)]
pub struct Review {
	pub review: PrimitiveReview,
	pub agency: Agency,
}

#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[serde(rename_all = "camelCase")]
#[diesel(table_name = review)]
#[diesel(check_for_backend(Pg))]
pub struct PrimitiveReview {
	pub id:            i32,
	#[serde(skip)]
	pub agency_id:     i32,
	pub title:         String,
	pub nights:        i32,
	pub people:        i32,
	pub regions:       Vec<String>,
	pub description:   Option<String>,
	pub thumbnail_url: Option<String>,
	#[serde(skip)]
	pub is_deleted:    bool,
	pub created_at:    NaiveDateTime,
}

/// An uploaded review photo with its position in the photo list
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[serde(rename_all = "camelCase")]
#[diesel(table_name = review_photo)]
#[diesel(check_for_backend(Pg))]
pub struct ReviewPhoto {
	#[serde(skip)]
	pub id:         i32,
	#[serde(skip)]
	pub review_id:  i32,
	pub image_url:  String,
	pub sort_order: i32,
}

impl ReviewPhoto {
	/// Load the ordered photo lists for the given review ids, sync
	fn for_reviews_sync(
		review_ids: &[i32],
		conn: &mut PgConnection,
	) -> QueryResult<Vec<Self>> {
		review_photo::table
			.filter(review_photo::review_id.eq_any(review_ids.to_vec()))
			.order((
				review_photo::review_id.asc(),
				review_photo::sort_order.asc(),
			))
			.select(Self::as_select())
			.load(conn)
	}
}

impl Review {
	/// Build a query with all required joins to select a full review data
	/// tuple
	#[diesel::dsl::auto_type(no_type_alias)]
	fn joined_query() -> _ {
		review::table
			.inner_join(agency::table.on(agency::id.eq(review::agency_id)))
	}

	/// Construct a full [`Review`] struct from the data returned by a joined
	/// query
	fn from_joined(data: JoinedReviewData) -> Self {
		Self { review: data.0, agency: data.1 }
	}

	/// Attach each review to its ordered photo list
	fn zip_photos(
		data: Vec<JoinedReviewData>,
		mut photos: Vec<ReviewPhoto>,
	) -> Vec<(Self, Vec<ReviewPhoto>)> {
		data.into_iter()
			.map(Self::from_joined)
			.map(|review| {
				let (own, rest) = photos
					.drain(..)
					.partition(|p| p.review_id == review.review.id);
				photos = rest;

				(review, own)
			})
			.collect()
	}

	/// Get a visible [`Review`] and its photos given its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(
		r_id: i32,
		conn: &DbConn,
	) -> Result<(Self, Vec<ReviewPhoto>), Error> {
		let query = Self::joined_query();

		let (data, photos) = conn
			.interact(move |conn| {
				let data: JoinedReviewData = query
					.filter(review::id.eq(r_id))
					.filter(review::is_deleted.eq(false))
					.select((
						PrimitiveReview::as_select(),
						Agency::as_select(),
					))
					.first(conn)?;

				let photos =
					ReviewPhoto::for_reviews_sync(&[data.0.id], conn)?;

				QueryResult::Ok((data, photos))
			})
			.await??;

		Ok((Self::from_joined(data), photos))
	}

	/// Get a page of visible [`Review`]s, newest first, optionally filtered
	/// to a region tag
	///
	/// Returns the total number of matches alongside the requested page.
	#[instrument(skip(conn))]
	pub async fn get_all(
		region: Option<String>,
		limit: i64,
		offset: i64,
		conn: &DbConn,
	) -> Result<(i64, Vec<(Self, Vec<ReviewPhoto>)>), Error> {
		let (total, data, photos) = conn
			.interact(move |conn| {
				let total: i64 = Self::joined_query()
					.filter(visibility_condition(region.clone()))
					.count()
					.get_result(conn)?;

				let data: Vec<JoinedReviewData> = Self::joined_query()
					.filter(visibility_condition(region))
					.order(review::created_at.desc())
					.limit(limit)
					.offset(offset)
					.select((
						PrimitiveReview::as_select(),
						Agency::as_select(),
					))
					.get_results(conn)?;

				let review_ids =
					data.iter().map(|d| d.0.id).collect::<Vec<_>>();
				let photos =
					ReviewPhoto::for_reviews_sync(&review_ids, conn)?;

				QueryResult::Ok((total, data, photos))
			})
			.await??;

		Ok((total, Self::zip_photos(data, photos)))
	}

	/// Get all visible [`Review`]s for the agency with the given id, newest
	/// first
	#[instrument(skip(conn))]
	pub async fn for_agency(
		a_id: i32,
		conn: &DbConn,
	) -> Result<Vec<(Self, Vec<ReviewPhoto>)>, Error> {
		let query = Self::joined_query();

		let (data, photos) = conn
			.interact(move |conn| {
				let data: Vec<JoinedReviewData> = query
					.filter(review::agency_id.eq(a_id))
					.filter(review::is_deleted.eq(false))
					.order(review::created_at.desc())
					.select((
						PrimitiveReview::as_select(),
						Agency::as_select(),
					))
					.get_results(conn)?;

				let review_ids =
					data.iter().map(|d| d.0.id).collect::<Vec<_>>();
				let photos =
					ReviewPhoto::for_reviews_sync(&review_ids, conn)?;

				QueryResult::Ok((data, photos))
			})
			.await??;

		Ok(Self::zip_photos(data, photos))
	}
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = review)]
#[diesel(check_for_backend(Pg))]
pub struct NewReview {
	pub agency_id:     i32,
	pub title:         String,
	pub nights:        i32,
	pub people:        i32,
	pub regions:       Vec<String>,
	pub description:   Option<String>,
	pub thumbnail_url: Option<String>,
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = review_photo)]
struct NewReviewPhoto {
	review_id:  i32,
	image_url:  String,
	sort_order: i32,
}

impl NewReview {
	/// Insert this [`NewReview`] together with its ordered photo rows
	///
	/// The first photo becomes the review thumbnail. Review and photo rows
	/// are written in one transaction.
	#[instrument(skip_all)]
	pub async fn insert(
		mut self,
		photo_urls: Vec<String>,
		conn: &DbConn,
	) -> Result<(Review, Vec<ReviewPhoto>), Error> {
		self.thumbnail_url = photo_urls.first().cloned();

		let (data, photos) = conn
			.interact(move |conn| {
				conn.transaction::<(JoinedReviewData, Vec<ReviewPhoto>), Error, _>(
					|conn| {
						let inserted: PrimitiveReview =
							diesel::insert_into(review::table)
								.values(&self)
								.returning(PrimitiveReview::as_returning())
								.get_result(conn)?;

						let photo_rows = photo_urls
							.into_iter()
							.enumerate()
							.map(|(index, image_url)| NewReviewPhoto {
								review_id: inserted.id,
								image_url,
								sort_order: index as i32 + 1,
							})
							.collect::<Vec<_>>();

						let photos =
							diesel::insert_into(review_photo::table)
								.values(photo_rows)
								.returning(ReviewPhoto::as_returning())
								.get_results(conn)?;

						let review_agency: Agency = agency::table
							.find(inserted.agency_id)
							.select(Agency::as_select())
							.first(conn)?;

						Ok(((inserted, review_agency), photos))
					},
				)
			})
			.await??;

		let review = Review::from_joined(data);

		info!("created review {} with {} photos", review.review.id, photos.len());

		Ok((review, photos))
	}
}
