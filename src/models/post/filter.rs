use diesel::dsl::InnerJoinQuerySource;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Nullable};
use serde::{Deserialize, Serialize};

use crate::models::{PostStatus, TargetGender};
use crate::schema::{post, schedule, travel_user};

/// Search parameters for the companion board
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFilter {
	/// Substring match on the post title
	pub query: Option<String>,

	pub status:        Option<PostStatus>,
	pub region:        Option<String>,
	pub target_gender: Option<TargetGender>,
	pub target_age:    Option<String>,
}

type Source = InnerJoinQuerySource<
	InnerJoinQuerySource<
		post::table,
		schedule::table,
		diesel::dsl::Eq<schedule::id, post::schedule_id>,
	>,
	travel_user::table,
	diesel::dsl::Eq<travel_user::id, post::author_id>,
>;

type BoxedCondition =
	Box<dyn BoxableExpression<Source, Pg, SqlType = Nullable<Bool>>>;

impl PostFilter {
	fn into_boxed_condition(self) -> Option<BoxedCondition> {
		let mut conditions: Vec<BoxedCondition> = vec![];

		if let Some(query) = self.query {
			conditions.push(Box::new(
				post::title.ilike(format!("%{query}%")).nullable(),
			));
		}

		if let Some(status) = self.status {
			conditions.push(Box::new(post::status.eq(status).nullable()));
		}

		if let Some(region) = self.region {
			conditions.push(Box::new(
				schedule::regions.overlaps_with(vec![region]).nullable(),
			));
		}

		if let Some(gender) = self.target_gender {
			conditions
				.push(Box::new(post::target_gender.eq(gender).nullable()));
		}

		if let Some(age) = self.target_age {
			conditions.push(Box::new(
				post::target_ages.contains(vec![age]).nullable(),
			));
		}

		conditions.into_iter().fold(
			None,
			|conditions: Option<BoxedCondition>, condition| {
				Some(match conditions {
					Some(cs) => Box::new(cs.and(condition)),
					None => condition,
				})
			},
		)
	}
}

/// Combine the soft-delete guard with an optional [`PostFilter`]
pub(crate) fn visibility_condition(filter: PostFilter) -> BoxedCondition {
	let mut condition: BoxedCondition =
		Box::new(post::is_deleted.eq(false).nullable());

	if let Some(f) = filter.into_boxed_condition() {
		condition = Box::new(condition.and(f));
	}

	condition
}
