use chrono::{NaiveDate, NaiveDateTime};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::schedule;

/// A single trip schedule as produced by the itinerary builder
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[serde(rename_all = "camelCase")]
#[diesel(table_name = schedule)]
#[diesel(check_for_backend(Pg))]
pub struct Schedule {
	pub id:         i32,
	pub start_date: NaiveDate,
	pub nights:     i32,
	pub people:     i32,
	pub regions:    Vec<String>,
	pub spots:      Vec<String>,
	pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize, Insertable, Serialize)]
#[diesel(table_name = schedule)]
#[diesel(check_for_backend(Pg))]
pub struct NewSchedule {
	pub start_date: NaiveDate,
	pub nights:     i32,
	pub people:     i32,
	pub regions:    Vec<String>,
	pub spots:      Vec<String>,
}

impl NewSchedule {
	/// Insert this [`NewSchedule`] within an already open transaction
	pub(crate) fn insert_sync(
		self,
		conn: &mut PgConnection,
	) -> QueryResult<Schedule> {
		diesel::insert_into(schedule::table)
			.values(self)
			.returning(Schedule::as_returning())
			.get_result(conn)
	}
}
