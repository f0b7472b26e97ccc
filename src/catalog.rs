//! Static region/spot catalog backing the itinerary builder
//!
//! An itinerary is only accepted if every selected region exists here and
//! every selected spot belongs to one of the selected regions.

use serde::Serialize;

use crate::Error;

/// A bookable tour region with its recommended spots
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
	pub id:          &'static str,
	pub name:        &'static str,
	pub tagline:     &'static str,
	/// Travel time band from Ulaanbaatar
	pub travel_time: &'static str,
	pub spots:       &'static [&'static str],
}

pub const REGIONS: &[Region] = &[
	Region {
		id:          "gobi",
		name:        "Southern Gobi",
		tagline:     "Endless horizons, singing dunes, and the milky way",
		travel_time: "8-10h",
		spots:       &[
			"Baga Gazriin Chuluu",
			"Tsagaan Suvarga",
			"Yolyn Am",
			"Khongoryn Els",
			"Bayanzag",
			"Ongi Monastery",
			"Mandalgovi",
		],
	},
	Region {
		id:          "central",
		name:        "Central Steppe",
		tagline:     "Wild horses, hot springs, and waterfalls",
		travel_time: "3-5h",
		spots:       &[
			"Terelj National Park",
			"Elsen Tasarkhai",
			"Tsenkher Hot Springs",
			"Ugii Lake",
			"Kharkhorin",
			"Orkhon Waterfall",
		],
	},
	Region {
		id:          "khuvsgul",
		name:        "Northern Khuvsgul",
		tagline:     "The blue pearl lake and the reindeer people",
		travel_time: "12-14h",
		spots:       &[
			"Khuvsgul Lake",
			"Uran Togoo",
			"Terkhiin Tsagaan Lake",
			"Bulgan",
			"Murun",
			"Shine-Ider",
		],
	},
];

/// Look up a [`Region`] given its id
#[must_use]
pub fn get(id: &str) -> Option<&'static Region> {
	REGIONS.iter().find(|r| r.id == id)
}

/// Validate an itinerary selection against the catalog
///
/// A valid selection contains at least one known region and at least one
/// spot, and every spot belongs to one of the selected regions.
pub fn validate_selection(
	regions: &[String],
	spots: &[String],
) -> Result<(), Error> {
	if regions.is_empty() {
		return Err(Error::ValidationError(
			"select at least one region".to_string(),
		));
	}

	let mut selected = Vec::with_capacity(regions.len());
	for id in regions {
		let Some(region) = get(id) else {
			return Err(Error::ValidationError(format!(
				"unknown region '{id}'"
			)));
		};

		selected.push(region);
	}

	if spots.is_empty() {
		return Err(Error::ValidationError(
			"select at least one spot".to_string(),
		));
	}

	for spot in spots {
		let known =
			selected.iter().any(|r| r.spots.contains(&spot.as_str()));

		if !known {
			return Err(Error::ValidationError(format!(
				"spot '{spot}' does not belong to any selected region"
			)));
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn strings(items: &[&str]) -> Vec<String> {
		items.iter().map(ToString::to_string).collect()
	}

	#[test]
	fn accepts_spots_across_selected_regions() {
		let regions = strings(&["gobi", "central"]);
		let spots = strings(&["Yolyn Am", "Tsenkher Hot Springs"]);

		assert!(validate_selection(&regions, &spots).is_ok());
	}

	#[test]
	fn rejects_empty_region_selection() {
		let result = validate_selection(&[], &strings(&["Yolyn Am"]));

		assert!(matches!(result, Err(Error::ValidationError(_))));
	}

	#[test]
	fn rejects_empty_spot_selection() {
		let result = validate_selection(&strings(&["gobi"]), &[]);

		assert!(matches!(result, Err(Error::ValidationError(_))));
	}

	#[test]
	fn rejects_unknown_region() {
		let result = validate_selection(
			&strings(&["atlantis"]),
			&strings(&["Yolyn Am"]),
		);

		assert!(matches!(result, Err(Error::ValidationError(_))));
	}

	#[test]
	fn rejects_spot_outside_selected_regions() {
		// Khuvsgul Lake exists in the catalog but khuvsgul was not selected
		let result = validate_selection(
			&strings(&["gobi"]),
			&strings(&["Khuvsgul Lake"]),
		);

		assert!(matches!(result, Err(Error::ValidationError(_))));
	}

	#[test]
	fn region_ids_are_unique() {
		for region in REGIONS {
			let count =
				REGIONS.iter().filter(|r| r.id == region.id).count();
			assert_eq!(count, 1);
		}
	}
}
