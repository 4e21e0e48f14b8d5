/// Default distance under which two same-category entities may connect.
pub const CLUSTER_DISTANCE: f64 = 450.0;
/// Default radius of the circle drawn around each clustered entity.
pub const ZONE_RADIUS: f64 = 90.0;

/// Tunables for zone clustering and label styling.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneConfig {
	pub cluster_distance: f64,
	pub zone_radius: f64,
	/// Fraction of `zone_radius` within which a foreign entity blocks an edge.
	pub occlusion_factor: f64,
	pub label_min_size: f64,
	pub label_max_size: f64,
	pub label_step: f64,
	pub label_darken: f64,
	pub label_alpha: f64,
	pub label_font_family: String,
	pub label_font_weight: u16,
	pub label_letter_spacing: f64,
	pub fallback_label: String,
}

impl Default for ZoneConfig {
	fn default() -> Self {
		Self {
			cluster_distance: CLUSTER_DISTANCE,
			zone_radius: ZONE_RADIUS,
			occlusion_factor: 0.8,
			label_min_size: 25.0,
			label_max_size: 40.0,
			label_step: 5.0,
			label_darken: 0.4,
			label_alpha: 0.25,
			label_font_family: "Segoe UI".into(),
			label_font_weight: 900,
			label_letter_spacing: 2.0,
			fallback_label: "ZONE".into(),
		}
	}
}

impl ZoneConfig {
	pub fn occlusion_radius(&self) -> f64 {
		self.zone_radius * self.occlusion_factor
	}

	pub fn road_width(&self) -> f64 {
		self.zone_radius * 2.0
	}

	/// Label size for a cluster of `members` entities: grows one step per member past two.
	///
	/// The maximum wins when the bounds are inverted.
	pub fn label_size(&self, members: usize) -> f64 {
		let extra = members.saturating_sub(2) as f64;
		(self.label_min_size + extra * self.label_step)
			.max(self.label_min_size)
			.min(self.label_max_size)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn label_size_is_monotonic_and_capped() {
		let config = ZoneConfig::default();
		let sizes: Vec<f64> = (2..=6).map(|n| config.label_size(n)).collect();
		assert_eq!(sizes, vec![25.0, 30.0, 35.0, 40.0, 40.0]);
		assert_eq!(config.label_size(50), 40.0);
	}

	#[test]
	fn label_size_tolerates_inverted_bounds() {
		let config = ZoneConfig {
			label_min_size: 50.0,
			..ZoneConfig::default()
		};
		assert_eq!(config.label_size(3), 40.0);

		let config = ZoneConfig {
			label_max_size: f64::NAN,
			..ZoneConfig::default()
		};
		assert_eq!(config.label_size(3), 30.0);
	}

	#[test]
	fn derived_radii() {
		let config = ZoneConfig::default();
		assert_eq!(config.occlusion_radius(), 72.0);
		assert_eq!(config.road_width(), 180.0);
	}
}
