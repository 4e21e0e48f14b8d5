use std::collections::BTreeMap;

use super::color::Rgb;
use super::config::ZoneConfig;
use super::geometry::Point;

/// Text color for labels whose category color does not parse.
pub const FALLBACK_LABEL_FILL: Rgb = Rgb::from_u32(0x1a1a1a);

#[derive(Clone, Debug, PartialEq)]
pub struct LabelStyle {
	pub fill: Rgb,
	pub alpha: f64,
	pub font_family: String,
	pub font_weight: u16,
	pub letter_spacing: f64,
}

impl LabelStyle {
	fn for_color(color: &str, config: &ZoneConfig) -> Self {
		let fill = Rgb::from_hex(color)
			.map(|rgb| rgb.darken(config.label_darken))
			.unwrap_or(FALLBACK_LABEL_FILL);
		Self {
			fill,
			alpha: config.label_alpha,
			font_family: config.label_font_family.clone(),
			font_weight: config.label_font_weight,
			letter_spacing: config.label_letter_spacing,
		}
	}
}

/// A pooled watermark label. Text, position and size are rewritten every pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneLabel {
	pub text: String,
	pub position: Point,
	pub size: f64,
	pub visible: bool,
	style: LabelStyle,
}

impl ZoneLabel {
	fn new(style: LabelStyle, size: f64) -> Self {
		Self {
			text: String::new(),
			position: Point::default(),
			size,
			visible: false,
			style,
		}
	}

	pub fn style(&self) -> &LabelStyle {
		&self.style
	}

	/// CSS font shorthand for the current size.
	pub fn font(&self) -> String {
		format!(
			"{} {}px \"{}\"",
			self.style.font_weight, self.size, self.style.font_family
		)
	}
}

/// Label resources keyed by `(category color, slot)`.
///
/// Entries are only ever added; a pass hides everything up front and shows
/// what it acquires.
#[derive(Clone, Debug, Default)]
pub struct LabelPool {
	slots: BTreeMap<String, Vec<ZoneLabel>>,
}

impl LabelPool {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the label at `(color, slot)`, creating entries up to `slot` if needed.
	pub fn acquire(&mut self, color: &str, slot: usize, config: &ZoneConfig) -> &mut ZoneLabel {
		let labels = self.slots.entry(color.to_owned()).or_default();
		while labels.len() <= slot {
			labels.push(ZoneLabel::new(
				LabelStyle::for_color(color, config),
				config.label_max_size,
			));
		}
		&mut labels[slot]
	}

	pub fn hide_all(&mut self) {
		self.slots
			.values_mut()
			.flatten()
			.for_each(|label| label.visible = false);
	}

	pub fn get(&self, color: &str, slot: usize) -> Option<&ZoneLabel> {
		self.slots.get(color)?.get(slot)
	}

	/// Live entries for `color`, visible or not.
	pub fn len_for(&self, color: &str) -> usize {
		self.slots.get(color).map_or(0, Vec::len)
	}

	pub fn len(&self) -> usize {
		self.slots.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn visible(&self) -> impl Iterator<Item = &ZoneLabel> {
		self.slots.values().flatten().filter(|label| label.visible)
	}

	pub fn clear(&mut self) {
		self.slots.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn acquire_creates_once_and_reuses() {
		let config = ZoneConfig::default();
		let mut pool = LabelPool::new();
		pool.acquire("#FF0000", 0, &config).text = "A".into();
		assert_eq!(pool.acquire("#FF0000", 0, &config).text, "A");
		assert_eq!(pool.len_for("#FF0000"), 1);
		assert_eq!(pool.len(), 1);
	}

	#[test]
	fn pool_only_grows_and_hides() {
		let config = ZoneConfig::default();
		let mut pool = LabelPool::new();
		pool.acquire("#FF0000", 2, &config).visible = true;
		assert_eq!(pool.len_for("#FF0000"), 3);
		assert_eq!(pool.visible().count(), 1);

		pool.hide_all();
		assert_eq!(pool.visible().count(), 0);
		assert_eq!(pool.len_for("#FF0000"), 3);
		assert!(pool.get("#FF0000", 2).is_some());
	}

	#[test]
	fn style_uses_darkened_category_color() {
		let config = ZoneConfig::default();
		let mut pool = LabelPool::new();
		let label = pool.acquire("#C86432", 0, &config);
		assert_eq!(label.style().fill, Rgb::new(120, 60, 30));
		assert_eq!(label.style().alpha, 0.25);
		label.size = 30.0;
		assert_eq!(label.font(), "900 30px \"Segoe UI\"");

		let odd = pool.acquire("not-a-color", 0, &config);
		assert_eq!(odd.style().fill, FALLBACK_LABEL_FILL);
	}
}
