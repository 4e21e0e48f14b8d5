use super::color::Rgb;
use super::config::ZoneConfig;
use super::geometry::{Point, centroid};
use super::graph::{ProximityGraph, ZoneEntity};

/// Tint used for categories whose color does not parse.
pub const FALLBACK_TINT: Rgb = Rgb::from_u32(0x7f7f7f);

/// A thick, round-capped segment between two clustered entities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Road {
	pub from: Point,
	pub to: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
	pub center: Point,
	pub radius: f64,
}

/// Raw white geometry for one category. The host blurs and tints it.
///
/// Surfaces are kept across passes and cleared, never dropped, so their
/// buffers are reused while nodes are dragged around.
#[derive(Clone, Debug)]
pub struct ZoneSurface {
	color: String,
	tint: Rgb,
	road_width: f64,
	roads: Vec<Road>,
	circles: Vec<Circle>,
}

impl ZoneSurface {
	pub fn new(color: &str, road_width: f64) -> Self {
		let tint = Rgb::from_hex(color).unwrap_or_else(|| {
			log::warn!("zone color {color:?} is not #RRGGBB, tinting it gray");
			FALLBACK_TINT
		});
		Self {
			color: color.to_owned(),
			tint,
			road_width,
			roads: Vec::new(),
			circles: Vec::new(),
		}
	}

	pub fn clear(&mut self) {
		self.roads.clear();
		self.circles.clear();
	}

	pub fn draw_road(&mut self, from: Point, to: Point) {
		self.roads.push(Road { from, to });
	}

	pub fn draw_circle(&mut self, center: Point, radius: f64) {
		self.circles.push(Circle { center, radius });
	}

	pub fn color(&self) -> &str {
		&self.color
	}

	pub fn tint(&self) -> Rgb {
		self.tint
	}

	pub fn road_width(&self) -> f64 {
		self.road_width
	}

	pub fn roads(&self) -> &[Road] {
		&self.roads
	}

	pub fn circles(&self) -> &[Circle] {
		&self.circles
	}

	pub fn is_empty(&self) -> bool {
		self.roads.is_empty() && self.circles.is_empty()
	}

	/// Axis-aligned bounds of everything drawn, padded by `margin`.
	pub fn bounds(&self, margin: f64) -> Option<(Point, Point)> {
		let half_road = self.road_width / 2.0;
		let extents = self
			.circles
			.iter()
			.map(|c| (c.center, c.radius))
			.chain(self.roads.iter().flat_map(|r| [(r.from, half_road), (r.to, half_road)]));
		let mut bounds: Option<(Point, Point)> = None;
		for (p, r) in extents {
			let (lo, hi) = bounds.get_or_insert((p, p));
			lo.x = lo.x.min(p.x - r);
			lo.y = lo.y.min(p.y - r);
			hi.x = hi.x.max(p.x + r);
			hi.y = hi.y.max(p.y + r);
		}
		bounds.map(|(lo, hi)| {
			(
				Point::new(lo.x - margin, lo.y - margin),
				Point::new(hi.x + margin, hi.y + margin),
			)
		})
	}
}

/// What a pass decided for one cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterShape {
	pub color: String,
	pub label: String,
	/// Entity indices, ascending.
	pub members: Vec<usize>,
	pub centroid: Point,
	pub label_size: f64,
	/// Label pool slot within the category for this pass.
	pub slot: usize,
}

/// Draws one cluster's roads and node circles onto `surface` and returns its
/// label directive. `members` must be sorted and non-empty.
pub fn plan_cluster<E: ZoneEntity>(
	entities: &[E],
	graph: &ProximityGraph,
	members: Vec<usize>,
	config: &ZoneConfig,
	surface: &mut ZoneSurface,
	slot: usize,
) -> Option<ClusterShape> {
	let first = entities.get(*members.first()?)?;
	let color = first.category_color()?.to_owned();
	let label = label_text(first.category_label(), config);

	for edge in graph.edges() {
		if members.binary_search(&edge.a).is_ok() && members.binary_search(&edge.b).is_ok() {
			surface.draw_road(entities[edge.a].position(), entities[edge.b].position());
		}
	}
	for &idx in &members {
		surface.draw_circle(entities[idx].position(), config.zone_radius);
	}

	Some(ClusterShape {
		centroid: centroid(members.iter().map(|&idx| entities[idx].position()))?,
		label_size: config.label_size(members.len()),
		color,
		label,
		members,
		slot,
	})
}

fn label_text(category: &str, config: &ZoneConfig) -> String {
	let trimmed = category.trim();
	if trimmed.is_empty() {
		config.fallback_label.clone()
	} else {
		trimmed.to_uppercase()
	}
}
