use super::config::ZoneConfig;
use super::geometry::{Point, canonical_segment, dist_to_segment};

/// A positioned, optionally categorized object the zone system clusters.
pub trait ZoneEntity {
	fn position(&self) -> Point;
	/// Category identity. Entities without a category never cluster.
	fn category_color(&self) -> Option<&str>;
	fn category_label(&self) -> &str;
}

/// An unobstructed same-category connection between two entities, by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProximityEdge {
	pub a: usize,
	pub b: usize,
}

/// Proximity + visibility relation over one slice of entities.
#[derive(Clone, Debug, Default)]
pub struct ProximityGraph {
	adjacency: Vec<Vec<usize>>,
	edges: Vec<ProximityEdge>,
	clusterable: Vec<bool>,
	excluded: usize,
}

impl ProximityGraph {
	pub fn build<E: ZoneEntity>(entities: &[E], config: &ZoneConfig) -> Self {
		let positions: Vec<Point> = entities.iter().map(ZoneEntity::position).collect();
		let finite: Vec<bool> = positions.iter().map(|p| p.is_finite()).collect();
		let clusterable: Vec<bool> = entities
			.iter()
			.zip(&finite)
			.map(|(e, &ok)| ok && e.category_color().is_some())
			.collect();
		let excluded = finite.iter().filter(|ok| !**ok).count();

		let mut graph = Self {
			adjacency: vec![Vec::new(); entities.len()],
			edges: Vec::new(),
			clusterable,
			excluded,
		};

		let occlusion_radius = config.occlusion_radius();
		for (a, b) in candidate_pairs(entities, &positions, &graph.clusterable, config.cluster_distance) {
			if is_blocked(entities, &positions, &finite, a, b, occlusion_radius) {
				continue;
			}
			graph.adjacency[a].push(b);
			graph.adjacency[b].push(a);
			graph.edges.push(ProximityEdge { a, b });
		}
		graph
	}

	pub fn len(&self) -> usize {
		self.adjacency.len()
	}

	pub fn is_empty(&self) -> bool {
		self.adjacency.is_empty()
	}

	pub fn neighbors(&self, idx: usize) -> &[usize] {
		self.adjacency.get(idx).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn edges(&self) -> &[ProximityEdge] {
		&self.edges
	}

	pub fn is_connected(&self, a: usize, b: usize) -> bool {
		self.neighbors(a).contains(&b)
	}

	/// Finite position and a category.
	pub fn is_clusterable(&self, idx: usize) -> bool {
		self.clusterable.get(idx).copied().unwrap_or(false)
	}

	/// Entities left out of this pass because of a non-finite position.
	pub fn excluded(&self) -> usize {
		self.excluded
	}
}

/// Same-category pairs `(i, j)`, `i < j`, closer than `cluster_distance`.
///
/// Plain O(N²) scan, no spatial index.
fn candidate_pairs<E: ZoneEntity>(
	entities: &[E],
	positions: &[Point],
	clusterable: &[bool],
	cluster_distance: f64,
) -> Vec<(usize, usize)> {
	let mut pairs = Vec::new();
	for i in 0..entities.len() {
		let Some(color) = entities[i].category_color().filter(|_| clusterable[i]) else {
			continue;
		};
		for j in i + 1..entities.len() {
			if clusterable[j]
				&& entities[j].category_color() == Some(color)
				&& positions[i].distance(positions[j]) < cluster_distance
			{
				pairs.push((i, j));
			}
		}
	}
	pairs
}

/// A foreign entity (other category or none) too close to the segment `a`-`b`
/// blocks the edge. Same-category entities never block.
fn is_blocked<E: ZoneEntity>(
	entities: &[E],
	positions: &[Point],
	finite: &[bool],
	a: usize,
	b: usize,
	occlusion_radius: f64,
) -> bool {
	let color = entities[a].category_color();
	let (from, to) = canonical_segment(positions[a], positions[b]);
	entities.iter().enumerate().any(|(o, obstacle)| {
		o != a
			&& o != b
			&& finite[o]
			&& obstacle.category_color() != color
			&& dist_to_segment(positions[o], from, to) < occlusion_radius
	})
}
