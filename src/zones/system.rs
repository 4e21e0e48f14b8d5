use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use super::cluster::extract_clusters;
use super::config::ZoneConfig;
use super::graph::{ProximityGraph, ZoneEntity};
use super::labels::LabelPool;
use super::shape::{ClusterShape, ZoneSurface, plan_cluster};

/// Owns the per-category surfaces and the label pool between passes.
///
/// Surfaces and labels are created lazily and kept until [`ZoneSystem::dispose`];
/// a category whose entities all disappear keeps an empty surface and hidden labels.
#[derive(Debug, Default)]
pub struct ZoneSystem {
	config: ZoneConfig,
	surfaces: BTreeMap<String, ZoneSurface>,
	labels: LabelPool,
	clusters: Vec<ClusterShape>,
	edge_count: usize,
	passes: u64,
}

impl ZoneSystem {
	pub fn new(config: ZoneConfig) -> Self {
		Self {
			config,
			..Default::default()
		}
	}

	pub fn config(&self) -> &ZoneConfig {
		&self.config
	}

	/// Rebuilds every zone from the current entity positions.
	///
	/// Surfaces are cleared and redrawn, every pooled label is hidden and the
	/// ones backing a cluster are shown again with fresh text, position and size.
	pub fn recompute<E: ZoneEntity>(&mut self, entities: &[E]) {
		self.surfaces.values_mut().for_each(ZoneSurface::clear);
		self.labels.hide_all();
		self.clusters.clear();
		self.passes += 1;

		let graph = ProximityGraph::build(entities, &self.config);
		if graph.excluded() > 0 {
			warn!(
				"zone pass {}: skipped {} entities with non-finite positions",
				self.passes,
				graph.excluded()
			);
		}
		self.edge_count = graph.edges().len();

		let mut slots: HashMap<&str, usize> = HashMap::new();
		for members in extract_clusters(&graph) {
			let Some(color) = entities[members[0]].category_color() else {
				continue;
			};
			let slot = slots.entry(color).or_insert(0);
			let road_width = self.config.road_width();
			let surface = self
				.surfaces
				.entry(color.to_owned())
				.or_insert_with(|| ZoneSurface::new(color, road_width));

			let Some(shape) = plan_cluster(entities, &graph, members, &self.config, surface, *slot)
			else {
				continue;
			};
			*slot += 1;

			let label = self.labels.acquire(color, shape.slot, &self.config);
			label.text.clone_from(&shape.label);
			label.position = shape.centroid;
			label.size = shape.label_size;
			label.visible = true;

			self.clusters.push(shape);
		}

		debug!(
			"zone pass {}: {} entities, {} edges, {} clusters",
			self.passes,
			entities.len(),
			self.edge_count,
			self.clusters.len()
		);
	}

	/// Clusters from the last pass.
	pub fn clusters(&self) -> &[ClusterShape] {
		&self.clusters
	}

	pub fn edge_count(&self) -> usize {
		self.edge_count
	}

	pub fn passes(&self) -> u64 {
		self.passes
	}

	pub fn surfaces(&self) -> impl Iterator<Item = &ZoneSurface> {
		self.surfaces.values()
	}

	pub fn surface(&self, color: &str) -> Option<&ZoneSurface> {
		self.surfaces.get(color)
	}

	pub fn labels(&self) -> &LabelPool {
		&self.labels
	}

	/// Drops every surface and pooled label.
	pub fn dispose(&mut self) {
		self.surfaces.clear();
		self.labels.clear();
		self.clusters.clear();
		self.edge_count = 0;
	}
}
