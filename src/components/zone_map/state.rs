use std::collections::HashMap;

use log::info;

use crate::zones::{Point, ZoneConfig, ZoneEntity, ZoneSystem};

use super::types::{Category, MapData};

/// World-space radius for picking a node under the cursor.
pub const HIT_RADIUS: f64 = 40.0;
pub const NODE_SIZE: f64 = 14.0;
/// Frames between zone passes while a node is being dragged.
pub const DRAG_RECOMPUTE_FRAMES: u32 = 3;

/// A node on the canvas with its category resolved.
#[derive(Clone, Debug)]
pub struct PlacedNode {
	pub id: String,
	pub title: String,
	pub position: Point,
	pub color: Option<String>,
	pub category_name: String,
}

impl ZoneEntity for PlacedNode {
	fn position(&self) -> Point {
		self.position
	}

	fn category_color(&self) -> Option<&str> {
		self.color.as_deref()
	}

	fn category_label(&self) -> &str {
		&self.category_name
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneTrigger {
	Load,
	NodeCreated,
	NodeDeleted,
	DragMove,
	DragRelease,
}

/// Decides on which frames the zones are rebuilt.
///
/// Structural changes and drag release rebuild on the next frame; movement
/// during a drag rebuilds at most every `drag_interval` frames.
#[derive(Clone, Debug)]
pub struct ZoneSchedule {
	pending: bool,
	drag_dirty: bool,
	drag_frames: u32,
	drag_interval: u32,
}

impl Default for ZoneSchedule {
	fn default() -> Self {
		Self::new(DRAG_RECOMPUTE_FRAMES)
	}
}

impl ZoneSchedule {
	pub fn new(drag_interval: u32) -> Self {
		Self {
			pending: false,
			drag_dirty: false,
			drag_frames: 0,
			drag_interval: drag_interval.max(1),
		}
	}

	pub fn request(&mut self, trigger: ZoneTrigger) {
		match trigger {
			ZoneTrigger::DragMove => self.drag_dirty = true,
			ZoneTrigger::Load
			| ZoneTrigger::NodeCreated
			| ZoneTrigger::NodeDeleted
			| ZoneTrigger::DragRelease => {
				self.pending = true;
			}
		}
	}

	/// Called once per frame; true when this frame should rebuild zones.
	pub fn poll(&mut self) -> bool {
		if self.pending {
			self.pending = false;
			self.drag_dirty = false;
			self.drag_frames = 0;
			return true;
		}
		if !self.drag_dirty {
			return false;
		}
		self.drag_frames += 1;
		if self.drag_frames < self.drag_interval {
			return false;
		}
		self.drag_frames = 0;
		self.drag_dirty = false;
		true
	}
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Point,
}

/// A connection being dragged out of `source` towards the cursor.
#[derive(Clone, Debug)]
pub struct LinkDraft {
	pub source: usize,
	pub cursor: Point,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

pub struct MapState {
	pub nodes: Vec<PlacedNode>,
	pub categories: Vec<Category>,
	pub zones: ZoneSystem,
	pub schedule: ZoneSchedule,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub link_draft: Option<LinkDraft>,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	links: Vec<(usize, usize)>,
	next_category: usize,
	planted: usize,
}

impl MapState {
	pub fn new(data: &MapData, width: f64, height: f64) -> Self {
		let by_id: HashMap<&str, &Category> =
			data.categories.iter().map(|c| (c.id.as_str(), c)).collect();
		let mut id_to_idx = HashMap::new();

		let nodes: Vec<PlacedNode> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				id_to_idx.insert(node.id.as_str(), i);
				let category = node.category.as_deref().and_then(|id| by_id.get(id));
				PlacedNode {
					id: node.id.clone(),
					title: node.title.clone(),
					position: Point::new(node.x, node.y),
					color: category.map(|c| c.color.clone()),
					category_name: category.map(|c| c.name.clone()).unwrap_or_default(),
				}
			})
			.collect();

		let links = data
			.links
			.iter()
			.filter_map(|link| {
				Some((
					*id_to_idx.get(link.source.as_str())?,
					*id_to_idx.get(link.target.as_str())?,
				))
			})
			.collect();

		let mut schedule = ZoneSchedule::default();
		schedule.request(ZoneTrigger::Load);
		info!(
			"Loaded {} nodes in {} categories",
			nodes.len(),
			data.categories.len()
		);

		Self {
			nodes,
			categories: data.categories.clone(),
			zones: ZoneSystem::new(ZoneConfig::default()),
			schedule,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			link_draft: None,
			width,
			height,
			flow_time: 0.0,
			links,
			next_category: 0,
			planted: 0,
		}
	}

	pub fn links(&self) -> impl Iterator<Item = (&PlacedNode, &PlacedNode)> {
		self.links
			.iter()
			.filter_map(|&(a, b)| Some((self.nodes.get(a)?, self.nodes.get(b)?)))
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node within [`HIT_RADIUS`] of the screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let p = self.screen_to_graph(sx, sy);
		self.nodes
			.iter()
			.rposition(|node| node.position.distance(p) < HIT_RADIUS)
	}

	pub fn begin_drag(&mut self, idx: usize, sx: f64, sy: f64) {
		let Some(node) = self.nodes.get(idx) else {
			return;
		};
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start: node.position,
		};
	}

	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node_idx.filter(|_| self.drag.active) else {
			return;
		};
		let (dx, dy) = (
			(sx - self.drag.start_x) / self.transform.k,
			(sy - self.drag.start_y) / self.transform.k,
		);
		if let Some(node) = self.nodes.get_mut(idx) {
			node.position = Point::new(self.drag.node_start.x + dx, self.drag.node_start.y + dy);
			self.schedule.request(ZoneTrigger::DragMove);
		}
	}

	pub fn end_drag(&mut self) {
		if self.drag.active && self.drag.node_idx.is_some() {
			self.schedule.request(ZoneTrigger::DragRelease);
		}
		self.drag = DragState::default();
		self.pan.active = false;
	}

	/// Connects two nodes. Self-links and duplicates (either direction) are refused.
	pub fn connect(&mut self, a: usize, b: usize) -> bool {
		let exists = self
			.links
			.iter()
			.any(|&(s, t)| (s, t) == (a, b) || (s, t) == (b, a));
		if a == b || a >= self.nodes.len() || b >= self.nodes.len() || exists {
			return false;
		}
		self.links.push((a, b));
		info!("Connected {} -> {}", self.nodes[a].title, self.nodes[b].title);
		true
	}

	pub fn begin_link(&mut self, idx: usize, sx: f64, sy: f64) {
		if idx < self.nodes.len() {
			self.link_draft = Some(LinkDraft {
				source: idx,
				cursor: self.screen_to_graph(sx, sy),
			});
		}
	}

	pub fn link_to(&mut self, sx: f64, sy: f64) {
		let cursor = self.screen_to_graph(sx, sy);
		if let Some(draft) = self.link_draft.as_mut() {
			draft.cursor = cursor;
		}
	}

	/// Drops the pending connection onto whatever node is under the cursor.
	pub fn finish_link(&mut self, sx: f64, sy: f64) -> bool {
		let Some(draft) = self.link_draft.take() else {
			return false;
		};
		match self.node_at_position(sx, sy) {
			Some(target) => self.connect(draft.source, target),
			None => false,
		}
	}

	/// Removes a node and its connections, rebuilding zones on the next frame.
	pub fn delete_node(&mut self, idx: usize) -> Option<PlacedNode> {
		if idx >= self.nodes.len() {
			return None;
		}
		let node = self.nodes.remove(idx);
		let shift = |i: usize| if i > idx { i - 1 } else { i };
		self.links = self
			.links
			.iter()
			.filter(|&&(a, b)| a != idx && b != idx)
			.map(|&(a, b)| (shift(a), shift(b)))
			.collect();
		self.drag = DragState::default();
		self.link_draft = None;
		self.schedule.request(ZoneTrigger::NodeDeleted);
		info!("Deleted {} ({})", node.title, node.id);
		Some(node)
	}

	/// Plants a node of the next category at a screen position.
	pub fn plant_node(&mut self, sx: f64, sy: f64) -> usize {
		let category = (!self.categories.is_empty())
			.then(|| self.categories[self.next_category % self.categories.len()].clone());
		self.next_category += 1;
		self.planted += 1;

		let node = PlacedNode {
			id: format!("planted-{}", self.planted),
			title: format!("Idea {}", self.planted),
			position: self.screen_to_graph(sx, sy),
			color: category.as_ref().map(|c| c.color.clone()),
			category_name: category.map(|c| c.name).unwrap_or_default(),
		};
		info!("Planted {} ({}) in {:?}", node.title, node.id, node.category_name);
		self.nodes.push(node);
		self.schedule.request(ZoneTrigger::NodeCreated);
		self.nodes.len() - 1
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
		if self.schedule.poll() {
			self.zones.recompute(&self.nodes);
		}
	}

	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::zone_map::types::{MapLink, MapNode};

	fn sample() -> MapData {
		MapData {
			categories: vec![
				Category {
					id: "green".into(),
					name: "Sustainability".into(),
					color: "#2ca02c".into(),
				},
				Category {
					id: "blue".into(),
					name: "Digital".into(),
					color: "#1f77b4".into(),
				},
			],
			nodes: vec![
				MapNode {
					id: "a".into(),
					title: "Solar roof".into(),
					x: 0.0,
					y: 0.0,
					category: Some("green".into()),
				},
				MapNode {
					id: "b".into(),
					title: "Compost".into(),
					x: 150.0,
					y: 0.0,
					category: Some("green".into()),
				},
				MapNode {
					id: "c".into(),
					title: "Loose idea".into(),
					x: 0.0,
					y: 800.0,
					category: None,
				},
			],
			links: vec![
				MapLink {
					source: "a".into(),
					target: "c".into(),
				},
				MapLink {
					source: "a".into(),
					target: "missing".into(),
				},
			],
		}
	}

	#[test]
	fn schedule_rebuilds_immediately_on_structural_change() {
		let mut schedule = ZoneSchedule::default();
		assert!(!schedule.poll());
		schedule.request(ZoneTrigger::NodeCreated);
		assert!(schedule.poll());
		assert!(!schedule.poll());
	}

	#[test]
	fn schedule_throttles_drag() {
		let mut schedule = ZoneSchedule::default();
		let mut fired = Vec::new();
		for frame in 1..=9 {
			schedule.request(ZoneTrigger::DragMove);
			if schedule.poll() {
				fired.push(frame);
			}
		}
		assert_eq!(fired, vec![3, 6, 9]);

		schedule.request(ZoneTrigger::DragMove);
		schedule.request(ZoneTrigger::DragRelease);
		assert!(schedule.poll());
		assert!(!schedule.poll());
	}

	#[test]
	fn loads_and_builds_zones_on_first_tick() {
		let mut state = MapState::new(&sample(), 800.0, 600.0);
		assert_eq!(state.links().count(), 1);
		assert_eq!(state.nodes[2].category_color(), None);

		state.tick(0.016);
		assert_eq!(state.zones.clusters().len(), 1);
		assert_eq!(state.zones.clusters()[0].label, "SUSTAINABILITY");
	}

	#[test]
	fn dragging_apart_dissolves_zone_on_release() {
		let mut state = MapState::new(&sample(), 800.0, 600.0);
		state.tick(0.016);

		let (sx, sy) = (state.transform.x + 150.0, state.transform.y);
		let idx = state.node_at_position(sx, sy).unwrap();
		assert_eq!(idx, 1);
		state.begin_drag(idx, sx, sy);
		state.drag_to(sx + 1000.0, sy);
		state.tick(0.016);
		assert_eq!(state.zones.clusters().len(), 1, "throttled mid-drag");

		state.end_drag();
		state.tick(0.016);
		assert!(state.zones.clusters().is_empty());
		assert_eq!(state.nodes[1].position, Point::new(1150.0, 0.0));
	}

	#[test]
	fn planting_cycles_categories() {
		let mut state = MapState::new(&sample(), 800.0, 600.0);
		state.tick(0.016);
		let (sx, sy) = (state.transform.x + 75.0, state.transform.y + 100.0);
		let first = state.plant_node(sx, sy);
		let second = state.plant_node(sx, sy + 2000.0);
		assert_eq!(state.nodes[first].color.as_deref(), Some("#2ca02c"));
		assert_eq!(state.nodes[second].color.as_deref(), Some("#1f77b4"));

		state.tick(0.016);
		assert_eq!(state.zones.clusters()[0].members, vec![0, 1, 3]);
	}

	#[test]
	fn deleting_a_member_dissolves_its_zone() {
		let mut state = MapState::new(&sample(), 800.0, 600.0);
		state.tick(0.016);
		assert_eq!(state.zones.clusters().len(), 1);

		let removed = state.delete_node(0).unwrap();
		assert_eq!(removed.id, "a");
		assert_eq!(state.links().count(), 0, "links of a deleted node go too");
		state.tick(0.016);
		assert!(state.zones.clusters().is_empty());
		let surface = state.zones.surface("#2ca02c").unwrap();
		assert!(surface.is_empty());
		assert_eq!(state.zones.labels().visible().count(), 0);
		assert!(state.delete_node(10).is_none());
	}

	#[test]
	fn deleting_reindexes_remaining_links() {
		let mut state = MapState::new(&sample(), 800.0, 600.0);
		assert!(state.connect(1, 2));
		state.delete_node(0);
		let pairs: Vec<(&str, &str)> = state
			.links()
			.map(|(a, b)| (a.id.as_str(), b.id.as_str()))
			.collect();
		assert_eq!(pairs, vec![("b", "c")]);
	}

	#[test]
	fn drag_out_a_connection_between_nodes() {
		let mut state = MapState::new(&sample(), 800.0, 600.0);
		let (ox, oy) = (state.transform.x, state.transform.y);
		state.begin_link(1, ox + 150.0, oy);
		state.link_to(ox + 60.0, oy + 400.0);
		assert_eq!(
			state.link_draft.as_ref().map(|d| d.cursor),
			Some(Point::new(60.0, 400.0))
		);
		assert!(state.finish_link(ox, oy + 800.0));
		assert!(state.link_draft.is_none());
		assert_eq!(state.links().count(), 2);

		state.begin_link(2, ox, oy + 800.0);
		assert!(!state.finish_link(ox + 150.0, oy), "already connected the other way");
		state.begin_link(0, ox, oy);
		assert!(!state.finish_link(ox + 3000.0, oy), "dropped on empty canvas");
		assert!(!state.connect(1, 1));
		assert_eq!(state.links().count(), 2);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut state = MapState::new(&sample(), 800.0, 600.0);
		state.zoom_at(400.0, 300.0, 100.0);
		assert_eq!(state.transform.k, 10.0);
		state.zoom_at(400.0, 300.0, 0.0001);
		assert_eq!(state.transform.k, 0.1);
	}
}
