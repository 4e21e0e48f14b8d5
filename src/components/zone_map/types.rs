#[derive(Clone, Debug)]
pub struct Category {
	pub id: String,
	pub name: String,
	/// `#RRGGBB`, also the zone identity.
	pub color: String,
}

#[derive(Clone, Debug)]
pub struct MapNode {
	pub id: String,
	pub title: String,
	pub x: f64,
	pub y: f64,
	/// Category id, if the node belongs to one.
	pub category: Option<String>,
}

#[derive(Clone, Debug)]
pub struct MapLink {
	pub source: String,
	pub target: String,
}

#[derive(Clone, Debug, Default)]
pub struct MapData {
	pub categories: Vec<Category>,
	pub nodes: Vec<MapNode>,
	pub links: Vec<MapLink>,
}
