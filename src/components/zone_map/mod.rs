mod component;
mod metaball;
mod render;
mod state;
mod types;

pub use component::ZoneMapCanvas;
pub use types::{Category, MapData, MapLink, MapNode};
