//! Zone clustering: which same-category nodes share an organic zone, and the
//! raw geometry and labels to draw for each zone.
//!
//! Entities connect when they share a category, sit closer than the cluster
//! distance, and no foreign entity lies on the segment between them. Connected
//! groups of two or more become zones.
//!
//! Every pass compares all same-category pairs against all entities, which is
//! fine for the tens to low hundreds of nodes a map holds.

mod cluster;
mod color;
mod config;
mod geometry;
mod graph;
mod labels;
mod shape;
mod system;

pub use cluster::extract_clusters;
pub use color::Rgb;
pub use config::{CLUSTER_DISTANCE, ZONE_RADIUS, ZoneConfig};
pub use geometry::{Point, centroid, dist_to_segment};
pub use graph::{ProximityEdge, ProximityGraph, ZoneEntity};
pub use labels::{LabelPool, LabelStyle, ZoneLabel};
pub use shape::{Circle, ClusterShape, Road, ZoneSurface, plan_cluster};
pub use system::ZoneSystem;
