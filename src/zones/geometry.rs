/// A point in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}

	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// Clamped distance from `p` to the segment `v`-`w`.
///
/// A zero-length segment degrades to the point distance to `v`.
pub fn dist_to_segment(p: Point, v: Point, w: Point) -> f64 {
	let (wx, wy) = (w.x - v.x, w.y - v.y);
	let l2 = wx * wx + wy * wy;
	if l2 == 0.0 {
		return p.distance(v);
	}
	let t = (((p.x - v.x) * wx + (p.y - v.y) * wy) / l2).clamp(0.0, 1.0);
	p.distance(Point::new(v.x + t * wx, v.y + t * wy))
}

/// Orders segment endpoints so occlusion tests do not depend on which end came first.
pub fn canonical_segment(a: Point, b: Point) -> (Point, Point) {
	if (a.x, a.y) <= (b.x, b.y) { (a, b) } else { (b, a) }
}

/// Arithmetic mean of `points`, `None` when empty.
pub fn centroid(points: impl IntoIterator<Item = Point>) -> Option<Point> {
	let (mut sx, mut sy, mut n) = (0.0, 0.0, 0usize);
	for p in points {
		sx += p.x;
		sy += p.y;
		n += 1;
	}
	(n > 0).then(|| Point::new(sx / n as f64, sy / n as f64))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn projects_onto_segment_interior() {
		let d = dist_to_segment(
			Point::new(50.0, 30.0),
			Point::new(0.0, 0.0),
			Point::new(100.0, 0.0),
		);
		assert!((d - 30.0).abs() < 1e-9);
	}

	#[test]
	fn clamps_past_the_endpoints() {
		let (v, w) = (Point::new(0.0, 0.0), Point::new(100.0, 0.0));
		assert!((dist_to_segment(Point::new(-30.0, 40.0), v, w) - 50.0).abs() < 1e-9);
		assert!((dist_to_segment(Point::new(130.0, -40.0), v, w) - 50.0).abs() < 1e-9);
	}

	#[test]
	fn degenerate_segment_is_point_distance() {
		let v = Point::new(10.0, 10.0);
		assert!((dist_to_segment(Point::new(13.0, 14.0), v, v) - 5.0).abs() < 1e-9);
	}

	#[test]
	fn centroid_of_row() {
		let c = centroid([
			Point::new(0.0, 0.0),
			Point::new(100.0, 0.0),
			Point::new(200.0, 0.0),
		]);
		assert_eq!(c, Some(Point::new(100.0, 0.0)));
		assert_eq!(centroid(std::iter::empty()), None);
	}

	#[test]
	fn canonical_segment_is_order_free() {
		let (a, b) = (Point::new(5.0, 1.0), Point::new(-2.0, 8.0));
		assert_eq!(canonical_segment(a, b), canonical_segment(b, a));
	}

	#[test]
	fn non_finite_points() {
		assert!(Point::new(1.0, 2.0).is_finite());
		assert!(!Point::new(f64::NAN, 2.0).is_finite());
		assert!(!Point::new(1.0, f64::INFINITY).is_finite());
	}
}
