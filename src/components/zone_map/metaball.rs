//! Turns a blurred white alpha mask into a tinted zone with a soft rim.

use crate::zones::Rgb;

/// Alpha below which a pixel is dropped entirely.
pub const DISCARD_BELOW: f64 = 0.25;
const FILL_OPACITY: f64 = 0.08;
const BORDER_OPACITY: f64 = 0.2;

pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
	let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
	t * t * (3.0 - 2.0 * t)
}

/// Output opacity for a blurred mask alpha in `[0, 1]`.
///
/// Dense centers get a faint fill; the band between 0.3 and 0.6 becomes a
/// brighter rim.
pub fn zone_alpha(a: f64) -> f64 {
	if a < DISCARD_BELOW {
		return 0.0;
	}
	let fill = smoothstep(0.6, 0.9, a);
	let outer = smoothstep(0.3, 0.6, a);
	let border = outer - fill;
	fill * FILL_OPACITY + border * BORDER_OPACITY * outer
}

/// Recolors an RGBA buffer in place: every pixel becomes `tint` at its zone alpha.
pub fn composite(pixels: &mut [u8], tint: Rgb) {
	for px in pixels.chunks_exact_mut(4) {
		let alpha = zone_alpha(px[3] as f64 / 255.0);
		px[0] = tint.r;
		px[1] = tint.g;
		px[2] = tint.b;
		px[3] = (alpha * 255.0).round() as u8;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn smoothstep_edges() {
		assert_eq!(smoothstep(0.3, 0.6, 0.1), 0.0);
		assert_eq!(smoothstep(0.3, 0.6, 0.9), 1.0);
		assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-12);
	}

	#[test]
	fn thin_alpha_is_discarded() {
		assert_eq!(zone_alpha(0.0), 0.0);
		assert_eq!(zone_alpha(0.24), 0.0);
	}

	#[test]
	fn rim_is_brighter_than_core() {
		let rim = zone_alpha(0.55);
		let core = zone_alpha(1.0);
		assert!((core - FILL_OPACITY).abs() < 1e-12);
		assert!(rim > core);
	}

	#[test]
	fn composite_tints_and_sets_alpha() {
		let mut pixels = vec![255, 255, 255, 255, 255, 255, 255, 10];
		composite(&mut pixels, Rgb::new(200, 100, 50));
		assert_eq!(&pixels[..4], &[200, 100, 50, 20]);
		assert_eq!(&pixels[4..], &[200, 100, 50, 0]);
	}
}
