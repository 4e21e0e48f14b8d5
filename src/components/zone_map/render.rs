use std::collections::HashMap;
use std::f64::consts::PI;

use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, ImageData};

use crate::zones::{Point, ZoneLabel, ZoneSurface};

use super::metaball;
use super::state::{MapState, NODE_SIZE};

/// Blur radius applied to zone masks, in world units.
pub const ZONE_BLUR: f64 = 60.0;
/// Largest side of an offscreen zone canvas.
const MAX_LAYER_PX: f64 = 4096.0;
const GRID_SIZE: f64 = 50.0;

const BACKGROUND: &str = "#f5f5f7";
const GRID: &str = "#e0e0e0";
const TEXT_DARK: &str = "#1a1a1a";
const UNCATEGORIZED: &str = "#aaaaaa";
const LINK_DRAFT: &str = "rgba(74, 144, 226, 0.8)";

/// A composited window of one zone, valid for one pass at one zoom.
struct CachedZone {
	canvas: HtmlCanvasElement,
	pass: u64,
	zoom: f64,
	origin: Point,
	extent: Point,
}

impl CachedZone {
	fn end(&self) -> Point {
		Point::new(self.origin.x + self.extent.x, self.origin.y + self.extent.y)
	}
}

/// World-space rectangle as `(min, max)` corners.
type Bounds = (Point, Point);

fn pad((lo, hi): Bounds, margin: f64) -> Bounds {
	(
		Point::new(lo.x - margin, lo.y - margin),
		Point::new(hi.x + margin, hi.y + margin),
	)
}

fn intersect(a: Bounds, b: Bounds) -> Option<Bounds> {
	let lo = Point::new(a.0.x.max(b.0.x), a.0.y.max(b.0.y));
	let hi = Point::new(a.1.x.min(b.1.x), a.1.y.min(b.1.y));
	(lo.x < hi.x && lo.y < hi.y).then_some((lo, hi))
}

fn contains(outer: Bounds, inner: Bounds) -> bool {
	outer.0.x <= inner.0.x && outer.0.y <= inner.0.y && outer.1.x >= inner.1.x && outer.1.y >= inner.1.y
}

/// Offscreen canvases for rasterizing, blurring and tinting zone surfaces.
pub struct ZoneLayer {
	document: Document,
	mask: HtmlCanvasElement,
	blurred: HtmlCanvasElement,
	cache: HashMap<String, CachedZone>,
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
	canvas
		.get_context("2d")?
		.ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
		.dyn_into::<CanvasRenderingContext2d>()
		.map_err(JsValue::from)
}

fn create_canvas(document: &Document) -> Result<HtmlCanvasElement, JsValue> {
	document
		.create_element("canvas")?
		.dyn_into::<HtmlCanvasElement>()
		.map_err(JsValue::from)
}

fn fit(canvas: &HtmlCanvasElement, width: u32, height: u32) {
	if canvas.width() != width {
		canvas.set_width(width);
	}
	if canvas.height() != height {
		canvas.set_height(height);
	}
}

impl ZoneLayer {
	pub fn new(document: &Document) -> Result<Self, JsValue> {
		Ok(Self {
			document: document.clone(),
			mask: create_canvas(document)?,
			blurred: create_canvas(document)?,
			cache: HashMap::new(),
		})
	}

	/// Composited zone covering the visible part of `surface`.
	///
	/// Rasterizes a window around the viewport and reuses it while the view
	/// stays inside it, so panning does not re-blur every frame.
	fn zone(
		&mut self,
		surface: &ZoneSurface,
		pass: u64,
		zoom: f64,
		viewport: Bounds,
	) -> Result<Option<&CachedZone>, JsValue> {
		let Some(bounds) = surface.bounds(ZONE_BLUR * 2.0) else {
			return Ok(None);
		};
		let Some(needed) = intersect(bounds, pad(viewport, ZONE_BLUR * 2.0)) else {
			return Ok(None);
		};

		let fresh = self.cache.get(surface.color()).is_some_and(|z| {
			z.pass == pass && z.zoom == zoom && contains((z.origin, z.end()), needed)
		});
		if !fresh {
			let (vw, vh) = (viewport.1.x - viewport.0.x, viewport.1.y - viewport.0.y);
			let margin = ZONE_BLUR * 2.0 + vw.max(vh) / 2.0;
			let Some((lo, hi)) = intersect(bounds, pad(viewport, margin)) else {
				return Ok(None);
			};
			let extent = Point::new(hi.x - lo.x, hi.y - lo.y);
			let scale = zoom.min(MAX_LAYER_PX / extent.x.max(extent.y));

			let canvas = match self.cache.remove(surface.color()) {
				Some(old) => old.canvas,
				None => create_canvas(&self.document)?,
			};
			self.rasterize(surface, &canvas, lo, extent, scale)?;
			self.cache.insert(
				surface.color().to_owned(),
				CachedZone {
					canvas,
					pass,
					zoom,
					origin: lo,
					extent,
				},
			);
		}
		Ok(self.cache.get(surface.color()))
	}

	/// White mask → blur → metaball tint, written into `target`.
	fn rasterize(
		&self,
		surface: &ZoneSurface,
		target: &HtmlCanvasElement,
		origin: Point,
		extent: Point,
		scale: f64,
	) -> Result<(), JsValue> {
		let (w, h) = (
			(extent.x * scale).ceil().max(1.0) as u32,
			(extent.y * scale).ceil().max(1.0) as u32,
		);
		for canvas in [&self.mask, &self.blurred, target] {
			fit(canvas, w, h);
		}

		let mask = context_2d(&self.mask)?;
		mask.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
		mask.clear_rect(0.0, 0.0, w as f64, h as f64);
		mask.set_transform(scale, 0.0, 0.0, scale, -origin.x * scale, -origin.y * scale)?;

		mask.set_stroke_style_str("#ffffff");
		mask.set_line_width(surface.road_width());
		mask.set_line_cap("round");
		mask.set_line_join("round");
		mask.begin_path();
		for road in surface.roads() {
			mask.move_to(road.from.x, road.from.y);
			mask.line_to(road.to.x, road.to.y);
		}
		mask.stroke();

		mask.set_fill_style_str("#ffffff");
		mask.begin_path();
		for circle in surface.circles() {
			mask.move_to(circle.center.x + circle.radius, circle.center.y);
			mask.arc(circle.center.x, circle.center.y, circle.radius, 0.0, 2.0 * PI)?;
		}
		mask.fill();

		let blurred = context_2d(&self.blurred)?;
		blurred.clear_rect(0.0, 0.0, w as f64, h as f64);
		blurred.set_filter(&format!("blur({}px)", ZONE_BLUR * scale));
		blurred.draw_image_with_html_canvas_element(&self.mask, 0.0, 0.0)?;
		blurred.set_filter("none");

		let mut pixels = blurred.get_image_data(0.0, 0.0, w as f64, h as f64)?.data().0;
		metaball::composite(&mut pixels, surface.tint());
		let tinted = ImageData::new_with_u8_clamped_array_and_sh(Clamped(&pixels[..]), w, h)?;
		context_2d(target)?.put_image_data(&tinted, 0.0, 0.0)
	}
}

pub fn render(
	state: &MapState,
	ctx: &CanvasRenderingContext2d,
	layer: &mut ZoneLayer,
) -> Result<(), JsValue> {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	ctx.translate(state.transform.x, state.transform.y)?;
	ctx.scale(state.transform.k, state.transform.k)?;
	draw_grid(state, ctx);
	draw_zones(state, ctx, layer)?;
	for label in state.zones.labels().visible() {
		draw_label(ctx, label)?;
	}
	draw_links(state, ctx)?;
	draw_nodes(state, ctx)?;
	ctx.restore();
	Ok(())
}

fn draw_grid(state: &MapState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	if k < 0.25 {
		return;
	}
	let lo = state.screen_to_graph(0.0, 0.0);
	let hi = state.screen_to_graph(state.width, state.height);

	ctx.set_stroke_style_str(GRID);
	ctx.set_line_width(1.0 / k);
	ctx.begin_path();
	let mut x = (lo.x / GRID_SIZE).floor() * GRID_SIZE;
	while x <= hi.x {
		ctx.move_to(x, lo.y);
		ctx.line_to(x, hi.y);
		x += GRID_SIZE;
	}
	let mut y = (lo.y / GRID_SIZE).floor() * GRID_SIZE;
	while y <= hi.y {
		ctx.move_to(lo.x, y);
		ctx.line_to(hi.x, y);
		y += GRID_SIZE;
	}
	ctx.stroke();
}

fn draw_zones(
	state: &MapState,
	ctx: &CanvasRenderingContext2d,
	layer: &mut ZoneLayer,
) -> Result<(), JsValue> {
	let pass = state.zones.passes();
	let viewport = (
		state.screen_to_graph(0.0, 0.0),
		state.screen_to_graph(state.width, state.height),
	);
	for surface in state.zones.surfaces().filter(|s| !s.is_empty()) {
		if let Some(zone) = layer.zone(surface, pass, state.transform.k, viewport)? {
			ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
				&zone.canvas,
				zone.origin.x,
				zone.origin.y,
				zone.extent.x,
				zone.extent.y,
			)?;
		}
	}
	Ok(())
}

/// Centered text with extra spacing between glyphs.
fn draw_label(ctx: &CanvasRenderingContext2d, label: &ZoneLabel) -> Result<(), JsValue> {
	let style = label.style();
	ctx.set_font(&label.font());
	ctx.set_fill_style_str(&style.fill.to_string());
	ctx.set_global_alpha(style.alpha);
	ctx.set_text_align("left");
	ctx.set_text_baseline("middle");

	let mut glyphs = Vec::new();
	for ch in label.text.chars() {
		let glyph = ch.to_string();
		let width = ctx.measure_text(&glyph)?.width();
		glyphs.push((glyph, width));
	}
	let spacing = style.letter_spacing * glyphs.len().saturating_sub(1) as f64;
	let total: f64 = glyphs.iter().map(|(_, w)| w).sum::<f64>() + spacing;

	let mut x = label.position.x - total / 2.0;
	for (glyph, width) in &glyphs {
		ctx.fill_text(glyph, x, label.position.y)?;
		x += width + style.letter_spacing;
	}
	ctx.set_global_alpha(1.0);
	Ok(())
}

fn draw_links(state: &MapState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	let k = state.transform.k;
	let (dash, gap) = (8.0 / k, 4.0 / k);
	ctx.set_stroke_style_str("rgba(170, 170, 170, 0.9)");
	ctx.set_line_width(2.0 / k);
	ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(dash),
		&JsValue::from_f64(gap),
	))?;
	ctx.set_line_dash_offset(-(state.flow_time * 30.0) % (dash + gap));

	ctx.begin_path();
	for (a, b) in state.links() {
		ctx.move_to(a.position.x, a.position.y);
		ctx.line_to(b.position.x, b.position.y);
	}
	ctx.stroke();

	let draft = state
		.link_draft
		.as_ref()
		.and_then(|d| Some((state.nodes.get(d.source)?.position, d.cursor)));
	if let Some((from, to)) = draft {
		ctx.set_stroke_style_str(LINK_DRAFT);
		ctx.begin_path();
		ctx.move_to(from.x, from.y);
		ctx.line_to(to.x, to.y);
		ctx.stroke();
	}
	ctx.set_line_dash(&js_sys::Array::new())
}

fn draw_nodes(state: &MapState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	let k = state.transform.k;
	ctx.set_text_align("center");
	ctx.set_text_baseline("top");
	ctx.set_line_join("round");

	for node in &state.nodes {
		let Point { x, y } = node.position;

		ctx.begin_path();
		ctx.move_to(x, y - NODE_SIZE);
		ctx.line_to(x + NODE_SIZE, y);
		ctx.line_to(x, y + NODE_SIZE);
		ctx.line_to(x - NODE_SIZE, y);
		ctx.close_path();
		ctx.set_fill_style_str(node.color.as_deref().unwrap_or(UNCATEGORIZED));
		ctx.fill();
		ctx.set_stroke_style_str("#ffffff");
		ctx.set_line_width(2.0);
		ctx.stroke();

		ctx.set_font(&format!("bold {}px \"Segoe UI\", sans-serif", 14.0 / k.max(0.5)));
		ctx.set_line_width(4.0 / k.max(0.5));
		ctx.stroke_text(&node.title, x, y + NODE_SIZE + 6.0)?;
		ctx.set_fill_style_str(TEXT_DARK);
		ctx.fill_text(&node.title, x, y + NODE_SIZE + 6.0)?;
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Bounds {
		(Point::new(x0, y0), Point::new(x1, y1))
	}

	#[test]
	fn distant_clusters_are_cropped_to_the_view() {
		// one category with clusters 10k units apart, viewing only the left one
		let zone = rect(-200.0, -200.0, 10_200.0, 300.0);
		let view = rect(-400.0, -300.0, 400.0, 300.0);
		let window = intersect(zone, pad(view, ZONE_BLUR * 2.0)).unwrap();
		assert_eq!(window, rect(-200.0, -200.0, 520.0, 300.0));
		assert!(window.1.x - window.0.x < 1000.0);
	}

	#[test]
	fn offscreen_zone_has_no_window() {
		let zone = rect(5000.0, 5000.0, 5400.0, 5400.0);
		let view = rect(-400.0, -300.0, 400.0, 300.0);
		assert_eq!(intersect(zone, pad(view, ZONE_BLUR * 2.0)), None);
	}

	#[test]
	fn small_pan_stays_inside_cached_window() {
		let zone = rect(-5000.0, -5000.0, 5000.0, 5000.0);
		let view = rect(-400.0, -300.0, 400.0, 300.0);
		let cached = intersect(zone, pad(view, ZONE_BLUR * 2.0 + 400.0)).unwrap();
		let panned = rect(-350.0, -300.0, 450.0, 300.0);
		let needed = intersect(zone, pad(panned, ZONE_BLUR * 2.0)).unwrap();
		assert!(contains(cached, needed));

		let far = rect(600.0, -300.0, 1400.0, 300.0);
		let needed = intersect(zone, pad(far, ZONE_BLUR * 2.0)).unwrap();
		assert!(!contains(cached, needed));
	}
}
