use leptos::prelude::*;

use crate::components::zone_map::{Category, MapData, MapLink, MapNode, ZoneMapCanvas};

const CATEGORIES: &[(&str, &str, &str)] = &[
	("green", "Sustainability", "#2ca02c"),
	("blue", "Digital Campus", "#1f77b4"),
	("orange", "Community", "#ff7f0e"),
	("purple", "Research", "#9467bd"),
];

/// Seed a map with a few loose neighbourhoods per category.
fn generate_sample_data(per_category: usize) -> MapData {
	let categories: Vec<Category> = CATEGORIES
		.iter()
		.map(|&(id, name, color)| Category {
			id: id.into(),
			name: name.into(),
			color: color.into(),
		})
		.collect();

	let mut nodes = Vec::new();
	for (c, category) in categories.iter().enumerate() {
		let (cx, cy) = (
			if c % 2 == 0 { -450.0 } else { 450.0 },
			if c < 2 { -350.0 } else { 350.0 },
		);
		for i in 0..per_category {
			let seed = c * per_category + i;
			nodes.push(MapNode {
				id: format!("{}-{}", category.id, i),
				title: format!("{} #{}", category.name, i + 1),
				x: cx + (rand_simple(seed) - 0.5) * 600.0,
				y: cy + (rand_simple(seed + 97) - 0.5) * 500.0,
				category: Some(category.id.clone()),
			});
		}
	}
	nodes.push(MapNode {
		id: "question-0".into(),
		title: "Open question".into(),
		x: 0.0,
		y: 0.0,
		category: None,
	});

	let links: Vec<MapLink> = (1..nodes.len())
		.step_by(3)
		.map(|i| {
			let target = (rand_simple(i) * (i as f64)) as usize;
			MapLink {
				source: nodes[i].id.clone(),
				target: nodes[target].id.clone(),
			}
		})
		.collect();

	MapData {
		categories,
		nodes,
		links,
	}
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let map_data = Signal::derive(move || generate_sample_data(6));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-map">
				<ZoneMapCanvas data=map_data fullscreen=true />
				<div class="map-overlay">
					<h1>"Innovation Map"</h1>
					<p class="subtitle">
						"Drag ideas to regroup them. Double-click to plant one, shift-drag to connect, right-click to remove."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
