use super::graph::ProximityGraph;

/// Connected components of `graph` with at least two members.
///
/// Members are sorted by entity index; clusters come out in the order of their
/// lowest member. Lone entities render no zone and are dropped.
pub fn extract_clusters(graph: &ProximityGraph) -> Vec<Vec<usize>> {
	let mut visited = vec![false; graph.len()];
	let mut clusters = Vec::new();
	let mut stack = Vec::new();

	for start in 0..graph.len() {
		if visited[start] || !graph.is_clusterable(start) {
			continue;
		}
		visited[start] = true;
		stack.push(start);

		let mut members = Vec::new();
		while let Some(idx) = stack.pop() {
			members.push(idx);
			for &next in graph.neighbors(idx) {
				if !visited[next] {
					visited[next] = true;
					stack.push(next);
				}
			}
		}

		if members.len() > 1 {
			members.sort_unstable();
			clusters.push(members);
		}
	}
	clusters
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::zones::config::ZoneConfig;
	use crate::zones::graph::tests::node;

	fn clusters_of(nodes: &[crate::zones::graph::tests::Node]) -> Vec<Vec<usize>> {
		extract_clusters(&ProximityGraph::build(nodes, &ZoneConfig::default()))
	}

	#[test]
	fn chain_forms_one_cluster() {
		let nodes = vec![
			node(0.0, 0.0, "#FF0000"),
			node(400.0, 0.0, "#FF0000"),
			node(800.0, 0.0, "#FF0000"),
			node(1200.0, 0.0, "#FF0000"),
		];
		assert_eq!(clusters_of(&nodes), vec![vec![0, 1, 2, 3]]);
	}

	#[test]
	fn isolated_entities_form_no_cluster() {
		let nodes = vec![
			node(0.0, 0.0, "#FF0000"),
			node(1000.0, 0.0, "#FF0000"),
			node(0.0, 1000.0, "#00FF00"),
		];
		assert!(clusters_of(&nodes).is_empty());
	}

	#[test]
	fn categories_never_share_a_cluster() {
		let nodes = vec![
			node(0.0, 0.0, "#FF0000"),
			node(0.0, 300.0, "#00FF00"),
			node(300.0, 0.0, "#FF0000"),
			node(300.0, 300.0, "#00FF00"),
		];
		let clusters = clusters_of(&nodes);
		assert_eq!(clusters, vec![vec![0, 2], vec![1, 3]]);
	}

	#[test]
	fn separate_groups_of_one_category() {
		let nodes = vec![
			node(0.0, 0.0, "#FF0000"),
			node(5000.0, 0.0, "#FF0000"),
			node(100.0, 0.0, "#FF0000"),
			node(5100.0, 0.0, "#FF0000"),
			node(9000.0, 0.0, "#FF0000"),
		];
		assert_eq!(clusters_of(&nodes), vec![vec![0, 2], vec![1, 3]]);
	}

	#[test]
	fn uncategorized_entities_are_skipped() {
		let mut loose = node(50.0, 0.0, "#FF0000");
		loose.color = None;
		let mut other = node(60.0, 0.0, "#FF0000");
		other.color = None;
		assert!(clusters_of(&[loose, other]).is_empty());
	}
}
