//! Treating a carved maze as a graph of cells joined by passages.

use itertools::Itertools;
use petgraph::algo::{connected_components, is_cyclic_undirected};
use petgraph::graph::{NodeIndex, UnGraph};
use std::iter;

use crate::coordinates::{MazeCoordinate, WallCoordinate};
use crate::grid::MazeGrid;

/// Build an undirected graph with one node per maze cell and one edge per cleared wall.
///
/// Node indices match `MazeGrid::coordinate_to_index`, the edge weight is the cleared wall.
pub fn passage_graph(grid: &MazeGrid) -> UnGraph<MazeCoordinate, WallCoordinate> {
    let mut graph = UnGraph::with_capacity(grid.cells_count().0, grid.passages_count().0);
    for coord in grid.iter() {
        let _ = graph.add_node(coord);
    }

    for wall in grid.cleared_walls() {
        let indices = wall.separated_cells()
            .and_then(|(a, b)| grid.coordinate_to_index(a).and_then(|ia| grid.coordinate_to_index(b).map(|ib| (ia, ib))));
        if let Some((a_index, b_index)) = indices {
            let _ = graph.add_edge(NodeIndex::new(a_index), NodeIndex::new(b_index), wall);
        }
    }
    graph
}

/// Are there no loops among the carved passages?
pub fn passages_are_acyclic(grid: &MazeGrid) -> bool {
    !is_cyclic_undirected(&passage_graph(grid))
}

/// Do the carved passages form a spanning tree over every maze cell?
pub fn is_perfect_maze(grid: &MazeGrid) -> bool {
    let graph = passage_graph(grid);
    graph.edge_count() + 1 == graph.node_count() && connected_components(&graph) == 1 &&
    !is_cyclic_undirected(&graph)
}

/// Serialise the maze passages as text.
///
/// Line 1: `n m`, the number of cells and passages. Each following line is a passage between
/// two cells given as 1-based row major indices.
pub fn edges_text(grid: &MazeGrid) -> String {
    let graph = passage_graph(grid);
    let header = format!("{} {}", graph.node_count(), graph.edge_count());
    let edges = graph.raw_edges()
        .iter()
        .map(|edge| format!("{} {}", edge.source().index() + 1, edge.target().index() + 1));

    let mut text = iter::once(header).chain(edges).join("\n");
    text.push('\n');
    text
}
