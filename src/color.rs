use std::fs;

use bit_set::BitSet;
use tracing::info;

use crate::error::Error;

/** Vertex Id */
pub type VertexId = usize;

/** Solution of a graph coloring problem
(represented as a partition).
*/
pub type Solution = Vec<Vec<VertexId>>;

/** read-only view on a graph coloring instance.
Built once from the input, never mutated afterwards.
*/
pub trait ColoringInstance: std::fmt::Debug {
    /// number of vertices
    fn nb_vertices(&self) -> usize;

    /// number of edges
    fn nb_edges(&self) -> usize;

    /// vertices adjacent to u
    fn neighbors(&self, u:VertexId) -> &[VertexId];

    /// number of neighbors of u
    fn degree(&self, u:VertexId) -> usize { self.neighbors(u).len() }

    /// true iff u and v share an edge
    fn are_adjacent(&self, u:VertexId, v:VertexId) -> bool;

    /// edge list (each edge once, smallest endpoint first)
    fn edges(&self) -> &[(VertexId, VertexId)];

    /// iterator over the vertex ids
    fn vertices(&self) -> std::ops::Range<VertexId> { 0..self.nb_vertices() }

    /// logs some statistics of the instance
    fn display_statistics(&self) {
        let min_degree = self.vertices().map(|u| self.degree(u)).min().unwrap_or(0);
        let max_degree = self.vertices().map(|u| self.degree(u)).max().unwrap_or(0);
        info!(
            vertices = self.nb_vertices(),
            edges = self.nb_edges(),
            min_degree,
            max_degree,
            "instance statistics"
        );
    }

    /** writes a solution into a file. each line corresponds to a color. */
    fn write_solution(&self, filename:&str, solution:&[Vec<VertexId>]) -> Result<(), Error> {
        fs::write(filename, solution_to_string(solution))
            .map_err(|e| Error::io(filename, e))
    }
}

/** writes a string encoding the solution (use this to export the solution) */
pub fn solution_to_string(solution:&[Vec<VertexId>]) -> String {
    let mut res = String::default();
    for e in solution {
        for v in e {
            res += format!("{} ", v).as_str();
        }
        res += "\n";
    }
    res
}

/** converts a per-vertex coloring (colors[v]: color of v) into a partition */
pub fn colors_to_solution(colors:&[usize]) -> Solution {
    let nb_colors = colors.iter().max().map_or(0, |c| c+1);
    let mut res = vec![vec![] ; nb_colors];
    for (v,c) in colors.iter().enumerate() {
        res[*c].push(v);
    }
    res
}

/** converts a partition into a per-vertex coloring. Vertices missing from the partition get `None`. */
pub fn solution_to_colors(solution:&[Vec<VertexId>], n:usize) -> Vec<Option<usize>> {
    let mut res = vec![None ; n];
    for (c,class) in solution.iter().enumerate() {
        for v in class {
            res[*v] = Some(c);
        }
    }
    res
}

/// result of the checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerResult {
    /// valid solution, with its number of colors
    Ok(usize),
    /// a vertex does not exist in the instance
    UnknownVertex(VertexId),
    /// a vertex appears more than once
    DuplicateVertex(VertexId),
    /// a vertex is not colored
    MissingVertex(VertexId),
    /// two adjacent vertices share a color
    Conflict(VertexId, VertexId),
    /// a color class is empty
    EmptyColor(usize),
}

/**
checks a solution (given as a partition).
returns the number of colors if it is feasible, the first problem found otherwise.
*/
pub fn checker(inst:&dyn ColoringInstance, sol:&[Vec<VertexId>]) -> CheckerResult {
    let n = inst.nb_vertices();
    // check that all vertices are added exactly once
    let mut visited = BitSet::with_capacity(n);
    for (c,class) in sol.iter().enumerate() {
        if class.is_empty() { return CheckerResult::EmptyColor(c); }
        for v in class {
            if *v >= n { return CheckerResult::UnknownVertex(*v); }
            if !visited.insert(*v) { return CheckerResult::DuplicateVertex(*v); }
        }
    }
    if let Some(v) = inst.vertices().find(|v| !visited.contains(*v)) {
        return CheckerResult::MissingVertex(v);
    }
    // check conflicts
    let colors = solution_to_colors(sol, n);
    for (u,v) in inst.edges() {
        if colors[*u] == colors[*v] { return CheckerResult::Conflict(*u, *v); }
    }
    // if ok: return the number of colors
    CheckerResult::Ok(sol.len())
}
