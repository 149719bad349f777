//! Search components for the graph coloring problem.

/// fixed vertex ordering (decreasing degree)
pub mod ordering;

/// coloring state and constraint propagation
pub mod state;

/// greedy coloring along the vertex ordering
pub mod greedy;

/// greedy DSATUR algorithm
pub mod greedy_dsatur;

/// greedy clique (lower bound and search seed)
pub mod greedy_clique;

/// branch & bound for a fixed number of colors
pub mod backtracking;

/// stopping criteria (time limits)
pub mod stopping;

/// decrease-and-verify loop over the number of colors
pub mod driver;
