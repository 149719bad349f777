use serde::Serialize;

use crate::color::VertexId;
use crate::search::state::{ColoringState, Infeasible};
use crate::search::stopping::StoppingCriterion;

/// why a bounded search did not return a coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFailure {
    /// every branch was explored: no coloring within the ceiling extends the initial state
    Infeasible,
    /// the stopping criterion fired before the search finished
    Interrupted,
}

impl From<Infeasible> for SearchFailure {
    fn from(_:Infeasible) -> Self { Self::Infeasible }
}

/// search statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStatistics {
    /// number of choice points (vertices with at least 2 color variants)
    pub nb_choice_points: usize,
    /// number of alternatives explored after the first one of a choice point
    pub nb_branches: usize,
}

impl SearchStatistics {
    /// adds the statistics of another search
    pub fn add(&mut self, other:&SearchStatistics) {
        self.nb_choice_points += other.nb_choice_points;
        self.nb_branches += other.nb_branches;
    }
}

/** choice point: state before coloring `vertex`, and the colors left to try */
#[derive(Debug)]
struct ChoicePoint {
    /// state before the decision
    snapshot: ColoringState,
    /// vertex to color
    vertex: VertexId,
    /// candidate colors (increasing)
    variants: Vec<usize>,
    /// index of the next variant to try (always < variants.len())
    next: usize,
}

/**
Implements a depth-first branch and bound for a fixed number of colors (ceiling).

Each vertex is colored in ordering order:
 - forced colors (single remaining color) are propagated
 - its neighbors with every used color forbidden take a new color
 - a vertex with a single variant, or with a variant already forbidden to all its uncolored neighbors,
   is colored without branching
 - otherwise, a choice point stores a snapshot of the state and every variant is tried in increasing order.
   The last variant reuses the snapshot instead of copying it.

The first complete coloring is returned.
Choice points are kept on an explicit stack, so the depth of the search is not limited by the call stack.
*/
#[derive(Debug)]
pub struct BranchAndBound {
    /// number of colors allowed
    ceiling: usize,
    /// open choice points (deepest last)
    choice_points: Vec<ChoicePoint>,
    /// statistics of the last search
    stats: SearchStatistics,
}

impl BranchAndBound {
    /** creates a search allowing at most `ceiling` colors */
    pub fn new(ceiling:usize) -> Self {
        Self { ceiling, choice_points: Vec::new(), stats: SearchStatistics::default() }
    }

    /// number of colors allowed
    pub fn ceiling(&self) -> usize { self.ceiling }

    /// statistics of the last search
    pub fn statistics(&self) -> &SearchStatistics { &self.stats }

    /**
    colors vertices while no choice is needed.
    returns the next choice point (vertex, variants) or None if the state is complete.
    */
    fn descend(&self, state:&mut ColoringState) -> Result<Option<(VertexId, Vec<usize>)>, Infeasible> {
        loop {
            state.propagate_forced(self.ceiling)?;
            let v = match state.next_uncolored() {
                None => return Ok(None),
                Some(v) => v,
            };
            state.force_new_color_neighbors(v, self.ceiling)?;
            if state.color(v).is_some() { continue; } // colored as a last neighbor
            let variants = state.color_variants(v, self.ceiling);
            let c = match variants.len() {
                0 => return Err(Infeasible),
                1 => variants[0],
                _ => match state.color_forbidden_to_all_neighbors(v, &variants) {
                    Some(c) => c,
                    None => return Ok(Some((v, variants))),
                }
            };
            state.assign(v, c, self.ceiling)?;
        }
    }

    /**
    tries the next alternative of the deepest open choice point (dropping exhausted ones).
    returns the resulting state, or None if no alternative remains.
    */
    fn backtrack(&mut self) -> Option<ColoringState> {
        while let Some(top) = self.choice_points.last_mut() {
            let v = top.vertex;
            let c = top.variants[top.next];
            top.next += 1;
            self.stats.nb_branches += 1;
            let mut state = if top.next == top.variants.len() {
                // last variant: the snapshot is not needed anymore
                self.choice_points.pop()?.snapshot
            } else {
                top.snapshot.clone()
            };
            if state.assign(v, c, self.ceiling).is_ok() {
                return Some(state);
            }
        }
        None
    }

    /**
    searches for a complete coloring extending `initial` with at most `ceiling` colors.

    returns:
     - Ok(state): complete state, using at most `ceiling` colors
     - Err(Infeasible): no such coloring extends `initial`
     - Err(Interrupted): the stopping criterion fired first
    */
    pub fn solve<Stop:StoppingCriterion>(
        &mut self, initial:ColoringState, stopping_criterion:&Stop
    ) -> Result<ColoringState, SearchFailure> {
        self.choice_points.clear();
        self.stats = SearchStatistics::default();
        if !initial.admits(self.ceiling) {
            return Err(SearchFailure::Infeasible);
        }
        let mut state = initial;
        loop {
            if stopping_criterion.is_finished() {
                self.choice_points.clear();
                return Err(SearchFailure::Interrupted);
            }
            match self.descend(&mut state) {
                Ok(None) => { // complete coloring
                    debug_assert!(state.is_complete() && state.colors_used() <= self.ceiling);
                    self.choice_points.clear();
                    return Ok(state);
                },
                Ok(Some((v, variants))) => { // open a choice point and try the first variant
                    self.stats.nb_choice_points += 1;
                    let first = variants[0];
                    self.choice_points.push(ChoicePoint {
                        snapshot: state.clone(), vertex: v, variants, next: 1
                    });
                    if state.assign(v, first, self.ceiling).is_ok() { continue; }
                },
                Err(Infeasible) => {},
            }
            state = match self.backtrack() {
                None => return Err(SearchFailure::Infeasible),
                Some(s) => s,
            };
        }
    }
}
