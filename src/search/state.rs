use std::cmp::{max, min};
use std::rc::Rc;

use bit_set::BitSet;

use crate::color::{ColoringInstance, VertexId};
use crate::search::ordering::VertexOrdering;

/** no legal color is left for some vertex under the current ceiling.
This is an expected search outcome, not an error: the nearest choice point tries its next alternative.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Infeasible;

/** per-vertex search information */
#[derive(Debug, Clone)]
struct VertexState {
    /// assigned color (None if uncolored)
    color: Option<usize>,
    /// number of neighbors still uncolored (meaningless once colored)
    nb_uncolored_neighbors: usize,
    /// colors held by colored neighbors (emptied once colored)
    forbidden: BitSet,
    /// |forbidden|
    nb_forbidden: usize,
}

/**
Coloring state: color assignment of every vertex and forbidden-color bookkeeping.

Invariants (after every operation that returned `Ok`):
 - no two adjacent colored vertices share a color
 - for every uncolored vertex, `forbidden` is exactly the set of colors of its colored neighbors
 - for every uncolored vertex, `nb_uncolored_neighbors` counts its uncolored neighbors
 - `colors_used` is one more than the largest color assigned
 - `ordering[frontier]` is the first uncolored vertex in the ordering

When an operation returns `Infeasible`, the state may be partially updated and must be discarded.
Cloning the state is the backtracking mechanism (the instance and the ordering are shared).
*/
#[derive(Debug, Clone)]
pub struct ColoringState {
    /// instance (shared, read-only)
    inst: Rc<dyn ColoringInstance>,
    /// vertex ordering (shared, read-only)
    ordering: Rc<VertexOrdering>,
    /// vertices[v]: search information of v
    vertices: Vec<VertexState>,
    /// 1 + largest color assigned so far
    colors_used: usize,
    /// position in the ordering of the first uncolored vertex
    frontier: usize,
    /// number of colored vertices
    nb_colored: usize,
}

impl ColoringState {
    /** creates a state where every vertex is uncolored */
    pub fn new(inst:Rc<dyn ColoringInstance>, ordering:Rc<VertexOrdering>) -> Self {
        debug_assert_eq!(inst.nb_vertices(), ordering.len());
        let vertices = inst.vertices().map(|v| VertexState {
            color: None,
            nb_uncolored_neighbors: inst.degree(v),
            forbidden: BitSet::default(),
            nb_forbidden: 0,
        }).collect();
        Self { inst, ordering, vertices, colors_used: 0, frontier: 0, nb_colored: 0 }
    }

    /// instance the state colors
    pub fn instance(&self) -> &Rc<dyn ColoringInstance> { &self.inst }

    /// ordering driving the state
    pub fn ordering(&self) -> &Rc<VertexOrdering> { &self.ordering }

    /// color of v (None if uncolored)
    pub fn color(&self, v:VertexId) -> Option<usize> { self.vertices[v].color }

    /// number of colors used so far (1 + largest color)
    pub fn colors_used(&self) -> usize { self.colors_used }

    /// position (in the ordering) of the first uncolored vertex
    pub fn frontier(&self) -> usize { self.frontier }

    /// number of colored vertices
    pub fn nb_colored(&self) -> usize { self.nb_colored }

    /// true if every vertex is colored
    pub fn is_complete(&self) -> bool { self.nb_colored == self.vertices.len() }

    /// number of colors forbidden for v (0 if v is colored)
    pub fn nb_forbidden(&self, v:VertexId) -> usize { self.vertices[v].nb_forbidden }

    /// true if some colored neighbor of the uncolored vertex v holds c
    pub fn is_forbidden(&self, v:VertexId, c:usize) -> bool { self.vertices[v].forbidden.contains(c) }

    /// number of uncolored neighbors of the uncolored vertex v
    #[cfg(test)]
    pub(crate) fn nb_uncolored_neighbors(&self, v:VertexId) -> usize { self.vertices[v].nb_uncolored_neighbors }

    /// colors[v] for every vertex, if the state is complete
    pub fn colors(&self) -> Option<Vec<usize>> {
        self.vertices.iter().map(|v| v.color).collect()
    }

    /// next vertex to color (first uncolored in the ordering)
    pub fn next_uncolored(&self) -> Option<VertexId> {
        self.ordering.as_slice().get(self.frontier).copied()
    }

    /// smallest color below the ceiling not forbidden for v
    pub fn first_allowed_color(&self, v:VertexId, ceiling:usize) -> Option<usize> {
        let forbidden = &self.vertices[v].forbidden;
        (0..ceiling).find(|c| !forbidden.contains(*c))
    }

    /** colors worth trying for v: allowed colors among the used ones, plus one new color,
    all below the ceiling (increasing order) */
    pub fn color_variants(&self, v:VertexId, ceiling:usize) -> Vec<usize> {
        debug_assert!(self.vertices[v].color.is_none());
        let forbidden = &self.vertices[v].forbidden;
        (0..min(self.colors_used+1, ceiling)).filter(|c| !forbidden.contains(*c)).collect()
    }

    /** returns a variant that every other uncolored neighbor of v already forbids.
    Giving it to v removes nothing from the neighbors' domains. */
    pub fn color_forbidden_to_all_neighbors(&self, v:VertexId, variants:&[usize]) -> Option<usize> {
        variants.iter().copied().find(|c| {
            self.inst.neighbors(v).iter().all(|u| {
                let vu = &self.vertices[*u];
                *u == v || vu.color.is_some() || vu.forbidden.contains(*c)
            })
        })
    }

    /** true if the state may still be completed within `ceiling` colors as far as bookkeeping tells
    (no color above the ceiling, no uncolored vertex with every color forbidden) */
    pub fn admits(&self, ceiling:usize) -> bool {
        self.colors_used <= ceiling
            && self.vertices.iter().all(|v| v.color.is_some() || v.nb_forbidden < ceiling)
    }

    /// colors v with c and drops its bookkeeping (no neighbor update)
    fn set_color(&mut self, v:VertexId, c:usize) {
        let vv = &mut self.vertices[v];
        vv.color = Some(c);
        vv.forbidden = BitSet::default();
        vv.nb_forbidden = 0;
        vv.nb_uncolored_neighbors = 0;
        self.colors_used = max(self.colors_used, c+1);
        self.nb_colored += 1;
    }

    /// moves the frontier past colored vertices
    fn advance_frontier(&mut self) {
        while let Some(v) = self.ordering.as_slice().get(self.frontier) {
            if self.vertices[*v].color.is_none() { break; }
            self.frontier += 1;
        }
    }

    /**
    assigns color c to the uncolored vertex v and updates its uncolored neighbors:
     - c becomes forbidden for them
     - their uncolored neighbor count decreases. When it reaches 0, nothing can restrict them anymore:
       they receive their smallest allowed color right away.

    returns `Infeasible` if a neighbor ends up with every color below the ceiling forbidden.
    In that case the state is partially updated and must be discarded.

    # Panics (debug builds)
     - if v is already colored, if c is forbidden for v or if c is not below the ceiling
    */
    pub fn assign(&mut self, v:VertexId, c:usize, ceiling:usize) -> Result<(), Infeasible> {
        debug_assert!(self.vertices[v].color.is_none(), "vertex {} is already colored", v);
        debug_assert!(!self.vertices[v].forbidden.contains(c), "color {} is forbidden for vertex {}", c, v);
        debug_assert!(c < ceiling, "color {} exceeds the ceiling {}", c, ceiling);
        self.set_color(v, c);
        let inst = Rc::clone(&self.inst);
        for u in inst.neighbors(v) {
            let vu = &mut self.vertices[*u];
            if vu.color.is_some() { continue; }
            if !vu.forbidden.contains(c) {
                if vu.nb_forbidden + 1 >= ceiling {
                    return Err(Infeasible);
                }
                vu.forbidden.insert(c);
                vu.nb_forbidden += 1;
            }
            vu.nb_uncolored_neighbors -= 1;
            if vu.nb_uncolored_neighbors == 0 {
                let last = self.first_allowed_color(*u, ceiling).ok_or(Infeasible)?;
                self.set_color(*u, last);
            }
        }
        self.advance_frontier();
        Ok(())
    }

    /**
    assigns every vertex that has a single color left (ceiling-1 forbidden colors),
    until a fixed point is reached.
    returns `Infeasible` if one of these assignments fails.
    */
    pub fn propagate_forced(&mut self, ceiling:usize) -> Result<(), Infeasible> {
        // nb_forbidden <= colors_used: nothing can be forced yet
        if self.colors_used + 1 < ceiling { return Ok(()); }
        loop {
            let mut changed = false;
            for i in self.frontier..self.ordering.len() {
                let v = self.ordering[i];
                let vv = &self.vertices[v];
                if vv.color.is_none() && vv.nb_forbidden + 1 == ceiling {
                    let c = self.first_allowed_color(v, ceiling).ok_or(Infeasible)?;
                    self.assign(v, c, ceiling)?;
                    changed = true;
                }
            }
            if !changed { return Ok(()); }
        }
    }

    /**
    colors the uncolored neighbors of v that have every used color forbidden.
    Unused colors are interchangeable, so such a neighbor takes the next new color (`colors_used`).
    Forced colors are propagated after each pass, until no neighbor of v changes.
    Applies while a new color still fits strictly below the last one (`colors_used + 1 < ceiling`),
    `propagate_forced` takes over beyond.

    returns `Infeasible` if one of these assignments fails.
    */
    pub fn force_new_color_neighbors(&mut self, v:VertexId, ceiling:usize) -> Result<(), Infeasible> {
        let inst = Rc::clone(&self.inst);
        while self.colors_used + 1 < ceiling {
            let mut changed = false;
            for u in inst.neighbors(v) {
                let vu = &self.vertices[*u];
                if vu.color.is_none() && vu.nb_forbidden + 1 == min(self.colors_used+1, ceiling) {
                    let c = self.first_allowed_color(*u, ceiling).ok_or(Infeasible)?;
                    self.assign(*u, c, ceiling)?;
                    changed = true;
                }
            }
            if !changed { break; }
            self.propagate_forced(ceiling)?;
        }
        Ok(())
    }

    /**
    checks every invariant of the state against the instance.
    returns a description of the first violation found. Meant for tests and debug checks (O(n+m)).
    */
    pub fn check_consistency(&self) -> Result<(), String> {
        let mut max_color:Option<usize> = None;
        let mut nb_colored = 0;
        for v in self.inst.vertices() {
            let vv = &self.vertices[v];
            match vv.color {
                Some(c) => {
                    nb_colored += 1;
                    max_color = max(max_color, Some(c));
                    if let Some(u) = self.inst.neighbors(v).iter().find(|u| self.vertices[**u].color == Some(c)) {
                        return Err(format!("vertices {} and {} share color {}", v, u, c));
                    }
                },
                None => {
                    let expected:BitSet = self.inst.neighbors(v).iter()
                        .filter_map(|u| self.vertices[*u].color).collect();
                    if !expected.iter().eq(vv.forbidden.iter()) {
                        return Err(format!("vertex {}: forbidden {:?}, expected {:?}", v, vv.forbidden, expected));
                    }
                    if vv.nb_forbidden != vv.forbidden.len() {
                        return Err(format!("vertex {}: nb_forbidden {} != {}", v, vv.nb_forbidden, vv.forbidden.len()));
                    }
                    let nb_uncolored = self.inst.neighbors(v).iter()
                        .filter(|u| self.vertices[**u].color.is_none()).count();
                    if vv.nb_uncolored_neighbors != nb_uncolored {
                        return Err(format!(
                            "vertex {}: nb_uncolored_neighbors {} != {}", v, vv.nb_uncolored_neighbors, nb_uncolored
                        ));
                    }
                }
            }
        }
        if self.colors_used != max_color.map_or(0, |c| c+1) {
            return Err(format!("colors_used {} but max color {:?}", self.colors_used, max_color));
        }
        if self.nb_colored != nb_colored {
            return Err(format!("nb_colored {} != {}", self.nb_colored, nb_colored));
        }
        let order = self.ordering.as_slice();
        if order[..self.frontier].iter().any(|v| self.vertices[*v].color.is_none())
        || order.get(self.frontier).map_or(false, |v| self.vertices[*v].color.is_some()) {
            return Err(format!("frontier {} is not the first uncolored position", self.frontier));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::compact_instance::CompactInstance;

    fn build_state(n:usize, edges:&[(VertexId,VertexId)]) -> ColoringState {
        let inst:Rc<dyn ColoringInstance> = Rc::new(CompactInstance::from_edges(n, edges).unwrap());
        let ordering = Rc::new(VertexOrdering::by_degree(&*inst));
        ColoringState::new(inst, ordering)
    }

    fn random_state(rng:&fastrand::Rng, n:usize, density:f64) -> ColoringState {
        let mut edges = Vec::new();
        for a in 0..n {
            for b in a+1..n {
                if rng.f64() < density { edges.push((a,b)); }
            }
        }
        build_state(n, &edges)
    }

    #[test]
    fn test_initial_state() {
        let state = build_state(3, &[(0,1), (1,2), (2,0)]);
        assert_eq!(state.colors_used(), 0);
        assert_eq!(state.frontier(), 0);
        assert_eq!(state.nb_uncolored_neighbors(1), 2);
        assert_eq!(state.next_uncolored(), Some(0));
        assert_eq!(state.colors(), None);
        assert_eq!(state.check_consistency(), Ok(()));
    }

    #[test]
    fn test_assign_updates_neighbors() {
        let mut state = build_state(3, &[(0,1), (1,2), (2,0)]);
        assert_eq!(state.assign(0, 0, 3), Ok(()));
        assert_eq!(state.color(0), Some(0));
        assert_eq!(state.colors_used(), 1);
        for v in 1..3 {
            assert!(state.is_forbidden(v, 0));
            assert_eq!(state.nb_forbidden(v), 1);
            assert_eq!(state.nb_uncolored_neighbors(v), 1);
        }
        assert_eq!(state.frontier(), 1);
        assert_eq!(state.check_consistency(), Ok(()));
    }

    #[test]
    fn test_assign_infeasible() {
        // triangle with two colors
        let mut state = build_state(3, &[(0,1), (1,2), (2,0)]);
        assert_eq!(state.assign(0, 0, 2), Ok(()));
        assert_eq!(state.assign(1, 1, 2), Err(Infeasible));
    }

    #[test]
    fn test_last_neighbor_colored() {
        // path 0-1-2: coloring the middle vertex leaves no uncolored neighbor to 0 and 2
        let mut state = build_state(3, &[(0,1), (1,2)]);
        assert_eq!(state.next_uncolored(), Some(1));
        assert_eq!(state.assign(1, 0, 3), Ok(()));
        assert!(state.is_complete());
        assert_eq!(state.colors(), Some(vec![1, 0, 1]));
        assert_eq!(state.colors_used(), 2);
        assert_eq!(state.frontier(), 3);
        assert_eq!(state.next_uncolored(), None);
        assert_eq!(state.check_consistency(), Ok(()));
    }

    #[test]
    fn test_propagate_forced() {
        // 4-cycle with 2 colors: one decision colors everything
        let mut state = build_state(4, &[(0,1), (1,2), (2,3), (3,0)]);
        assert_eq!(state.assign(0, 0, 2), Ok(()));
        assert_eq!(state.propagate_forced(2), Ok(()));
        assert_eq!(state.colors(), Some(vec![0, 1, 0, 1]));
        assert_eq!(state.check_consistency(), Ok(()));
    }

    #[test]
    fn test_propagate_forced_infeasible() {
        // 5-cycle with 2 colors
        let mut state = build_state(5, &[(0,1), (1,2), (2,3), (3,4), (4,0)]);
        let res = state.assign(0, 0, 2).and_then(|_| state.propagate_forced(2));
        assert_eq!(res, Err(Infeasible));
    }

    #[test]
    fn test_propagate_forced_nothing_to_do() {
        let mut state = build_state(4, &[(0,1), (1,2), (2,3), (3,0)]);
        assert_eq!(state.assign(0, 0, 4), Ok(()));
        assert_eq!(state.propagate_forced(4), Ok(()));
        assert_eq!(state.nb_colored(), 1);
    }

    #[test]
    fn test_force_new_color_neighbors() {
        // 2 sees colors 0 and 1 (from 0 and 1), 3 is the vertex about to be colored
        let mut state = build_state(5, &[(0,2), (1,2), (2,3), (3,4)]);
        assert_eq!(state.assign(0, 0, 5), Ok(()));
        assert_eq!(state.assign(1, 1, 5), Ok(()));
        assert_eq!(state.nb_forbidden(2), state.colors_used());
        let mut forced = state.clone();
        assert_eq!(forced.force_new_color_neighbors(3, 5), Ok(()));
        assert_eq!(forced.color(2), Some(2));
        assert_eq!(forced.colors_used(), 3);
        assert_eq!(forced.color(3), None);
        assert!(forced.is_forbidden(3, 2));
        assert_eq!(forced.nb_uncolored_neighbors(3), 1);
        assert_eq!(forced.next_uncolored(), Some(3));
        assert_eq!(forced.check_consistency(), Ok(()));
        // a new color would be the last one: left to propagate_forced
        let mut tight = state.clone();
        assert_eq!(tight.force_new_color_neighbors(3, 3), Ok(()));
        assert_eq!(tight.color(2), None);
        assert_eq!(tight.propagate_forced(3), Ok(()));
        assert_eq!(tight.color(2), Some(2));
    }

    #[test]
    fn test_force_new_color_neighbors_first_color() {
        // nothing colored: the first neighbor of 0 takes color 0, the others keep their choice
        let mut state = build_state(4, &[(0,1), (0,2), (0,3)]);
        assert_eq!(state.force_new_color_neighbors(0, 4), Ok(()));
        assert_eq!(state.color(1), Some(0));
        assert_eq!(state.color(2), None);
        assert_eq!(state.colors_used(), 1);
        assert_eq!(state.check_consistency(), Ok(()));
    }

    #[test]
    fn test_color_variants() {
        // 0 adjacent to 1,2,3 ; 1-2
        let mut state = build_state(5, &[(0,1), (0,2), (0,3), (1,2), (3,4)]);
        assert_eq!(state.color_variants(0, 5), vec![0]);
        assert_eq!(state.assign(0, 0, 5), Ok(()));
        assert_eq!(state.color_variants(1, 5), vec![1]);
        assert_eq!(state.color_variants(4, 5), vec![0, 1]);
        assert_eq!(state.color_variants(4, 1), vec![0]);
        assert_eq!(state.assign(1, 1, 5), Ok(()));
        // 2 has no uncolored neighbor left: colored right away
        assert_eq!(state.color(2), Some(2));
        assert_eq!(state.colors_used(), 3);
        assert_eq!(state.color_variants(3, 5), vec![1, 2, 3]);
        assert_eq!(state.color_variants(3, 3), vec![1, 2]);
    }

    #[test]
    fn test_color_forbidden_to_all_neighbors() {
        // star: 0 center, leaves 1,2 ; 1-3, 2-4
        let mut state = build_state(5, &[(0,1), (0,2), (1,3), (2,4)]);
        assert_eq!(state.assign(3, 0, 5), Ok(()));
        assert_eq!(state.assign(4, 1, 5), Ok(()));
        // leaf 1 forbids 0, leaf 2 forbids 1: no variant of 0 is forbidden to both
        assert_eq!(state.color_forbidden_to_all_neighbors(0, &[0, 1, 2]), None);
        let mut state = build_state(5, &[(0,1), (0,2), (1,3), (2,4)]);
        assert_eq!(state.assign(3, 1, 5), Ok(()));
        assert_eq!(state.assign(4, 1, 5), Ok(()));
        assert_eq!(state.color_forbidden_to_all_neighbors(0, &[0, 1]), Some(1));
        // isolated vertex: any variant
        let state = build_state(2, &[]);
        assert_eq!(state.color_forbidden_to_all_neighbors(0, &[0]), Some(0));
    }

    #[test]
    fn test_admits() {
        // triangle 0,1,2 with a pendant vertex 3 on 2
        let mut state = build_state(4, &[(0,1), (1,2), (2,0), (2,3)]);
        assert!(state.admits(1));
        assert_eq!(state.assign(0, 0, 4), Ok(()));
        assert_eq!(state.assign(1, 1, 4), Ok(()));
        assert_eq!(state.color(2), None);
        assert!(state.admits(3));
        assert!(!state.admits(2)); // vertex 2 sees both colors
        assert!(!state.admits(1)); // color 1 used
    }

    #[test]
    fn test_snapshot_independence() {
        let mut state = build_state(4, &[(0,1), (1,2), (2,3), (3,0)]);
        assert_eq!(state.assign(0, 0, 4), Ok(()));
        let snapshot = state.clone();
        {
            let mut copy = state.clone();
            assert_eq!(copy.assign(1, 1, 4), Ok(()));
            assert_eq!(copy.nb_colored(), 2);
        }
        assert_eq!(state.color(1), None);
        assert_eq!(state.nb_forbidden(2), 0);
        assert_eq!(state.nb_colored(), 1);
        assert_eq!(state.assign(2, 1, 4), Ok(()));
        assert_eq!(snapshot.color(2), None);
        assert_eq!(snapshot.check_consistency(), Ok(()));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic]
    fn test_assign_twice() {
        let mut state = build_state(2, &[(0,1)]);
        let _ = state.assign(0, 0, 2);
        let _ = state.assign(0, 0, 2);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic]
    fn test_assign_forbidden_color() {
        let mut state = build_state(3, &[(0,1), (1,2)]);
        let _ = state.assign(0, 0, 3);
        let _ = state.assign(1, 0, 3);
    }

    #[test]
    fn test_random_assignments_keep_invariants() {
        let rng = fastrand::Rng::with_seed(42);
        for _ in 0..200 {
            let n = rng.usize(1..15);
            let mut state = random_state(&rng, n, rng.f64());
            let ceiling = rng.usize(1..n+1);
            while let Some(v) = state.next_uncolored() {
                if state.force_new_color_neighbors(v, ceiling).is_err() { break; }
                assert_eq!(state.check_consistency(), Ok(()));
                if state.color(v).is_some() { continue; }
                let variants = state.color_variants(v, ceiling);
                if variants.is_empty() { break; }
                let c = variants[rng.usize(..variants.len())];
                if state.assign(v, c, ceiling).is_err() { break; }
                assert_eq!(state.check_consistency(), Ok(()));
                if state.propagate_forced(ceiling).is_err() { break; }
                assert_eq!(state.check_consistency(), Ok(()));
                // after propagation, every uncolored vertex keeps at least 2 colors (or the ceiling is 1)
                for u in 0..n {
                    if state.color(u).is_none() {
                        assert!(state.nb_forbidden(u) < ceiling);
                        assert!(ceiling == 1 || state.colors_used() + 1 < ceiling || state.nb_forbidden(u) + 1 < ceiling);
                    }
                }
            }
        }
    }
}
