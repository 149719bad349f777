use bit_set::BitSet;
use tracing::debug;

use crate::color::{ColoringInstance, VertexId};
use crate::search::state::{ColoringState, Infeasible};

/** implements a greedy algorithm that finds a "large" size clique.
The algorithm chooses the vertex with the largest degree. It marks as "candidates" its neighbors.
Then, while the set of candidates is not empty, choose the candidate with the largest degree
(ties: smallest id) and keep as candidates only its neighbors.
*/
pub fn greedy_clique(inst:&dyn ColoringInstance) -> Vec<VertexId> {
    let mut candidates:BitSet = inst.vertices().collect();
    let mut res = Vec::new();
    loop {
        let next = candidates.iter().max_by(|a,b| {
            inst.degree(*a).cmp(&inst.degree(*b)).then_with(|| b.cmp(a))
        });
        match next {
            None => break,
            Some(current_vertex) => {
                // insert the current vertex as part of the clique solution
                res.push(current_vertex);
                // only its neighbors can extend the clique
                let neighbors:BitSet = inst.neighbors(current_vertex).iter().copied().collect();
                candidates.intersect_with(&neighbors);
            }
        };
    }
    debug!(size = res.len(), "greedy clique");
    res
}

/** colors the clique members with 0, 1, ..., k-1 (distinct colors are forced in any coloring).
The clique size is a lower bound of the number of colors.
*/
pub fn seed_clique(state:&mut ColoringState, clique:&[VertexId]) -> Result<(), Infeasible> {
    let ceiling = state.instance().nb_vertices();
    for (i,v) in clique.iter().enumerate() {
        debug_assert!(clique[..i].iter().all(|u| state.instance().are_adjacent(*u, *v)));
        state.assign(*v, i, ceiling)?;
    }
    Ok(())
}
