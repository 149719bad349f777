use crate::search::state::{ColoringState, Infeasible};

/** greedy coloring following the vertex ordering: every uncolored vertex receives its smallest
allowed color. With `ceiling = n` it always succeeds and provides the initial upper bound.

parameters:
 - state: state to complete (may be partially colored)
 - ceiling: number of colors allowed
*/
pub fn greedy_coloring(state:&mut ColoringState, ceiling:usize) -> Result<(), Infeasible> {
    let ordering = state.ordering().clone();
    for v in ordering.as_slice()[state.frontier()..].iter() {
        if state.color(*v).is_some() { continue; } // colored by propagation
        let c = state.first_allowed_color(*v, ceiling).ok_or(Infeasible)?;
        state.assign(*v, c, ceiling)?;
    }
    Ok(())
}
