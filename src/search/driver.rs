use std::rc::Rc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::color::{CheckerResult, ColoringInstance, checker, colors_to_solution};
use crate::error::Error;
use crate::search::backtracking::{BranchAndBound, SearchFailure, SearchStatistics};
use crate::search::greedy::greedy_coloring;
use crate::search::greedy_clique::{greedy_clique, seed_clique};
use crate::search::greedy_dsatur::greedy_dsatur;
use crate::search::ordering::VertexOrdering;
use crate::search::state::ColoringState;
use crate::search::stopping::StoppingCriterion;

/// parameters of the decrease-and-verify loop
#[derive(Debug, Clone, Default)]
pub struct DriverParameters {
    /// maximum number of bounded searches (None: until a stopping rule applies)
    pub max_attempts: Option<usize>,
    /// seed the searches with a greedy clique
    pub use_clique: bool,
    /// also run DSATUR for the initial upper bound
    pub use_dsatur: bool,
}

/// result of a run
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    /// colors[v]: color of vertex v in the best coloring found
    pub colors: Vec<usize>,
    /// number of colors of the best coloring
    pub nb_colors: usize,
    /// proven lower bound on the number of colors
    pub lower_bound: usize,
    /// true if the best coloring is proven optimal
    pub optimal: bool,
    /// number of colors of each accepted coloring (decreasing)
    pub primal_list: Vec<usize>,
    /// number of bounded searches performed
    pub nb_attempts: usize,
    /// statistics accumulated over every bounded search
    pub stats: SearchStatistics,
}

/// number of colors of a complete coloring
fn nb_colors(colors:&[usize]) -> usize {
    colors.iter().max().map_or(0, |c| c+1)
}

/**
colors the instance with as few colors as possible:
 1. greedy coloring along the degree ordering (and DSATUR if asked) gives an upper bound U
 2. the searches start from an uncolored state, or from a greedy clique colored with distinct colors
 3. bounded searches with ceilings U-1, then one less than each new best, until a search fails,
    the lower bound is reached, the attempts are spent or the stopping criterion fires.
*/
pub fn solve_coloring<Stop:StoppingCriterion>(
    inst:Rc<dyn ColoringInstance>,
    params:&DriverParameters,
    stopping_criterion:&Stop,
) -> Result<SolveReport, Error> {
    let n = inst.nb_vertices();
    let ordering = Rc::new(VertexOrdering::by_degree(&*inst));
    let initial = ColoringState::new(inst.clone(), ordering);
    // initial upper bound
    let mut greedy = initial.clone();
    greedy_coloring(&mut greedy, n).map_err(|_| Error::Infeasible { ceiling: n })?;
    let mut best = greedy.colors().ok_or(Error::Infeasible { ceiling: n })?;
    info!(nb_colors = nb_colors(&best), "greedy coloring");
    if params.use_dsatur {
        let dsatur = greedy_dsatur(&*inst);
        info!(nb_colors = nb_colors(&dsatur), "DSATUR coloring");
        if nb_colors(&dsatur) < nb_colors(&best) { best = dsatur; }
    }
    // lower bound & seed state
    let mut lower_bound = match (n, inst.nb_edges()) {
        (0, _) => 0,
        (_, 0) => 1,
        _ => 2,
    };
    let mut seed = initial;
    if params.use_clique {
        let clique = greedy_clique(&*inst);
        seed_clique(&mut seed, &clique).map_err(|_| Error::Infeasible { ceiling: n })?;
        lower_bound = lower_bound.max(clique.len());
        info!(clique_size = clique.len(), "clique lower bound");
    }
    // decrease and verify
    let mut primal_list = vec![nb_colors(&best)];
    let mut optimal = nb_colors(&best) <= lower_bound;
    let mut nb_attempts = 0;
    let mut stats = SearchStatistics::default();
    while !optimal
    && params.max_attempts.map_or(true, |a| nb_attempts < a)
    && !stopping_criterion.is_finished() {
        let ceiling = nb_colors(&best) - 1;
        nb_attempts += 1;
        let t_start = Instant::now();
        let mut search = BranchAndBound::new(ceiling);
        let result = search.solve(seed.clone(), stopping_criterion);
        stats.add(search.statistics());
        let duration = t_start.elapsed().as_secs_f32();
        debug!(ceiling, nb_branches = search.statistics().nb_branches, duration, "bounded search done");
        match result {
            Ok(state) => {
                best = state.colors().ok_or(Error::Infeasible { ceiling })?;
                primal_list.push(nb_colors(&best));
                optimal = nb_colors(&best) <= lower_bound;
                info!(nb_colors = nb_colors(&best), ceiling, duration, "improved coloring");
            },
            Err(SearchFailure::Infeasible) => {
                lower_bound = ceiling + 1;
                optimal = true;
                info!(ceiling, duration, "no coloring within the ceiling");
            },
            Err(SearchFailure::Interrupted) => {
                info!(ceiling, duration, "search interrupted");
                break;
            },
        }
    }
    debug_assert_eq!(
        checker(&*inst, &colors_to_solution(&best)),
        CheckerResult::Ok(nb_colors(&best))
    );
    info!(
        nb_colors = nb_colors(&best),
        lower_bound,
        optimal,
        nb_attempts,
        nb_branches = stats.nb_branches,
        "coloring done"
    );
    Ok(SolveReport {
        nb_colors: nb_colors(&best),
        colors: best,
        lower_bound,
        optimal,
        primal_list,
        nb_attempts,
        stats,
    })
}
