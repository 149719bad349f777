//! Graph coloring: greedy upper bound, then branch & bound with decreasing numbers of colors

#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]

use std::io::Write;
use std::time::Instant;

use tracing::{error, info};

use bnb_color::error::Error;
use bnb_color::search::driver::solve_coloring;
use bnb_color::search::stopping::TimeStoppingCriterion;
use bnb_color::util::{
    Params, export_results, format_result, init_logging, parse_command_line, read_instance,
};

/**
reads an instance, colors it and prints `<nb colors> 0` followed by the vertex colors.
Logs go to stderr.
*/
pub fn main() {
    init_logging();
    let params = parse_command_line(std::env::args_os());
    if let Err(e) = run(&params) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(params:&Params) -> Result<(), Error> {
    let start = Instant::now();
    let inst = read_instance(params)?;
    let stopping_criterion = params.time_limit.map(TimeStoppingCriterion::new);
    let report = solve_coloring(inst.clone(), &params.driver, &stopping_criterion)?;
    let time_searched = start.elapsed().as_secs_f32();
    info!(
        nb_colors = report.nb_colors,
        lower_bound = report.lower_bound,
        optimal = report.optimal,
        time = time_searched,
        "search finished"
    );
    let stdout = std::io::stdout();
    stdout.lock().write_all(format_result(&report).as_bytes())
        .map_err(|e| Error::io("<stdout>", e))?;
    export_results(&*inst, &report, params, time_searched)
}
