use std::ffi::OsString;
use std::fs;
use std::io::IsTerminal;
use std::rc::Rc;
use std::str::FromStr;

use clap::{App, ArgMatches, load_yaml, value_t};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    color::{CheckerResult, ColoringInstance, checker, colors_to_solution},
    dimacs,
    edge_list,
    error::Error,
    search::driver::{DriverParameters, SolveReport},
};

/// instance file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceType {
    /// `V E` header then `E` pairs of 0-based vertices
    Plain,
    /// DIMACS `.col` format (1-based)
    Dimacs,
}

impl FromStr for InstanceType {
    type Err = String;

    fn from_str(s:&str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "dimacs" => Ok(Self::Dimacs),
            _ => Err(format!("instance type unknown {} (valid: 'plain', 'dimacs')", s)),
        }
    }
}

/// parameters of a run
#[derive(Debug, Clone)]
pub struct Params {
    /// instance file
    pub inst_filename: String,
    /// instance format
    pub instance_type: InstanceType,
    /// time limit in seconds (None: no limit)
    pub time_limit: Option<f32>,
    /// parameters of the search
    pub driver: DriverParameters,
    /// where to write the best solution
    pub sol_file: Option<String>,
    /// where to write the statistics
    pub perf_file: Option<String>,
}

/// reads an optional value, exits with a usage error if it cannot be parsed
fn optional_value<T:FromStr>(main_args:&ArgMatches, name:&str) -> Option<T> {
    if main_args.is_present(name) {
        Some(value_t!(main_args, name, T).unwrap_or_else(|e| e.exit()))
    } else {
        None
    }
}

/** reads command line input and returns the run parameters */
pub fn read_params(main_args:&ArgMatches) -> Params {
    let inst_filename = main_args.value_of("instance").unwrap_or_default().to_string();
    let instance_type = optional_value(main_args, "type").unwrap_or(InstanceType::Plain);
    let time_limit = optional_value(main_args, "time");
    let max_attempts = optional_value(main_args, "attempts");
    let sol_file = main_args.value_of("solution").map(|e| e.to_string());
    let perf_file = main_args.value_of("perf").map(|e| e.to_string());
    Params {
        inst_filename,
        instance_type,
        time_limit,
        driver: DriverParameters {
            max_attempts,
            use_clique: main_args.is_present("clique"),
            use_dsatur: main_args.is_present("dsatur"),
        },
        sol_file,
        perf_file,
    }
}

/** parses the command line arguments (exits with code 1 on usage errors) */
pub fn parse_command_line<I, T>(args:I) -> Params
where I: IntoIterator<Item=T>, T: Into<OsString> + Clone {
    let yaml = load_yaml!("main_args.yml");
    let main_args = App::from_yaml(yaml).get_matches_from(args);
    read_params(&main_args)
}

/** logs to stderr (level set by RUST_LOG, info by default) so that stdout only contains the result.
Colors only when stderr is a terminal. */
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(use_ansi(&std::io::stderr()))
        .with_writer(std::io::stderr)
        .try_init();
}

/// true if escape codes can be written to the stream
fn use_ansi(stream:&impl IsTerminal) -> bool { stream.is_terminal() }

/// reads the instance file
pub fn read_instance(params:&Params) -> Result<Rc<dyn ColoringInstance>, Error> {
    info!(instance = params.inst_filename.as_str(), "reading instance");
    let instance:Rc<dyn ColoringInstance> = match params.instance_type {
        InstanceType::Plain => Rc::new(edge_list::read_from_file(&params.inst_filename)?),
        InstanceType::Dimacs => Rc::new(dimacs::read_from_file(&params.inst_filename)?),
    };
    instance.display_statistics();
    Ok(instance)
}

/** result as printed on stdout: `<nb colors> 0`, then the color of each vertex */
pub fn format_result(report:&SolveReport) -> String {
    let colors:Vec<String> = report.colors.iter().map(|c| c.to_string()).collect();
    format!("{} 0\n{}\n", report.nb_colors, colors.join(" "))
}

/// exports search results to files
pub fn export_results(
    instance:&dyn ColoringInstance,
    report:&SolveReport,
    params:&Params,
    time_searched:f32,
) -> Result<(), Error> {
    // export statistics
    if let Some(filename) = &params.perf_file {
        let stats = json!({
            "inst_name": params.inst_filename,
            "primal_list": report.primal_list,
            "lower_bound": report.lower_bound,
            "optimal": report.optimal,
            "nb_attempts": report.nb_attempts,
            "nb_branches": report.stats.nb_branches,
            "nb_choice_points": report.stats.nb_choice_points,
            "time_searched": time_searched,
        });
        fs::write(filename, serde_json::to_string(&stats)?)
            .map_err(|e| Error::io(filename, e))?;
        info!(file = filename.as_str(), "statistics written");
    }
    // export solution
    if let Some(filename) = &params.sol_file {
        let solution = colors_to_solution(&report.colors);
        match checker(instance, &solution) {
            CheckerResult::Ok(_) => {},
            checker_result => return Err(Error::InvalidSolution(checker_result)),
        }
        instance.write_solution(filename, &solution)?;
        info!(file = filename.as_str(), "solution written");
    }
    Ok(())
}
