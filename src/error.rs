use std::io;

use thiserror::Error;

use crate::color::{CheckerResult, VertexId};

/** errors that abort a run (unreadable or malformed instances, rejected solutions).
Running out of colors during the search is not an error, see `search::state::Infeasible`.
*/
#[derive(Debug, Error)]
pub enum Error {
    /// the instance (or an output file) could not be read or written
    #[error("unable to access {path}: {source}")]
    Io {
        /// file involved
        path: String,
        /// underlying io error
        source: io::Error,
    },
    /// the instance file does not follow the expected format
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line of the offending token
        line: usize,
        /// what was expected
        message: String,
    },
    /// an edge refers to a vertex that does not exist
    #[error("vertex {vertex} out of range (instance has {nb_vertices} vertices)")]
    VertexOutOfRange {
        /// offending vertex id
        vertex: VertexId,
        /// number of vertices declared by the header
        nb_vertices: usize,
    },
    /// no coloring exists within the requested number of colors
    #[error("no coloring found within {ceiling} colors")]
    Infeasible {
        /// number of colors allowed
        ceiling: usize,
    },
    /// the checker rejected a solution
    #[error("invalid solution ({0:?})")]
    InvalidSolution(CheckerResult),
    /// statistics could not be serialized
    #[error("unable to serialize statistics: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// builds an io error carrying the file name
    pub fn io(path:&str, source:io::Error) -> Self {
        Self::Io { path: path.to_string(), source }
    }

    /** builds a parse error located in `input` where `remaining` starts */
    pub fn parse(input:&str, remaining:&str, message:impl Into<String>) -> Self {
        let consumed = &input[..input.len()-remaining.len()];
        let line = consumed.matches('\n').count() + 1;
        Self::Parse { line, message: message.into() }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_line() {
        let input = "3 2\n0 1\nx 2\n";
        let remaining = &input[8..];
        match Error::parse(input, remaining, "expected an integer") {
            Error::Parse { line, message } => {
                assert_eq!(line, 3);
                assert_eq!(message, "expected an integer");
            },
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn test_display() {
        let e = Error::VertexOutOfRange { vertex: 7, nb_vertices: 3 };
        assert_eq!(e.to_string(), "vertex 7 out of range (instance has 3 vertices)");
    }
}
