use std::fs;

use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{digit1, space0, space1};
use nom::combinator::{all_consuming, map_res};
use nom::sequence::{preceded, separated_pair, terminated, tuple};

use crate::color::VertexId;
use crate::compact_instance::CompactInstance;
use crate::error::Error;


/// reads an unsigned integer
fn integer(s:&str) -> IResult<&str, usize> {
    map_res(digit1, |d:&str| d.parse::<usize>())(s)
}

/// reads two numbers separated by spaces (and nothing else on the line)
fn read_two_integers(s:&str) -> IResult<&str, (usize,usize)> {
    all_consuming(terminated(separated_pair(integer, space1, integer), space0))(s)
}

/// reads header containing (n,m)
pub fn read_header(s:&str) -> IResult<&str, (usize,usize)> {
    preceded(
        tuple((tag("p"), space1, alt((tag("edge"), tag("col"))), space1)),
        read_two_integers
    )(s)
}

/// reads edge line (WARNING: indices start at 1 in the DIMACS format)
pub fn read_edge(s:&str) -> IResult<&str, (usize,usize)> {
    preceded(tuple((tag("e"), space1)), read_two_integers)(s)
}

/// reads an instance from a string, returns (n, m, 0-based edges)
pub fn parse_dimacs(input:&str) -> Result<(usize, usize, Vec<(VertexId,VertexId)>), Error> {
    let mut header:Option<(usize,usize)> = None;
    let mut edges = Vec::new();
    for (i,raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('c') { continue; } // skip comments
        let error = |message:&str| Error::Parse { line: i+1, message: message.to_string() };
        match header {
            None => {
                let (_,(n,m)) = read_header(line).map_err(|_| error("expected header `p edge n m`"))?;
                edges.reserve(m.min(1 << 20));
                header = Some((n,m));
            },
            Some((n,_)) => {
                let (_,(a,b)) = read_edge(line).map_err(|_| error("expected edge `e u v`"))?;
                for v in [a, b].iter() {
                    if *v == 0 || *v > n {
                        return Err(Error::VertexOutOfRange { vertex: *v, nb_vertices: n });
                    }
                }
                edges.push((a-1, b-1));
            }
        }
    }
    match header {
        None => Err(Error::Parse { line: input.lines().count().max(1), message: "missing header".to_string() }),
        Some((n,m)) => Ok((n, m, edges)),
    }
}

/// reads a DIMACS instance from a string
pub fn instance_from_str(input:&str) -> Result<CompactInstance, Error> {
    let (n, _, edges) = parse_dimacs(input)?;
    let mut res = CompactInstance::from_edges(n, &edges)?;
    res.populate_adj_matrix();
    Ok(res)
}

/// creates an instance from a DIMACS file
pub fn read_from_file(filename:&str) -> Result<CompactInstance, Error> {
    let content = fs::read_to_string(filename).map_err(|e| Error::io(filename, e))?;
    instance_from_str(&content)
}
