//! Plain edge-list format: `V E` followed by `E` pairs `v0 v1` (0-based), whitespace separated.

use std::fs;

use nom::IResult;
use nom::character::complete::{digit1, multispace0};
use nom::combinator::map_res;
use nom::sequence::{pair, preceded};

use crate::color::VertexId;
use crate::compact_instance::CompactInstance;
use crate::error::Error;

/// reads an unsigned integer, skipping leading whitespace
fn integer(s:&str) -> IResult<&str, usize> {
    map_res(preceded(multispace0, digit1), |d:&str| d.parse::<usize>())(s)
}

/// reads two integers
fn integer_pair(s:&str) -> IResult<&str, (usize,usize)> {
    pair(integer, integer)(s)
}

/// reads an instance from a string, returns (n, edges)
pub fn parse_edge_list(input:&str) -> Result<(usize, Vec<(VertexId,VertexId)>), Error> {
    let (mut remaining, (n,m)) = integer_pair(input)
        .map_err(|_| Error::parse(input, input, "expected header `V E`"))?;
    let mut edges = Vec::with_capacity(m.min(1 << 20));
    for i in 0..m {
        let (rest, (a,b)) = integer_pair(remaining)
            .map_err(|_| Error::parse(input, remaining.trim_start(),
                format!("expected edge {} of {}", i+1, m)
            ))?;
        edges.push((a,b));
        remaining = rest;
    }
    Ok((n, edges))
}

/// reads an instance from a string
pub fn instance_from_str(input:&str) -> Result<CompactInstance, Error> {
    let (n, edges) = parse_edge_list(input)?;
    CompactInstance::from_edges(n, &edges)
}

/// creates an instance from a plain edge-list file
pub fn read_from_file(filename:&str) -> Result<CompactInstance, Error> {
    let content = fs::read_to_string(filename).map_err(|e| Error::io(filename, e))?;
    instance_from_str(&content)
}
