use bit_set::BitSet;
use tracing::warn;

use crate::color::{ColoringInstance, VertexId};
use crate::error::Error;

/** models a Graph Coloring instance (adjacency lists, edge list, optional adjacency matrix).  */
#[derive(Debug)]
pub struct CompactInstance {
    /// number of vertices
    n: usize,
    /// number of distinct edges
    m: usize,
    /// edges (u,v) with u < v
    edges: Vec<(VertexId,VertexId)>,
    /// adj_list[u]: sorted neighbors of u
    adj_list: Vec<Vec<VertexId>>,
    /// adj_matrix[u]: neighbors of u as a bitset (only for dense instances)
    adj_matrix: Option<Vec<BitSet>>,
}

impl ColoringInstance for CompactInstance {
    fn nb_vertices(&self) -> usize { self.n }

    fn nb_edges(&self) -> usize { self.m }

    fn neighbors(&self, u:VertexId) -> &[VertexId] { &self.adj_list[u] }

    fn are_adjacent(&self, u:VertexId, v:VertexId) -> bool {
        match &self.adj_matrix {
            Some(matrix) => matrix[u].contains(v),
            None => self.adj_list[u].binary_search(&v).is_ok(),
        }
    }

    fn edges(&self) -> &[(VertexId, VertexId)] { &self.edges }
}


impl CompactInstance {

    /// edges (u,v) with u < v, in lexicographic order
    fn collect_edges(adj_list:&[Vec<VertexId>]) -> Vec<(VertexId,VertexId)> {
        adj_list.iter().enumerate()
            .flat_map(|(u,l)| l.iter().filter(move |v| u < **v).map(move |v| (u,*v)))
            .collect()
    }

    /** constructor using an adjacency list. Neighbor lists are sorted, duplicates merged and
    self-loops dropped. The adjacency is assumed symmetric. */
    pub fn new(mut adj_list:Vec<Vec<VertexId>>) -> Self {
        let n = adj_list.len();
        let mut nb_loops = 0;
        for (u,l) in adj_list.iter_mut().enumerate() {
            l.sort_unstable();
            l.dedup();
            if let Ok(pos) = l.binary_search(&u) {
                l.remove(pos);
                nb_loops += 1;
            }
        }
        if nb_loops > 0 {
            warn!(nb_loops, "self-loops dropped");
        }
        let edges = Self::collect_edges(&adj_list);
        let m = edges.len();
        Self { n,m, edges, adj_list, adj_matrix:None }
    }

    /** constructor using an edge list over vertices 0..n.
    Fails if an endpoint is not a vertex of the graph. */
    pub fn from_edges(n:usize, edges:&[(VertexId,VertexId)]) -> Result<Self, Error> {
        let mut adj_list = vec![Vec::new() ; n];
        for (a,b) in edges {
            for v in [*a, *b].iter() {
                if *v >= n {
                    return Err(Error::VertexOutOfRange { vertex: *v, nb_vertices: n });
                }
            }
            adj_list[*a].push(*b);
            adj_list[*b].push(*a);
        }
        Ok(Self::new(adj_list))
    }

    /// builds the adjacency matrix (constant-time `are_adjacent`, more memory)
    pub fn populate_adj_matrix(&mut self) {
        let matrix = self.adj_list.iter()
            .map(|l| l.iter().copied().collect::<BitSet>())
            .collect();
        self.adj_matrix = Some(matrix);
    }

    /// true if the adjacency matrix has been computed
    #[cfg(test)]
    pub(crate) fn has_adj_matrix(&self) -> bool { self.adj_matrix.is_some() }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges() {
        let inst = CompactInstance::from_edges(4, &[(0,1), (1,2), (2,3), (3,0)]).unwrap();
        assert_eq!(inst.nb_vertices(), 4);
        assert_eq!(inst.nb_edges(), 4);
        assert_eq!(inst.neighbors(0), &[1,3]);
        assert_eq!(inst.edges(), &[(0,1), (0,3), (1,2), (2,3)]);
        assert!(inst.are_adjacent(3, 0));
        assert!(!inst.are_adjacent(0, 2));
    }

    #[test]
    fn test_duplicates_and_loops() {
        let inst = CompactInstance::from_edges(3, &[(0,1), (1,0), (2,2)]).unwrap();
        assert_eq!(inst.nb_edges(), 1);
        assert_eq!(inst.degree(0), 1);
        assert_eq!(inst.degree(2), 0);
    }

    #[test]
    fn test_out_of_range() {
        match CompactInstance::from_edges(2, &[(0,2)]) {
            Err(Error::VertexOutOfRange { vertex, nb_vertices }) => {
                assert_eq!(vertex, 2);
                assert_eq!(nb_vertices, 2);
            },
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_adj_matrix() {
        let mut inst = CompactInstance::from_edges(3, &[(0,1), (1,2)]).unwrap();
        assert!(!inst.has_adj_matrix());
        inst.populate_adj_matrix();
        assert!(inst.has_adj_matrix());
        assert!(inst.are_adjacent(1, 0));
        assert!(!inst.are_adjacent(0, 2));
    }
}
