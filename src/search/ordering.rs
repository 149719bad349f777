use std::ops::Index;

use crate::color::{ColoringInstance, VertexId};

/** fixed permutation of the vertices, by non-increasing degree (ties: smallest id first).
Drives both the greedy pass and the order in which the search visits vertices.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexOrdering {
    /// order[i]: ith vertex to color
    order: Vec<VertexId>,
}

impl VertexOrdering {
    /// sorts the vertices by decreasing degree (stable)
    pub fn by_degree(inst:&dyn ColoringInstance) -> Self {
        let mut order:Vec<VertexId> = inst.vertices().collect();
        order.sort_by(|a,b| inst.degree(*b).cmp(&inst.degree(*a)));
        Self { order }
    }

    /// number of vertices in the ordering
    pub fn len(&self) -> usize { self.order.len() }

    /// true if there are no vertices
    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    /// vertices in order
    pub fn as_slice(&self) -> &[VertexId] { &self.order }
}

impl Index<usize> for VertexOrdering {
    type Output = VertexId;

    fn index(&self, i:usize) -> &VertexId { &self.order[i] }
}
