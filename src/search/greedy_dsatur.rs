use std::cmp::Reverse;

use priority_queue::PriorityQueue;
use bit_set::BitSet;

use crate::color::{ColoringInstance, VertexId};

/// (saturation, degree, smallest id first)
type Priority = (usize, usize, Reverse<VertexId>);

/** DSATUR greedy coloring.
Repeatedly colors, with its smallest available color, the uncolored vertex adjacent to the most
distinct colors (ties: largest degree, then smallest id).

returns colors[v]: color of vertex v
*/
pub fn greedy_dsatur(inst:&dyn ColoringInstance) -> Vec<usize> {
    let n = inst.nb_vertices();
    let mut queue:PriorityQueue<VertexId, Priority> = inst.vertices()
        .map(|v| (v, (0, inst.degree(v), Reverse(v))))
        .collect();
    let mut colors = vec![usize::MAX ; n];
    let mut seen:Vec<BitSet> = vec![BitSet::default() ; n]; // seen[v]: colors of the neighbors of v
    while let Some((u, _)) = queue.pop() {
        let c = (0..).find(|c| !seen[u].contains(*c)).unwrap_or_default();
        colors[u] = c;
        for v in inst.neighbors(u) {
            if colors[*v] == usize::MAX && seen[*v].insert(c) {
                queue.change_priority_by(v, |p| p.0 += 1);
            }
        }
    }
    debug_assert!(colors.iter().all(|c| *c < n));
    colors
}
