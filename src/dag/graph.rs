//! PipelineGraph - adjacency structure built from untrusted node/edge lists
//!
//! - Arc<str> for zero-cost cloning of node IDs (one allocation per unique ID)
//! - FxHashMap for faster hashing (non-crypto)
//! - SmallVec for stack-allocated successor lists (0-4 items)
//!
//! Acyclicity is decided with Kahn's algorithm (topological sort by in-degree).

use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Stack-allocated successors: most pipeline nodes fan out to 0-4 nodes
type SuccVec = SmallVec<[Arc<str>; 4]>;

/// Directed graph over the union of declared node IDs and edge endpoints
#[derive(Debug, Default)]
pub struct PipelineGraph {
    /// node_id -> successor node_ids (one entry per edge, parallel edges kept)
    adjacency: FxHashMap<Arc<str>, SuccVec>,
    /// node_id -> number of incoming edges; every known ID has an entry
    in_degree: FxHashMap<Arc<str>, usize>,
    /// Every known ID in first-seen order: declared IDs first, then edge-only IDs
    node_ids: Vec<Arc<str>>,
    /// Number of distinct declared IDs (prefix length of `node_ids`)
    declared: usize,
}

impl PipelineGraph {
    /// Build the graph from declared node IDs and `(source, target)` edges.
    ///
    /// Duplicate node IDs collapse into one. Edge endpoints that were never
    /// declared still join the graph so that cycles among them are seen.
    pub fn new<'a, N, E>(node_ids: N, edges: E) -> Self
    where
        N: IntoIterator<Item = &'a str>,
        E: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut graph = Self::default();

        for id in node_ids {
            graph.intern(id);
        }
        graph.declared = graph.node_ids.len();

        for (source, target) in edges {
            let src = graph.intern(source);
            let tgt = graph.intern(target);

            graph
                .adjacency
                .entry(src)
                .or_default()
                .push(Arc::clone(&tgt));
            *graph.in_degree.entry(tgt).or_default() += 1;
        }

        graph
    }

    /// Return the shared Arc for `id`, registering it on first sight
    fn intern(&mut self, id: &str) -> Arc<str> {
        if let Some((existing, _)) = self.in_degree.get_key_value(id) {
            return Arc::clone(existing);
        }

        let id: Arc<str> = Arc::from(id);
        self.in_degree.insert(Arc::clone(&id), 0);
        self.node_ids.push(Arc::clone(&id));
        id
    }

    /// Number of distinct node IDs, edge-only IDs included
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Number of distinct IDs from the declared node list
    #[inline]
    pub fn declared_count(&self) -> usize {
        self.declared
    }

    /// IDs referenced by edges but missing from the declared node list
    pub fn dangling_ids(&self) -> &[Arc<str>] {
        &self.node_ids[self.declared..]
    }

    /// Get successors of a node (one entry per outgoing edge)
    #[inline]
    pub fn successors(&self, node_id: &str) -> &[Arc<str>] {
        static EMPTY: &[Arc<str>] = &[];
        self.adjacency
            .get(node_id)
            .map_or(EMPTY, SmallVec::as_slice)
    }

    /// Pipeline verdict: an empty declared node list is a DAG whatever the
    /// edges say, otherwise the whole graph must be acyclic.
    pub fn is_dag(&self) -> bool {
        self.declared == 0 || self.is_acyclic()
    }

    /// Check the graph for cycles using Kahn's algorithm.
    ///
    /// Nodes with no incoming edges are dequeued first; removing a node
    /// releases its successors. The graph is acyclic iff every node is
    /// eventually dequeued. Nodes left behind sit on or downstream of a cycle.
    pub fn is_acyclic(&self) -> bool {
        let mut remaining: FxHashMap<&str, usize> = self
            .in_degree
            .iter()
            .map(|(id, degree)| (id.as_ref(), *degree))
            .collect();

        let mut queue: VecDeque<&str> = self
            .node_ids
            .iter()
            .map(|id| id.as_ref())
            .filter(|id| remaining.get(id) == Some(&0))
            .collect();
        let mut visited = 0usize;

        while let Some(current) = queue.pop_front() {
            visited += 1;

            for next in self.successors(current) {
                if let Some(degree) = remaining.get_mut(next.as_ref()) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(next.as_ref());
                    }
                }
            }
        }

        visited == self.node_ids.len()
    }
}
