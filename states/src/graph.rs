use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt::{Debug, Formatter};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError<T>
where
    T: Debug,
{
    #[error("Cycle detected in dependency graph: {:?}", .0)]
    CycleDetected(DepRoute<T>),
    #[error("Duplicate edge in dependency graph: {:?}", .0)]
    DuplicateEdge(DepRoute<T>),
}

/// A path through the graph, first element is the start node.
pub struct DepRoute<T> {
    route: Vec<T>,
}

impl<T> DepRoute<T> {
    pub fn nodes(&self) -> &[T] {
        &self.route
    }
}

impl<T> Debug for DepRoute<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut nodes = self.route.iter();
        let Some(first) = nodes.next() else {
            return write!(f, "[]");
        };
        write!(f, "{first:?}")?;
        for node in nodes {
            write!(f, " -> {node:?}")?;
        }
        Ok(())
    }
}

/// Directed dependency graph. An edge `from -> to` means `to` is derived from
/// `from` and must be refreshed when `from` changes.
#[derive(Debug)]
pub struct Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    edges: BTreeMap<Node, Vec<Node>>,
}

impl<Node> Default for Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Node> Graph<Node>
where
    Node: Debug + Copy + Ord,
{
    pub fn new() -> Self {
        Self {
            edges: BTreeMap::new(),
        }
    }

    pub fn route_to(&mut self, from: Node, to: Node) {
        self.edges.entry(from).or_default().push(to);
        self.edges.entry(to).or_default();
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    fn direct(&self, node: Node) -> &[Node] {
        self.edges.get(&node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every node reachable from `node`, excluding `node` itself unless it
    /// sits on a cycle.
    pub fn dependents(&self, node: Node) -> BTreeSet<Node> {
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<Node> = self.direct(node).iter().copied().collect();

        while let Some(current) = queue.pop_front() {
            if seen.insert(current) {
                queue.extend(self.direct(current).iter().copied());
            }
        }

        seen
    }

    /// Kahn ordering of all nodes. Fails on duplicate edges and cycles.
    pub fn topology_sort(&self) -> Result<Vec<Node>, TopologyError<Node>> {
        let mut in_degree: BTreeMap<Node, usize> = self.edges.keys().map(|n| (*n, 0)).collect();

        for (from, targets) in &self.edges {
            let mut unique = BTreeSet::new();
            for to in targets {
                if !unique.insert(*to) {
                    return Err(TopologyError::DuplicateEdge(DepRoute {
                        route: vec![*from, *to],
                    }));
                }
                *in_degree.entry(*to).or_default() += 1;
            }
        }

        let mut ready: VecDeque<Node> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(node, _)| *node)
            .collect();
        let mut order = Vec::with_capacity(in_degree.len());

        while let Some(node) = ready.pop_front() {
            order.push(node);
            for to in self.direct(node) {
                if let Some(degree) = in_degree.get_mut(to) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(*to);
                    }
                }
            }
        }

        if order.len() == in_degree.len() {
            return Ok(order);
        }

        let remaining: BTreeSet<Node> = in_degree
            .into_iter()
            .filter(|(node, _)| !order.contains(node))
            .map(|(node, _)| node)
            .collect();
        Err(TopologyError::CycleDetected(DepRoute {
            route: self.find_cycle(&remaining),
        }))
    }

    /// Every remaining node still has a predecessor inside `remaining`, so
    /// walking predecessors must revisit a node. The cycle is returned in edge
    /// direction.
    fn find_cycle(&self, remaining: &BTreeSet<Node>) -> Vec<Node> {
        let Some(&start) = remaining.iter().next() else {
            return Vec::new();
        };

        let mut path = vec![start];
        let mut current = start;
        loop {
            let previous = self
                .edges
                .iter()
                .find(|(from, targets)| remaining.contains(*from) && targets.contains(&current))
                .map(|(from, _)| *from);
            let Some(previous) = previous else {
                return path;
            };
            if let Some(pos) = path.iter().position(|n| *n == previous) {
                let mut cycle = path.split_off(pos);
                cycle.push(previous);
                cycle.reverse();
                return cycle;
            }
            path.push(previous);
            current = previous;
        }
    }
}
