//! Task dependency graph.
//!
//! Validated once at construction: keys are unique, every dependency names
//! a declared task, and the dependency relation is acyclic. Execution order
//! is topological with ties broken by declaration order.

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use super::{CrewError, Task};

/// Validated task graph with a fixed execution order.
#[derive(Debug)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    /// Indices into `tasks`, in execution order
    order: Vec<usize>,
}

impl TaskGraph {
    /// # Errors
    /// - `NoTasks` for an empty list
    /// - `DuplicateTask` when two tasks share a key
    /// - `SelfDependency` / `UnknownDependency` for bad edges
    /// - `Cycle` when the dependencies are not acyclic
    pub fn new(tasks: Vec<Task>) -> Result<Self, CrewError> {
        if tasks.is_empty() {
            return Err(CrewError::NoTasks);
        }

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            if index.insert(task.key(), i).is_some() {
                return Err(CrewError::DuplicateTask(task.key().to_string()));
            }
        }

        // Edges point from a dependency to the task that needs it.
        let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(tasks.len(), tasks.len());
        let nodes: Vec<NodeIndex> = (0..tasks.len()).map(|i| graph.add_node(i)).collect();

        for (i, task) in tasks.iter().enumerate() {
            for dependency in task.dependencies() {
                if dependency == task.key() {
                    return Err(CrewError::SelfDependency(task.key().to_string()));
                }
                let &j = index.get(dependency.as_str()).ok_or_else(|| {
                    CrewError::UnknownDependency {
                        task: task.key().to_string(),
                        dependency: dependency.clone(),
                    }
                })?;
                graph.update_edge(nodes[j], nodes[i], ());
            }
        }

        if let Err(cycle) = toposort(&graph, None) {
            let task = tasks[graph[cycle.node_id()]].key().to_string();
            return Err(CrewError::Cycle { task });
        }

        let order = declaration_ordered_toposort(&graph);
        Ok(Self { tasks, order })
    }

    /// Tasks in execution order.
    pub fn ordered(&self) -> impl Iterator<Item = &Task> + '_ {
        self.order.iter().map(move |&i| &self.tasks[i])
    }

    /// Task keys in execution order.
    pub fn execution_order(&self) -> Vec<&str> {
        self.ordered().map(Task::key).collect()
    }

    pub fn get(&self, key: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.key() == key)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Kahn's algorithm, always releasing the earliest-declared ready task.
///
/// The graph must be acyclic; node indices equal declaration indices.
fn declaration_ordered_toposort(graph: &DiGraph<usize, ()>) -> Vec<usize> {
    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|n| graph.neighbors_directed(n, Direction::Incoming).count())
        .collect();

    let mut ready: BTreeSet<usize> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(i, _)| i)
        .collect();

    let mut order = Vec::with_capacity(in_degree.len());
    while let Some(next) = ready.pop_first() {
        order.push(next);
        for successor in graph.neighbors_directed(NodeIndex::new(next), Direction::Outgoing) {
            let s = successor.index();
            in_degree[s] -= 1;
            if in_degree[s] == 0 {
                ready.insert(s);
            }
        }
    }
    order
}
