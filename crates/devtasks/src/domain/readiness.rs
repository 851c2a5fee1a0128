//! Dependency readiness evaluation.
//!
//! A task is ready when it is pending or in progress and every dependency id
//! resolves to a task that is done. Unknown ids block; they are never an
//! error. Cycles are not detected here: a cycle simply never becomes ready.
//! [`dependency_report`] is the place that looks for them.

use std::collections::{HashMap, HashSet};

use crate::entities::{Task, TaskStatus};

/// A pending or in-progress task held back by its dependencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedTask {
    pub task_id: u32,
    /// Dependencies that are missing or not done, in declared order
    pub waiting_on: Vec<u32>,
}

/// Read-only findings about the dependency graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyReport {
    /// `(task_id, dep_id)` pairs whose dependency does not exist
    pub missing: Vec<(u32, u32)>,
    /// Tasks listing themselves as a dependency
    pub self_references: Vec<u32>,
    /// Dependency cycles, each starting at its first-visited task
    pub cycles: Vec<Vec<u32>>,
}

impl DependencyReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.self_references.is_empty() && self.cycles.is_empty()
    }
}

fn statuses(all: &[Task]) -> HashMap<u32, TaskStatus> {
    all.iter().map(|t| (t.id, t.status)).collect()
}

fn unsatisfied(task: &Task, status_by_id: &HashMap<u32, TaskStatus>) -> Vec<u32> {
    task.dependencies
        .iter()
        .copied()
        .filter(|dep| status_by_id.get(dep) != Some(&TaskStatus::Done))
        .collect()
}

/// Whether every dependency of `task` is done within `all`
pub fn is_ready(task: &Task, all: &[Task]) -> bool {
    task.status.is_open() && unsatisfied(task, &statuses(all)).is_empty()
}

/// Tasks that can be worked on now, in collection order
pub fn ready_tasks(all: &[Task]) -> Vec<&Task> {
    let status_by_id = statuses(all);
    all.iter()
        .filter(|t| t.status.is_open())
        .filter(|t| unsatisfied(t, &status_by_id).is_empty())
        .collect()
}

/// Open tasks with at least one unsatisfied dependency
pub fn blocked_tasks(all: &[Task]) -> Vec<BlockedTask> {
    let status_by_id = statuses(all);
    all.iter()
        .filter(|t| t.status.is_open())
        .filter_map(|t| {
            let waiting_on = unsatisfied(t, &status_by_id);
            (!waiting_on.is_empty()).then_some(BlockedTask {
                task_id: t.id,
                waiting_on,
            })
        })
        .collect()
}

/// Inspect the graph for missing references, self-references and cycles
pub fn dependency_report(all: &[Task]) -> DependencyReport {
    let ids: HashSet<u32> = all.iter().map(|t| t.id).collect();
    let mut report = DependencyReport::default();

    for task in all {
        if task.depends_on_itself() {
            report.self_references.push(task.id);
        }
        for dep in &task.dependencies {
            if !ids.contains(dep) {
                report.missing.push((task.id, *dep));
            }
        }
    }

    report.cycles = find_cycles(all);
    report
}

/// Find cycles of length two or more; self-references are reported separately
fn find_cycles(tasks: &[Task]) -> Vec<Vec<u32>> {
    let graph: HashMap<u32, Vec<u32>> = tasks
        .iter()
        .map(|t| {
            let deps = t.dependencies.iter().copied().filter(|d| *d != t.id).collect();
            (t.id, deps)
        })
        .collect();

    let mut cycles = Vec::new();
    let mut visited = HashSet::new();
    let mut on_stack = HashSet::new();

    for task in tasks {
        if !visited.contains(&task.id) {
            let mut path = Vec::new();
            dfs_cycle(
                &graph,
                task.id,
                &mut visited,
                &mut on_stack,
                &mut path,
                &mut cycles,
            );
        }
    }

    cycles
}

fn dfs_cycle(
    graph: &HashMap<u32, Vec<u32>>,
    node: u32,
    visited: &mut HashSet<u32>,
    on_stack: &mut HashSet<u32>,
    path: &mut Vec<u32>,
    cycles: &mut Vec<Vec<u32>>,
) {
    visited.insert(node);
    on_stack.insert(node);
    path.push(node);

    if let Some(deps) = graph.get(&node) {
        for &dep in deps {
            if !visited.contains(&dep) {
                dfs_cycle(graph, dep, visited, on_stack, path, cycles);
            } else if on_stack.contains(&dep) {
                if let Some(start) = path.iter().position(|&n| n == dep) {
                    let cycle = path[start..].to_vec();
                    if !cycles.contains(&cycle) {
                        cycles.push(cycle);
                    }
                }
            }
        }
    }

    path.pop();
    on_stack.remove(&node);
}
