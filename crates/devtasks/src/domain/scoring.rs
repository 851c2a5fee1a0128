//! Complexity scoring.
//!
//! The score is a weighted sum over four fixed factors:
//!
//! | factor         | input                                     | weight |
//! |----------------|-------------------------------------------|--------|
//! | `dependencies` | number of dependency ids                  | 0.5    |
//! | `subtasks`     | number of subtasks                        | 0.7    |
//! | `priority`     | low=1, medium=2, high=3                   | 1.0    |
//! | `description`  | `min(5, floor(chars / 50))`               | 0.3    |
//!
//! The total maps onto a [`ComplexityLevel`] with the thresholds in
//! [`level_for`].

use crate::entities::{ComplexityFactor, ComplexityLevel, ComplexityScore, ComplexitySource, Task};

const DEPENDENCY_WEIGHT: f64 = 0.5;
const SUBTASK_WEIGHT: f64 = 0.7;
const PRIORITY_WEIGHT: f64 = 1.0;
const DESCRIPTION_WEIGHT: f64 = 0.3;

/// Characters of description per point of the description factor
const DESCRIPTION_CHARS_PER_POINT: usize = 50;
const DESCRIPTION_MAX_POINTS: usize = 5;

const FACTORS: [(&str, f64, &str); 4] = [
    (
        "dependencies",
        DEPENDENCY_WEIGHT,
        "Number of tasks this task depends on",
    ),
    ("subtasks", SUBTASK_WEIGHT, "Number of subtasks"),
    (
        "priority",
        PRIORITY_WEIGHT,
        "Priority weight (low=1, medium=2, high=3)",
    ),
    (
        "description",
        DESCRIPTION_WEIGHT,
        "Description length in 50-character steps, capped at 5",
    ),
];

/// The fixed factor descriptors attached to every computed score
pub fn factors() -> Vec<ComplexityFactor> {
    FACTORS
        .iter()
        .map(|(name, weight, description)| ComplexityFactor {
            name: (*name).to_string(),
            weight: *weight,
            description: (*description).to_string(),
        })
        .collect()
}

/// Description factor: `min(5, floor(chars / 50))`
pub fn description_factor(description: &str) -> usize {
    (description.chars().count() / DESCRIPTION_CHARS_PER_POINT).min(DESCRIPTION_MAX_POINTS)
}

/// Map a total onto a level.
pub fn level_for(total: f64) -> ComplexityLevel {
    if total > 10.0 {
        ComplexityLevel::VeryComplex
    } else if total > 7.0 {
        ComplexityLevel::Complex
    } else if total > 4.0 {
        ComplexityLevel::Moderate
    } else {
        ComplexityLevel::Simple
    }
}

/// Weighted total for a task, before level mapping
#[allow(clippy::cast_precision_loss)]
pub fn total(task: &Task) -> f64 {
    task.dependencies.len() as f64 * DEPENDENCY_WEIGHT
        + task.subtasks.len() as f64 * SUBTASK_WEIGHT
        + f64::from(task.priority.weight()) * PRIORITY_WEIGHT
        + description_factor(&task.description) as f64 * DESCRIPTION_WEIGHT
}

/// Score a task. Deterministic, no side effects.
pub fn score(task: &Task) -> ComplexityScore {
    let total = total(task);
    ComplexityScore {
        level: level_for(total),
        score: total,
        factors: factors(),
        source: ComplexitySource::Computed,
    }
}

/// Recompute the task's complexity unless it carries an override.
///
/// Returns `true` when the stored value changed.
pub fn rescore(task: &mut Task) -> bool {
    if task.has_complexity_override() {
        return false;
    }
    let fresh = score(task);
    if task.complexity.as_ref() == Some(&fresh) {
        return false;
    }
    task.complexity = Some(fresh);
    true
}
