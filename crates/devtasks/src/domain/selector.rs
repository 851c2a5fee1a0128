//! Next-task selection.

use std::cmp::Ordering;

use crate::entities::Task;

/// Recommendation order between two ready tasks; `Less` is picked first.
///
/// Keys, in turn: in-progress before pending, higher priority, lower
/// complexity score (only when both tasks have one), lower id.
pub fn compare(a: &Task, b: &Task) -> Ordering {
    a.status
        .rank()
        .cmp(&b.status.rank())
        .then_with(|| b.priority.weight().cmp(&a.priority.weight()))
        .then_with(|| match (&a.complexity, &b.complexity) {
            (Some(ca), Some(cb)) => ca.score.total_cmp(&cb.score),
            _ => Ordering::Equal,
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// Pick the recommended task, or `None` if nothing is ready.
///
/// `compare` is not transitive once unscored tasks are mixed in, so
/// candidates are walked in id order to make the pick independent of the
/// order they were passed in.
pub fn select_next<'a>(ready: &[&'a Task]) -> Option<&'a Task> {
    by_id(ready).into_iter().min_by(|a, b| compare(a, b))
}

/// Ready tasks in recommendation order.
///
/// Repeatedly takes the next pick instead of handing `compare` to `sort_by`.
pub fn rank<'a>(ready: &[&'a Task]) -> Vec<&'a Task> {
    let mut remaining = by_id(ready);
    let mut ranked = Vec::with_capacity(remaining.len());
    while !remaining.is_empty() {
        let pos = (0..remaining.len())
            .min_by(|&i, &j| compare(remaining[i], remaining[j]))
            .unwrap_or(0);
        ranked.push(remaining.remove(pos));
    }
    ranked
}

fn by_id<'a>(ready: &[&'a Task]) -> Vec<&'a Task> {
    let mut sorted = ready.to_vec();
    sorted.sort_by_key(|t| t.id);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ComplexityLevel, ComplexityScore, TaskPriority, TaskStatus};

    fn scored(task: Task, score: f64) -> Task {
        Task {
            complexity: Some(ComplexityScore::manual(ComplexityLevel::Simple, score)),
            ..task
        }
    }

    #[test]
    fn test_empty_has_no_candidate() {
        assert!(select_next(&[]).is_none());
    }

    #[test]
    fn test_in_progress_beats_priority_and_score() {
        let x = scored(
            Task::new(1, "X", "").with_priority(TaskPriority::High),
            2.0,
        );
        let y = scored(
            Task::new(2, "Y", "")
                .with_priority(TaskPriority::Low)
                .with_status(TaskStatus::InProgress),
            5.0,
        );
        assert_eq!(select_next(&[&x, &y]).unwrap().id, 2);
        assert_eq!(select_next(&[&y, &x]).unwrap().id, 2);
    }

    #[test]
    fn test_priority_descending() {
        let low = Task::new(1, "Low", "").with_priority(TaskPriority::Low);
        let high = Task::new(2, "High", "").with_priority(TaskPriority::High);
        let medium = Task::new(3, "Medium", "");
        let ranked: Vec<u32> = rank(&[&low, &high, &medium]).iter().map(|t| t.id).collect();
        assert_eq!(ranked, vec![2, 3, 1]);
    }

    #[test]
    fn test_lower_score_wins_when_both_scored() {
        let hard = scored(Task::new(1, "Hard", ""), 9.0);
        let easy = scored(Task::new(2, "Easy", ""), 3.0);
        assert_eq!(select_next(&[&hard, &easy]).unwrap().id, 2);
    }

    #[test]
    fn test_score_skipped_when_one_side_unscored() {
        let unscored = Task::new(1, "Unscored", "");
        let easy = scored(Task::new(2, "Easy", ""), 0.5);
        assert_eq!(compare(&unscored, &easy), Ordering::Less);
        assert_eq!(select_next(&[&easy, &unscored]).unwrap().id, 1);
    }

    #[test]
    fn test_pick_ignores_input_order_with_mixed_scores() {
        let unscored = Task::new(2, "Unscored", "");
        let hard = scored(Task::new(1, "Hard", ""), 5.0);
        let easy = scored(Task::new(3, "Easy", ""), 1.0);

        for order in [
            [&unscored, &hard, &easy],
            [&hard, &easy, &unscored],
            [&easy, &unscored, &hard],
        ] {
            assert_eq!(select_next(&order).unwrap().id, 3);
            assert_eq!(rank(&order)[0].id, 3);
        }
    }

    #[test]
    fn test_id_breaks_ties() {
        let a = Task::new(8, "A", "");
        let b = Task::new(3, "B", "");
        assert_eq!(select_next(&[&a, &b]).unwrap().id, 3);
    }
}
