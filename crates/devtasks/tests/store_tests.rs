//! Integration tests for the task store.
//!
//! These run the store against real files in a temporary project and
//! cover readiness, selection, subtask numbering and failure behavior.

use std::sync::Arc;

use async_trait::async_trait;
use devtasks::domain::{scoring, SubtaskDraft, TaskDraft, TaskStore, TaskUpdate};
use devtasks::entities::{ComplexityLevel, ComplexityScore, Task, TaskPriority, TaskStatus};
use devtasks::errors::{ErrorKind, TasksError, TasksResult};
use devtasks::storage::{FileStorage, Storage};
use tempfile::TempDir;

async fn setup() -> (TempDir, TaskStore) {
    let temp_dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::with_defaults(temp_dir.path()));
    storage.initialize().await.unwrap();
    (temp_dir, TaskStore::new(storage))
}

fn description_of(len: usize) -> String {
    "x".repeat(len)
}

mod scoring_tests {
    use super::*;

    #[test]
    fn test_high_priority_task_with_two_deps() {
        let task = Task::new(5, "Wire auth", description_of(60))
            .with_priority(TaskPriority::High)
            .with_dependencies([1, 2]);

        let complexity = scoring::score(&task);
        assert!((complexity.score - 4.3).abs() < 1e-9);
        assert_eq!(complexity.level, ComplexityLevel::Moderate);
    }

    #[test]
    fn test_bare_task_is_priority_plus_description() {
        let task = Task::new(1, "Plain", description_of(120));
        // medium (2) + min(5, 120 / 50 = 2) * 0.3
        assert!((scoring::total(&task) - 2.6).abs() < 1e-9);
    }

    #[test]
    fn test_each_dependency_adds_half_a_point() {
        let base = Task::new(1, "T", "");
        let with_dep = base.clone().with_dependencies([9]);
        assert!((scoring::total(&with_dep) - scoring::total(&base) - 0.5).abs() < 1e-9);
    }
}

mod readiness_tests {
    use super::*;

    #[tokio::test]
    async fn test_done_dependency_unblocks() {
        let (_temp, store) = setup().await;
        let a = store.add_task(TaskDraft::new("A", "")).await.unwrap();
        store
            .add_task(TaskDraft {
                dependencies: vec![a.id],
                ..TaskDraft::new("B", "")
            })
            .await
            .unwrap();
        store.set_status(&[a.id], TaskStatus::Done).await.unwrap();

        let ready: Vec<u32> = store
            .ready_tasks()
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ready, vec![2]);
    }

    #[tokio::test]
    async fn test_missing_dependency_blocks() {
        let (_temp, store) = setup().await;
        store
            .add_task(TaskDraft {
                dependencies: vec![99],
                ..TaskDraft::new("A", "")
            })
            .await
            .unwrap();

        assert!(store.ready_tasks().await.unwrap().is_empty());

        let blocked = store.blocked_tasks().await.unwrap();
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].waiting_on, vec![99]);

        let report = store.dependency_report().await.unwrap();
        assert_eq!(report.missing, vec![(1, 99)]);
    }

    #[tokio::test]
    async fn test_closed_tasks_are_never_ready() {
        let (_temp, store) = setup().await;
        store.add_task(TaskDraft::new("A", "")).await.unwrap();
        store.add_task(TaskDraft::new("B", "")).await.unwrap();
        store.set_status(&[1], TaskStatus::Done).await.unwrap();
        store.set_status(&[2], TaskStatus::Deferred).await.unwrap();

        assert!(store.ready_tasks().await.unwrap().is_empty());
        assert!(matches!(
            store.next_task().await,
            Err(TasksError::NoCandidate)
        ));
    }

    #[tokio::test]
    async fn test_cycle_is_reported_not_rejected() {
        let (_temp, store) = setup().await;
        store
            .add_task(TaskDraft {
                dependencies: vec![2],
                ..TaskDraft::new("A", "")
            })
            .await
            .unwrap();
        store
            .add_task(TaskDraft {
                dependencies: vec![1],
                ..TaskDraft::new("B", "")
            })
            .await
            .unwrap();

        assert!(store.ready_tasks().await.unwrap().is_empty());
        let report = store.dependency_report().await.unwrap();
        assert_eq!(report.cycles.len(), 1);
    }
}

mod selection_tests {
    use super::*;

    #[tokio::test]
    async fn test_in_progress_wins_over_lower_score() {
        let (_temp, store) = setup().await;
        store
            .add_task(TaskDraft {
                priority: Some(TaskPriority::Low),
                ..TaskDraft::new("X", "")
            })
            .await
            .unwrap();
        store
            .add_task(TaskDraft {
                priority: Some(TaskPriority::Low),
                status: Some(TaskStatus::InProgress),
                ..TaskDraft::new("Y", "")
            })
            .await
            .unwrap();
        store
            .set_complexity(1, ComplexityScore::manual(ComplexityLevel::Simple, 2.0))
            .await
            .unwrap();
        store
            .set_complexity(2, ComplexityScore::manual(ComplexityLevel::Moderate, 5.0))
            .await
            .unwrap();

        assert_eq!(store.next_task().await.unwrap().title, "Y");
    }

    #[tokio::test]
    async fn test_ready_tasks_are_ranked() {
        let (_temp, store) = setup().await;
        for (title, priority) in [
            ("low", TaskPriority::Low),
            ("high", TaskPriority::High),
            ("medium", TaskPriority::Medium),
        ] {
            store
                .add_task(TaskDraft {
                    priority: Some(priority),
                    ..TaskDraft::new(title, "")
                })
                .await
                .unwrap();
        }

        let titles: Vec<String> = store
            .ready_tasks()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["high", "medium", "low"]);
    }
}

mod subtask_tests {
    use super::*;

    #[tokio::test]
    async fn test_new_subtasks_continue_numbering() {
        let (_temp, store) = setup().await;
        store
            .add_task(TaskDraft {
                subtasks: vec![SubtaskDraft::new("one"), SubtaskDraft::new("two")],
                ..TaskDraft::new("Parent", "")
            })
            .await
            .unwrap();

        let created = store
            .add_subtasks_to_task(1, vec![SubtaskDraft::new("three"), SubtaskDraft::new("four")])
            .await
            .unwrap();
        assert_eq!(created.iter().map(|s| s.id).collect::<Vec<_>>(), vec![3, 4]);

        let more = store
            .add_subtasks_to_task(1, vec![SubtaskDraft::new("five")])
            .await
            .unwrap();
        assert_eq!(more[0].id, 5);

        let task = store.get_task(1).await.unwrap();
        assert_eq!(task.subtasks.len(), 5);
        assert!(task.subtasks.iter().all(|s| s.parent_id == 1));
        // five subtasks * 0.7 + medium priority
        assert!((task.complexity.unwrap().score - 5.5).abs() < 1e-9);
    }
}

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_update_missing_id_leaves_file_unchanged() {
        let (temp, store) = setup().await;
        store.add_task(TaskDraft::new("Only", "")).await.unwrap();
        let path = temp.path().join(".tasks/tasks.json");
        let before = std::fs::read(&path).unwrap();

        let result = store
            .update_task_rescoring(
                42,
                TaskUpdate {
                    title: Some("Renamed".to_string()),
                    ..TaskUpdate::default()
                },
            )
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_uninitialized_project_is_persistence_failure() {
        let temp_dir = TempDir::new().unwrap();
        let store = TaskStore::new(Arc::new(FileStorage::with_defaults(temp_dir.path())));

        let err = store.list_tasks(None).await.unwrap_err();
        assert!(matches!(err, TasksError::NotInitialized));
        assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
    }

    /// Storage that reads from a file backend but refuses every write.
    struct ReadOnlyStorage {
        inner: FileStorage,
    }

    #[async_trait]
    impl Storage for ReadOnlyStorage {
        async fn initialize(&self) -> TasksResult<()> {
            self.inner.initialize().await
        }

        fn storage_type(&self) -> &'static str {
            "read-only"
        }

        async fn is_initialized(&self) -> TasksResult<bool> {
            self.inner.is_initialized().await
        }

        async fn load_tasks(&self) -> TasksResult<Vec<Task>> {
            self.inner.load_tasks().await
        }

        async fn save_tasks(&self, _tasks: &[Task]) -> TasksResult<()> {
            Err(TasksError::FileWriteError {
                path: "tasks.json".to_string(),
                reason: "read-only file system".to_string(),
            })
        }

        async fn save_task_file(&self, _task: &Task) -> TasksResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_write_failure_surfaces_and_keeps_state() {
        let temp_dir = TempDir::new().unwrap();
        let writable = TaskStore::new(Arc::new(FileStorage::with_defaults(temp_dir.path())));
        writable.init().await.unwrap();
        writable.add_task(TaskDraft::new("Existing", "")).await.unwrap();

        let store = TaskStore::new(Arc::new(ReadOnlyStorage {
            inner: FileStorage::with_defaults(temp_dir.path()),
        }));
        let err = store
            .set_status(&[1], TaskStatus::Done)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
        assert_eq!(
            writable.get_task(1).await.unwrap().status,
            TaskStatus::Pending
        );
    }
}
