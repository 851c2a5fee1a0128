//! AI Domain - assistant-driven task operations.
//!
//! This module provides:
//! - Parse a PRD into tasks
//! - Expand a task into subtasks
//! - Draft a single task from a description
//! - Assess a task's complexity
//!
//! Every operation renders a prompt, waits for the provider (or for the
//! cancellation token), validates the response and only then writes
//! through the [`TaskStore`].

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::store::TaskStore;
use crate::ai::prompts::{
    self, AddTaskContext, AssessComplexityContext, ExpandTaskContext, ParsePrdContext,
};
use crate::ai::{
    parse_ai_response, AIMessage, AIProvider, AIResponse, ComplexityAssessment, GenerateOptions,
    GeneratedTask, PromptManager, SubtaskListResponse, TaskListResponse, TokenUsage,
};
use crate::entities::{ModelSettings, Subtask, Task, TaskPriority};
use crate::errors::{TasksError, TasksResult};

/// AI Domain for assistant-driven task operations.
pub struct AIDomain {
    store: Arc<TaskStore>,
    provider: Arc<dyn AIProvider>,
    settings: ModelSettings,
    prompts: PromptManager,
}

impl AIDomain {
    /// Create a new AI domain.
    pub fn new(store: Arc<TaskStore>, provider: Arc<dyn AIProvider>, settings: ModelSettings) -> Self {
        Self {
            store,
            provider,
            settings,
            prompts: PromptManager::default(),
        }
    }

    /// Render a template, call the provider and race it against `cancel`.
    async fn generate<C: Serialize>(
        &self,
        template_id: &str,
        context: &C,
        cancel: &CancellationToken,
    ) -> TasksResult<AIResponse> {
        let (system, user) = self.prompts.render(template_id, context)?;
        let messages = vec![AIMessage::system(system), AIMessage::user(user)];
        let options = GenerateOptions {
            temperature: Some(self.settings.temperature),
            max_tokens: Some(self.settings.max_tokens),
            stop_sequences: None,
        };

        debug!(
            template = template_id,
            provider = self.provider.name(),
            model = %self.settings.model_id,
            "Calling assistant"
        );

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                warn!(template = template_id, "Assistant call cancelled");
                return Err(TasksError::Cancelled);
            }
            response = self.provider.generate_text(&self.settings.model_id, &messages, &options) => response?,
        };

        debug!(
            template = template_id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Assistant responded"
        );
        Ok(response)
    }

    /// Parse a PRD and append the generated tasks.
    pub async fn parse_prd(
        &self,
        prd_content: &str,
        num_tasks: u32,
        cancel: &CancellationToken,
    ) -> TasksResult<(Vec<Task>, TokenUsage)> {
        let existing = self.store.list_tasks(None).await?;
        let next_id = existing.iter().map(|t| t.id).max().unwrap_or(0) + 1;

        let context = ParsePrdContext {
            num_tasks,
            next_id,
            prd_content: prd_content.to_string(),
            ..ParsePrdContext::default()
        };

        let response = self.generate(prompts::PARSE_PRD, &context, cancel).await?;
        let drafts = parse_ai_response::<TaskListResponse>(&response)?.into_drafts()?;
        ensure_not_cancelled(cancel)?;

        let created = self.store.append_tasks(drafts).await?;
        info!(count = created.len(), "Tasks generated from PRD");
        Ok((created, response.usage))
    }

    /// Expand a task into subtasks and append them to it.
    pub async fn expand_task(
        &self,
        task_id: u32,
        subtask_count: u32,
        additional_context: Option<&str>,
        cancel: &CancellationToken,
    ) -> TasksResult<(Vec<Subtask>, TokenUsage)> {
        let task = self.store.get_task(task_id).await?;

        let context = ExpandTaskContext {
            subtask_count,
            task: (&task).into(),
            additional_context: additional_context.unwrap_or_default().to_string(),
        };

        let response = self.generate(prompts::EXPAND_TASK, &context, cancel).await?;
        let drafts = parse_ai_response::<SubtaskListResponse>(&response)?.into_drafts()?;
        ensure_not_cancelled(cancel)?;

        let created = self.store.add_subtasks_to_task(task_id, drafts).await?;
        info!(task_id, count = created.len(), "Task expanded");
        Ok((created, response.usage))
    }

    /// Draft a task from a description and add it.
    ///
    /// An explicit `priority` wins over the one the assistant picked.
    pub async fn add_task(
        &self,
        prompt: &str,
        priority: Option<TaskPriority>,
        cancel: &CancellationToken,
    ) -> TasksResult<(Task, TokenUsage)> {
        let existing: Vec<serde_json::Value> = self
            .store
            .list_tasks(None)
            .await?
            .iter()
            .map(|t| serde_json::json!({ "id": t.id, "title": t.title }))
            .collect();

        let context = AddTaskContext {
            prompt: prompt.to_string(),
            existing_tasks: serde_json::Value::Array(existing),
            priority: priority.map(|p| p.to_string()),
        };

        let response = self.generate(prompts::ADD_TASK, &context, cancel).await?;
        let generated: GeneratedTask = parse_ai_response(&response)?;
        if generated.title.trim().is_empty() {
            return Err(TasksError::AiResponseParseError {
                reason: "generated task has an empty title".to_string(),
            });
        }
        ensure_not_cancelled(cancel)?;

        let mut draft = generated.into_draft();
        draft.source_id = None;
        if priority.is_some() {
            draft.priority = priority;
        }

        let task = self.store.add_task(draft).await?;
        info!(task_id = task.id, "Task drafted by assistant");
        Ok((task, response.usage))
    }

    /// Ask the assistant for a complexity score and install it as an override.
    pub async fn assess_complexity(
        &self,
        task_id: u32,
        cancel: &CancellationToken,
    ) -> TasksResult<(Task, TokenUsage)> {
        let task = self.store.get_task(task_id).await?;
        let context = AssessComplexityContext {
            task: serde_json::to_value(&task)?,
        };

        let response = self
            .generate(prompts::ASSESS_COMPLEXITY, &context, cancel)
            .await?;
        let score = parse_ai_response::<ComplexityAssessment>(&response)?.into_score()?;
        ensure_not_cancelled(cancel)?;

        let task = self.store.set_complexity(task_id, score).await?;
        info!(task_id, "Complexity assessed");
        Ok((task, response.usage))
    }
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> TasksResult<()> {
    if cancel.is_cancelled() {
        return Err(TasksError::Cancelled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;
    use crate::entities::{ComplexityLevel, ComplexitySource};
    use crate::storage::{FileStorage, Storage};
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Provider that answers every call with the same text, or never answers.
    struct ScriptedProvider {
        reply: Option<String>,
    }

    #[async_trait]
    impl AIProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn api_key_env_var(&self) -> &'static str {
            "SCRIPTED_API_KEY"
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn generate_text(
            &self,
            model: &str,
            _messages: &[AIMessage],
            _options: &GenerateOptions,
        ) -> TasksResult<AIResponse> {
            let Some(text) = self.reply.clone() else {
                return std::future::pending().await;
            };
            Ok(AIResponse {
                text,
                usage: TokenUsage {
                    input_tokens: 3,
                    output_tokens: 4,
                    total_tokens: 7,
                },
                model: model.to_string(),
                provider: "scripted".to_string(),
            })
        }
    }

    async fn setup(reply: Option<&str>) -> (TempDir, Arc<TaskStore>, AIDomain) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(FileStorage::with_defaults(temp_dir.path()));
        storage.initialize().await.unwrap();
        let store = Arc::new(TaskStore::new(storage));
        let provider = Arc::new(ScriptedProvider {
            reply: reply.map(str::to_string),
        });
        let domain = AIDomain::new(Arc::clone(&store), provider, ModelSettings::default());
        (temp_dir, store, domain)
    }

    #[tokio::test]
    async fn test_parse_prd_appends_and_renumbers() {
        let reply = "Plan:\n```json\n[\n  {\"id\": 1, \"title\": \"Scaffold\", \"priority\": \"high\"},\n  {\"id\": 2, \"title\": \"Persist\", \"dependencies\": [1]}\n]\n```";
        let (_temp, store, domain) = setup(Some(reply)).await;
        store.add_task(TaskDraft::new("Existing", "")).await.unwrap();

        let (created, usage) = domain
            .parse_prd("# PRD", 2, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(usage.total_tokens, 7);
        assert_eq!(created.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(created[1].dependencies, vec![2]);
        assert!(created.iter().all(|t| t.complexity.is_some()));
        assert_eq!(store.list_tasks(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_response_leaves_store_untouched() {
        let (_temp, store, domain) = setup(Some("I could not do that.")).await;
        store.add_task(TaskDraft::new("Existing", "")).await.unwrap();

        let err = domain
            .expand_task(1, 3, None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), crate::errors::ErrorKind::ValidationFailure);
        assert!(store.get_task(1).await.unwrap().subtasks.is_empty());
    }

    #[tokio::test]
    async fn test_expand_task_appends_subtasks() {
        let reply = "```json\n{\"subtasks\": [{\"title\": \"One\"}, {\"title\": \"Two\"}]}\n```";
        let (_temp, store, domain) = setup(Some(reply)).await;
        store.add_task(TaskDraft::new("Parent", "")).await.unwrap();

        let (created, _) = domain
            .expand_task(1, 2, Some("keep it small"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(created.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2]);
        assert!(created.iter().all(|s| s.parent_id == 1));
    }

    #[tokio::test]
    async fn test_cancellation_aborts_without_mutation() {
        let (_temp, store, domain) = setup(None).await;
        store.add_task(TaskDraft::new("Parent", "")).await.unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = domain.expand_task(1, 3, None, &cancel).await;
        assert!(matches!(result, Err(TasksError::Cancelled)));
        assert!(store.get_task(1).await.unwrap().subtasks.is_empty());
    }

    #[tokio::test]
    async fn test_add_task_explicit_priority_wins() {
        let reply = "{\"title\": \"Rate limiting\", \"priority\": \"low\", \"id\": 40}";
        let (_temp, _store, domain) = setup(Some(reply)).await;

        let (task, _) = domain
            .add_task("limit requests", Some(TaskPriority::High), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(task.id, 1);
        assert_eq!(task.priority, TaskPriority::High);
    }

    #[tokio::test]
    async fn test_assess_complexity_installs_override() {
        let reply = "```json\n{\"complexity\": {\"level\": \"veryComplex\", \"score\": 12.5}}\n```";
        let (_temp, store, domain) = setup(Some(reply)).await;
        store.add_task(TaskDraft::new("Big", "")).await.unwrap();

        let (task, _) = domain
            .assess_complexity(1, &CancellationToken::new())
            .await
            .unwrap();

        let complexity = task.complexity.unwrap();
        assert_eq!(complexity.level, ComplexityLevel::VeryComplex);
        assert_eq!(complexity.source, ComplexitySource::Assistant);
        assert_eq!(store.rescore_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_task_fails_before_calling_assistant() {
        let (_temp, _store, domain) = setup(None).await;
        let result = domain
            .assess_complexity(9, &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(TasksError::TaskNotFound { task_id: 9 })));
    }
}
