//! devtasks CLI - task tracking for AI-assisted development.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::disallowed_macros)]
#![allow(clippy::uninlined_format_args)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use devtasks::ai::ProviderRegistry;
use devtasks::domain::{
    AIDomain, ConfigDomain, StatusTarget, SubtaskDraft, TaskDraft, TaskStore, TaskUpdate,
};
use devtasks::entities::{
    ComplexityLevel, ComplexityScore, ModelSettings, TaskPriority, TaskStatus, TasksConfig,
};
use devtasks::errors::{ErrorKind, TasksError, TasksResult};
use devtasks::storage::FileStorage;
use devtasks::ui;

#[derive(Parser)]
#[command(name = "devtasks")]
#[command(about = "Task tracking for AI-assisted development", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root directory
    #[arg(long, global = true)]
    project: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the .tasks directory
    Init {
        /// Project name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List tasks grouped by status
    List {
        /// Filter by status
        #[arg(short, long)]
        status: Option<String>,

        /// Include subtasks
        #[arg(long)]
        with_subtasks: bool,
    },

    /// Show details of a specific task
    Show {
        /// Task ID(s), comma-separated
        id: String,
    },

    /// Show the next task to work on
    Next,

    /// Add a new task
    Add {
        /// Task title
        #[arg(short, long)]
        title: String,

        /// Task description
        #[arg(short, long)]
        description: Option<String>,

        /// Dependencies (comma-separated)
        #[arg(long)]
        deps: Option<String>,

        /// Priority (low, medium, high)
        #[arg(short, long)]
        priority: Option<String>,

        /// Implementation details
        #[arg(long)]
        details: Option<String>,

        /// Test strategy
        #[arg(long)]
        test_strategy: Option<String>,
    },

    /// Update fields of a task
    Update {
        /// Task ID
        #[arg(short, long)]
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Priority (low, medium, high)
        #[arg(short, long)]
        priority: Option<String>,

        /// Replace dependencies (comma-separated, empty to clear)
        #[arg(long)]
        deps: Option<String>,

        #[arg(long)]
        details: Option<String>,

        #[arg(long)]
        test_strategy: Option<String>,

        /// Keep the current complexity instead of recomputing it
        #[arg(long)]
        keep_complexity: bool,
    },

    /// Set task or subtask status
    SetStatus {
        /// Task ID(s), comma-separated; `3.2` addresses subtask 2 of task 3
        #[arg(short, long)]
        id: String,

        /// New status
        #[arg(short, long)]
        status: String,
    },

    /// Override a task's complexity
    SetComplexity {
        /// Task ID
        #[arg(short, long)]
        id: String,

        /// Level (simple, moderate, complex, veryComplex)
        #[arg(short, long)]
        level: String,

        /// Numeric score
        #[arg(short, long)]
        score: f64,
    },

    /// Add a subtask to a task
    AddSubtask {
        /// Parent task ID
        #[arg(short, long)]
        id: String,

        /// Subtask title
        #[arg(short, long)]
        title: String,

        /// Subtask description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Recompute complexity for every task without an override
    Rescore,

    /// Show blocked tasks and dependency problems
    Deps,

    /// Configure the assistant model
    Models {
        /// Set model (`provider:model_id`)
        #[arg(long)]
        set: Option<String>,
    },

    // =========== Assistant Commands ===========
    /// Parse a PRD file and generate tasks
    ParsePrd {
        /// Path to the PRD file
        file: PathBuf,

        /// Number of tasks to generate (0 = auto)
        #[arg(short, long)]
        num_tasks: Option<u32>,
    },

    /// Expand a task into subtasks
    Expand {
        /// Task ID to expand
        #[arg(short, long)]
        id: String,

        /// Number of subtasks to generate
        #[arg(short, long)]
        num: Option<u32>,

        /// Extra guidance for the assistant
        #[arg(short, long)]
        prompt: Option<String>,
    },

    /// Draft a new task from a description
    AddTask {
        /// What the task should accomplish
        #[arg(short, long)]
        prompt: String,

        /// Priority (low, medium, high)
        #[arg(long)]
        priority: Option<String>,
    },

    /// Ask the assistant to assess a task's complexity
    AssessComplexity {
        /// Task ID
        #[arg(short, long)]
        id: String,
    },
}

fn get_project_path(cli_path: Option<PathBuf>) -> PathBuf {
    cli_path.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let project_path = get_project_path(cli.project);
    let config_domain = ConfigDomain::new(&project_path);
    let config = config_domain.load().await;

    let default_filter = config
        .as_ref()
        .map_or("warn", |c| c.global.log_level.as_str());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match config {
        Ok(config) => run(cli.command, &project_path, &config_domain, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::debug!(kind = ?e.kind(), "Command failed");
        ui::print_error(&e.to_string());
        let code = if e.kind() == ErrorKind::Cancelled { 130 } else { 1 };
        std::process::exit(code);
    }
}

async fn run(
    command: Commands,
    project_path: &Path,
    config_domain: &ConfigDomain,
    config: TasksConfig,
) -> TasksResult<()> {
    let storage = Arc::new(FileStorage::new(project_path, &config.storage));
    let store = Arc::new(
        TaskStore::new(storage).with_default_priority(config.global.default_priority),
    );

    match command {
        Commands::Init { name } => {
            if store.is_initialized().await? {
                ui::print_warning("Project already initialized");
                return Ok(());
            }

            store.init().await?;

            if let Some(project_name) = name {
                config_domain.set_project_name(project_name).await?;
            }

            ui::print_success("Project initialized successfully!");
            ui::print_info(&format!(
                "Tasks directory created at: {}",
                project_path.join(".tasks").display()
            ));
        }

        Commands::List {
            status,
            with_subtasks,
        } => {
            check_initialized(&store).await?;

            let status_filter = status.map(|s| s.parse::<TaskStatus>()).transpose()?;
            let tasks = store.list_tasks(status_filter).await?;

            if tasks.is_empty() {
                ui::print_info("No tasks found");
            } else {
                ui::display_grouped_tasks(&tasks, with_subtasks);
                ui::print_info(&format!("{} task(s) total", tasks.len()));
            }
        }

        Commands::Show { id } => {
            check_initialized(&store).await?;

            for task_id in parse_id_list(&id)? {
                let task = store.get_task(task_id).await?;
                ui::display_task_details(&task);
            }
        }

        Commands::Next => {
            check_initialized(&store).await?;

            match store.next_task().await {
                Ok(task) => {
                    ui::print_success(&format!("Next task: {} - {}", task.id, task.title));
                    println!();
                    ui::display_task_details(&task);
                }
                Err(TasksError::NoCandidate) => {
                    ui::print_info("No ready tasks: everything is done, deferred or blocked");
                }
                Err(e) => return Err(e),
            }
        }

        Commands::Add {
            title,
            description,
            deps,
            priority,
            details,
            test_strategy,
        } => {
            check_initialized(&store).await?;

            let draft = TaskDraft {
                priority: priority.map(|p| p.parse::<TaskPriority>()).transpose()?,
                dependencies: deps.as_deref().map(parse_id_list).transpose()?.unwrap_or_default(),
                details,
                test_strategy,
                ..TaskDraft::new(title, description.unwrap_or_default())
            };
            let task = store.add_task(draft).await?;

            ui::print_success(&format!("Created task {} - {}", task.id, task.title));
        }

        Commands::Update {
            id,
            title,
            description,
            priority,
            deps,
            details,
            test_strategy,
            keep_complexity,
        } => {
            check_initialized(&store).await?;

            let task_id = parse_task_id(&id)?;
            let update = TaskUpdate {
                title,
                description,
                status: None,
                priority: priority.map(|p| p.parse::<TaskPriority>()).transpose()?,
                dependencies: deps.as_deref().map(parse_id_list).transpose()?,
                details,
                test_strategy,
            };

            let current = if keep_complexity {
                store.get_task(task_id).await?.complexity
            } else {
                None
            };
            let task = match current {
                Some(complexity) => {
                    store
                        .update_task_preserving_complexity(task_id, update, complexity)
                        .await?
                }
                None => store.update_task_rescoring(task_id, update).await?,
            };

            ui::print_success(&format!("Updated task {} - {}", task.id, task.title));
        }

        Commands::SetStatus { id, status } => {
            check_initialized(&store).await?;

            let new_status: TaskStatus = status.parse()?;
            let targets = id
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::parse)
                .collect::<TasksResult<Vec<StatusTarget>>>()?;
            if targets.is_empty() {
                return Err(TasksError::InvalidId { id });
            }

            store.set_target_status(&targets, new_status).await?;
            let names: Vec<String> = targets.iter().map(ToString::to_string).collect();
            ui::print_success(&format!(
                "Updated {} to status: {}",
                names.join(", "),
                new_status
            ));
        }

        Commands::SetComplexity { id, level, score } => {
            check_initialized(&store).await?;

            let level: ComplexityLevel = level.parse()?;
            let task = store
                .set_complexity(parse_task_id(&id)?, ComplexityScore::manual(level, score))
                .await?;

            ui::print_success(&format!(
                "Task {} complexity set to {} ({:.1})",
                task.id, level, score
            ));
        }

        Commands::AddSubtask {
            id,
            title,
            description,
        } => {
            check_initialized(&store).await?;

            let draft = SubtaskDraft {
                description,
                ..SubtaskDraft::new(title)
            };
            let created = store
                .add_subtasks_to_task(parse_task_id(&id)?, vec![draft])
                .await?;

            for subtask in created {
                ui::print_success(&format!(
                    "Created subtask {} - {}",
                    subtask.full_id(),
                    subtask.title
                ));
            }
        }

        Commands::Rescore => {
            check_initialized(&store).await?;

            let changed = store.rescore_all().await?;
            ui::print_success(&format!("Rescored tasks: {changed} changed"));
        }

        Commands::Deps => {
            check_initialized(&store).await?;

            let report = store.dependency_report().await?;
            let blocked = store.blocked_tasks().await?;
            ui::display_dependency_report(&report, &blocked);
        }

        Commands::Models { set } => {
            if let Some(model) = set {
                let settings = parse_model_string(&model, &config.model)?;
                config_domain.set_model(settings).await?;
                ui::print_success(&format!("Model set to {model}"));
            } else {
                ui::print_info(&format!(
                    "Model: {}:{} (max tokens {}, temperature {})",
                    config.model.provider,
                    config.model.model_id,
                    config.model.max_tokens,
                    config.model.temperature
                ));
            }
        }

        Commands::ParsePrd { file, num_tasks } => {
            check_initialized(&store).await?;

            let prd_content = tokio::fs::read_to_string(&file)
                .await
                .map_err(|e| TasksError::FileReadError {
                    path: file.display().to_string(),
                    reason: e.to_string(),
                })?;

            let ai_domain = ai_domain(&store, &config)?;
            let num_tasks = num_tasks.unwrap_or(u32::from(config.global.default_num_tasks));

            ui::print_info(&format!("Parsing PRD: {}", file.display()));
            ui::print_info("This may take a moment... (Ctrl-C to cancel)");

            let (tasks, usage) = ai_domain
                .parse_prd(&prd_content, num_tasks, &cancel_on_ctrl_c())
                .await?;

            ui::print_success(&format!("Generated {} tasks from PRD", tasks.len()));
            print_usage(usage.input_tokens, usage.output_tokens);
            let rows: Vec<_> = tasks.iter().collect();
            println!("{}", ui::task_table(&rows, false));
        }

        Commands::Expand { id, num, prompt } => {
            check_initialized(&store).await?;

            let task_id = parse_task_id(&id)?;
            let ai_domain = ai_domain(&store, &config)?;
            let count = num.unwrap_or(u32::from(config.global.default_subtasks));

            ui::print_info(&format!("Expanding task {task_id} into {count} subtasks..."));

            let (subtasks, usage) = ai_domain
                .expand_task(task_id, count, prompt.as_deref(), &cancel_on_ctrl_c())
                .await?;

            ui::print_success(&format!(
                "Added {} subtasks to task {task_id}",
                subtasks.len()
            ));
            print_usage(usage.input_tokens, usage.output_tokens);
            ui::display_task_details(&store.get_task(task_id).await?);
        }

        Commands::AddTask { prompt, priority } => {
            check_initialized(&store).await?;

            let priority = priority.map(|p| p.parse::<TaskPriority>()).transpose()?;
            let ai_domain = ai_domain(&store, &config)?;

            ui::print_info("Drafting task...");

            let (task, usage) = ai_domain
                .add_task(&prompt, priority, &cancel_on_ctrl_c())
                .await?;

            ui::print_success(&format!("Created task {} - {}", task.id, task.title));
            print_usage(usage.input_tokens, usage.output_tokens);
            ui::display_task_details(&task);
        }

        Commands::AssessComplexity { id } => {
            check_initialized(&store).await?;

            let ai_domain = ai_domain(&store, &config)?;
            let (task, usage) = ai_domain
                .assess_complexity(parse_task_id(&id)?, &cancel_on_ctrl_c())
                .await?;

            if let Some(ref complexity) = task.complexity {
                ui::print_success(&format!(
                    "Task {} assessed as {} ({:.1})",
                    task.id, complexity.level, complexity.score
                ));
            }
            print_usage(usage.input_tokens, usage.output_tokens);
        }
    }

    Ok(())
}

async fn check_initialized(store: &TaskStore) -> TasksResult<()> {
    if !store.is_initialized().await? {
        return Err(TasksError::NotInitialized);
    }
    Ok(())
}

fn ai_domain(store: &Arc<TaskStore>, config: &TasksConfig) -> TasksResult<AIDomain> {
    let registry = ProviderRegistry::with_defaults(&config.model);
    let provider = registry.require(&config.model.provider)?;
    Ok(AIDomain::new(Arc::clone(store), provider, config.model.clone()))
}

/// Token cancelled on the first Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    token
}

fn print_usage(input_tokens: u32, output_tokens: u32) {
    ui::print_info(&format!(
        "Tokens used: {input_tokens} in, {output_tokens} out"
    ));
}

fn parse_task_id(s: &str) -> TasksResult<u32> {
    s.trim()
        .parse::<u32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| TasksError::InvalidId { id: s.to_string() })
}

fn parse_id_list(s: &str) -> TasksResult<Vec<u32>> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(parse_task_id)
        .collect()
}

fn parse_model_string(s: &str, current: &ModelSettings) -> TasksResult<ModelSettings> {
    let Some((provider, model_id)) = s.split_once(':') else {
        return Err(TasksError::Validation {
            reason: "Model string must be in format 'provider:model_id'".to_string(),
        });
    };

    Ok(ModelSettings {
        provider: provider.to_string(),
        model_id: model_id.to_string(),
        ..current.clone()
    })
}
