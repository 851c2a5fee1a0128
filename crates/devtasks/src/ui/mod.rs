//! Terminal UI helpers for task display.
//!
//! This module uses println! for CLI output, which is appropriate
//! for terminal user interfaces.

#![allow(clippy::disallowed_macros)]

use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use crate::domain::{BlockedTask, DependencyReport};
use crate::entities::{ComplexityScore, Task, TaskPriority, TaskStatus};

/// Get colored status string
pub fn status_colored(status: TaskStatus) -> String {
    match status {
        TaskStatus::Pending => "pending".yellow().to_string(),
        TaskStatus::InProgress => "in-progress".cyan().to_string(),
        TaskStatus::Done => "done".green().to_string(),
        TaskStatus::Deferred => "deferred".blue().to_string(),
    }
}

/// Get colored priority string
pub fn priority_colored(priority: TaskPriority) -> String {
    match priority {
        TaskPriority::Low => "low".dimmed().to_string(),
        TaskPriority::Medium => "medium".normal().to_string(),
        TaskPriority::High => "high".yellow().to_string(),
    }
}

const fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Pending => Color::Yellow,
        TaskStatus::InProgress => Color::Cyan,
        TaskStatus::Done => Color::Green,
        TaskStatus::Deferred => Color::Blue,
    }
}

const fn priority_color(priority: TaskPriority) -> Color {
    match priority {
        TaskPriority::Low => Color::DarkGrey,
        TaskPriority::Medium => Color::White,
        TaskPriority::High => Color::Yellow,
    }
}

fn join_ids(ids: &[u32]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter().map(u32::to_string).collect::<Vec<_>>().join(", ")
}

fn complexity_cell(complexity: Option<&ComplexityScore>) -> String {
    complexity.map_or_else(
        || "-".to_string(),
        |c| format!("{} ({:.1})", c.level, c.score),
    )
}

/// Create a table for displaying tasks
pub fn task_table(tasks: &[&Task], show_subtasks: bool) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Priority").fg(Color::Cyan),
        Cell::new("Deps").fg(Color::Cyan),
        Cell::new("Complexity").fg(Color::Cyan),
    ]);

    for task in tasks {
        table.add_row(vec![
            Cell::new(task.id),
            Cell::new(&task.title),
            Cell::new(task.status.to_string()).fg(status_color(task.status)),
            Cell::new(task.priority.to_string()).fg(priority_color(task.priority)),
            Cell::new(join_ids(&task.dependencies)),
            Cell::new(complexity_cell(task.complexity.as_ref())),
        ]);

        if show_subtasks {
            for subtask in &task.subtasks {
                table.add_row(vec![
                    Cell::new(format!("  {}", subtask.full_id())).fg(Color::DarkGrey),
                    Cell::new(format!("  └─ {}", subtask.title)).fg(Color::DarkGrey),
                    Cell::new(subtask.status.to_string()).fg(status_color(subtask.status)),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                ]);
            }
        }
    }

    table
}

/// Print tasks grouped by status: in-progress, pending, deferred, done
pub fn display_grouped_tasks(tasks: &[Task], show_subtasks: bool) {
    for status in TaskStatus::ALL {
        let group: Vec<&Task> = tasks.iter().filter(|t| t.status == status).collect();
        if group.is_empty() {
            continue;
        }
        println!("{} ({})", status_colored(status).bold(), group.len());
        println!("{}", task_table(&group, show_subtasks));
        println!();
    }
}

/// Display task details in a formatted way
pub fn display_task_details(task: &Task) {
    println!("{}", "═".repeat(60).dimmed());
    println!(
        "{} {} {}",
        "Task".cyan().bold(),
        task.id.to_string().cyan().bold(),
        format!("[{}]", task.status).yellow()
    );
    println!("{}", "═".repeat(60).dimmed());
    println!();

    println!("{}: {}", "Title".bold(), task.title);
    println!("{}: {}", "Status".bold(), status_colored(task.status));
    println!("{}: {}", "Priority".bold(), priority_colored(task.priority));

    if !task.dependencies.is_empty() {
        println!("{}: {}", "Dependencies".bold(), join_ids(&task.dependencies));
    }

    if !task.description.is_empty() {
        println!();
        println!("{}", "Description".bold().underline());
        println!("{}", task.description);
    }

    if let Some(details) = task.details.as_deref().filter(|d| !d.is_empty()) {
        println!();
        println!("{}", "Details".bold().underline());
        println!("{details}");
    }

    if let Some(strategy) = task.test_strategy.as_deref().filter(|s| !s.is_empty()) {
        println!();
        println!("{}", "Test Strategy".bold().underline());
        println!("{strategy}");
    }

    if !task.subtasks.is_empty() {
        println!();
        println!(
            "{} ({}/{} done)",
            "Subtasks".bold().underline(),
            task.subtasks_in(TaskStatus::Done),
            task.subtasks.len()
        );
        for subtask in &task.subtasks {
            println!(
                "  {} {} - {} [{}]",
                "•".dimmed(),
                subtask.full_id(),
                subtask.title,
                status_colored(subtask.status)
            );
        }
    }

    if let Some(ref complexity) = task.complexity {
        println!();
        println!("{}", "Complexity".bold().underline());
        println!("  Level: {}", complexity.level);
        println!("  Score: {:.2}", complexity.score);
        if complexity.is_override() {
            println!("  Source: {}", complexity.source);
        }
        for factor in &complexity.factors {
            println!(
                "  {} {} (x{}) {}",
                "•".dimmed(),
                factor.name,
                factor.weight,
                factor.description.dimmed()
            );
        }
    }

    println!();
}

/// Display blocked tasks and dependency problems
pub fn display_dependency_report(report: &DependencyReport, blocked: &[BlockedTask]) {
    if blocked.is_empty() {
        print_info("No blocked tasks");
    } else {
        println!("{}", "Blocked".bold().underline());
        for entry in blocked {
            println!(
                "  {} {} waiting on {}",
                "•".dimmed(),
                entry.task_id,
                join_ids(&entry.waiting_on)
            );
        }
        println!();
    }

    if report.is_clean() {
        print_success("Dependency graph is valid");
        return;
    }

    for (task_id, dep_id) in &report.missing {
        print_warning(&format!("Task {task_id} depends on missing task {dep_id}"));
    }
    for task_id in &report.self_references {
        print_warning(&format!("Task {task_id} depends on itself"));
    }
    for cycle in &report.cycles {
        let path = cycle
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        print_warning(&format!("Dependency cycle: {path}"));
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&[]), "-");
        assert_eq!(join_ids(&[1, 4]), "1, 4");
    }

    #[test]
    fn test_table_lists_subtasks() {
        let mut task = Task::new(2, "Parent", "");
        task.subtasks.push(crate::entities::Subtask::new(1, 2, "Child"));

        let rendered = task_table(&[&task], true).to_string();
        assert!(rendered.contains("2.1"));
        assert!(rendered.contains("Child"));
    }
}
