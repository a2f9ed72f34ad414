use colored::Colorize;
use kanri_core::task::Task;

use crate::utils::command_error;

/// Resolve a user-supplied task reference (a full id, or a unique id prefix)
/// against the loaded board.
pub fn resolve<'a>(tasks: &'a [Task], reference: &str) -> command_error::Result<&'a Task> {
    if let Some(exact) = tasks.iter().find(|task| task.id == reference) {
        return Ok(exact);
    }

    let mut matches: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.id.starts_with(reference))
        .collect();

    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(eyre::eyre!(
            "no task matches '{reference}', run `kanri board` to list ids"
        ))?,
        _ => {
            let mut message = format!(
                "{} the reference '{}' is ambiguous and matches multiple tasks:\n",
                "✗".red().bold(),
                reference.yellow()
            );

            for task in matches {
                message.push_str(&format!(
                    "  - {} | {} | '{}'\n",
                    task.id.bold(),
                    task.status,
                    task.text.cyan()
                ));
            }

            message.push_str("\nUse a longer prefix to select a single task.");
            Err(eyre::eyre!(message))?
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanri_core::task::{SyncState, TaskStatus};

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            text: format!("task {id}"),
            status: TaskStatus::Todo,
            owner: "acc-1".to_string(),
            order: 1,
            sync: SyncState::Confirmed,
        }
    }

    #[test]
    fn test_resolve_exact_id() {
        let tasks = vec![task("abc123"), task("abd999")];
        assert_eq!(resolve(&tasks, "abc123").ok().map(|t| t.id.clone()), Some("abc123".to_string()));
    }

    #[test]
    fn test_resolve_unique_prefix() {
        let tasks = vec![task("abc123"), task("xyz789")];
        assert_eq!(resolve(&tasks, "ab").ok().map(|t| t.id.clone()), Some("abc123".to_string()));
    }

    #[test]
    fn test_resolve_exact_id_wins_over_prefix() {
        // "ab" is itself an id and also a prefix of "abc123".
        let tasks = vec![task("ab"), task("abc123")];
        assert_eq!(resolve(&tasks, "ab").ok().map(|t| t.id.clone()), Some("ab".to_string()));
    }

    #[test]
    fn test_resolve_ambiguous_prefix_fails() {
        let tasks = vec![task("abc123"), task("abd999")];
        assert!(resolve(&tasks, "ab").is_err());
    }

    #[test]
    fn test_resolve_unknown_reference_fails() {
        let tasks = vec![task("abc123")];
        assert!(resolve(&tasks, "zzz").is_err());
    }
}
