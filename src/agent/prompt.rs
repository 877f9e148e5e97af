//! Prompt templates for the agent.

use serde_json::{Map, Value};

/// Build the system prompt describing the agent's role.
pub fn build_system_prompt(name: &str, description: &str) -> String {
    format!(
        r#"You are {name}, {description}.

You are a specialized task agent. Your job is to use your available tools to complete specific tasks efficiently and accurately.

When given a task:
1. Analyze what tools you need to complete it
2. Use the appropriate tools in the correct order
3. Return clear, structured results
4. If you cannot complete a task, explain why clearly

Be concise, accurate, and focus on getting the job done."#
    )
}

/// Build the user prompt, folding optional context into the task text.
pub fn build_task_prompt(task: &str, context: Option<&Map<String, Value>>) -> String {
    match context {
        Some(ctx) if !ctx.is_empty() => {
            format!("Task: {}\nContext: {}", task, Value::Object(ctx.clone()))
        }
        _ => task.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn system_prompt_names_the_agent() {
        let prompt = build_system_prompt("TaskAgent", "a helpful agent");
        assert!(prompt.starts_with("You are TaskAgent, a helpful agent."));
    }

    #[test]
    fn task_prompt_without_context_is_the_task() {
        assert_eq!(build_task_prompt("What is 2 + 2?", None), "What is 2 + 2?");

        let empty = Map::new();
        assert_eq!(
            build_task_prompt("What is 2 + 2?", Some(&empty)),
            "What is 2 + 2?"
        );
    }

    #[test]
    fn task_prompt_folds_context_in() {
        let mut ctx = Map::new();
        ctx.insert("session_id".to_string(), json!("abc-123"));

        let prompt = build_task_prompt("Count words", Some(&ctx));
        assert!(prompt.starts_with("Task: Count words\nContext: "));
        assert!(prompt.contains("abc-123"));
    }
}
