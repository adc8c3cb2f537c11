//! `reqforge invoke` command.

use std::io::Write;

use super::write_err;
use crate::config::ConfigOptions;
use crate::context::ServiceContext;
use crate::ports::chat::ChatMessage;
use crate::provider::ModelHandler;

/// Sends each prompt as a user message and prints the reply.
///
/// # Errors
///
/// Returns an error string if the options are invalid or the provider call fails.
pub async fn run(
    ctx: &ServiceContext,
    options: &ConfigOptions,
    system: Option<&str>,
    prompts: &[String],
    out: &mut dyn Write,
) -> Result<(), String> {
    let handler = ctx.openai_handler(options).map_err(|e| e.to_string())?;
    let messages: Vec<ChatMessage> = prompts.iter().map(ChatMessage::user).collect();
    let reply = handler.invoke(&messages, system).await.map_err(|e| e.to_string())?;
    writeln!(out, "{reply}").map_err(|e| write_err(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn ctx(output: serde_json::Value) -> ServiceContext {
        ServiceContext::replaying(&Cassette {
            name: "invoke".into(),
            recorded_at: Utc::now(),
            commit: "x".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "chat".into(),
                method: "create".into(),
                input: json!({}),
                output,
            }],
        })
    }

    fn options() -> ConfigOptions {
        let mut options = ConfigOptions::new();
        options.insert("model_id".into(), json!("gpt-4o"));
        options
    }

    #[tokio::test]
    async fn prints_reply() {
        let ctx = ctx(json!({"ok": {"choices": [{"message": {"content": "Paris"}}]}}));
        let mut out = Vec::new();
        run(&ctx, &options(), Some("Answer tersely"), &["Capital of France?".into()], &mut out)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Paris\n");
    }

    #[tokio::test]
    async fn provider_failure_is_reported() {
        let ctx = ctx(json!({"err": "chat completion API error (401): Incorrect API key"}));
        let mut out = Vec::new();
        let err = run(&ctx, &options(), None, &["hi".into()], &mut out).await.unwrap_err();
        assert!(err.contains("Incorrect API key"));
        assert!(out.is_empty());
    }
}
