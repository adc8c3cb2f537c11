//! Record-replay round trip through the chat transport.
//!
//! 1. Record exchanges by wrapping a scripted transport in `RecordingChatTransport`.
//! 2. Write the cassette to disk.
//! 3. Replay it through `ServiceContext::replaying_from` and a real handler.
//! 4. Assert the handler sees the same replies, including failures.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::json;

use reqforge::adapters::recording::RecordingChatTransport;
use reqforge::adapters::replaying::ReplayingChatTransport;
use reqforge::cassette::{Cassette, CassetteRecorder, CassetteReplayer, Interaction};
use reqforge::config::{ConfigOptions, ProviderConfig};
use reqforge::context::ServiceContext;
use reqforge::ports::chat::ChatMessage;
use reqforge::provider::{ModelHandler, OpenAiHandler};

fn scripted(outputs: Vec<serde_json::Value>) -> ReplayingChatTransport {
    let interactions = outputs
        .into_iter()
        .enumerate()
        .map(|(seq, output)| Interaction {
            seq: seq as u64,
            port: "chat".into(),
            method: "create".into(),
            input: json!({}),
            output,
        })
        .collect();
    let cassette = Cassette {
        name: "script".into(),
        recorded_at: Utc::now(),
        commit: "x".into(),
        interactions,
    };
    ReplayingChatTransport::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))))
}

fn options() -> ConfigOptions {
    let mut options = ConfigOptions::new();
    options.insert("model_id".into(), json!("GPT-4o-mini"));
    options.insert("api_key".into(), json!("sk-test"));
    options
}

#[tokio::test]
async fn record_then_replay_produces_identical_outputs() {
    let dir = std::env::temp_dir().join("reqforge_record_replay_test");
    std::fs::create_dir_all(&dir).unwrap();
    let cassette_path = dir.join("chat.cassette.yaml");

    // --- Phase 1: record ---
    let recorder =
        Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "roundtrip", "abc123")));
    let transport = RecordingChatTransport::new(
        Box::new(scripted(vec![
            json!({"ok": {"choices": [{"message": {"content": "Hello there"}}]}}),
            json!({"ok": {"choices": []}}),
            json!({"err": "chat completion API error (401): Incorrect API key"}),
        ])),
        Arc::clone(&recorder),
    );
    let config = ProviderConfig::parse_with(&options(), |_| None).unwrap();
    let handler = OpenAiHandler::with_transport(config, Box::new(transport));

    let messages = vec![ChatMessage::user("Hi")];
    let recorded = (
        handler.invoke(&messages, Some("You are helpful")).await.unwrap(),
        handler.invoke(&messages, None).await.unwrap(),
        handler.is_valid().await,
    );
    assert_eq!(recorded, ("Hello there".to_string(), String::new(), false));

    let written = recorder.lock().unwrap().write().expect("cassette should be written");
    assert_eq!(written, cassette_path);

    let cassette = Cassette::load(&cassette_path).unwrap();
    assert_eq!(cassette.interactions.len(), 3);
    assert_eq!(cassette.interactions[0].input["model"], "gpt-4o-mini");
    assert_eq!(cassette.interactions[0].input["messages"][0]["role"], "system");
    assert_eq!(cassette.interactions[2].input["max_tokens"], 1);

    // --- Phase 2 and 3: replay twice, expect identical outcomes ---
    for _ in 0..2 {
        let ctx = ServiceContext::replaying_from(&cassette_path).unwrap();
        let handler = ctx.openai_handler(&options()).unwrap();
        let replayed = (
            handler.invoke(&messages, Some("You are helpful")).await.unwrap(),
            handler.invoke(&messages, None).await.unwrap(),
            handler.is_valid().await,
        );
        assert_eq!(replayed, recorded);
    }

    let _ = std::fs::remove_dir_all(&dir);
}
