use super::*;
use crate::utils::report::{MemoryReporter, NoticeKind};
use crate::utils::test_utils::{MockResponse, MockServer};
use tempfile::tempdir;

async fn ollama_session(server: &MockServer, reporter: Arc<MemoryReporter>) -> ChatSession {
    let config = ClientConfig::new(server.base_url(), "gemma3:1b").with_token("tok");
    let client = LlmClient::connect(config, reporter.clone())
        .await
        .expect("client should build");
    ChatSession {
        conversation: Conversation::new(client, Some("sys")),
        context_mode: ContextMode::Full,
        prompt: PromptStyle::new("Ada", "gemma3:1b", false),
        reporter,
    }
}

async fn run(session: &mut ChatSession, input: &str) -> String {
    let mut out = Vec::new();
    run_chat_loop(session, input.as_bytes(), &mut out)
        .await
        .expect("loop should finish");
    String::from_utf8(out).expect("output should be UTF-8")
}

fn echo_server() -> impl Fn(&crate::utils::test_utils::RecordedRequest) -> MockResponse {
    |request| match request.path.as_str() {
        "/api/tags" => MockResponse::json(
            200,
            r#"{"models":[{"name":"gemma3","model":"gemma3:1b"}]}"#,
        ),
        "/api/chat" => {
            let body = request.json();
            let count = body["messages"].as_array().map(Vec::len).unwrap_or(0);
            MockResponse::json(
                200,
                &format!(r#"{{"message":{{"role":"assistant","content":"seen {count}"}}}}"#),
            )
        }
        _ => MockResponse::not_found(),
    }
}

#[tokio::test]
async fn chat_turns_are_answered_and_recorded() {
    let server = MockServer::start(echo_server()).await;
    let reporter = Arc::new(MemoryReporter::new());
    let mut session = ollama_session(&server, reporter.clone()).await;

    let output = run(&mut session, "hello\n\nagain\n/bye\n").await;

    assert!(output.starts_with("Interactive chat with model: gemma3:1b @ http://"));
    assert!(output.contains("(ollama)"));
    assert!(output.contains("🤖 gemma3:1b > seen 2\n"));
    assert!(output.contains("🤖 gemma3:1b > seen 4\n"));
    assert!(output.trim_end().ends_with("Conversation ended."));
    assert_eq!(session.conversation.messages().len(), 5);
    assert!(reporter.is_empty());
}

#[tokio::test]
async fn context_command_changes_what_is_sent() {
    let server = MockServer::start(echo_server()).await;
    let reporter = Arc::new(MemoryReporter::new());
    let mut session = ollama_session(&server, reporter).await;

    let output = run(&mut session, "one\n/context minimal\ntwo\n/context\n/exit\n").await;

    assert!(output.contains("Context mode set to minimal."));
    assert!(output.contains("Context mode: minimal"));
    assert!(output.contains("seen 2\n"));
    assert!(!output.contains("seen 4"));
    assert_eq!(session.context_mode, ContextMode::Minimal);
}

#[tokio::test]
async fn models_command_prints_listing() {
    let server = MockServer::start(echo_server()).await;
    let reporter = Arc::new(MemoryReporter::new());
    let mut session = ollama_session(&server, reporter).await;

    let output = run(&mut session, "/models\n/quit\n").await;

    assert!(output.contains("Available Models:\n\tgemma3 - gemma3:1b\n"));
}

#[tokio::test]
async fn empty_reply_warns_and_loop_continues() {
    let server = MockServer::start(|request| match request.path.as_str() {
        "/api/tags" => MockResponse::json(200, "{}"),
        _ => MockResponse::json(500, r#"{"error":"boom"}"#),
    })
    .await;
    let reporter = Arc::new(MemoryReporter::new());
    let mut session = ollama_session(&server, reporter.clone()).await;

    let output = run(&mut session, "first\nsecond\n").await;

    assert_eq!(output.matches("[WARN] No response received.").count(), 2);
    assert_eq!(reporter.messages_of(NoticeKind::Error).len(), 2);
    assert_eq!(session.conversation.messages().len(), 5);
    assert!(output.trim_end().ends_with("Conversation ended."));
}

#[tokio::test]
async fn save_and_load_commands_use_transcripts() {
    let server = MockServer::start(echo_server()).await;
    let dir = tempdir().unwrap();
    let path = dir.path().join("chat.json");
    let reporter = Arc::new(MemoryReporter::new());
    let mut session = ollama_session(&server, reporter.clone()).await;

    let script = format!(
        "hello\n/save {path}\nmore\n/load {path}\n/load {missing}\n/exit\n",
        path = path.display(),
        missing = dir.path().join("missing.json").display()
    );
    let output = run(&mut session, &script).await;

    assert!(output.contains("Transcript saved to"));
    assert!(output.contains("Loaded 3 messages from"));
    assert_eq!(session.conversation.messages().len(), 3);
    let errors = reporter.messages_of(NoticeKind::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Failed to read transcript"));
}

#[tokio::test]
async fn invalid_command_arguments_warn() {
    let server = MockServer::start(echo_server()).await;
    let reporter = Arc::new(MemoryReporter::new());
    let mut session = ollama_session(&server, reporter.clone()).await;

    run(&mut session, "/load\n/context sideways\n/exit\n").await;

    assert_eq!(reporter.messages_of(NoticeKind::Warning).len(), 2);
    assert_eq!(session.conversation.messages().len(), 1);
}
