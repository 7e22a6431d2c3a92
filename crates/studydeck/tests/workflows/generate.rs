use axum::{routing::post, Json, Router};
use serde_json::{json, Value};
use studydeck::{
  api,
  generate::Gateway,
  llm::ChatClient,
  view::{Artifact, Dashboard, FlashcardViewer, QuizSession},
};

use super::*;

/// Serves `router` on an ephemeral local port and returns its base URL.
async fn spawn(router: Router) -> TestResult<String> {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
  let addr = listener.local_addr()?;
  tokio::spawn(async move { axum::serve(listener, router).await });
  Ok(format!("http://{addr}"))
}

/// An upstream chat service that always answers with `content`.
fn upstream(content: &'static str) -> Router {
  Router::new().route(
    "/chat/completions",
    post(move |Json(_): Json<Value>| async move {
      Json(json!({
        "id": "chatcmpl-test",
        "model": "llama-3.3-70b-versatile",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
      }))
    }),
  )
}

#[traced_test]
#[tokio::test]
async fn test_http_chain_with_non_json_model_output() -> TestResult {
  let llm_host = spawn(upstream("I'm sorry, I can't produce JSON today.")).await?;
  let gateway = Gateway::new(ChatClient::new().with_host(llm_host).with_api_key("test"));
  let api_host = spawn(api::router(gateway)).await?;

  let response = reqwest::Client::new()
    .post(format!("{api_host}/api/generate-flashcards"))
    .json(&json!({ "text": "X" }))
    .send()
    .await?;
  assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(response.json::<Value>().await?, json!({ "error": "Failed to generate flashcards" }));

  // The summary passes through verbatim
  let response = reqwest::Client::new()
    .post(format!("{api_host}/api/generate-summary"))
    .json(&json!({ "text": "X" }))
    .send()
    .await?;
  assert!(response.status().is_success());
  assert_eq!(
    response.json::<Value>().await?,
    json!({ "summary": "I'm sorry, I can't produce JSON today." })
  );
  Ok(())
}

#[tokio::test]
async fn test_study_round() -> TestResult {
  let gateway = Gateway::new(StubModel::valid());
  let mut dashboard = Dashboard::new();

  let ticket = dashboard.begin("Cells make energy in mitochondria.");
  let generated = gateway.generate_all(dashboard.text().unwrap_or_default()).await;
  assert!(dashboard.apply_all(ticket, generated));
  assert!(!dashboard.is_generating());
  assert_eq!(gateway.model().calls.load(Ordering::SeqCst), 3);

  let cards = dashboard.flashcards().value().cloned().unwrap();
  let mut viewer = FlashcardViewer::new(cards);
  assert_eq!(viewer.visible_text(), Some("What do mitochondria produce?"));
  viewer.flip();
  assert_eq!(viewer.visible_text(), Some("ATP"));

  let questions = dashboard.quiz().value().cloned().unwrap();
  let mut session = QuizSession::new(questions);
  for answer in ["B", "A", "B", "C", "B"] {
    assert!(session.select(answer));
    session.next();
  }
  let score = session.submit().unwrap();
  assert_eq!(score.to_string(), "3 out of 5 (60%)");
  Ok(())
}

#[tokio::test]
async fn test_one_failure_does_not_spoil_the_round() -> TestResult {
  let model = StubModel { quiz: None, ..StubModel::valid() };
  let gateway = Gateway::new(model);
  let mut dashboard = Dashboard::new();

  let ticket = dashboard.begin("text");
  let generated = gateway.generate_all("text").await;
  dashboard.apply_all(ticket, generated);

  assert!(matches!(dashboard.quiz(), Artifact::Failed(_)));
  assert!(dashboard.flashcards().value().is_some());
  assert!(dashboard.summary().value().is_some());
  Ok(())
}
