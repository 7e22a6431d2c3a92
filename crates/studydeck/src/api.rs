//! HTTP endpoints exposing the generation gateway.
//!
//! Three `POST` routes accept `{"text": "..."}` and answer with the generated
//! material:
//!
//! | Route                        | Success body                     |
//! |------------------------------|----------------------------------|
//! | `/api/generate-flashcards`   | `{"flashcards": [{front, back}]}` |
//! | `/api/generate-quiz`         | `{"quiz": [{question, options, correctAnswer, explanation}]}` |
//! | `/api/generate-summary`      | `{"summary": "..."}`             |
//!
//! Any failure behind a route, upstream or validation, is logged and answered with
//! status 500 and `{"error": "Failed to generate <kind>"}`. The cause never leaves the
//! server. A body that is not `{"text": string}` JSON gets status 400 and
//! `{"error": "Invalid request body"}`.
//!
//! # Examples
//!
//! ```no_run
//! use studydeck::{api, generate::Gateway, llm::ChatClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Gateway::new(ChatClient::new().with_api_key(std::env::var("GROQ_API_KEY")?));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! api::serve(listener, gateway).await?;
//! # Ok(())
//! # }
//! ```

use axum::{
  extract::{rejection::JsonRejection, State},
  http::{header, Method, StatusCode},
  response::{IntoResponse, Response},
  routing::post,
  Json, Router,
};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use super::*;
use crate::{
  generate::{Flashcard, Gateway, GenerationKind, QuizQuestion},
  llm::CompletionModel,
};

/// Body accepted by every route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
  /// Document text to generate from
  pub text: String,
}

/// Body of a successful flashcard generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardsResponse {
  /// The generated cards
  pub flashcards: Vec<Flashcard>,
}

/// Body of a successful quiz generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
  /// The generated questions
  pub quiz: Vec<QuizQuestion>,
}

/// Body of a successful summary generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
  /// Markdown summary
  pub summary: String,
}

/// Everything a route can answer with instead of success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFailure {
  /// The request body was not `{"text": string}`
  InvalidBody,
  /// Generation failed for any reason
  Generation(GenerationKind),
}

impl IntoResponse for ApiFailure {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiFailure::InvalidBody => (StatusCode::BAD_REQUEST, "Invalid request body".to_string()),
      ApiFailure::Generation(kind) =>
        (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to generate {kind}")),
    };
    (status, Json(serde_json::json!({ "error": message }))).into_response()
  }
}

/// Shared handler state.
type SharedGateway<M> = State<Arc<Gateway<M>>>;

/// Unwraps the request body, mapping any rejection to [`ApiFailure::InvalidBody`].
fn request_text(
  body: core::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> core::result::Result<String, ApiFailure> {
  match body {
    Ok(Json(request)) => Ok(request.text),
    Err(rejection) => {
      warn!("Rejected request body: {rejection}");
      Err(ApiFailure::InvalidBody)
    },
  }
}

/// Logs a generation error and hides it behind the generic failure.
fn generation_failed(kind: GenerationKind) -> impl FnOnce(StudyError) -> ApiFailure {
  move |e| {
    error!("Error generating {kind}: {e}");
    ApiFailure::Generation(kind)
  }
}

/// `POST /api/generate-flashcards`
async fn generate_flashcards<M: CompletionModel + 'static>(
  State(gateway): SharedGateway<M>,
  body: core::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> core::result::Result<Json<FlashcardsResponse>, ApiFailure> {
  let text = request_text(body)?;
  let flashcards =
    gateway.flashcards(&text).await.map_err(generation_failed(GenerationKind::Flashcards))?;
  Ok(Json(FlashcardsResponse { flashcards }))
}

/// `POST /api/generate-quiz`
async fn generate_quiz<M: CompletionModel + 'static>(
  State(gateway): SharedGateway<M>,
  body: core::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> core::result::Result<Json<QuizResponse>, ApiFailure> {
  let text = request_text(body)?;
  let quiz = gateway.quiz(&text).await.map_err(generation_failed(GenerationKind::Quiz))?;
  Ok(Json(QuizResponse { quiz }))
}

/// `POST /api/generate-summary`
async fn generate_summary<M: CompletionModel + 'static>(
  State(gateway): SharedGateway<M>,
  body: core::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> core::result::Result<Json<SummaryResponse>, ApiFailure> {
  let text = request_text(body)?;
  let summary = gateway.summary(&text).await.map_err(generation_failed(GenerationKind::Summary))?;
  Ok(Json(SummaryResponse { summary }))
}

/// Builds the router with request tracing and permissive CORS for browser clients.
pub fn router<M: CompletionModel + 'static>(gateway: Gateway<M>) -> Router {
  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::POST, Method::OPTIONS])
    .allow_headers([header::CONTENT_TYPE]);

  Router::new()
    .route("/api/generate-flashcards", post(generate_flashcards::<M>))
    .route("/api/generate-quiz", post(generate_quiz::<M>))
    .route("/api/generate-summary", post(generate_summary::<M>))
    .layer(cors)
    .layer(TraceLayer::new_for_http())
    .with_state(Arc::new(gateway))
}

/// Serves the API on `listener` until Ctrl-C.
///
/// # Errors
///
/// Returns [`StudyError::Path`] if the server fails to accept connections.
pub async fn serve<M: CompletionModel + 'static>(
  listener: tokio::net::TcpListener,
  gateway: Gateway<M>,
) -> Result<()> {
  if let Ok(addr) = listener.local_addr() {
    debug!("Serving generation API on {addr}");
  }
  axum::serve(listener, router(gateway)).with_graceful_shutdown(shutdown_signal()).await?;
  debug!("Generation API stopped");
  Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!("Failed to listen for shutdown signal: {e}");
    std::future::pending::<()>().await;
  }
}

#[cfg(test)]
mod tests {
  use axum::body::{to_bytes, Body};
  use axum::http::Request;
  use serde_json::{json, Value};
  use tower::ServiceExt;

  use super::*;

  /// Answers every prompt with a fixed string, or fails when there is none.
  struct FixedModel(Option<&'static str>);

  #[async_trait]
  impl CompletionModel for FixedModel {
    async fn complete(&self, _prompt: &str) -> Result<String> {
      self.0.map(str::to_string).ok_or_else(|| StudyError::ApiError("503: unavailable".to_string()))
    }
  }

  /// Posts `body` to `uri` and returns the status and parsed JSON.
  async fn post_json(model: FixedModel, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = router(Gateway::new(model))
      .oneshot(
        Request::builder()
          .method("POST")
          .uri(uri)
          .header("content-type", "application/json")
          .body(Body::from(body.to_string()))
          .unwrap(),
      )
      .await
      .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[traced_test]
  #[tokio::test]
  async fn test_flashcards_non_json_upstream() {
    let (status, body) = post_json(
      FixedModel(Some("Sure! Here are some flashcards.")),
      "/api/generate-flashcards",
      r#"{"text": "X"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to generate flashcards" }));
    assert!(logs_contain("Error generating flashcards"));
  }

  #[tokio::test]
  async fn test_flashcards_success() {
    let (status, body) = post_json(
      FixedModel(Some(r#"[{"front": "ATP", "back": "Energy"}]"#)),
      "/api/generate-flashcards",
      r#"{"text": "Cells"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "flashcards": [{ "front": "ATP", "back": "Energy" }] }));
  }

  #[tokio::test]
  async fn test_quiz_success_uses_camel_case() {
    let answer = r#"[{
      "question": "Q?",
      "options": ["a", "b", "c", "d"],
      "correctAnswer": "c",
      "explanation": "Because."
    }]"#;
    let (status, body) =
      post_json(FixedModel(Some(answer)), "/api/generate-quiz", r#"{"text": "X"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quiz"][0]["correctAnswer"], "c");
  }

  #[tokio::test]
  async fn test_summary_verbatim() {
    let (status, body) =
      post_json(FixedModel(Some("## Overview\n* point")), "/api/generate-summary", r#"{"text": "X"}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "summary": "## Overview\n* point" }));
  }

  #[tokio::test]
  async fn test_upstream_failure_is_generic() {
    for (uri, kind) in [
      ("/api/generate-flashcards", "flashcards"),
      ("/api/generate-quiz", "quiz"),
      ("/api/generate-summary", "summary"),
    ] {
      let (status, body) = post_json(FixedModel(None), uri, r#"{"text": "X"}"#).await;
      assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
      assert_eq!(body, json!({ "error": format!("Failed to generate {kind}") }));
    }
  }

  #[tokio::test]
  async fn test_invalid_body() {
    for body in ["not json", r#"{"content": "X"}"#, r#"{"text": 5}"#] {
      let (status, value) =
        post_json(FixedModel(Some("[]")), "/api/generate-summary", body).await;
      assert_eq!(status, StatusCode::BAD_REQUEST);
      assert_eq!(value, json!({ "error": "Invalid request body" }));
    }
  }
}
