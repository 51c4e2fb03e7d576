use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use qna_system::{AnswerResponse, ErrorResponse, QnaError, QnaService, QuestionRequest};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

pub fn router(gateway: Arc<QnaService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/answer", post(answer))
        .layer(CorsLayer::permissive())
        .with_state(gateway)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn answer(
    State(gateway): State<Arc<QnaService>>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<AnswerResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::new_v4();
    log::info!(
        "[{}] question received ({} chars)",
        request_id,
        request.question.len()
    );

    match gateway.answer(request).await {
        Ok(response) => {
            log::info!("[{}] answered", request_id);
            Ok(Json(response))
        }
        Err(e) => {
            log::error!("[{}] {}", request_id, e);
            Err(error_response(e))
        }
    }
}

fn error_response(error: QnaError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &error {
        QnaError::MissingInput(_)
        | QnaError::InvalidFileType(_)
        | QnaError::FileReadFailure(_) => StatusCode::BAD_REQUEST,
        QnaError::ModelInvocationFailure(_) | QnaError::InvalidOutput(_) => StatusCode::BAD_GATEWAY,
    };

    (
        status,
        Json(ErrorResponse {
            status: "error".to_string(),
            error: error.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use qna_system::{DataUri, GenerativeModel, ModelPrompt, PDF_MIME_TYPE};
    use tower::ServiceExt;

    struct StubModel(Result<String, String>);

    #[async_trait]
    impl GenerativeModel for StubModel {
        async fn generate(&self, _prompt: ModelPrompt) -> anyhow::Result<String> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(anyhow::anyhow!("{message}")),
            }
        }
    }

    fn app(model: StubModel) -> Router {
        router(Arc::new(QnaService::new(Arc::new(model))))
    }

    fn answer_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/answer")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = app(StubModel(Ok(r#"{"answer": "unused"}"#.to_string())));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn answer_happy_path() {
        let app = app(StubModel(Ok(
            r#"{"answer": "Annual Report 2023"}"#.to_string()
        )));
        let pdf = DataUri::encode(PDF_MIME_TYPE, b"%PDF-1.4 sample").to_string();
        let response = app
            .oneshot(answer_request(serde_json::json!({
                "pdfDataUri": pdf,
                "question": "What is the title?"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["answer"], "Annual Report 2023");
    }

    #[tokio::test]
    async fn blank_question_is_bad_request() {
        let app = app(StubModel(Ok(r#"{"answer": "unused"}"#.to_string())));
        let pdf = DataUri::encode(PDF_MIME_TYPE, b"%PDF-1.4 sample").to_string();
        let response = app
            .oneshot(answer_request(serde_json::json!({
                "pdfDataUri": pdf,
                "question": "   "
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn non_pdf_payload_is_bad_request() {
        let app = app(StubModel(Ok(r#"{"answer": "unused"}"#.to_string())));
        let txt = DataUri::encode("text/plain", b"not a pdf").to_string();
        let response = app
            .oneshot(answer_request(serde_json::json!({
                "pdfDataUri": txt,
                "question": "What is the title?"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn model_failure_is_bad_gateway() {
        let app = app(StubModel(Err("connection reset".to_string())));
        let pdf = DataUri::encode(PDF_MIME_TYPE, b"%PDF-1.4 sample").to_string();
        let response = app
            .oneshot(answer_request(serde_json::json!({
                "pdfDataUri": pdf,
                "question": "What is the title?"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
    }
}
