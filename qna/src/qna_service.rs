use crate::data_uri::DataUri;
use crate::error::QnaError;
use crate::gemini_service::GenerativeModel;
use crate::models::{AnswerResponse, ModelPrompt, QuestionRequest};
use std::sync::Arc;

/// Question-answering gateway: validate input, make one model call, validate output.
pub struct QnaService {
    model: Arc<dyn GenerativeModel>,
}

impl QnaService {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub async fn answer(&self, request: QuestionRequest) -> Result<AnswerResponse, QnaError> {
        if request.question.trim().is_empty() {
            return Err(QnaError::MissingInput("question"));
        }
        if request.pdf_data_uri.is_empty() {
            return Err(QnaError::MissingInput("document"));
        }

        let document = DataUri::parse(&request.pdf_data_uri)
            .map_err(|e| QnaError::InvalidFileType(e.to_string()))?;
        if !document.is_pdf() {
            return Err(QnaError::InvalidFileType(document.mime_type));
        }

        let prompt = ModelPrompt {
            text: build_prompt(&request.question),
            document,
        };

        let raw = self.model
            .generate(prompt)
            .await
            .map_err(QnaError::ModelInvocationFailure)?;

        parse_answer(&raw)
    }
}

fn build_prompt(question: &str) -> String {
    format!(
        r#"You are an AI assistant that answers questions based on the content of the attached PDF document.

Answer using only the information in the document. Reply with a single JSON object of the form {{"answer": "<your answer>"}} and nothing else.

Question: {question}

Answer:"#
    )
}

/// The model is instructed, not forced, to emit the `{"answer"}` shape, so
/// parse defensively: tolerate surrounding whitespace and a fenced code block.
fn parse_answer(raw: &str) -> Result<AnswerResponse, QnaError> {
    let trimmed = strip_code_fence(raw.trim());

    serde_json::from_str::<AnswerResponse>(trimmed)
        .map_err(|e| QnaError::InvalidOutput(format!("{e}: {}", truncate(raw, 200))))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line, then the closing fence.
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
