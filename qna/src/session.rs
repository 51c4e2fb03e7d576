use crate::data_uri::{DataUri, PDF_MIME_TYPE};
use crate::error::QnaError;
use crate::models::{AnswerResponse, QuestionRequest};
use crate::qna_service::QnaService;
use std::io::Read;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Uploading,
    Uploaded,
    Asking,
    Answered,
    Error,
}

/// Short user-facing message, the equivalent of a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub name: String,
    pub data_uri: String,
}

/// A submission tagged with its sequence number. Responses carrying a stale
/// tag are discarded, so a newer submission always wins.
#[derive(Debug)]
pub struct PendingQuestion {
    pub seq: u64,
    pub request: QuestionRequest,
}

/// Upload/interaction surface: one uploaded document, one question, one answer.
pub struct QnaSession {
    state: SessionState,
    document: Option<UploadedDocument>,
    question: String,
    answer: String,
    notice: Option<Notice>,
    seq: u64,
}

impl QnaSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Empty,
            document: None,
            question: String::new(),
            answer: String::new(),
            notice: None,
            seq: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn document(&self) -> Option<&UploadedDocument> {
        self.document.as_ref()
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Uploading | SessionState::Asking)
    }

    pub fn set_question(&mut self, text: &str) {
        self.question = text.to_string();
    }

    /// Accepts a picked or dropped file. Non-PDF declared MIME types are
    /// rejected with a notice and no state change; read failures likewise
    /// leave the existing document untouched.
    pub fn upload<R: Read>(&mut self, name: &str, declared_mime: &str, mut source: R) {
        if declared_mime != PDF_MIME_TYPE {
            self.notice = Some(Notice::Error(
                "Invalid file type. Please upload a PDF file.".to_string(),
            ));
            return;
        }

        let previous = self.state;
        self.state = SessionState::Uploading;

        let mut bytes = Vec::new();
        match source.read_to_end(&mut bytes) {
            Ok(_) => {
                let data_uri = DataUri::encode(PDF_MIME_TYPE, &bytes).to_string();
                self.document = Some(UploadedDocument {
                    name: name.to_string(),
                    data_uri,
                });
                self.state = SessionState::Uploaded;
                self.notice = Some(Notice::Info(format!("{name} is ready for questions.")));
                log::info!("uploaded {} ({} bytes)", name, bytes.len());
            }
            Err(e) => {
                self.state = previous;
                self.notice = Some(Notice::Error(
                    "There was an error reading the file.".to_string(),
                ));
                log::error!("failed to read {}: {}", name, QnaError::FileReadFailure(e));
            }
        }
    }

    /// Removing the document clears everything that depends on it.
    pub fn remove_document(&mut self) {
        self.document = None;
        self.question.clear();
        self.answer.clear();
        self.state = SessionState::Empty;
        self.notice = Some(Notice::Info("You can now upload a new PDF.".to_string()));
    }

    /// Starts a submission. No-op with a notice unless a document is uploaded
    /// and the question is non-blank.
    pub fn begin_question(&mut self) -> Option<PendingQuestion> {
        let Some(document) = &self.document else {
            self.notice = Some(Notice::Error(
                "Please upload a PDF to ask questions.".to_string(),
            ));
            return None;
        };
        if self.question.trim().is_empty() {
            self.notice = Some(Notice::Error("Please enter a question.".to_string()));
            return None;
        }

        self.seq += 1;
        self.state = SessionState::Asking;
        Some(PendingQuestion {
            seq: self.seq,
            request: QuestionRequest {
                pdf_data_uri: document.data_uri.clone(),
                question: self.question.clone(),
            },
        })
    }

    /// Applies a gateway result. A stale sequence number means a newer
    /// submission has started since; that response is dropped.
    pub fn finish_question(&mut self, seq: u64, result: Result<AnswerResponse, QnaError>) {
        if seq != self.seq {
            log::info!("discarding stale response for submission {seq}");
            return;
        }

        match result {
            Ok(response) => {
                self.answer = response.answer;
                self.state = SessionState::Answered;
                self.notice = None;
            }
            Err(e) => {
                // Prior answer stays on screen.
                self.state = SessionState::Error;
                self.notice = Some(Notice::Error(
                    "Failed to get an answer. Please try again.".to_string(),
                ));
                log::error!("question failed: {e}");
            }
        }
    }

    pub async fn ask(&mut self, gateway: &QnaService) {
        if let Some(pending) = self.begin_question() {
            let result = gateway.answer(pending.request).await;
            self.finish_question(pending.seq, result);
        }
    }
}

impl Default for QnaSession {
    fn default() -> Self {
        Self::new()
    }
}
