pub mod data_uri;
pub mod error;
pub mod gemini_service;
pub mod models;
pub mod qna_service;
pub mod session;

pub use data_uri::{DataUri, PDF_MIME_TYPE};
pub use error::QnaError;
pub use gemini_service::{GeminiService, GenerativeModel};
pub use models::*;
pub use qna_service::QnaService;
pub use session::{Notice, QnaSession, SessionState};
