use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use thiserror::Error;

pub const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum DataUriError {
    #[error("missing 'data:' scheme")]
    MissingScheme,
    #[error("missing ';base64,' marker")]
    MissingBase64Marker,
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Inline document payload in `data:<mimetype>;base64,<encoded_data>` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub data: String,
}

impl DataUri {
    pub fn encode(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    pub fn parse(uri: &str) -> Result<Self, DataUriError> {
        let rest = uri.strip_prefix("data:").ok_or(DataUriError::MissingScheme)?;
        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or(DataUriError::MissingBase64Marker)?;

        // Validate the payload eagerly so a bad URI fails here, not mid-request.
        STANDARD.decode(data)?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    pub fn decode(&self) -> Result<Vec<u8>, DataUriError> {
        Ok(STANDARD.decode(&self.data)?)
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == PDF_MIME_TYPE
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}
