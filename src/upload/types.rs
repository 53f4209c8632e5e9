use derivative::Derivative;
use reqwest::StatusCode;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Photo chosen by the user, held in memory until it is uploaded or cleared.
#[derive(Derivative, Clone, PartialEq, Eq)]
#[derivative(Debug)]
pub struct SelectedFile {
    pub file_name: String,
    pub mime_type: String,
    #[derivative(Debug = "ignore")]
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> io::Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
        let bytes = fs::read(path)?;
        Ok(Self::new(file_name, bytes))
    }

    pub fn size_label(&self) -> String {
        const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
        let mut size = self.bytes.len() as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{} {}", self.bytes.len(), UNITS[0])
        } else {
            format!("{:.2} {}", size, UNITS[unit])
        }
    }
}

/// Everything one registration request carries.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub photo: SelectedFile,
}

impl RegistrationForm {
    /// Text parts in upload order. `middle_name` only appears when it was filled in.
    pub fn text_parts(&self) -> Vec<(&'static str, &str)> {
        let mut parts = vec![
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
        ];
        if let Some(middle_name) = &self.middle_name {
            parts.push(("middle_name", middle_name.as_str()));
        }
        parts
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub qr_code_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Application,
    Transport,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("registration rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },
    #[error("failed to decode registration response: {0}")]
    Decode(String),
    #[error("registration request failed: {0}")]
    Transport(String),
    #[error("upload worker exited without reporting an outcome")]
    WorkerLost,
}

impl RegistrationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            RegistrationError::Rejected { .. } => FailureKind::Application,
            RegistrationError::Decode(_)
            | RegistrationError::Transport(_)
            | RegistrationError::WorkerLost => FailureKind::Transport,
        }
    }

    /// Human readable text the server attached to a rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RegistrationError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Maps a decoded response onto a receipt or a rejection.
///
/// Success needs a 2xx status and a truthy `qr_code_url`. Anything else is a
/// rejection carrying the body's `message` when it is a truthy scalar.
pub fn interpret_response(
    status: StatusCode,
    body: &Value,
) -> Result<RegistrationReceipt, RegistrationError> {
    let marker = body.get("qr_code_url").filter(|value| is_truthy(value));

    match marker {
        Some(url) if status.is_success() => Ok(RegistrationReceipt {
            qr_code_url: match url {
                Value::String(url) => url.clone(),
                other => other.to_string(),
            },
        }),
        _ => Err(RegistrationError::Rejected {
            status: status.as_u16(),
            message: body.get("message").and_then(display_message),
        }),
    }
}

fn display_message(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(_) | Value::Bool(_) if is_truthy(value) => Some(value.to_string()),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
