//! Payload types exchanged with the exam-prep backend

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::span::FormattedDocument;

/// Identifier the backend may send as either a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: RecordId,
    /// `"user"` for the student, anything else is the assistant
    pub sender: String,
    pub message: String,
}

impl Message {
    pub fn is_from_user(&self) -> bool {
        self.sender == "user"
    }

    /// The message text run through the inline formatter.
    pub fn formatted(&self) -> FormattedDocument {
        crate::parser::format(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversation {
    pub chat_id: RecordId,
}

/// An uploaded study document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfDocument {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub subject: String,
    pub grade: String,
    pub file_name: String,
    pub file_size: u64,
    pub file_url: String,
    pub uploaded_at: String,
    pub uploaded_by: String,
}

impl PdfDocument {
    pub fn display_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub document: Option<PdfDocument>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// A validated upload, ready to be sent as multipart form data
#[derive(Debug, Clone, PartialEq)]
pub struct PdfUpload {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub grade: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Human-readable byte count: `0 Bytes`, `512 Bytes`, `1.5 KB`, `10 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}
