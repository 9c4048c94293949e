mod auth;
mod client;
mod config;
mod error;
mod html;
mod models;
mod parser;
mod span;
mod state;

pub use auth::{AuthDecision, StaticToken, TokenSource, require_auth};
pub use client::BackendClient;
pub use config::{AuthConfig, BackendConfig, Config, ConfigError, RenderConfig};
pub use error::{AUTH_REQUIRED_MESSAGE, ApiError, Result};
pub use models::{
    Conversation, DeleteResponse, Message, PdfDocument, PdfUpload, RecordId, StartConversation,
    UploadResponse, format_file_size,
};
pub use span::{FormattedDocument, Line, SpanKind, TextSpan};
pub use state::{ChatSession, PdfLibrary, PdfUploadForm, SelectedFile};

/// Format chat text into lines of styled spans.
pub fn format(text: &str) -> FormattedDocument {
    parser::format(text)
}

/// Format chat text straight to an HTML fragment using default config.
pub fn format_to_html(text: &str) -> String {
    format_to_html_with_config(text, &Config::compiled_default().render)
}

/// Format chat text to an HTML fragment with custom CSS classes.
///
/// Empty text renders as nothing rather than a lone break.
pub fn format_to_html_with_config(text: &str, config: &RenderConfig) -> String {
    if text.is_empty() {
        return String::new();
    }
    let doc = format(text);
    html::document_to_html(&doc, config)
}

/// Render an already formatted document to HTML.
pub fn document_to_html(doc: &FormattedDocument, config: &RenderConfig) -> String {
    html::document_to_html(doc, config)
}
