//! Authenticated client for the exam-prep backend

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::auth::TokenSource;
use crate::config::BackendConfig;
use crate::error::{ApiError, Result, extract_error_message};
use crate::models::{
    Conversation, DeleteResponse, PdfDocument, PdfUpload, StartConversation, UploadResponse,
};

/// Client for the conversation and document endpoints of the backend
///
/// Every call asks the [`TokenSource`] for a fresh bearer token and fails
/// with [`ApiError::Unauthenticated`] before touching the network when
/// there is none.
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenSource>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        let base_url =
            Url::parse(&config.url).map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.url.clone()));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was ruled out in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let token = self.tokens.auth_token().ok_or(ApiError::Unauthenticated)?;
        Ok(self
            .client
            .request(method, self.endpoint(segments))
            .bearer_auth(token))
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, failure: &str) -> Result<T> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("{failure}: {e}");
                return Err(e.into());
            }
        };

        let status = response.status();
        tracing::debug!(%status, url = %response.url(), "backend responded");

        if status.is_success() {
            let body = response.bytes().await?;
            return serde_json::from_slice(&body).map_err(|e| {
                tracing::warn!("{failure}: malformed response: {e}");
                ApiError::from(e)
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body).unwrap_or_else(|| failure.to_string());
        tracing::warn!(%status, "{failure}: {message}");
        Err(ApiError::Backend { status, message })
    }

    /// Open a new conversation seeded with the student's first question.
    pub async fn start_conversation(&self, input_text: &str) -> Result<StartConversation> {
        let request = self
            .authorized(Method::POST, &["api", "chat", "start"])?
            .json(&serde_json::json!({ "inputText": input_text }));
        self.execute(request, "Failed to start conversation").await
    }

    pub async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let request = self.authorized(Method::GET, &["api", "chat", "conversations"])?;
        self.execute(request, "Failed to fetch conversations").await
    }

    pub async fn get_conversation(&self, conversation_id: &str) -> Result<Conversation> {
        let request =
            self.authorized(Method::GET, &["api", "chat", "conversation", conversation_id])?;
        self.execute(request, "Failed to fetch conversation").await
    }

    /// Post a message; the backend's reply is passed through untouched.
    pub async fn send_message(
        &self,
        conversation_id: &str,
        message: &str,
    ) -> Result<serde_json::Value> {
        let builder = self.authorized(Method::POST, &["api", "chat", "message"])?;

        let id = parse_conversation_id(conversation_id);
        let Some(id) = id.filter(|_| !message.is_empty()) else {
            return Err(ApiError::InvalidRequest(
                "Message and conversation ID are required".to_string(),
            ));
        };

        let request = builder.json(&serde_json::json!({
            "message": message,
            "conversationId": id,
        }));
        self.execute(request, "Failed to send message").await
    }

    pub async fn list_pdfs(&self) -> Result<Vec<PdfDocument>> {
        let request = self.authorized(Method::GET, &["api", "pdfs"])?;
        self.execute(request, "Failed to fetch PDFs").await
    }

    pub async fn upload_pdf(&self, upload: PdfUpload) -> Result<UploadResponse> {
        let builder = self.authorized(Method::POST, &["api", "upload"])?;

        let file = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str("application/pdf")?;
        let form = Form::new()
            .part("file", file)
            .text("title", upload.title)
            .text("description", upload.description)
            .text("subject", upload.subject)
            .text("grade", upload.grade);

        self.execute(builder.multipart(form), "Upload failed").await
    }

    pub async fn delete_pdf(&self, id: &str) -> Result<DeleteResponse> {
        let builder = self.authorized(Method::DELETE, &["api", "pdfs", id])?;
        if id.is_empty() {
            return Err(ApiError::InvalidRequest("PDF ID is required".to_string()));
        }
        self.execute(builder, "Delete failed").await
    }
}

/// Leading integer of a conversation id, e.g. `"42"` or `"42-draft"`.
fn parse_conversation_id(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let digits_start = usize::from(raw.starts_with(['-', '+']));
    let digits_end = raw[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(raw.len(), |i| digits_start + i);
    if digits_end == digits_start {
        return None;
    }
    raw[..digits_end].parse().ok()
}
