//! Per-screen state: the document library, the upload form and a chat.
//!
//! Each container is owned by one screen and only changes through its own
//! methods. A failed action records a message in `error` and leaves the
//! data exactly as it was before the action started.

use std::collections::HashSet;

use crate::client::BackendClient;
use crate::error::{ApiError, Result};
use crate::models::{Message, PdfDocument, PdfUpload};

const PDF_MAGIC: &[u8] = b"%PDF";

/// A file picked for upload
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    fn is_pdf(&self) -> bool {
        self.name.to_ascii_lowercase().ends_with(".pdf") || self.bytes.starts_with(PDF_MAGIC)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfUploadForm {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub grade: String,
    file: Option<SelectedFile>,
}

impl PdfUploadForm {
    /// A form with its text fields filled in and no file attached yet.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        subject: impl Into<String>,
        grade: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            subject: subject.into(),
            grade: grade.into(),
            file: None,
        }
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    /// Attach a file, refusing anything that is not a PDF.
    pub fn select_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> Result<()> {
        let file = SelectedFile {
            name: name.into(),
            bytes,
        };
        if !file.is_pdf() {
            return Err(ApiError::InvalidRequest(
                "Please select a valid PDF file".to_string(),
            ));
        }
        self.file = Some(file);
        Ok(())
    }

    pub fn remove_file(&mut self) {
        self.file = None;
    }

    /// Whether every required field is filled in.
    pub fn is_complete(&self) -> bool {
        self.file.is_some()
            && !self.title.is_empty()
            && !self.subject.is_empty()
            && !self.grade.is_empty()
    }

    pub fn validate(&self) -> Result<PdfUpload> {
        match &self.file {
            Some(file) if self.is_complete() => Ok(PdfUpload {
                title: self.title.clone(),
                description: self.description.clone(),
                subject: self.subject.clone(),
                grade: self.grade.clone(),
                file_name: file.name.clone(),
                bytes: file.bytes.clone(),
            }),
            _ => Err(ApiError::InvalidRequest(
                "Please fill in all required fields and select a PDF file".to_string(),
            )),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Documents shown on the admin dashboard
#[derive(Debug, Clone, Default)]
pub struct PdfLibrary {
    pub documents: Vec<PdfDocument>,
    pub is_loading: bool,
    pub is_uploading: bool,
    pub error: Option<String>,
}

impl PdfLibrary {
    pub async fn refresh(&mut self, client: &BackendClient) -> Result<()> {
        self.is_loading = true;
        self.error = None;
        let result = client.list_pdfs().await;
        self.is_loading = false;

        match result {
            Ok(documents) => {
                self.documents = documents;
                Ok(())
            }
            Err(e) => Err(self.fail(e, "Failed to load PDFs. Please try again.")),
        }
    }

    /// Upload the form's document. On success the new document goes to
    /// the top of the list and the form is cleared; on failure the form
    /// keeps its contents.
    pub async fn upload(
        &mut self,
        client: &BackendClient,
        form: &mut PdfUploadForm,
    ) -> Result<PdfDocument> {
        let upload = form.validate()?;

        self.is_uploading = true;
        self.error = None;
        let result = client.upload_pdf(upload).await;
        self.is_uploading = false;

        let outcome = result.and_then(|response| match response.document {
            Some(document) if response.success => Ok(document),
            _ => Err(ApiError::Rejected(
                response.message.unwrap_or_else(|| "Upload failed".to_string()),
            )),
        });

        match outcome {
            Ok(document) => {
                tracing::info!(id = %document.id, "uploaded {}", document.file_name);
                self.documents.insert(0, document.clone());
                form.reset();
                Ok(document)
            }
            Err(e) => Err(self.fail(e, "Upload failed. Please try again.")),
        }
    }

    pub async fn delete(&mut self, client: &BackendClient, id: &str) -> Result<()> {
        self.error = None;
        let outcome = client.delete_pdf(id).await.and_then(|response| {
            if response.success {
                Ok(())
            } else {
                Err(ApiError::Rejected(
                    response.message.unwrap_or_else(|| "Delete failed".to_string()),
                ))
            }
        });

        match outcome {
            Ok(()) => {
                self.documents.retain(|doc| doc.id != id);
                Ok(())
            }
            Err(e) => Err(self.fail(e, "Delete failed. Please try again.")),
        }
    }

    /// Number of distinct subjects across the loaded documents.
    pub fn subject_count(&self) -> usize {
        self.documents
            .iter()
            .map(|doc| doc.subject.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Number of distinct grades across the loaded documents.
    pub fn grade_count(&self) -> usize {
        self.documents
            .iter()
            .map(|doc| doc.grade.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn fail(&mut self, err: ApiError, fallback: &str) -> ApiError {
        self.error = Some(err.user_message(fallback));
        err
    }
}

/// One open conversation
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub conversation_id: String,
    pub title: Option<String>,
    pub messages: Vec<Message>,
    pub is_loading: bool,
    pub is_sending: bool,
    pub error: Option<String>,
}

impl ChatSession {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            title: None,
            messages: Vec::new(),
            is_loading: false,
            is_sending: false,
            error: None,
        }
    }

    /// Start a fresh conversation from the student's first question and
    /// load whatever the backend already has for it.
    pub async fn start(client: &BackendClient, input_text: &str) -> Result<Self> {
        let started = client.start_conversation(input_text).await?;
        let mut session = Self::new(started.chat_id.to_string());
        session.load(client).await?;
        Ok(session)
    }

    pub async fn load(&mut self, client: &BackendClient) -> Result<()> {
        self.is_loading = true;
        self.error = None;
        let result = client.get_conversation(&self.conversation_id).await;
        self.is_loading = false;

        match result {
            Ok(conversation) => {
                self.title = conversation.title;
                self.messages = conversation.messages;
                Ok(())
            }
            Err(e) => Err(self.fail(e, "Failed to load conversation. Please try again.")),
        }
    }

    /// Send a message and reload the conversation to pick up the reply.
    /// Blank input is ignored.
    pub async fn send(&mut self, client: &BackendClient, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        self.is_sending = true;
        self.error = None;
        let result = client.send_message(&self.conversation_id, text).await;
        self.is_sending = false;

        if let Err(e) = result {
            return Err(self.fail(e, "Failed to send message. Please try again."));
        }
        self.load(client).await
    }

    fn fail(&mut self, err: ApiError, fallback: &str) -> ApiError {
        self.error = Some(err.user_message(fallback));
        err
    }
}
