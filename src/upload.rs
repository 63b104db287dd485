//! File upload helper for image and video fields.

use tracing::{info, warn};
use zatca_shared::{UPLOAD_FIELD, UploadResponse};

use crate::config::AppConfig;
use crate::notify::{Notifier, Toast};
use crate::request::{FormPart, HttpClient, HttpMethod, HttpRequest};

/// A file picked in the browser, not yet on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Pending(PendingFile),
    /// Already stored; `path` is what the mutation receives.
    Uploaded { path: String },
}

impl Attachment {
    pub fn uploaded(path: impl Into<String>) -> Self {
        Self::Uploaded { path: path.into() }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, Self::Uploaded { .. })
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Uploaded { path } => Some(path),
            Self::Pending(_) => None,
        }
    }
}

pub struct Uploader<H, N> {
    http: H,
    notifier: N,
    endpoint: String,
    bearer: Option<String>,
}

impl<H: HttpClient, N: Notifier> Uploader<H, N> {
    pub fn new(http: H, notifier: N, config: &AppConfig) -> Self {
        Self {
            http,
            notifier,
            endpoint: config.upload_endpoint(),
            bearer: None,
        }
    }

    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    /// Uploads a pending file. Never fails: on any error the file comes
    /// back as [`Attachment::Pending`] so the form can block submission.
    pub async fn upload(&self, attachment: Attachment) -> Attachment {
        let file = match attachment {
            Attachment::Uploaded { .. } => return attachment,
            Attachment::Pending(file) => file,
        };

        let toast = self.notifier.notify(Toast::loading(format!("Uploading {}...", file.name)));
        let result = self.send(&file).await;
        self.notifier.dismiss(toast);

        match result {
            Ok(path) => {
                info!(file = %file.name, %path, "upload complete");
                Attachment::Uploaded { path }
            }
            Err(reason) => {
                warn!(file = %file.name, %reason, "upload failed");
                Attachment::Pending(file)
            }
        }
    }

    async fn send(&self, file: &PendingFile) -> Result<String, String> {
        let mut req = HttpRequest::new(&self.endpoint, HttpMethod::Post).with_multipart(vec![
            FormPart::File {
                name: UPLOAD_FIELD.to_string(),
                file_name: file.name.clone(),
                content_type: file.content_type.clone(),
                bytes: file.bytes.clone(),
            },
        ]);
        if let Some(token) = &self.bearer {
            req = req.with_header("Authorization", &format!("Bearer {token}"));
        }

        let resp = self.http.send(req).await.map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(format!("status {}", resp.status));
        }
        let body: UploadResponse = resp.json().map_err(|e| e.to_string())?;
        if body.path.is_empty() {
            return Err("empty path".to_string());
        }
        Ok(body.path)
    }
}
