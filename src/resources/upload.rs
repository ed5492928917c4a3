use std::path::Path;

use async_trait::async_trait;
use log::info;
use reqwest::multipart::{Form, Part};

use super::AdminClient;
use crate::error::{Error, Result};
use crate::models::Image;

/// A file selected for upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Wrap in-memory bytes. The content type is guessed from the file name.
    pub fn new(file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: mime_guess::from_path(file_name)
                .first_or_octet_stream()
                .to_string(),
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }

    /// Read a file from disk
    pub async fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| Error::general(format!("not a file: {}", path.display())))?;
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(&file_name, bytes))
    }

    fn into_form(self) -> Result<Form> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)?;
        Ok(Form::new().part("file", part))
    }
}

/// Anything that can store an image and hand back its record.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, file: UploadFile) -> Result<Image>;

    /// How many uploads may run at once when several files are attached together
    fn upload_concurrency(&self) -> usize {
        4
    }
}

#[async_trait]
impl Uploader for AdminClient {
    /// `POST /upload` as multipart with a single `file` field
    async fn upload(&self, file: UploadFile) -> Result<Image> {
        let name = file.file_name.clone();
        let form = file.into_form()?;
        let image: Image = self.http().post("/upload").multipart(form).execute().await?;
        info!("uploaded {} as {}", name, image.url);
        Ok(image)
    }

    fn upload_concurrency(&self) -> usize {
        self.options().upload_concurrency
    }
}
