use futures_util::stream::{self, StreamExt};
use log::warn;

use crate::error::Error;
use crate::models::Image;
use crate::query::{MutationKind, QueryCache};
use crate::resources::{UploadFile, Uploader};

/// Result of one file in a fan-out
#[derive(Debug)]
pub enum UploadOutcome {
    Uploaded { file_name: String, image: Image },
    Failed { file_name: String, error: Error },
}

/// Tally of a fan-out, in completion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadReport {
    /// URLs of the stored images
    pub uploaded: Vec<String>,
    /// `(file name, operator message)` for each failure
    pub failed: Vec<(String, String)>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Upload every file as its own request, at most
/// [`Uploader::upload_concurrency`] at a time, and hand each outcome to
/// `on_result` as it completes. A failure never stops the other files.
/// Completion order is not the selection order.
pub async fn upload_each<U, F>(
    uploader: &U,
    cache: &QueryCache,
    files: Vec<UploadFile>,
    mut on_result: F,
) where
    U: Uploader + ?Sized,
    F: FnMut(UploadOutcome),
{
    let limit = uploader.upload_concurrency().max(1);

    let mut outcomes = stream::iter(files)
        .map(|file| async move {
            let file_name = file.file_name.clone();
            match cache
                .mutate(MutationKind::UploadImage, uploader.upload(file))
                .await
            {
                Ok(image) => UploadOutcome::Uploaded { file_name, image },
                Err(error) => {
                    warn!("upload of {} failed: {}", file_name, error);
                    UploadOutcome::Failed { file_name, error }
                }
            }
        })
        .buffer_unordered(limit);

    while let Some(outcome) = outcomes.next().await {
        on_result(outcome);
    }
}
