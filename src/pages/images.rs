use super::ImagesPage;
use crate::editor::{upload_each, UploadOutcome, UploadReport};
use crate::models::Image;
use crate::resources::{AdminClient, UploadFile};

impl ImagesPage {
    /// Upload each file on its own. Every success refreshes the gallery.
    pub async fn upload(&self, client: &AdminClient, files: Vec<UploadFile>) -> UploadReport {
        let mut report = UploadReport::default();
        let notifier = &self.notifier;

        upload_each(client, &self.cache, files, |outcome| match outcome {
            UploadOutcome::Uploaded { image, .. } => {
                report.uploaded.push(image.url);
            }
            UploadOutcome::Failed { file_name, error } => {
                let message = error.message_or("Error uploading images");
                notifier.error(&message);
                report.failed.push((file_name, message));
            }
        })
        .await;

        if !report.uploaded.is_empty() {
            self.notifier.success("Images uploaded successfully");
        }
        report
    }

    /// Full URL of an image, for pasting elsewhere
    pub fn copy_url(&self, client: &AdminClient, image: &Image) -> String {
        client.asset_url(&image.url)
    }
}
