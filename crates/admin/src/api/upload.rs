use bazaar_core::store::BearerToken;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::instrument;

use super::{ApiClient, ApiError};

/// An image file received from the edit form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    image_url: String,
}

impl ApiClient {
    /// `POST /api/upload` with the file in the multipart field `image`.
    /// Returns the hosted image URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected or the request fails.
    #[instrument(skip(self, token, image), fields(file = %image.file_name, size = image.bytes.len()))]
    pub async fn upload_image(
        &self,
        token: &BearerToken,
        image: ImageUpload,
    ) -> Result<String, ApiError> {
        let mut part = Part::bytes(image.bytes).file_name(image.file_name);
        if let Some(content_type) = image.content_type {
            part = part.mime_str(&content_type)?;
        }

        let request = self
            .request(Method::POST, "/api/upload", Some(token))?
            .multipart(Form::new().part("image", part));
        let response: UploadResponse = self.send(request).await?;
        Ok(response.image_url)
    }
}
