//! Uploads profile images to the third-party image host.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::Error;

/// An image file taken from a multipart form.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// The host's description of a stored image.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadedImage {
    pub secure_url: String,
    #[serde(default)]
    pub public_id: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Deserialize)]
struct UploadFailure {
    error: Option<UploadFailureDetail>,
}

#[derive(Deserialize)]
struct UploadFailureDetail {
    message: Option<String>,
}

/// Client for an unsigned-upload image host.
#[derive(Debug, Clone)]
pub struct ImageHost {
    http: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

impl ImageHost {
    pub fn new(upload_url: &str, upload_preset: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::ImageUpload(error.to_string()))?;

        Ok(Self {
            http,
            upload_url: upload_url.to_owned(),
            upload_preset: upload_preset.to_owned(),
        })
    }

    /// Upload `image` and return where the host stored it.
    ///
    /// # Errors
    ///
    /// Returns [Error::ImageUpload] with the host's error message, or the
    /// HTTP status text if the host did not send one.
    pub async fn upload(&self, image: ImageFile) -> Result<UploadedImage, Error> {
        let mut part = Part::bytes(image.bytes).file_name(image.file_name);

        if let Some(content_type) = image.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|error| Error::ImageUpload(error.to_string()))?;
        }

        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|error| {
                tracing::error!("Could not reach the image host: {error}");
                Error::ImageUpload(error.to_string())
            })?;

        let status = response.status();

        if !status.is_success() {
            let status_text = status
                .canonical_reason()
                .unwrap_or("Upload failed")
                .to_owned();
            let message = response
                .json::<UploadFailure>()
                .await
                .ok()
                .and_then(|failure| failure.error)
                .and_then(|detail| detail.message)
                .unwrap_or(status_text);

            tracing::error!("Image upload failed with status {status}: {message}");
            return Err(Error::ImageUpload(message));
        }

        response
            .json::<UploadedImage>()
            .await
            .map_err(|error| Error::ImageUpload(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        Json, Router,
        extract::Multipart,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::post,
    };
    use serde_json::json;

    use crate::{Error, test_utils::spawn_mock_api};

    use super::{ImageFile, ImageHost, UploadedImage};

    async fn accept_upload(mut multipart: Multipart) -> Response {
        let mut preset = None;
        let mut file_size = 0;

        while let Ok(Some(field)) = multipart.next_field().await {
            match field.name() {
                Some("upload_preset") => preset = field.text().await.ok(),
                Some("file") => file_size = field.bytes().await.map(|b| b.len()).unwrap_or(0),
                _ => {}
            }
        }

        if preset.as_deref() != Some("Spendwise") || file_size == 0 {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": {"message": "Upload preset not found"}})),
            )
                .into_response();
        }

        Json(json!({
            "secure_url": "https://images.example.com/avatar.png",
            "public_id": "avatar",
            "width": 64,
            "height": 64
        }))
        .into_response()
    }

    fn image() -> ImageFile {
        ImageFile {
            file_name: "avatar.png".to_owned(),
            content_type: Some("image/png".to_owned()),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    async fn host_with_preset(preset: &str) -> ImageHost {
        let base_url = spawn_mock_api(Router::new().route("/upload", post(accept_upload))).await;

        ImageHost::new(
            &format!("{base_url}/upload"),
            preset,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn upload_returns_secure_url() {
        let host = host_with_preset("Spendwise").await;

        let uploaded = host.upload(image()).await.unwrap();

        assert_eq!(
            uploaded,
            UploadedImage {
                secure_url: "https://images.example.com/avatar.png".to_owned(),
                public_id: "avatar".to_owned(),
                width: Some(64),
                height: Some(64),
            }
        );
    }

    #[tokio::test]
    async fn upload_failure_uses_host_message() {
        let host = host_with_preset("wrong").await;

        let result = host.upload(image()).await;

        assert_eq!(
            result,
            Err(Error::ImageUpload("Upload preset not found".to_owned()))
        );
    }

    #[tokio::test]
    async fn upload_failure_without_message_uses_status_text() {
        let base_url = spawn_mock_api(Router::new().route(
            "/upload",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await;
        let host =
            ImageHost::new(&format!("{base_url}/upload"), "Spendwise", Duration::from_secs(5))
                .unwrap();

        let result = host.upload(image()).await;

        assert_eq!(
            result,
            Err(Error::ImageUpload("Internal Server Error".to_owned()))
        );
    }
}
