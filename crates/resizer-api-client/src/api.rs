//! Domain methods for the resizer API client.

use crate::{check_status, ClientError, ClientResult, ResizePath, ResizerClient};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use resizer_core::{
    FitMode, ResizeRequest, StagedResize, StagedResizeRequest, Transition, UploadUrlResponse,
};

/// Resize parameters as the caller states them. `None` leaves the value to the
/// server: an omitted side is inferred from the aspect ratio, quality defaults
/// to 75 and fit to cover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeParams {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u8>,
    pub fit: Option<FitMode>,
}

impl ResizeParams {
    pub fn to_request(&self) -> ResizeRequest {
        ResizeRequest {
            width: self.width.map(|w| w.to_string()),
            height: self.height.map(|h| h.to_string()),
            quality: self.quality.map(|q| q.to_string()),
            fit: self.fit.map(|f| f.as_str().to_string()),
        }
    }

    /// Form fields for `POST /resize`, omitting unset values.
    fn form_fields(&self) -> Vec<(&'static str, String)> {
        let request = self.to_request();
        [
            ("width", request.width),
            ("height", request.height),
            ("quality", request.quality),
            ("fit", request.fit),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

/// Extension used for the staged object key: the text after the last dot of
/// the file name.
pub fn extension_of(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

fn file_part(data: Vec<u8>, filename: &str) -> Part {
    Part::bytes(data).file_name(filename.to_string())
}

impl ResizerClient {
    /// Resize `data`, choosing the direct or staged route by its size.
    pub async fn resize_bytes(
        &self,
        data: Vec<u8>,
        filename: &str,
        params: &ResizeParams,
    ) -> ClientResult<Bytes> {
        let path = ResizePath::for_size(data.len() as u64);
        tracing::debug!(size_bytes = data.len(), path = ?path, "Resizing");

        match path {
            ResizePath::Direct => self.resize_direct(data, filename, params).await,
            ResizePath::Staged => {
                let key = self.stage_upload(data, filename).await?;
                self.resize_staged(&key, params).await
            }
        }
    }

    /// `POST /resize` with the image inline.
    pub async fn resize_direct(
        &self,
        data: Vec<u8>,
        filename: &str,
        params: &ResizeParams,
    ) -> ClientResult<Bytes> {
        let form = params
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
            .part("image", file_part(data, filename));

        let response = self
            .client()
            .post(self.build_url("/resize"))
            .multipart(form)
            .send()
            .await?;

        Ok(check_status(response).await?.bytes().await?)
    }

    /// `GET /upload-url`, forwarding the file extension when there is one.
    pub async fn request_upload_url(&self, ext: Option<&str>) -> ClientResult<UploadUrlResponse> {
        let mut request = self.client().get(self.build_url("/upload-url"));
        if let Some(ext) = ext {
            request = request.query(&[("ext", ext)]);
        }

        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// POST the file to storage using a presigned authorization.
    ///
    /// Sends every authorization field followed by the `file` part and returns
    /// the object key on a 2xx answer.
    pub async fn upload_to_storage(
        &self,
        authorization: &UploadUrlResponse,
        data: Vec<u8>,
        filename: &str,
    ) -> ClientResult<String> {
        let key = authorization
            .key()
            .ok_or(ClientError::MissingKey)?
            .to_string();

        let form = authorization
            .fields
            .iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            })
            .part("file", file_part(data, filename));

        let response = self
            .client()
            .post(&authorization.url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::Upload {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(key = %key, "Staged upload stored");
        Ok(key)
    }

    /// Authorize and perform a staged upload, returning the object key.
    pub async fn stage_upload(&self, data: Vec<u8>, filename: &str) -> ClientResult<String> {
        let stage = StagedResize::new();

        let authorization = match self.request_upload_url(extension_of(filename)).await {
            Ok(authorization) => authorization,
            Err(e) => return Err(fail(stage, e)),
        };

        let stage = stage.apply(Transition::BeginUpload)?;
        let key = match self.upload_to_storage(&authorization, data, filename).await {
            Ok(key) => key,
            Err(e) => return Err(fail(stage, e)),
        };

        let stage = stage.apply(Transition::UploadSucceeded { key })?;
        tracing::debug!(stage = stage.name(), key = stage.key(), "Staged upload complete");

        stage.key().map(str::to_string).ok_or(ClientError::MissingKey)
    }

    /// `POST /resize/staged` for an object that is already in storage.
    pub async fn resize_staged(&self, key: &str, params: &ResizeParams) -> ClientResult<Bytes> {
        let body = StagedResizeRequest {
            key: Some(key.to_string()),
            params: params.to_request(),
        };

        let response = self
            .client()
            .post(self.build_url("/resize/staged"))
            .json(&body)
            .send()
            .await?;

        Ok(check_status(response).await?.bytes().await?)
    }
}

fn fail(stage: StagedResize, err: ClientError) -> ClientError {
    match stage.apply(Transition::Fail) {
        Ok(failed) => tracing::warn!(state = ?failed, error = %err, "Staged upload failed"),
        Err(e) => tracing::warn!(error = %e, "Staged upload failed in a terminal state"),
    }
    err
}
