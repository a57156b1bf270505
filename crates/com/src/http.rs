use {
    crate::ComError,
    reqwest::multipart::{Form, Part},
};

/// Posts files to a fixed endpoint and returns the response body.
///
/// No timeout is configured: a request that never answers keeps its future
/// pending until the caller drops it.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    url: String,
}

impl HttpClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Upload `bytes` as a single multipart form field.
    ///
    /// Non-success status codes are reported as `ComError::Status` with the
    /// response body attached.
    pub async fn post_file(
        &self,
        field: &str,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ComError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part(field.to_string(), part);

        let response = self.client.post(&self.url).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ComError::Status(status.as_u16(), body));
        }
        if body.len() > crate::MAX_MESSAGE_SIZE {
            return Err(ComError::MessageTooLarge(body.len()));
        }
        Ok(body)
    }
}
