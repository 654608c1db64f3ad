//! Transport seam between the form and the scoring endpoint.
//!
//! `ScreeningApi` only moves bytes and decodes JSON; deciding whether a reply
//! is a success or a failure is the controller's job.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use crate::client::files::SelectedFile;
use crate::client::ClientError;
use crate::models::candidate::ScreenReplyBody;

/// Payload of one submission.
#[derive(Debug, Clone)]
pub struct ScreenRequest {
    pub job_description: SelectedFile,
    pub resumes: Vec<SelectedFile>,
    pub special_instructions: String,
}

/// A decoded reply, whatever its status.
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: u16,
    pub body: ScreenReplyBody,
}

impl ApiReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait ScreeningApi: Send + Sync {
    /// Sends the request. `Err` means no decodable reply was obtained.
    async fn screen(&self, request: ScreenRequest) -> Result<ApiReply, ClientError>;
}

/// `POST {base_url}/screen` as multipart form data.
#[derive(Clone)]
pub struct HttpScreeningApi {
    client: Client,
    endpoint: String,
}

impl HttpScreeningApi {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/screen", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn file_part(file: &SelectedFile) -> Part {
    Part::bytes(file.data.to_vec()).file_name(file.name.clone())
}

/// Builds the multipart body: `job_description`, repeated `resumes`, `special_instructions`.
pub fn build_form(request: &ScreenRequest) -> Form {
    let form = Form::new().part("job_description", file_part(&request.job_description));
    request
        .resumes
        .iter()
        .fold(form, |form, file| form.part("resumes", file_part(file)))
        .text("special_instructions", request.special_instructions.clone())
}

#[async_trait]
impl ScreeningApi for HttpScreeningApi {
    async fn screen(&self, request: ScreenRequest) -> Result<ApiReply, ClientError> {
        debug!(
            endpoint = %self.endpoint,
            resumes = request.resumes.len(),
            "Submitting screening request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(build_form(&request))
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .json::<ScreenReplyBody>()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(ApiReply { status, body })
    }
}
