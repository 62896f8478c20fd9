//! OpenAI transport trait and reqwest-based HTTP implementation.

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use crate::{ProviderError, ProviderFuture};

use super::serde_api::{
    OpenAiApiChatResponse, OpenAiApiImageRequest, OpenAiApiImageResponse, OpenAiApiSpeechRequest,
    build_chat_api_request, extract_error_message,
};
use super::types::{
    OpenAiAuth, OpenAiChatRequest, OpenAiChatResponse, OpenAiImageRequest, OpenAiImageResponse,
    OpenAiSpeechRequest, OpenAiSpeechResponse,
};

pub trait OpenAiTransport: Send + Sync + std::fmt::Debug {
    fn complete<'a>(
        &'a self,
        request: OpenAiChatRequest,
        auth: OpenAiAuth,
    ) -> ProviderFuture<'a, Result<OpenAiChatResponse, ProviderError>>;

    fn generate_image<'a>(
        &'a self,
        request: OpenAiImageRequest,
        auth: OpenAiAuth,
    ) -> ProviderFuture<'a, Result<OpenAiImageResponse, ProviderError>>;

    fn synthesize_speech<'a>(
        &'a self,
        request: OpenAiSpeechRequest,
        auth: OpenAiAuth,
    ) -> ProviderFuture<'a, Result<OpenAiSpeechResponse, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct OpenAiHttpTransport {
    client: Client,
    base_url: String,
}

impl OpenAiHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
        auth: &OpenAiAuth,
    ) -> Result<Response, ProviderError> {
        let OpenAiAuth::ApiKey(key) = auth;
        let response = self
            .client
            .post(self.endpoint(path))
            .bearer_auth(key.expose())
            .json(body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ProviderError::timeout(err.to_string())
                } else {
                    ProviderError::transport(err.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_status(status, &body));
        }

        Ok(response)
    }
}

/// Maps a non-success HTTP status and body to a typed error, keeping the
/// parsed JSON envelope when the body is one.
pub(crate) fn error_from_status(status: StatusCode, body: &str) -> ProviderError {
    let envelope = serde_json::from_str::<Value>(body).ok();
    let message = envelope
        .as_ref()
        .and_then(extract_error_message)
        .unwrap_or_else(|| format!("OpenAI request failed with status {status}"));

    let error = match status {
        StatusCode::UNAUTHORIZED => ProviderError::authentication(message),
        StatusCode::FORBIDDEN => ProviderError::permission_denied(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ProviderError::timeout(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ProviderError::invalid_request(message)
        }
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
            ProviderError::unavailable(message)
        }
        _ => ProviderError::rejected(message),
    };

    match envelope {
        Some(envelope) => error.with_envelope(envelope),
        None => error,
    }
}

impl OpenAiTransport for OpenAiHttpTransport {
    fn complete<'a>(
        &'a self,
        request: OpenAiChatRequest,
        auth: OpenAiAuth,
    ) -> ProviderFuture<'a, Result<OpenAiChatResponse, ProviderError>> {
        Box::pin(async move {
            let api_request = build_chat_api_request(request)?;
            let response = self.post("chat/completions", &api_request, &auth).await?;
            let parsed: OpenAiApiChatResponse = response
                .json()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))?;

            OpenAiChatResponse::try_from(parsed)
        })
    }

    fn generate_image<'a>(
        &'a self,
        request: OpenAiImageRequest,
        auth: OpenAiAuth,
    ) -> ProviderFuture<'a, Result<OpenAiImageResponse, ProviderError>> {
        Box::pin(async move {
            let api_request = OpenAiApiImageRequest::from(request);
            let response = self.post("images/generations", &api_request, &auth).await?;
            let parsed: OpenAiApiImageResponse = response
                .json()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))?;

            OpenAiImageResponse::try_from(parsed)
        })
    }

    fn synthesize_speech<'a>(
        &'a self,
        request: OpenAiSpeechRequest,
        auth: OpenAiAuth,
    ) -> ProviderFuture<'a, Result<OpenAiSpeechResponse, ProviderError>> {
        Box::pin(async move {
            let api_request = OpenAiApiSpeechRequest::from(request);
            let response = self.post("audio/speech", &api_request, &auth).await?;
            let mime_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("audio/mpeg")
                .to_string();
            let audio = response
                .bytes()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))?;

            Ok(OpenAiSpeechResponse {
                mime_type,
                audio: audio.to_vec(),
            })
        })
    }
}
