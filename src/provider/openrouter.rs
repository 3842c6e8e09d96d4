// src/provider/openrouter.rs — OpenRouter (OpenAI-compatible) completion client
//
// One POST to `/chat/completions` per `complete()` call. Works against any
// endpoint that speaks the OpenAI chat schema when `base_url` is changed.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::time::Duration;

use super::credential::Credential;
use super::{CompletionRequest, ModelClient};
use crate::infra::config::ProviderConfig;
use crate::infra::errors::StudioError;

const PROVIDER_ID: &str = "openrouter";

/// Used when a 429 carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_MS: u64 = 5_000;

/// Timeout for the credential check, independent of the completion timeout.
const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

pub struct OpenRouterClient {
    credential: Credential,
    base_url: String,
    app_name: String,
    referer: Option<String>,
    default_max_tokens: u32,
    client: reqwest::Client,
}

impl OpenRouterClient {
    pub fn new(credential: Credential, base_url: impl Into<String>) -> Self {
        let defaults = ProviderConfig::default();
        Self {
            credential,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            app_name: defaults.app_name,
            referer: defaults.referer,
            default_max_tokens: defaults.max_tokens,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(credential: Credential, config: &ProviderConfig) -> Result<Self, StudioError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(format!("promptstudio/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StudioError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            credential,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_name: config.app_name.clone(),
            referer: config.referer.clone(),
            default_max_tokens: config.max_tokens,
            client,
        })
    }

    fn api_key(&self) -> Result<&str, StudioError> {
        self.credential
            .key()
            .ok_or_else(|| StudioError::missing_credential(PROVIDER_ID, self.credential.env_var()))
    }

    fn request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": request.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens.unwrap_or(self.default_max_tokens),
        })
    }

    fn with_app_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header("X-Title", &self.app_name);
        match self.referer {
            Some(ref referer) => builder.header("HTTP-Referer", referer),
            None => builder,
        }
    }

    /// Check the key against the provider's key-info endpoint without
    /// spending any tokens.
    pub async fn verify_credential(&self) -> Result<(), StudioError> {
        let key = self.api_key()?;
        let response = self
            .client
            .get(format!("{}/key", self.base_url))
            .bearer_auth(key)
            .timeout(VERIFY_TIMEOUT)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("OpenRouter credential verified");
            return Ok(());
        }
        let retry_after = retry_after_ms(response.headers());
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, retry_after, &body))
    }
}

#[async_trait]
impl ModelClient for OpenRouterClient {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, StudioError> {
        request.validate()?;
        let key = self.api_key()?;

        tracing::debug!(
            model = %request.model,
            temperature = request.temperature,
            prompt_chars = request.prompt.chars().count(),
            "Sending completion request"
        );

        let response = self
            .with_app_headers(
                self.client
                    .post(format!("{}/chat/completions", self.base_url))
                    .bearer_auth(key),
            )
            .json(&self.request_body(&request))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_ms(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, retry_after, &body));
        }

        let resp: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(e)
            } else {
                StudioError::Provider {
                    provider: PROVIDER_ID.into(),
                    message: format!("Failed to parse response: {e}"),
                }
            }
        })?;

        extract_content(&resp)
    }
}

fn transport_error(e: reqwest::Error) -> StudioError {
    let message = if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    };
    StudioError::Transport {
        provider: PROVIDER_ID.into(),
        message,
    }
}

/// `Retry-After` in milliseconds, when given as delta-seconds.
fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs.saturating_mul(1000))
}

/// Map a non-success HTTP status onto the error taxonomy.
pub(crate) fn classify_status(
    status: StatusCode,
    retry_after_ms: Option<u64>,
    body: &str,
) -> StudioError {
    let detail = provider_message(body).unwrap_or_else(|| body.trim().to_string());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StudioError::Auth {
            provider: PROVIDER_ID.into(),
            message: format!("HTTP {status}: {detail}"),
        },
        StatusCode::TOO_MANY_REQUESTS => StudioError::RateLimited {
            provider: PROVIDER_ID.into(),
            retry_after_ms: retry_after_ms.unwrap_or(DEFAULT_RETRY_AFTER_MS),
        },
        s if s.is_server_error() || s == StatusCode::REQUEST_TIMEOUT => StudioError::Transport {
            provider: PROVIDER_ID.into(),
            message: format!("HTTP {status}: {detail}"),
        },
        _ => StudioError::Provider {
            provider: PROVIDER_ID.into(),
            message: format!("HTTP {status}: {detail}"),
        },
    }
}

/// Pull `error.message` out of an OpenAI-style error body.
fn provider_message(body: &str) -> Option<String> {
    let v: serde_json::Value = serde_json::from_str(body).ok()?;
    v["error"]["message"].as_str().map(str::to_string)
}

/// Extract the completion text from a successful response body.
///
/// OpenRouter occasionally answers 200 with an `error` object instead of
/// choices (upstream provider failures); those are routed through the same
/// status mapping using the embedded code.
pub(crate) fn extract_content(resp: &serde_json::Value) -> Result<String, StudioError> {
    if resp["error"].is_object() {
        let code = resp["error"]["code"]
            .as_u64()
            .and_then(|c| u16::try_from(c).ok())
            .and_then(|c| StatusCode::from_u16(c).ok())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        return Err(classify_status(code, None, &resp.to_string()));
    }

    let choice = resp["choices"]
        .as_array()
        .and_then(|c| c.first())
        .ok_or_else(|| StudioError::Provider {
            provider: PROVIDER_ID.into(),
            message: "response contained no choices".into(),
        })?;

    Ok(choice["message"]["content"]
        .as_str()
        .unwrap_or("")
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_without_key() -> OpenRouterClient {
        // Port 9 (discard) so a stray request would fail fast rather than hit the network.
        OpenRouterClient::new(
            Credential::missing("OPENROUTER_API_KEY"),
            "http://127.0.0.1:9/api/v1/",
        )
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let c = client_without_key();
        assert_eq!(c.base_url, "http://127.0.0.1:9/api/v1");
    }

    #[test]
    fn test_request_body_shape() {
        let c = client_without_key();
        let body = c.request_body(&CompletionRequest::new("m/x", "Write a haiku", 0.5));
        assert_eq!(body["model"], "m/x");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Write a haiku");
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["max_tokens"], 1024);
    }

    #[test]
    fn test_request_body_explicit_max_tokens() {
        let c = client_without_key();
        let body =
            c.request_body(&CompletionRequest::new("m/x", "hi", 0.1).with_max_tokens(32));
        assert_eq!(body["max_tokens"], 32);
    }

    #[tokio::test]
    async fn test_missing_key_fails_with_auth() {
        let err = client_without_key()
            .complete(CompletionRequest::new("m/x", "hi", 0.5))
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::Auth { .. }));
    }

    #[tokio::test]
    async fn test_invalid_request_rejected_before_auth() {
        let err = client_without_key()
            .complete(CompletionRequest::new("m/x", "", 0.5))
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::Validation(_)));
    }

    #[tokio::test]
    async fn test_verify_without_key_fails_with_auth() {
        let err = client_without_key().verify_credential().await.unwrap_err();
        assert!(matches!(err, StudioError::Auth { .. }));
    }

    #[test]
    fn test_classify_auth() {
        let body = r#"{"error":{"message":"No auth credentials found","code":401}}"#;
        let err = classify_status(StatusCode::UNAUTHORIZED, None, body);
        match err {
            StudioError::Auth { message, .. } => {
                assert!(message.contains("No auth credentials found"))
            }
            other => panic!("expected Auth, got {other:?}"),
        }
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, None, ""),
            StudioError::Auth { .. }
        ));
    }

    #[test]
    fn test_classify_rate_limit_uses_retry_after() {
        match classify_status(StatusCode::TOO_MANY_REQUESTS, Some(7_000), "") {
            StudioError::RateLimited { retry_after_ms, .. } => assert_eq!(retry_after_ms, 7_000),
            other => panic!("expected RateLimited, got {other:?}"),
        }
        match classify_status(StatusCode::TOO_MANY_REQUESTS, None, "") {
            StudioError::RateLimited { retry_after_ms, .. } => {
                assert_eq!(retry_after_ms, DEFAULT_RETRY_AFTER_MS)
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_server_error_is_transport() {
        assert!(matches!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE, None, "down"),
            StudioError::Transport { .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, None, ""),
            StudioError::Transport { .. }
        ));
    }

    #[test]
    fn test_classify_bad_request_is_provider() {
        let err = classify_status(StatusCode::BAD_REQUEST, None, "model not found");
        match err {
            StudioError::Provider { message, .. } => assert!(message.contains("model not found")),
            other => panic!("expected Provider, got {other:?}"),
        }
    }

    #[test]
    fn test_retry_after_header_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, "3".parse().unwrap());
        assert_eq!(retry_after_ms(&headers), Some(3_000));

        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, "Wed, 21 Oct 2015 07:28:00 GMT".parse().unwrap());
        assert_eq!(retry_after_ms(&headers), None);

        assert_eq!(retry_after_ms(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, "18446744073709552".parse().unwrap());
        assert_eq!(retry_after_ms(&headers), Some(u64::MAX));
    }

    #[test]
    fn test_extract_content_ok() {
        let resp = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "Hello there" } }]
        });
        assert_eq!(extract_content(&resp).unwrap(), "Hello there");
    }

    #[test]
    fn test_extract_content_null_content_is_empty() {
        let resp = serde_json::json!({ "choices": [{ "message": { "content": null } }] });
        assert_eq!(extract_content(&resp).unwrap(), "");
    }

    #[test]
    fn test_extract_content_no_choices() {
        let resp = serde_json::json!({ "choices": [] });
        assert!(matches!(
            extract_content(&resp),
            Err(StudioError::Provider { .. })
        ));
    }

    #[test]
    fn test_extract_content_embedded_error() {
        let resp = serde_json::json!({ "error": { "code": 429, "message": "slow down" } });
        assert!(matches!(
            extract_content(&resp),
            Err(StudioError::RateLimited { .. })
        ));

        let resp = serde_json::json!({ "error": { "message": "upstream exploded" } });
        assert!(matches!(
            extract_content(&resp),
            Err(StudioError::Transport { .. })
        ));
    }
}
