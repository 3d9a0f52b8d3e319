//! Timeout-bounded calls to downstream services
//!
//! Every way a call can end is a `CallOutcome` variant, so callers match
//! all of them exhaustively instead of unwinding through error chains.

use std::time::Duration;

use bytes::Bytes;
use http::StatusCode;
use url::Url;

use crate::error::Result;

/// Outcome of a single downstream call.
#[derive(Debug)]
pub enum CallOutcome {
    /// The downstream produced an HTTP response. Any status code counts,
    /// 4xx and 5xx included; interpreting it is the caller's business.
    Response { status: StatusCode, body: Bytes },
    /// No response within the deadline.
    TimedOut,
    /// Transport failure: connection refused or reset, DNS failure,
    /// malformed response.
    Failed(String),
}

/// Shared outbound HTTP client.
///
/// Cloning is cheap; clones share the same connection pool. Deadlines are
/// per call, not per client, because each forwarding route carries its own
/// timeout.
#[derive(Debug, Clone)]
pub struct DownstreamClient {
    client: reqwest::Client,
}

impl DownstreamClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    /// POST `body` to `url` as JSON, bounded by `timeout`.
    ///
    /// The deadline covers the whole exchange, response body included.
    pub async fn post_json(&self, url: Url, body: Bytes, timeout: Duration) -> CallOutcome {
        let request = self
            .client
            .post(url)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body)
            .timeout(timeout);

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) if err.is_timeout() => return CallOutcome::TimedOut,
            Err(err) => return CallOutcome::Failed(describe(&err)),
        };

        let status = response.status();
        match response.bytes().await {
            Ok(body) => CallOutcome::Response { status, body },
            Err(err) if err.is_timeout() => CallOutcome::TimedOut,
            Err(err) => CallOutcome::Failed(describe(&err)),
        }
    }
}

/// Flatten a reqwest error and its source chain into one diagnostic line.
/// The top-level message alone ("error sending request") hides the part an
/// operator needs, such as "connection refused".
fn describe(err: &reqwest::Error) -> String {
    use std::error::Error as _;

    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> DownstreamClient {
        DownstreamClient::new().expect("client builds")
    }

    fn target(server: &MockServer, path: &str) -> Url {
        format!("{}{path}", server.uri()).parse().expect("mock url")
    }

    #[tokio::test]
    async fn test_response_is_returned_with_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/validate"))
            .respond_with(
                ResponseTemplate::new(503).set_body_string(r#"{"error":"overloaded"}"#),
            )
            .mount(&server)
            .await;

        let url = target(&server, "/validate");
        let outcome = client()
            .post_json(url, Bytes::from_static(b"{}"), Duration::from_secs(1))
            .await;

        match outcome {
            CallOutcome::Response { status, body } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(&body[..], br#"{"error":"overloaded"}"#);
            }
            other => panic!("expected a response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_downstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let url = target(&server, "/validate");
        let outcome = client()
            .post_json(url, Bytes::from_static(b"{}"), Duration::from_millis(50))
            .await;

        assert!(matches!(outcome, CallOutcome::TimedOut));
    }

    #[tokio::test]
    async fn test_refused_connection_fails_with_reason() {
        // Grab a local port, then free it by dropping the server.
        let server = MockServer::start().await;
        let url = target(&server, "/validate");
        drop(server);

        let outcome = client()
            .post_json(url, Bytes::from_static(b"{}"), Duration::from_secs(1))
            .await;

        match outcome {
            CallOutcome::Failed(reason) => assert!(!reason.is_empty()),
            other => panic!("expected a failure, got {other:?}"),
        }
    }
}
