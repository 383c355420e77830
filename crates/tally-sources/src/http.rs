//! Response handling shared by the Harvest and GitHub clients.
//!
//! Both services signal throttling with `429` and an optional `Retry-After`,
//! report other failures as non-2xx statuses with a text or JSON body, and
//! return JSON arrays on success. GitHub additionally pages its issue list
//! through the `Link` header.

use reqwest::header::{HeaderMap, LINK, RETRY_AFTER};
use serde::de::DeserializeOwned;

use crate::error::SourceError;

/// Fallback wait when a throttled response names none.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Turn a throttled or failed Harvest/GitHub response into a [`SourceError`].
///
/// A `429` becomes [`SourceError::RateLimited`]; any other non-2xx status
/// becomes [`SourceError::Api`] carrying the body the service sent back.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, SourceError> {
    let status = resp.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(SourceError::RateLimited {
            retry_after_secs: retry_after_secs(resp.headers()),
        });
    }
    if status.is_success() {
        return Ok(resp);
    }

    let message = resp.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), %message, "request rejected");
    Err(SourceError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Decode a JSON body, naming `what` was being read on failure.
pub async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
    what: &str,
) -> Result<T, SourceError> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| SourceError::Parse(format!("{what}: {e}")))
}

/// Whether a `Link` header announces a further page.
pub fn has_next_page(headers: &HeaderMap) -> bool {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.to_ascii_lowercase().contains("rel=\"next\""))
}

/// Seconds to wait according to `Retry-After`. HTTP-date values are not used
/// by either service and fall back to the default.
fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;
    use rstest::rstest;

    use super::*;

    fn response(status: u16, headers: &[(&str, &str)], body: &'static str) -> reqwest::Response {
        let mut builder = ::http::Response::builder().status(status);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        reqwest::Response::from(builder.body(body).unwrap())
    }

    fn mock_json(body: &'static str) -> reqwest::Response {
        response(200, &[], body)
    }

    #[rstest]
    #[case(Some("120"), 120)]
    #[case(Some(" 5 "), 5)]
    #[case(Some("Wed, 21 Oct 2015 07:28:00 GMT"), 60)]
    #[case(None, 60)]
    fn retry_after_reads_seconds(#[case] value: Option<&str>, #[case] expected: u64) {
        let mut headers = HeaderMap::new();
        if let Some(value) = value {
            headers.insert(RETRY_AFTER, HeaderValue::from_str(value).unwrap());
        }
        assert_eq!(retry_after_secs(&headers), expected);
    }

    #[tokio::test]
    async fn github_secondary_rate_limit_is_rate_limited() {
        let resp = response(429, &[("retry-after", "30")], r#"{"message":"API rate limit exceeded"}"#);
        assert!(matches!(
            check_response(resp).await.unwrap_err(),
            SourceError::RateLimited {
                retry_after_secs: 30
            }
        ));
    }

    #[tokio::test]
    async fn harvest_auth_failure_keeps_body() {
        let resp = response(401, &[], "Authentication failed");
        match check_response(resp).await.unwrap_err() {
            SourceError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Authentication failed");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn successful_response_passes_through() {
        assert!(check_response(response(200, &[], "[]")).await.is_ok());
    }

    #[tokio::test]
    async fn read_json_reports_what_failed() {
        let err = read_json::<Vec<u64>>(mock_json("{\"oops\":"), "github issues")
            .await
            .unwrap_err();
        match err {
            SourceError::Parse(message) => assert!(message.starts_with("github issues: ")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn read_json_decodes_body() {
        let values: Vec<u64> = read_json(mock_json("[1, 2, 3]"), "numbers").await.unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }

    fn link(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(LINK, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[rstest]
    #[case(r#"<https://api.github.com/repositories/1/issues?page=2>; rel="next", <https://api.github.com/repositories/1/issues?page=5>; rel="last""#, true)]
    #[case(r#"<https://api.github.com/repositories/1/issues?page=1>; rel="prev", <https://api.github.com/repositories/1/issues?page=1>; rel="first""#, false)]
    #[case(r#"<https://x/?page=2>; REL="NEXT""#, true)]
    fn link_header_announces_next_page(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(has_next_page(&link(value)), expected);
    }

    #[test]
    fn missing_link_header_means_last_page() {
        assert!(!has_next_page(&HeaderMap::new()));
    }
}
