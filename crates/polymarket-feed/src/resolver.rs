//! Build identifier discovery
//!
//! The markets listing page is server-rendered HTML with the Next.js build
//! identifier embedded as `"buildId":"<value>"`. The resolver fetches the
//! page, isolates the value, and holds it for the fetcher. Validity cannot
//! be known in advance; staleness only shows up as a 404 on the data
//! endpoint, at which point the fetcher asks for a refresh.
//!
//! The resolver never retries on its own; callers decide when to invoke it.

use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::error::FeedError;
use crate::MARKETS_PAGE_PATH;

/// Literal marker preceding the build identifier in the page HTML
const BUILD_ID_MARKER: &str = "\"buildId\":\"";

/// Stateful holder of the current build identifier
///
/// Single-writer discipline: one owner calls `refresh`, so readers always
/// observe either the prior or the newly resolved value.
pub struct BuildIdResolver {
    client: Client,
    page_url: String,
    current: Option<String>,
}

impl BuildIdResolver {
    /// Create a resolver targeting `<base_url>/markets/crypto`
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            page_url: format!("{}{}", base_url.trim_end_matches('/'), MARKETS_PAGE_PATH),
            current: None,
        }
    }

    /// The identifier from the most recent successful refresh, if any
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Fetch the listing page and extract a fresh build identifier
    ///
    /// On success the held identifier is replaced wholesale; on any failure
    /// it is left untouched.
    pub async fn refresh(&mut self) -> Result<String, FeedError> {
        debug!("GET {}", self.page_url);

        let response = self
            .client
            .get(&self.page_url)
            .send()
            .await
            .map_err(FeedError::Network)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FeedError::UnexpectedStatus(status));
        }

        let body = response.text().await.map_err(FeedError::Network)?;

        let build_id = extract_build_id(&body)
            .ok_or_else(|| FeedError::parse("build id marker not found in page body"))?;

        info!("resolved build id: {}", build_id);
        self.current = Some(build_id.to_string());
        Ok(build_id.to_string())
    }
}

/// Isolate the token between the marker and the next quote character.
/// Returns None when the marker is absent or the token is empty.
fn extract_build_id(body: &str) -> Option<&str> {
    let after = &body[body.find(BUILD_ID_MARKER)? + BUILD_ID_MARKER.len()..];
    let token = &after[..after.find('"')?];
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client() -> Client {
        Client::new()
    }

    #[test]
    fn test_extract_build_id() {
        let body = r#"<script>{"props":{},"buildId":"abc123XYZ","page":"/markets/[slug]"}</script>"#;
        assert_eq!(extract_build_id(body), Some("abc123XYZ"));
    }

    #[test]
    fn test_extract_build_id_missing_marker() {
        assert_eq!(extract_build_id("<html>no marker here</html>"), None);
    }

    #[test]
    fn test_extract_build_id_empty_token() {
        assert_eq!(extract_build_id(r#""buildId":"""#), None);
    }

    #[tokio::test]
    async fn test_refresh_updates_current() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/markets/crypto"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<html>"buildId":"deploy-42"</html>"#),
            )
            .mount(&server)
            .await;

        let mut resolver = BuildIdResolver::new(test_client(), &server.uri());
        assert_eq!(resolver.current(), None);

        let id = resolver.refresh().await.unwrap();
        assert_eq!(id, "deploy-42");
        assert_eq!(resolver.current(), Some("deploy-42"));
    }

    #[tokio::test]
    async fn test_refresh_parse_failure_keeps_previous_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/markets/crypto"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<html>"buildId":"deploy-42"</html>"#),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/markets/crypto"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>redeploying</html>"))
            .mount(&server)
            .await;

        let mut resolver = BuildIdResolver::new(test_client(), &server.uri());
        resolver.refresh().await.unwrap();

        let err = resolver.refresh().await.unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
        assert_eq!(resolver.current(), Some("deploy-42"));
    }

    #[tokio::test]
    async fn test_refresh_non_200_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/markets/crypto"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut resolver = BuildIdResolver::new(test_client(), &server.uri());
        let err = resolver.refresh().await.unwrap_err();
        assert!(matches!(err, FeedError::UnexpectedStatus(s) if s.as_u16() == 503));
        assert_eq!(resolver.current(), None);
    }
}
