//! URL fetch action handler.
//!
//! Downloads a remote resource over HTTP(S) and saves the body verbatim.
//! Backs both the "fetch api data" and "scrape website" entries.

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::handler::fs;
use crate::handler::{ActionContext, ActionHandler};
use crate::types::ActionKind;

pub struct FetchUrlHandler {
    kind: ActionKind,
    client: reqwest::Client,
    message: &'static str,
}

impl FetchUrlHandler {
    pub fn new(kind: ActionKind, client: reqwest::Client, message: &'static str) -> Self {
        Self {
            kind,
            client,
            message,
        }
    }

    pub fn api_data(client: reqwest::Client) -> Self {
        Self::new(ActionKind::FetchApiData, client, "API data saved.")
    }

    pub fn scrape_website(client: reqwest::Client) -> Self {
        Self::new(ActionKind::ScrapeWebsite, client, "Website data scraped.")
    }
}

/// Only `http://` and `https://` URLs are fetched.
pub fn parse_http_url(raw: &str) -> Result<url::Url, HandlerError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| HandlerError::domain(format!("invalid URL '{}': {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(HandlerError::domain(format!(
            "Unsupported URL scheme. Only http:// and https:// are allowed, got: {}",
            other
        ))),
    }
}

#[async_trait]
impl ActionHandler for FetchUrlHandler {
    fn kind(&self) -> ActionKind {
        self.kind
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<String, HandlerError> {
        let url = parse_http_url(ctx.param("url")?)?;
        let output = ctx.target("output")?.clone();

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            HandlerError::domain(format!("{} failed: request to {} failed: {}", self.kind, url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HandlerError::domain(format!(
                "{} failed: {} returned HTTP {}",
                self.kind, url, status
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            HandlerError::domain(format!("{} failed: reading body from {}: {}", self.kind, url, e))
        })?;
        let size = body.len();

        fs::blocking(move || fs::write_output(&output, &body)).await?;

        tracing::info!(action = %self.kind, url = %url, bytes = size, "Remote content saved");
        Ok(self.message.to_string())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::handler::testing::{services_with_tool, spec, Sandbox};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    /// Serve `router` on an ephemeral local port and return its base URL.
    pub(crate) async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_saves_body() {
        let base = serve(Router::new().route("/data", get(|| async { "{\"ok\":true}" }))).await;
        let sandbox = Sandbox::new();
        let url = format!("{}/data", base);
        let ctx = sandbox.context(spec(ActionKind::FetchApiData), &[("url", url.as_str())]);

        let handler = FetchUrlHandler::api_data(services_with_tool("true").http);
        let msg = handler.execute(&ctx).await.unwrap();

        assert_eq!(msg, "API data saved.");
        assert_eq!(sandbox.read("api_output.txt"), "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_scrape_writes_its_own_output() {
        let base = serve(Router::new().route("/", get(|| async { "<h1>Hi</h1>" }))).await;
        let sandbox = Sandbox::new();
        let ctx = sandbox.context(spec(ActionKind::ScrapeWebsite), &[("url", base.as_str())]);

        let handler = FetchUrlHandler::scrape_website(services_with_tool("true").http);
        assert_eq!(handler.execute(&ctx).await.unwrap(), "Website data scraped.");
        assert_eq!(sandbox.read("scraped_data.txt"), "<h1>Hi</h1>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_domain_error() {
        let base = serve(Router::new().route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, "nope") }),
        ))
        .await;
        let sandbox = Sandbox::new();
        let url = format!("{}/missing", base);
        let ctx = sandbox.context(spec(ActionKind::FetchApiData), &[("url", url.as_str())]);

        let handler = FetchUrlHandler::api_data(services_with_tool("true").http);
        let err = handler.execute(&ctx).await.unwrap_err();
        assert!(matches!(err, HandlerError::Domain(msg) if msg.contains("404")));
        assert!(!sandbox.path("api_output.txt").exists());
    }

    #[tokio::test]
    async fn test_unsupported_scheme_is_domain_error() {
        let sandbox = Sandbox::new();
        let ctx = sandbox.context(
            spec(ActionKind::FetchApiData),
            &[("url", "file:///etc/passwd")],
        );
        let handler = FetchUrlHandler::api_data(services_with_tool("true").http);
        let err = handler.execute(&ctx).await.unwrap_err();
        assert!(matches!(err, HandlerError::Domain(msg) if msg.contains("Unsupported URL scheme")));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_domain_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let sandbox = Sandbox::new();
        let url = format!("http://127.0.0.1:{}/", port);
        let ctx = sandbox.context(spec(ActionKind::FetchApiData), &[("url", url.as_str())]);
        let handler = FetchUrlHandler::api_data(services_with_tool("true").http);
        assert!(matches!(
            handler.execute(&ctx).await,
            Err(HandlerError::Domain(_))
        ));
    }

    #[test]
    fn test_parse_http_url() {
        assert!(parse_http_url("https://example.com/x?y=1").is_ok());
        assert!(parse_http_url("not a url").is_err());
        assert!(parse_http_url("javascript:alert(1)").is_err());
    }
}
