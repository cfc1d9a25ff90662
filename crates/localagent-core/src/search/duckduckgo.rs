//! DuckDuckGo HTML search (no API key)

use super::{WebResult, WebSearch};
use crate::config::WebSearchConfig;
use crate::error::{LocalAgentError, Result};
use crate::llm::{check_status, transport_error};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RESULT_LINK_RE: Regex =
        Regex::new(r#"(?s)<a[^>]*class="result__a"[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#).unwrap();
    static ref SNIPPET_RE: Regex =
        Regex::new(r#"(?s)<a[^>]*class="result__snippet"[^>]*>(.*?)</a>"#).unwrap();
    static ref TAG_RE: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Web search through the DuckDuckGo HTML front-end
pub struct DuckDuckGoSearch {
    http_client: reqwest::Client,
    config: WebSearchConfig,
}

impl DuckDuckGoSearch {
    pub fn new(config: WebSearchConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("Mozilla/5.0 (compatible; localagent/", env!("CARGO_PKG_VERSION"), ")"));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            config,
        })
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebResult>> {
        if !self.config.enabled {
            return Err(LocalAgentError::Transport(
                "Web search is disabled in configuration".to_string(),
            ));
        }

        let url = &self.config.url;
        let response = self
            .http_client
            .get(url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;
        let response = check_status(response, "Web search").await?;

        let html = response.text().await.map_err(|e| {
            LocalAgentError::Transport(format!("Failed to read web search response: {}", e))
        })?;

        let results = parse_results(&html, max_results);
        tracing::info!("Web search found {} result(s) for: {}", results.len(), query);
        Ok(results)
    }

    fn backend_name(&self) -> &str {
        "duckduckgo"
    }
}

/// Extract up to `max_results` organic results from a results page
fn parse_results(html: &str, max_results: usize) -> Vec<WebResult> {
    let links: Vec<_> = RESULT_LINK_RE.captures_iter(html).collect();
    let mut results = Vec::new();

    for (i, caps) in links.iter().enumerate() {
        if results.len() >= max_results {
            break;
        }

        let (Some(whole), Some(href), Some(title)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };

        let url = resolve_href(&decode_entities(href.as_str()));
        // Sponsored results redirect through the ad click endpoint
        if url.is_empty() || url.contains("duckduckgo.com/y.js") {
            continue;
        }

        let region_end = links
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(html.len());
        let snippet = SNIPPET_RE
            .captures(&html[whole.end()..region_end])
            .and_then(|c| c.get(1))
            .map(|m| clean_text(m.as_str()))
            .unwrap_or_default();

        results.push(WebResult {
            title: clean_text(title.as_str()),
            url,
            snippet,
        });
    }

    results
}

/// Unwrap `//duckduckgo.com/l/?uddg=<target>` redirect links
fn resolve_href(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    match reqwest::Url::parse(&absolute) {
        Ok(parsed) => parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned())
            .unwrap_or(absolute),
        Err(_) => absolute,
    }
}

fn clean_text(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, "");
    let decoded = decode_entities(&stripped);
    WHITESPACE_RE.replace_all(decoded.trim(), " ").to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<div class="result results_links results_links_deep result--ad">
  <a rel="nofollow" class="result__a" href="https://duckduckgo.com/y.js?ad_provider=x">Buy stuff</a>
  <a class="result__snippet" href="https://duckduckgo.com/y.js?ad_provider=x">Ad copy</a>
</div>
<div class="result results_links results_links_deep web-result">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.elastic.co%2Fblog%2Frelease&amp;rut=abc">Elasticsearch <b>9.0</b> released</a>
  </h2>
  <a class="result__snippet" href="//duckduckgo.com/l/?uddg=x">The <b>latest</b> release adds &quot;better binary quantization&quot;.</a>
</div>
<div class="result results_links results_links_deep web-result">
  <a rel="nofollow" class="result__a" href="https://example.com/no-snippet">Plain   result</a>
</div>
<div class="result results_links results_links_deep web-result">
  <a rel="nofollow" class="result__a" href="https://example.com/third">Third</a>
  <a class="result__snippet" href="https://example.com/third">Third snippet</a>
</div>
"#;

    #[test]
    fn test_parse_results_skips_ads_and_decodes() {
        let results = parse_results(PAGE, 10);
        assert_eq!(results.len(), 3);

        assert_eq!(results[0].title, "Elasticsearch 9.0 released");
        assert_eq!(results[0].url, "https://www.elastic.co/blog/release");
        assert_eq!(
            results[0].snippet,
            "The latest release adds \"better binary quantization\"."
        );

        assert_eq!(results[1].title, "Plain result");
        assert_eq!(results[1].snippet, "");
        assert_eq!(results[2].snippet, "Third snippet");
    }

    #[test]
    fn test_parse_results_respects_max() {
        let results = parse_results(PAGE, 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://www.elastic.co/blog/release");
    }

    #[test]
    fn test_parse_results_empty_page() {
        assert!(parse_results("<html><body>No results.</body></html>", 3).is_empty());
    }

    #[test]
    fn test_resolve_href_passthrough() {
        assert_eq!(resolve_href("https://example.com/a"), "https://example.com/a");
    }

    #[tokio::test]
    async fn test_disabled_search_is_transport_error() {
        let config = WebSearchConfig {
            enabled: false,
            ..WebSearchConfig::default()
        };
        let search = DuckDuckGoSearch::new(config).unwrap();
        let err = search.search("anything", 3).await.unwrap_err();
        assert!(err.is_transport());
    }
}
