use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Non-content nodes, removed group by group in this order.
const BLOCKLIST: &[&str] = &[
    "script, style, noscript, iframe, nav, footer, header, aside",
    ".sidebar, .advertisement, .ads, .social-share, .comments, .related-posts",
    "#sidebar, #ads, #comments, #social-share, #related-posts",
];

/// Primary-content candidates, most specific first.
const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role=\"main\"]",
    ".main-content",
    ".content",
    ".post-content",
    ".entry-content",
    ".article-content",
];

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to fetch URL: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Failed to fetch URL: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct ExtractService {
    client: Client,
}

impl ExtractService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn extract(&self, url: &Url) -> Result<String, FetchError> {
        tracing::info!(%url, "Fetching page for text extraction");

        let response = self
            .client
            .get(url.clone())
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let html = response.text().await?;
        let text = extract_main_text(&html);
        tracing::info!(%url, chars = text.chars().count(), "Extracted page text");
        Ok(text)
    }
}

/// Accepts only absolute http(s) URLs.
pub fn parse_page_url(raw: &str) -> Option<Url> {
    Url::parse(raw.trim())
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
}

pub fn extract_main_text(html: &str) -> String {
    let mut document = Html::parse_document(html);
    strip_blocklisted(&mut document);

    let root = document.root_element();
    let text = CONTENT_SELECTORS
        .iter()
        .filter_map(|sel| Selector::parse(sel).ok())
        .map(|sel| root.select(&sel).collect::<Vec<_>>())
        .find(|matches| !matches.is_empty())
        .map(|matches| matches.iter().map(element_text).collect::<String>())
        .unwrap_or_default();

    let text = if text.is_empty() {
        body_text(&document)
    } else {
        text
    };

    normalize_text(&text)
}

fn strip_blocklisted(document: &mut Html) {
    for group in BLOCKLIST {
        let Ok(selector) = Selector::parse(group) else {
            continue;
        };
        // Walk from the root so already detached subtrees are skipped.
        let ids: Vec<_> = document
            .root_element()
            .select(&selector)
            .map(|el| el.id())
            .collect();
        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }
}

fn body_text(document: &Html) -> String {
    let root = document.root_element();
    Selector::parse("body")
        .ok()
        .and_then(|sel| root.select(&sel).next())
        .map(|body| element_text(&body))
        .unwrap_or_else(|| element_text(&root))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

pub fn normalize_text(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    BLANK_LINES.replace_all(&collapsed, "\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_wins_over_navigation() {
        let html = "<html><body><nav>X</nav><article>Hello world</article></body></html>";
        assert_eq!(extract_main_text(html), "Hello world");
    }

    #[test]
    fn first_matching_selector_is_not_merged_with_later_ones() {
        let html = r#"<html><body>
            <div class="content">Sidebar-ish content</div>
            <main><p>Main one</p></main>
            <article>Article text</article>
        </body></html>"#;
        assert_eq!(extract_main_text(html), "Main one");
    }

    #[test]
    fn all_matches_of_the_winning_selector_are_kept() {
        let html = "<body><article>First</article><article> Second</article></body>";
        assert_eq!(extract_main_text(html), "First Second");
    }

    #[test]
    fn blocklisted_nodes_are_removed_inside_content() {
        let html = r#"<html><head><style>p { color: red }</style></head><body>
            <main>
              <header>Site title</header>
              <p>Le   texte
                 principal.</p>
              <script>var x = 1;</script>
              <div class="social-share">Partager</div>
              <section id="comments">Commentaire</section>
              <div class="related-posts">Voir aussi</div>
            </main>
            <footer>Copyright</footer>
        </body></html>"#;
        assert_eq!(extract_main_text(html), "Le texte principal.");
    }

    #[test]
    fn falls_back_to_body_without_candidates() {
        let html = "<html><body><aside>Ads</aside><div>  Juste\n\n\n du texte </div></body></html>";
        assert_eq!(extract_main_text(html), "Juste du texte");
    }

    #[test]
    fn empty_winning_selector_falls_back_to_body() {
        let html = "<html><body><main><script>1</script></main><p>Corps</p></body></html>";
        assert_eq!(extract_main_text(html), "Corps");
    }

    #[test]
    fn role_main_is_a_candidate() {
        let html = r#"<body><div>noise</div><div role="main">Signal</div></body>"#;
        assert_eq!(extract_main_text(html), "Signal");
    }

    #[test]
    fn parse_page_url_rejects_non_http() {
        assert!(parse_page_url("https://example.com/a").is_some());
        assert!(parse_page_url("  http://127.0.0.1:8080/x ").is_some());
        assert!(parse_page_url("ftp://example.com").is_none());
        assert!(parse_page_url("not a url").is_none());
        assert!(parse_page_url("").is_none());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let service = ExtractService::new(Client::new());
        let url = Url::parse("http://127.0.0.1:1/").unwrap();
        let err = service.extract(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
