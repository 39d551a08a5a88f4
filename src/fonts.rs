// src/fonts.rs
use crate::config::FONT_STYLESHEET_URL;
use crate::error::{EditorError, EditorResult};
use gloo::file::Blob;
use gloo_net::http::Request;
use wasm_bindgen::JsCast;
use web_sys::{HtmlLinkElement, HtmlStyleElement};

/// A remote `url(...)` token found in a stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct FontUrl {
    /// The token as written, e.g. `url(https://...)`.
    pub token: String,
    pub url: String,
}

/// Remote font references in order of appearance, without duplicates.
pub fn extract_font_urls(css: &str) -> Vec<FontUrl> {
    let mut found: Vec<FontUrl> = Vec::new();
    let mut rest = css;

    while let Some(start) = rest.find("url(") {
        let after = &rest[start..];
        let Some(end) = after.find(')') else {
            break;
        };
        let token = &after[..=end];
        let url = token[4..token.len() - 1]
            .trim()
            .trim_matches(|c| c == '"' || c == '\'');

        if (url.starts_with("https://") || url.starts_with("http://"))
            && !found.iter().any(|f| f.token == token)
        {
            found.push(FontUrl {
                token: token.to_string(),
                url: url.to_string(),
            });
        }
        rest = &after[end + 1..];
    }

    found
}

/// Replaces each token with `url(<data uri>)`.
pub fn rewrite_stylesheet(css: &str, embedded: &[(FontUrl, String)]) -> String {
    embedded
        .iter()
        .fold(css.to_string(), |text, (font, data_url)| {
            text.replace(&font.token, &format!("url({})", data_url))
        })
}

async fn fetch_as_data_url(url: &str) -> EditorResult<String> {
    let resp = Request::get(url).send().await?;
    if !resp.ok() {
        return Err(EditorError::service(format!("HTTP {} for {}", resp.status(), url)));
    }
    let mime = resp
        .headers()
        .get("content-type")
        .unwrap_or_else(|| "font/woff2".to_string());
    let bytes = resp.binary().await?;
    let blob = Blob::new_with_options(bytes.as_slice(), Some(&mime));
    gloo::file::futures::read_as_data_url(&blob)
        .await
        .map_err(|e| EditorError::service(e.to_string()))
}

async fn embedded_stylesheet() -> EditorResult<String> {
    let resp = Request::get(FONT_STYLESHEET_URL).send().await?;
    if !resp.ok() {
        return Err(EditorError::service("Falha ao buscar o CSS da fonte."));
    }
    let css = resp.text().await?;

    let mut embedded = Vec::new();
    for font in extract_font_urls(&css) {
        match fetch_as_data_url(&font.url).await {
            Ok(data_url) => embedded.push((font, data_url)),
            Err(e) => log::warn!("Could not embed font {}: {}", font.url, e),
        }
    }
    log::info!("Embedded {} font files", embedded.len());

    Ok(rewrite_stylesheet(&css, &embedded))
}

fn inject_style(css: &str) -> Option<()> {
    let document = gloo_utils::document();
    let style: HtmlStyleElement = document.create_element("style").ok()?.dyn_into().ok()?;
    style.set_text_content(Some(css));
    document.head()?.append_child(&style).ok()?;
    Some(())
}

fn inject_link() -> Option<()> {
    let document = gloo_utils::document();
    let link: HtmlLinkElement = document.create_element("link").ok()?.dyn_into().ok()?;
    link.set_rel("stylesheet");
    link.set_href(FONT_STYLESHEET_URL);
    document.head()?.append_child(&link).ok()?;
    Some(())
}

/// Installs the card fonts with their files inlined, so the capture does not
/// hit cross-origin restrictions. Falls back to a plain `<link>`.
pub async fn embed_fonts() {
    let injected = match embedded_stylesheet().await {
        Ok(css) => inject_style(&css),
        Err(e) => {
            log::error!("Font embedding failed: {}", e);
            inject_link()
        }
    };
    if injected.is_none() {
        log::error!("Could not attach the font stylesheet to the document");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSS: &str = "@font-face {\n  font-family: 'Lato';\n  src: url(https://fonts.gstatic.com/s/lato/v24/a.woff2) format('woff2');\n}\n@font-face {\n  font-family: 'Roboto';\n  src: url('https://fonts.gstatic.com/s/roboto/b.woff2') format('woff2');\n}\n@font-face {\n  src: url(data:font/woff2;base64,AAAA), url(https://fonts.gstatic.com/s/lato/v24/a.woff2);\n}\n";

    #[test]
    fn test_extract_font_urls() {
        let urls = extract_font_urls(CSS);
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].url, "https://fonts.gstatic.com/s/lato/v24/a.woff2");
        assert_eq!(urls[0].token, "url(https://fonts.gstatic.com/s/lato/v24/a.woff2)");
        assert_eq!(urls[1].url, "https://fonts.gstatic.com/s/roboto/b.woff2");
    }

    #[test]
    fn test_rewrite_replaces_every_occurrence() {
        let urls = extract_font_urls(CSS);
        let lato = urls[0].clone();
        let css = rewrite_stylesheet(CSS, &[(lato, "data:font/woff2;base64,TEFUTw==".to_string())]);

        assert!(!css.contains("lato/v24/a.woff2"));
        assert_eq!(css.matches("url(data:font/woff2;base64,TEFUTw==)").count(), 2);
        // failed fetches keep their remote url
        assert!(css.contains("url('https://fonts.gstatic.com/s/roboto/b.woff2')"));
    }

    #[test]
    fn test_unterminated_url() {
        assert!(extract_font_urls("src: url(https://x").is_empty());
    }
}
