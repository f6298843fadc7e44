//! HTML extraction of image references and outbound links
//!
//! Everything returned here is raw and unresolved; resolving against the
//! fetched page's URL is the caller's responsibility.
//!
//! Image sources, unioned:
//! - `<img src="...">`
//! - `<img srcset="...">` (the URL token of each comma-separated candidate)
//! - inline `style` attributes with a `background`/`background-image: url(...)`
//! - `<link rel="preload">` / `<link rel="prefetch">` hrefs
//! - `<meta property="og:image" content="...">`
//!
//! Link sources: every `<a href="...">`.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Raw references pulled out of one page
#[derive(Debug, Default)]
pub struct Extracted {
    pub images: HashSet<String>,
    pub links: HashSet<String>,
}

static CSS_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)background(?:-image)?\s*:[^;{}]*?url\(\s*['"]?([^'")\s]+)['"]?\s*\)"#)
        .expect("css url pattern")
});

/// Parses HTML content and extracts raw image and link references
pub fn extract(html: &str) -> Extracted {
    let document = Html::parse_document(html);
    let mut out = Extracted::default();

    collect_img_elements(&document, &mut out.images);
    collect_inline_styles(&document, &mut out.images);
    collect_preload_links(&document, &mut out.images);
    collect_og_images(&document, &mut out.images);
    collect_anchors(&document, &mut out.links);

    out
}

fn collect_img_elements(document: &Html, images: &mut HashSet<String>) {
    if let Ok(selector) = Selector::parse("img") {
        for element in document.select(&selector) {
            if let Some(src) = element.value().attr("src") {
                insert_nonempty(images, src);
            }
            if let Some(srcset) = element.value().attr("srcset") {
                for candidate in parse_srcset(srcset) {
                    images.insert(candidate);
                }
            }
        }
    }
}

fn collect_inline_styles(document: &Html, images: &mut HashSet<String>) {
    if let Ok(selector) = Selector::parse("[style]") {
        for element in document.select(&selector) {
            if let Some(style) = element.value().attr("style") {
                for capture in CSS_URL_RE.captures_iter(style) {
                    insert_nonempty(images, &capture[1]);
                }
            }
        }
    }
}

fn collect_preload_links(document: &Html, images: &mut HashSet<String>) {
    if let Ok(selector) = Selector::parse("link[href]") {
        for element in document.select(&selector) {
            let rel = element.value().attr("rel").unwrap_or("");
            let preloading = rel
                .split_whitespace()
                .any(|token| token.eq_ignore_ascii_case("preload") || token.eq_ignore_ascii_case("prefetch"));
            if preloading {
                if let Some(href) = element.value().attr("href") {
                    insert_nonempty(images, href);
                }
            }
        }
    }
}

fn collect_og_images(document: &Html, images: &mut HashSet<String>) {
    if let Ok(selector) = Selector::parse(r#"meta[property="og:image"]"#) {
        for element in document.select(&selector) {
            if let Some(content) = element.value().attr("content") {
                insert_nonempty(images, content);
            }
        }
    }
}

fn collect_anchors(document: &Html, links: &mut HashSet<String>) {
    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                insert_nonempty(links, href);
            }
        }
    }
}

/// Takes the leading URL token of each srcset candidate, discarding the
/// width/density descriptor
fn parse_srcset(srcset: &str) -> Vec<String> {
    srcset
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn insert_nonempty(set: &mut HashSet<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        set.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_img_src() {
        let extracted = extract(r#"<html><body><img src="/a.png"></body></html>"#);
        assert!(extracted.images.contains("/a.png"));
        assert_eq!(extracted.images.len(), 1);
    }

    #[test]
    fn test_duplicate_srcs_collapse() {
        let html = r#"<img src="/a.png"><img src="/a.png"><img src="/b.png">"#;
        let extracted = extract(html);
        assert_eq!(extracted.images.len(), 2);
    }

    #[test]
    fn test_srcset_candidates() {
        let html = r#"<img srcset="/small.jpg 480w, /large.jpg 2x,/plain.jpg">"#;
        let extracted = extract(html);
        assert!(extracted.images.contains("/small.jpg"));
        assert!(extracted.images.contains("/large.jpg"));
        assert!(extracted.images.contains("/plain.jpg"));
        assert_eq!(extracted.images.len(), 3);
    }

    #[test]
    fn test_img_with_src_and_srcset() {
        let html = r#"<img src="/a.png" srcset="/a@2x.png 2x">"#;
        let extracted = extract(html);
        assert!(extracted.images.contains("/a.png"));
        assert!(extracted.images.contains("/a@2x.png"));
    }

    #[test]
    fn test_inline_style_background_image() {
        let html = r#"<div style="background-image: url('/bg.jpg')"></div>"#;
        let extracted = extract(html);
        assert!(extracted.images.contains("/bg.jpg"));
    }

    #[test]
    fn test_inline_style_background_shorthand() {
        let html = r##"<div style="background: #fff url(/hero.png) no-repeat"></div>"##;
        let extracted = extract(html);
        assert!(extracted.images.contains("/hero.png"));
    }

    #[test]
    fn test_inline_style_case_insensitive_and_quoted() {
        let html = r#"<div style="BACKGROUND-IMAGE: URL(&quot;/x.gif&quot;)"></div>"#;
        let extracted = extract(html);
        assert!(extracted.images.contains("/x.gif"));
    }

    #[test]
    fn test_preload_and_prefetch_links() {
        let html = r#"
            <link rel="preload" href="/hero.webp" as="image">
            <link rel="prefetch" href="/next.png">
            <link rel="stylesheet" href="/style.css">
        "#;
        let extracted = extract(html);
        assert!(extracted.images.contains("/hero.webp"));
        assert!(extracted.images.contains("/next.png"));
        assert!(!extracted.images.contains("/style.css"));
    }

    #[test]
    fn test_og_image_meta() {
        let html = r#"<head><meta property="og:image" content="https://cdn.ex.com/og.jpg"></head>"#;
        let extracted = extract(html);
        assert!(extracted.images.contains("https://cdn.ex.com/og.jpg"));
    }

    #[test]
    fn test_anchor_hrefs_collected_raw() {
        let html = r#"<a href="/page">One</a><a href="https://other.com/p">Two</a>"#;
        let extracted = extract(html);
        assert!(extracted.links.contains("/page"));
        assert!(extracted.links.contains("https://other.com/p"));
        assert_eq!(extracted.links.len(), 2);
    }

    #[test]
    fn test_empty_attributes_skipped() {
        let html = r#"<img src="  "><a href=""></a>"#;
        let extracted = extract(html);
        assert!(extracted.images.is_empty());
        assert!(extracted.links.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let extracted = extract("");
        assert!(extracted.images.is_empty());
        assert!(extracted.links.is_empty());
    }

    #[test]
    fn test_non_html_text_extracts_nothing() {
        let extracted = extract("just some plain text, no markup");
        assert!(extracted.images.is_empty());
        assert!(extracted.links.is_empty());
    }
}
