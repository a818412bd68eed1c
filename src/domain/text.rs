//! Text normalization for campaign descriptions.
//!
//! Turns raw campaign HTML (or plain text) into a normalized plain-text form,
//! its sentence and word tokenization, and the structural counts read from
//! the markup (paragraphs, bolded spans, media tags, links).
//!
//! Normalization never fails: empty or malformed input produces empty text
//! and zero counts.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Compiled markup and tokenization patterns.
static PATTERNS: OnceLock<Patterns> = OnceLock::new();

struct Patterns {
    comment: Regex,
    declaration: Regex,
    hidden_blocks: Vec<Regex>,
    numeric_entity: Regex,
    any_tag: Regex,
    block_break: Regex,
    paragraph: Regex,
    bold: Regex,
    open_tag: Regex,
    url_attr: Regex,
    youtube_url: Regex,
    blank_line: Regex,
    sentence_end: Regex,
}

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        comment: Regex::new(r"(?s)<!--.*?-->").expect("Valid regex"),
        declaration: Regex::new(r"(?s)<!\[CDATA\[.*?\]\]>|<![^>]*>|<\?.*?\?>")
            .expect("Valid regex"),
        // Outer elements first so nested ones go with them.
        hidden_blocks: ["head", "template", "noscript", "script", "style", "title"]
            .iter()
            .map(|tag| {
                Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).expect("Valid regex")
            })
            .collect(),
        numeric_entity: Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));").expect("Valid regex"),
        any_tag: Regex::new(r"</?[a-zA-Z][^>]*>").expect("Valid regex"),
        block_break: Regex::new(
            r"(?i)</?(?:p|div|li|ul|ol|h[1-6]|figure|figcaption|blockquote|section|article|tr|table)\b[^>]*>|<br\s*/?>",
        )
        .expect("Valid regex"),
        paragraph: Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>").expect("Valid regex"),
        bold: Regex::new(r"(?is)<(?:b|strong)\b[^>]*>(.*?)</(?:b|strong)\s*>")
            .expect("Valid regex"),
        open_tag: Regex::new(r"<([a-zA-Z][a-zA-Z0-9]*)\b([^>]*)>").expect("Valid regex"),
        url_attr: Regex::new(r#"(?i)\b(src|data-src|href)\s*=\s*["']?([^"'\s>]+)"#)
            .expect("Valid regex"),
        youtube_url: Regex::new(
            r"(?i)^(?:https?:)?//(?:[a-z0-9-]+\.)*(?:youtube\.com|youtube-nocookie\.com|youtu\.be)(?:/|$)",
        )
        .expect("Valid regex"),
        blank_line: Regex::new(r"\n\s*\n").expect("Valid regex"),
        sentence_end: Regex::new(r#"[.!?]+["'\u{201D}\u{2019})\]]*(?:\s+|$)"#)
            .expect("Valid regex"),
    })
}

/// Counts read from the page markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructureCounts {
    /// `<p>` elements with text, or blank-line blocks for plain-text input.
    pub paragraphs: usize,
    /// `<b>` / `<strong>` elements.
    pub bolded_spans: usize,
    /// Non-whitespace characters inside bolded elements.
    pub bolded_chars: usize,
    /// `<img>` tags that are not GIFs.
    pub images: usize,
    pub videos: usize,
    /// Tags linking to or embedding YouTube.
    pub youtubes: usize,
    /// Tags whose source or link is a `.gif`.
    pub gifs: usize,
    /// `<a>` tags with an `href`.
    pub hrefs: usize,
}

/// Output of [`normalize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedText {
    /// Markup-free text. Paragraphs separated by a blank line, other
    /// whitespace collapsed. Punctuation retained.
    pub plain: String,
    /// `plain` with punctuation removed and all whitespace collapsed.
    pub normalized: String,
    pub sentences: Vec<String>,
    /// Tokens of `normalized`, raw casing.
    pub words: Vec<String>,
    /// Non-whitespace characters of `plain`.
    pub total_chars: usize,
    pub structure: StructureCounts,
}

/// Normalize raw campaign HTML or text.
#[must_use]
pub fn normalize(raw: &str) -> NormalizedText {
    let p = patterns();

    let without_comments = p.comment.replace_all(raw, "");
    let mut cleaned = p.declaration.replace_all(&without_comments, "").into_owned();
    for block in &p.hidden_blocks {
        cleaned = block.replace_all(&cleaned, "").into_owned();
    }
    let has_markup = p.any_tag.is_match(&cleaned);

    let broken = p.block_break.replace_all(&cleaned, "\n\n");
    let stripped = p.any_tag.replace_all(&broken, "");
    let decoded = decode_entities(&stripped);

    let blocks: Vec<String> = p
        .blank_line
        .split(&decoded)
        .map(collapse_ws)
        .filter(|b| !b.is_empty())
        .collect();

    let sentences: Vec<String> = blocks.iter().flat_map(|b| split_sentences(b)).collect();
    let plain = blocks.join("\n\n");
    let normalized = strip_punctuation(&plain);
    let words: Vec<String> = normalized.split_whitespace().map(str::to_string).collect();
    let total_chars = count_visible(&plain);

    let mut structure = if has_markup {
        scan_markup(&cleaned)
    } else {
        StructureCounts::default()
    };
    if !has_markup {
        structure.paragraphs = blocks.len();
    }

    NormalizedText {
        plain,
        normalized,
        sentences,
        words,
        total_chars,
        structure,
    }
}

fn scan_markup(html: &str) -> StructureCounts {
    let p = patterns();
    let mut counts = StructureCounts::default();

    counts.paragraphs = p
        .paragraph
        .captures_iter(html)
        .filter(|c| {
            c.get(1)
                .is_some_and(|inner| count_visible(&inner_text(inner.as_str())) > 0)
        })
        .count();

    for cap in p.bold.captures_iter(html) {
        counts.bolded_spans += 1;
        if let Some(inner) = cap.get(1) {
            counts.bolded_chars += count_visible(&inner_text(inner.as_str()));
        }
    }

    for cap in p.open_tag.captures_iter(html) {
        let tag = cap.get(1).map_or("", |m| m.as_str()).to_ascii_lowercase();
        let attrs = cap.get(2).map_or("", |m| m.as_str());

        let mut is_gif = false;
        let mut is_youtube = false;
        let mut has_href = false;
        for attr in p.url_attr.captures_iter(attrs) {
            let name = attr.get(1).map_or("", |m| m.as_str());
            let url = attr.get(2).map_or("", |m| m.as_str());
            if name.eq_ignore_ascii_case("href") {
                has_href = true;
            }
            is_gif |= is_gif_url(url);
            is_youtube |= p.youtube_url.is_match(url);
        }

        if is_gif {
            counts.gifs += 1;
        }
        if is_youtube {
            counts.youtubes += 1;
        }
        match tag.as_str() {
            "img" if !is_gif => counts.images += 1,
            "video" => counts.videos += 1,
            "a" if has_href => counts.hrefs += 1,
            _ => {}
        }
    }

    counts
}

fn is_gif_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or("");
    path.to_ascii_lowercase().ends_with(".gif")
}

/// Text content of an HTML fragment.
fn inner_text(fragment: &str) -> String {
    let stripped = patterns().any_tag.replace_all(fragment, " ");
    decode_entities(&stripped)
}

/// Decode numeric character references, then the common named entities.
/// Invalid code points become a space.
fn decode_entities(s: &str) -> String {
    let numeric = patterns()
        .numeric_entity
        .replace_all(s, |caps: &Captures<'_>| {
            let code = match (caps.get(1), caps.get(2)) {
                (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
                (None, None) => None,
            };
            code.and_then(char::from_u32)
                .map_or_else(|| " ".to_string(), String::from)
        });

    numeric
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&rsquo;", "\u{2019}")
        .replace("&lsquo;", "\u{2018}")
        .replace("&ldquo;", "\u{201C}")
        .replace("&rdquo;", "\u{201D}")
        .replace("&mdash;", "\u{2014}")
        .replace("&ndash;", "\u{2013}")
        .replace("&hellip;", "\u{2026}")
        .replace("&amp;", "&")
}

fn collapse_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

fn count_visible(s: &str) -> usize {
    s.chars().filter(|c| !c.is_whitespace()).count()
}

fn split_sentences(block: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in patterns().sentence_end.find_iter(block) {
        push_sentence(&mut out, &block[last..m.end()]);
        last = m.end();
    }
    push_sentence(&mut out, &block[last..]);
    out
}

fn push_sentence(out: &mut Vec<String>, candidate: &str) {
    let s = candidate.trim();
    if s.chars().any(char::is_alphanumeric) {
        out.push(s.to_string());
    }
}

/// Replace punctuation with spaces, keeping apostrophes and hyphens that sit
/// between two alphanumeric characters.
fn strip_punctuation(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    for (i, &ch) in chars.iter().enumerate() {
        let keep = if ch.is_alphanumeric() || ch.is_whitespace() {
            true
        } else if matches!(ch, '\'' | '\u{2019}' | '-') {
            let before = i > 0 && chars[i - 1].is_alphanumeric();
            let after = chars.get(i + 1).is_some_and(|c| c.is_alphanumeric());
            before && after
        } else {
            false
        };
        out.push(if keep { ch } else { ' ' });
    }
    collapse_ws(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let n = normalize("");
        assert!(n.plain.is_empty());
        assert!(n.words.is_empty());
        assert!(n.sentences.is_empty());
        assert_eq!(n.structure, StructureCounts::default());
        assert_eq!(n.total_chars, 0);
    }

    #[test]
    fn test_plain_text_paragraphs_and_sentences() {
        let n = normalize("We built a lamp. It glows!\n\nBack us today?  Thanks");
        assert_eq!(n.structure.paragraphs, 2);
        assert_eq!(
            n.sentences,
            vec!["We built a lamp.", "It glows!", "Back us today?", "Thanks"]
        );
        assert_eq!(n.words.len(), 10);
    }

    #[test]
    fn test_html_structure_counts() {
        let html = r#"
            <div class="full-description">
              <p>Meet the <b>smartest</b> lamp &amp; charger.</p>
              <p>   </p>
              <p>Watch <a href="https://www.youtube.com/watch?v=abc">our film</a>
                 or read <a href="/faq">the FAQ</a>.</p>
              <img src="https://cdn.example.com/photo.jpg">
              <img data-src="https://cdn.example.com/demo.GIF?w=600">
              <video src="clip.mp4"></video>
              <iframe src="//www.youtube.com/embed/xyz"></iframe>
              <strong>Ships in May</strong>
            </div>"#;
        let n = normalize(html);
        assert_eq!(n.structure.paragraphs, 2);
        assert_eq!(n.structure.bolded_spans, 2);
        assert_eq!(n.structure.bolded_chars, "smartest".len() + "ShipsinMay".len());
        assert_eq!(n.structure.images, 1);
        assert_eq!(n.structure.gifs, 1);
        assert_eq!(n.structure.videos, 1);
        assert_eq!(n.structure.youtubes, 2);
        assert_eq!(n.structure.hrefs, 2);
        assert!(n.plain.contains("lamp & charger."));
        assert!(!n.plain.contains('<'));
    }

    #[test]
    fn test_script_and_comments_dropped() {
        let n = normalize("<p>Hello!</p><script>var x = 'BIG!';</script><!-- <b>no</b> -->");
        assert_eq!(n.plain, "Hello!");
        assert_eq!(n.structure.bolded_spans, 0);
    }

    #[test]
    fn test_br_is_not_bold() {
        let n = normalize("<p>one<br>two</p><blockquote>three</blockquote>");
        assert_eq!(n.structure.bolded_spans, 0);
        assert_eq!(n.words, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_punctuation_stripped_but_contractions_kept() {
        let n = normalize("Don't stop -- it's \"state-of-the-art\"!!!");
        assert_eq!(n.normalized, "Don't stop it's state-of-the-art");
    }

    #[test]
    fn test_malformed_markup_does_not_panic() {
        let n = normalize("<p>unterminated <b>bold <img src=\"x.gif\" and < stray");
        assert!(n.words.contains(&"unterminated".to_string()));
        assert_eq!(n.structure.paragraphs, 0);
    }

    #[test]
    fn test_full_document_declarations_and_head_dropped() {
        let html = r#"<?xml version="1.0"?>
            <!DOCTYPE html>
            <html>
              <head>
                <title>LAMP | Kickstarter</title>
                <meta name="description" content="ignored">
              </head>
              <body>
                <noscript>ENABLE JAVASCRIPT</noscript>
                <p>hello world.</p>
                <![CDATA[ HIDDEN ]]>
              </body>
            </html>"#;
        let n = normalize(html);
        assert_eq!(n.words, vec!["hello", "world"]);
        assert_eq!(n.plain, "hello world.");
        assert_eq!(n.structure.paragraphs, 1);
    }

    #[test]
    fn test_header_element_is_not_head() {
        let n = normalize("<header><p>Visible intro</p></header>");
        assert_eq!(n.words, vec!["Visible", "intro"]);
    }

    #[test]
    fn test_numeric_entities_decoded() {
        let n = normalize("<p>We don&#8217;t stop &#x2014; ever&#33;</p>");
        assert_eq!(n.words, vec!["We", "don\u{2019}t", "stop", "ever"]);
        assert_eq!(n.plain, "We don\u{2019}t stop \u{2014} ever!");
    }

    #[test]
    fn test_invalid_code_point_becomes_space() {
        let n = normalize("<p>a&#xD800;b &#99999999999; c</p>");
        assert_eq!(n.words, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_escaped_entity_is_decoded_once() {
        let n = normalize("<p>&amp;#8217; literal</p>");
        assert_eq!(n.plain, "&#8217; literal");
    }
}
