//! Lightweight HTML-to-markdown conversion and whitespace cleanup.
//!
//! Issue bodies and fetched pages arrive as HTML fragments; the agent only
//! needs a readable markdown rendition, not a faithful one.

use regex::Regex;

/// Convert an HTML fragment to lightweight markdown.
///
/// Handles the tags that actually show up in GitHub issue bodies and
/// documentation pages: headings, emphasis, inline/block code, links, list
/// items, paragraphs and line breaks. Everything else is stripped.
pub fn html_to_markdown(html: &str) -> String {
    let mut text = strip_blocks(html, "<script", "</script>");
    text = strip_blocks(&text, "<style", "</style>");

    let mut out = String::with_capacity(text.len());
    let mut rest = text.as_str();

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tag_rest = &rest[start + 1..];
        let Some(end) = tag_rest.find('>') else {
            // Unterminated tag; keep the remainder as text.
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let tag = tag_rest[..end].trim();
        out.push_str(markdown_for_tag(tag));
        rest = &tag_rest[end + 1..];
    }
    out.push_str(rest);

    collapse_blank_lines(decode_entities(&out).trim())
}

/// Collapse runs of 3+ consecutive newlines down to a single blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    let re = Regex::new(r"\n{3,}").unwrap();
    re.replace_all(text, "\n\n").into_owned()
}

/// Markdown replacement for a single HTML tag.
fn markdown_for_tag(tag: &str) -> &'static str {
    let name = tag
        .trim_start_matches('/')
        .split([' ', '\t', '\n'])
        .next()
        .unwrap_or("")
        .to_lowercase();
    let closing = tag.starts_with('/');

    match name.as_str() {
        "h1" => {
            if closing {
                "\n"
            } else {
                "\n# "
            }
        }
        "h2" => {
            if closing {
                "\n"
            } else {
                "\n## "
            }
        }
        "h3" | "h4" | "h5" | "h6" => {
            if closing {
                "\n"
            } else {
                "\n### "
            }
        }
        "b" | "strong" => "**",
        "i" | "em" => "*",
        "code" => "`",
        "pre" => "\n```\n",
        "li" => {
            if closing {
                "\n"
            } else {
                "- "
            }
        }
        "p" | "div" | "ul" | "ol" | "blockquote" | "table" | "tr" => "\n",
        "br" => "\n",
        "hr" => "\n---\n",
        _ => "",
    }
}

/// Remove everything between `open` and `close` markers, inclusive.
fn strip_blocks(html: &str, open: &str, close: &str) -> String {
    let mut text = html.to_string();
    while let Some(start) = text.find(open) {
        if let Some(end) = text[start..].find(close) {
            text = format!("{}{}", &text[..start], &text[start + end + close.len()..]);
        } else {
            text.truncate(start);
            break;
        }
    }
    text
}

/// Basic HTML entity decoding.
pub fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_three_or_more_newlines() {
        assert_eq!(collapse_blank_lines("a\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n\n\n\n\n\nb"), "a\n\nb");
        // Exactly one blank line is left alone.
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\nb"), "a\nb");
    }

    #[test]
    fn collapsed_output_never_has_triple_newlines() {
        let ugly = "start\n\n\n\nmiddle\n\n\n\n\n\nend\n\n\n";
        let clean = collapse_blank_lines(ugly);
        assert!(!clean.contains("\n\n\n"));
    }

    #[test]
    fn converts_basic_tags() {
        let html = "<p>Hello <b>world</b></p><p>Use <code>cargo test</code></p>";
        let md = html_to_markdown(html);
        assert!(md.contains("**world**"));
        assert!(md.contains("`cargo test`"));
    }

    #[test]
    fn converts_headings_and_lists() {
        let html = "<h2>Steps</h2><ul><li>one</li><li>two</li></ul>";
        let md = html_to_markdown(html);
        assert!(md.contains("## Steps"));
        assert!(md.contains("- one"));
        assert!(md.contains("- two"));
    }

    #[test]
    fn strips_script_and_style() {
        let html = "before<script>alert(1)</script>mid<style>a{}</style>after";
        let md = html_to_markdown(html);
        assert_eq!(md, "beforemidafter");
    }

    #[test]
    fn decodes_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(html_to_markdown("just markdown *text*"), "just markdown *text*");
    }
}
