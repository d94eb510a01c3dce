//! HTML scanning for custom element occurrences.
//!
//! Finds `<tag ...>content</tag>` spans in a document without building a DOM.
//! Tag matching is ASCII case-insensitive and handles nested tags of the same name.

use crate::traits::Attributes;

/// A located element occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementMatch {
    /// Tag name (lowercase)
    pub tag: String,

    /// Byte offset of the opening tag's `<`
    pub start: usize,

    /// Byte offset just past the opening tag's `>`
    pub content_start: usize,

    /// Byte offset of the closing tag's `<`
    pub content_end: usize,

    /// Byte offset just past the closing tag's `>`
    pub end: usize,

    /// Parsed attributes of the opening tag
    pub attributes: Attributes,
}

impl ElementMatch {
    /// The opening tag, including its attributes.
    pub fn open_tag<'a>(&self, html: &'a str) -> &'a str {
        &html[self.start..self.content_start]
    }

    /// The element's inner markup.
    pub fn content<'a>(&self, html: &'a str) -> &'a str {
        &html[self.content_start..self.content_end]
    }

    /// The closing tag.
    pub fn close_tag<'a>(&self, html: &'a str) -> &'a str {
        &html[self.content_end..self.end]
    }
}

/// Find every top-level occurrence of `tag` in `html`.
///
/// Occurrences without a closing tag are skipped.
pub fn find_elements(html: &str, tag: &str) -> Vec<ElementMatch> {
    let tag = tag.to_ascii_lowercase();
    let lower = html.to_ascii_lowercase();
    let needle = format!("<{}", tag);

    let mut matches = Vec::new();
    let mut pos = 0;

    while let Some(start) = find_tag(&lower, &needle, pos) {
        match match_element_at(html, &lower, start, &tag) {
            Some(m) => {
                pos = m.end;
                matches.push(m);
            }
            None => {
                pos = start + needle.len();
            }
        }
    }

    matches
}

/// Match an element whose opening tag begins at `start`.
///
/// `lower` must be `html.to_ascii_lowercase()` (byte offsets are shared).
pub(crate) fn match_element_at(
    html: &str,
    lower: &str,
    start: usize,
    tag: &str,
) -> Option<ElementMatch> {
    let name_end = start + 1 + tag.len();
    let content_start = open_tag_end(html, name_end)?;

    // Strip the trailing '>' (and a '/' some authors write on empty tags)
    let raw_attrs = html[name_end..content_start - 1].trim_end_matches('/');

    let (content_end, end) = find_matching_close(lower, tag, content_start)?;

    Some(ElementMatch {
        tag: tag.to_string(),
        start,
        content_start,
        content_end,
        end,
        attributes: Attributes::parse(raw_attrs),
    })
}

/// Find the next `needle` (an opening or closing tag prefix) that ends at a tag
/// name boundary.
pub(crate) fn find_tag(lower: &str, needle: &str, from: usize) -> Option<usize> {
    let mut pos = from;

    while pos <= lower.len() {
        let idx = pos + lower[pos..].find(needle)?;
        let after = lower[idx + needle.len()..].chars().next();

        match after {
            None => return Some(idx),
            Some(c) if c.is_ascii_whitespace() || c == '>' || c == '/' => return Some(idx),
            _ => pos = idx + 1,
        }
    }

    None
}

/// Position just past the `>` closing an opening tag, skipping quoted values.
fn open_tag_end(html: &str, from: usize) -> Option<usize> {
    let mut quote: Option<char> = None;

    for (i, c) in html[from..].char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(from + i + 1),
            None => {}
        }
    }

    None
}

/// Find the matching closing tag, handling nested same-name elements.
///
/// Returns the offsets of the closing tag's `<` and just past its `>`.
fn find_matching_close(lower: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let open_pattern = format!("<{}", tag);
    let close_pattern = format!("</{}", tag);

    let mut depth = 1;
    let mut pos = from;

    loop {
        let next_open = find_tag(lower, &open_pattern, pos);
        let next_close = find_tag(lower, &close_pattern, pos)?;

        match next_open {
            Some(o) if o < next_close => {
                depth += 1;
                pos = o + open_pattern.len();
            }
            _ => {
                let close_end = next_close + lower[next_close..].find('>')? + 1;
                depth -= 1;
                if depth == 0 {
                    return Some((next_close, close_end));
                }
                pos = close_end;
            }
        }
    }
}

/// Text content of a markup fragment: tags and comments removed, trimmed.
///
/// Character references are left encoded, so the result can be written back
/// into markup unchanged.
pub fn text_content(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(lt) = rest.find('<') {
        text.push_str(&rest[..lt]);
        rest = &rest[lt..];

        let skip = if rest.starts_with("<!--") {
            rest.find("-->").map(|i| i + 3)
        } else {
            rest.find('>').map(|i| i + 1)
        };

        match skip {
            Some(n) => rest = &rest[n..],
            None => {
                rest = "";
            }
        }
    }
    text.push_str(rest);

    text.trim().to_string()
}
