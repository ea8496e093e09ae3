// src/core/html.rs
//! Tolerant, allocation-light HTML scanning.
//!
//! Not a parser. Everything works on byte offsets into the original text and
//! an ASCII-lowercased shadow copy of it; `to_lower` keeps byte lengths
//! identical so offsets line up between the two.

use super::sanitize::{normalize_entities, normalize_ws};

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Opening tags of one element name, in document order.
/// Yields `(tag_start, open_end)`: `doc[tag_start..open_end]` is `<a href=…>`.
pub struct OpenTags<'a> {
    lc: &'a str,
    needle: String,
    pos: usize,
}

impl<'a> OpenTags<'a> {
    /// `lc` must be `to_lower(doc)`; `tag` is a bare lowercase name ("a", "li").
    pub fn new(lc: &'a str, tag: &str) -> Self {
        Self { lc, needle: join!("<", tag), pos: 0 }
    }
}

impl Iterator for OpenTags<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let start = self.lc.get(self.pos..)?.find(&self.needle)? + self.pos;
            let after_name = start + self.needle.len();
            self.pos = after_name;
            // "<a" must not match "<abbr"
            let boundary = self.lc[after_name..].chars().next();
            if !matches!(boundary, Some(c) if c.is_ascii_whitespace() || c == '>' || c == '/') {
                continue;
            }
            let open_end = self.lc[after_name..].find('>')? + after_name + 1;
            self.pos = open_end;
            return Some((start, open_end));
        }
    }
}

/// Offset just past the `</tag>` matching an element whose opening tag ends
/// at `open_end`. Nested elements of the same name are counted.
pub fn element_end(lc: &str, tag: &str, open_end: usize) -> Option<usize> {
    let close = join!("</", tag);
    let mut depth = 1usize;
    let mut pos = open_end;
    let mut opens = OpenTags::new(lc, tag);
    opens.pos = open_end;
    let mut next_open = opens.next();

    loop {
        let c = lc.get(pos..)?.find(&close)? + pos;
        while let Some((o, _)) = next_open {
            if o >= c { break; }
            depth += 1;
            next_open = opens.next();
        }
        depth -= 1;
        let end = lc[c..].find('>')? + c + 1;
        if depth == 0 {
            return Some(end);
        }
        pos = end;
    }
}

/// Value of attribute `name` inside one opening tag (`<a href="x" …>`).
/// Handles double, single and unquoted values; name match is case-insensitive.
pub fn attr(open_tag: &str, name: &str) -> Option<String> {
    let lc = to_lower(open_tag);
    let name = to_lower(name);
    let bytes = lc.as_bytes();
    let mut from = 0usize;

    while let Some(rel) = lc[from..].find(&name) {
        let at = from + rel;
        from = at + name.len();
        let before_ok = at > 0 && bytes[at - 1].is_ascii_whitespace();
        let rest = lc[from..].trim_start();
        if !before_ok || !rest.starts_with('=') {
            continue;
        }
        // Offsets into the original tag text
        let value_start = open_tag.len() - rest.len() + 1;
        let value = open_tag[value_start..].trim_start();
        return Some(match value.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let body = &value[1..];
                s!(&body[..body.find(q).unwrap_or(body.len())])
            }
            _ => {
                let end = value
                    .find(|c: char| c.is_ascii_whitespace() || c == '>')
                    .unwrap_or(value.len());
                s!(&value[..end])
            }
        });
    }
    None
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Visible text of an HTML fragment: tags dropped, entities decoded,
/// whitespace collapsed.
pub fn visible_text(fragment: &str) -> String {
    normalize_ws(&normalize_entities(&strip_tags(fragment)))
}
