// src/specs/startlist.rs
//
// Startlist page → raw rider display names ("VAN DER POEL Mathieu").
//
// Selector precedence:
//   1. every <a href="rider/…"> anywhere on the page
//   2. fallback: the first <a> of each <li> inside <div class="main">
// Rows in that list carry the rider link first and the team link after it,
// so only the first anchor of a row is read; later anchors are never names.
// Names are returned in page order with duplicates removed.

use std::collections::HashSet;

use tracing::debug;

use crate::core::html::{self, OpenTags, attr, element_end, visible_text};

const RIDER_HREF_PREFIX: &str = "rider/";

pub fn extract_names(doc: &str) -> Vec<String> {
    let lc = html::to_lower(doc);

    let mut names = rider_links(doc, &lc);
    if names.is_empty() {
        debug!("No rider/ links on page; falling back to main list items");
        names = main_list_links(doc, &lc);
    }
    dedup_in_order(names)
}

fn rider_links(doc: &str, lc: &str) -> Vec<String> {
    let mut out = Vec::new();
    for (start, open_end) in OpenTags::new(lc, "a") {
        let is_rider = attr(&doc[start..open_end], "href")
            .map(|h| h.trim_start_matches('/').starts_with(RIDER_HREF_PREFIX))
            .unwrap_or(false);
        if !is_rider { continue; }
        if let Some(text) = anchor_text(doc, lc, open_end) {
            out.push(text);
        }
    }
    out
}

fn main_list_links(doc: &str, lc: &str) -> Vec<String> {
    let Some((div_open, div_end)) = main_div(doc, lc) else {
        return Vec::new();
    };
    let scope = &lc[..div_end];

    let mut out = Vec::new();
    for (li_start, li_open_end) in OpenTags::new(scope, "li") {
        if li_start < div_open { continue; }
        // First anchor of the item only
        let li_scope = &scope[..element_end(scope, "li", li_open_end).unwrap_or(div_end)];
        let mut anchors = OpenTags::new(li_scope, "a").skip_while(|(s, _)| *s < li_open_end);
        if let Some((_, a_open_end)) = anchors.next() {
            if let Some(text) = anchor_text(doc, li_scope, a_open_end) {
                out.push(text);
            }
        }
    }
    out
}

/// `(open_end, element_end)` of the first `<div>` whose class list has `main`.
fn main_div(doc: &str, lc: &str) -> Option<(usize, usize)> {
    OpenTags::new(lc, "div").find_map(|(start, open_end)| {
        let class = attr(&doc[start..open_end], "class")?;
        if !class.split_whitespace().any(|c| c == "main") {
            return None;
        }
        Some((open_end, element_end(lc, "div", open_end)?))
    })
}

fn anchor_text(doc: &str, lc: &str, open_end: usize) -> Option<String> {
    let close = lc.get(open_end..)?.find("</a")? + open_end;
    let text = visible_text(&doc[open_end..close]);
    if text.is_empty() { None } else { Some(text) }
}

fn dedup_in_order(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names.into_iter().filter(|n| seen.insert(n.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rider_links_are_collected_in_order() {
        let doc = r#"
            <ul class="startlist_v4">
              <li><a href="team/alpecin">Alpecin-Deceuninck</a>
                <ul>
                  <li><span>1</span><a href="rider/mathieu-van-der-poel">VAN DER POEL&nbsp;Mathieu</a></li>
                  <li><span>2</span><a href="rider/jasper-philipsen"><b>PHILIPSEN</b> Jasper</a></li>
                </ul>
              </li>
              <li><a href="/rider/tadej-pogacar">POGAČAR Tadej</a></li>
              <li><a href="rider/empty">  </a></li>
            </ul>
        "#;
        assert_eq!(
            extract_names(doc),
            vec!["VAN DER POEL Mathieu", "PHILIPSEN Jasper", "POGAČAR Tadej"]
        );
    }

    #[test]
    fn duplicates_collapse() {
        let doc = r#"<a href="rider/a">PEDERSEN Mads</a><a href="rider/a">PEDERSEN Mads</a>"#;
        assert_eq!(extract_names(doc), vec!["PEDERSEN Mads"]);
    }

    #[test]
    fn falls_back_to_main_list_items() {
        let doc = r#"
            <div class="menu"><ul><li><a href="x">Home</a></li></ul></div>
            <div class="page main">
              <div class="title">Startlist</div>
              <ul>
                <li><a href="r1">GANNA Filippo</a> <a href="t">INEOS</a></li>
                <li><a href="r2">PIDCOCK Thomas</a></li>
              </ul>
            </div>
            <ul><li><a href="z">Outside</a></li></ul>
        "#;
        assert_eq!(extract_names(doc), vec!["GANNA Filippo", "PIDCOCK Thomas"]);
    }

    #[test]
    fn page_without_riders_is_empty() {
        assert!(extract_names("<html><body>Access denied</body></html>").is_empty());
    }
}
