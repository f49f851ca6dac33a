//! Minimal HTML table extraction
//!
//! The GMP sources are plain server-rendered pages; all we need from them
//! is the row/cell text of their tables. This walks `<tr>`/`<td>` blocks
//! case-insensitively, strips tags, decodes the handful of entities these
//! pages actually emit, and collapses whitespace. Malformed markup simply
//! yields fewer rows.

/// Extract every table row as a vector of cell texts.
///
/// Rows without any `<td>` cells (header rows made of `<th>`) come back
/// empty and are filtered out here.
pub fn table_rows(html: &str) -> Vec<Vec<String>> {
    let lower = html.to_ascii_lowercase();
    let mut rows = Vec::new();
    let mut at = 0;

    while let Some((start, end)) = tag_block(html, &lower, "tr", at) {
        let row_html = &html[start..end];
        let row_lower = &lower[start..end];
        let mut cells = Vec::new();
        let mut cell_at = 0;
        while let Some((cs, ce)) = tag_block(row_html, row_lower, "td", cell_at) {
            cells.push(cell_text(&row_html[cs..ce]));
            cell_at = ce;
        }
        if !cells.is_empty() {
            rows.push(cells);
        }
        at = end;
    }

    rows
}

/// Locate the next `<tag ...> ... </tag>` block at or after `from`.
/// Returns the byte range of the inner content. `lower` must be the
/// ascii-lowercased copy of `s` (byte offsets line up).
fn tag_block(s: &str, lower: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let open = format!("<{tag}");
    let close = format!("</{tag}");

    let mut search = from;
    let start = loop {
        let hit = lower.get(search..)?.find(&open)? + search;
        // reject partial matches like <track> when looking for <tr>
        match lower.as_bytes().get(hit + open.len()) {
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'/') => {
                break hit
            }
            _ => search = hit + open.len(),
        }
    };

    let open_end = s.get(start..)?.find('>')? + start + 1;
    let end = lower.get(open_end..)?.find(&close)? + open_end;
    Some((open_end, end))
}

/// Tag-stripped, entity-decoded, whitespace-normalized text of a cell.
fn cell_text(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut in_tag = false;
    for ch in inner.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&decode_entities(&out))
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
