//! Text normalization for pool questions.
//!
//! Question records frequently carry rich-text markup (`<p>`, `<b>`, entities) from
//! authoring tools. [`normalize`] strips tags, drops `<script>`/`<style>` bodies,
//! decodes entities and collapses whitespace so embeddings and oracle prompts see
//! only the visible text. It never fails: absent or empty input yields `""`.


/// Elements whose contents are not visible text.
const HIDDEN_ELEMENTS: [&str; 2] = ["script", "style"];

/// Elements that break the text flow; replaced with a space when stripped.
const BLOCK_ELEMENTS: [&str; 22] = [
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "h1", "h2", "h3", "h4",
    "h5", "h6", "hr", "li", "ol", "p", "pre", "table", "td", "tr",
];

/// Longest entity body we try to decode (`&thetasym;` is the longest common one).
const MAX_ENTITY_LEN: usize = 10;

/// Strips markup and collapses whitespace. `None` is treated as empty.
pub fn normalize(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(r) if !r.is_empty() => r,
        _ => return String::new(),
    };

    collapse_whitespace(&decode_entities(&strip_tags(raw)))
}

/// Removes tags and comments, keeping text content.
///
/// A `<` that does not open a tag (e.g. `2 < 3`) is kept verbatim. Block-level
/// tags are replaced with a space so adjacent paragraphs do not fuse together.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let after = &rest[lt..];

        if let Some(comment) = after.strip_prefix("<!--") {
            rest = match comment.find("-->") {
                Some(end) => &comment[end + 3..],
                None => "",
            };
            continue;
        }

        let Some(name) = tag_name(after) else {
            out.push('<');
            rest = &after[1..];
            continue;
        };

        let Some(gt) = after.find('>') else {
            // Never closed, so it was text all along (`a<b for all b`).
            out.push('<');
            rest = &after[1..];
            continue;
        };

        let lowered = name.to_ascii_lowercase();
        let closing = after.as_bytes().get(1) == Some(&b'/');
        rest = &after[gt + 1..];

        if !closing && HIDDEN_ELEMENTS.contains(&lowered.as_str()) {
            let close = format!("</{}", lowered);
            rest = match find_ascii_case_insensitive(rest, &close) {
                Some(idx) => match rest[idx..].find('>') {
                    Some(end) => &rest[idx + end + 1..],
                    None => "",
                },
                None => "",
            };
        }

        if BLOCK_ELEMENTS.contains(&lowered.as_str()) {
            out.push(' ');
        }
    }

    out.push_str(rest);
    out
}

/// Returns the element name if `s` (starting at `<`) looks like a tag.
fn tag_name(s: &str) -> Option<&str> {
    let body = s.strip_prefix('<')?;
    let body = body.strip_prefix('/').unwrap_or(body);
    let body = body.strip_prefix('!').unwrap_or(body);

    let end = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':'))
        .unwrap_or(body.len());

    let name = &body[..end];
    match name.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => Some(name),
        _ => None,
    }
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

/// Decodes named and numeric character references. Unknown entities are kept.
pub fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        let decoded = after
            .find(';')
            .filter(|&semi| semi > 0 && semi <= MAX_ENTITY_LEN)
            .and_then(|semi| decode_entity(&after[..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(body: &str) -> Option<char> {
    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    let c = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "hellip" => '\u{2026}',
        "times" => '\u{00D7}',
        "divide" => '\u{00F7}',
        "plusmn" => '\u{00B1}',
        "minus" => '\u{2212}',
        "le" => '\u{2264}',
        "ge" => '\u{2265}',
        "ne" => '\u{2260}',
        "deg" => '\u{00B0}',
        "pi" => '\u{03C0}',
        "sup2" => '\u{00B2}',
        "sup3" => '\u{00B3}',
        "frac12" => '\u{00BD}',
        "frac14" => '\u{00BC}',
        "frac34" => '\u{00BE}',
        _ => return None,
    };
    Some(c)
}

/// Collapses runs of Unicode whitespace into single spaces and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
