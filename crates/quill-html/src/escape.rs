//! HTML entity escaping.
//!
//! Attributes are always emitted with double quotes, so the single quote is
//! left as is.

/// Escape `&`, `<`, `>` and `"` for HTML text and attribute values.
///
/// # Example
///
/// ```
/// use quill_html::encode;
///
/// assert_eq!(encode(r#"<a href="x">"#), "&lt;a href=&quot;x&quot;&gt;");
/// assert_eq!(encode("it's"), "it's");
/// ```
#[must_use]
pub fn encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape raw bytes, replacing invalid UTF-8 sequences with U+FFFD.
#[must_use]
pub fn encode_bytes(bytes: &[u8]) -> String {
    encode(&String::from_utf8_lossy(bytes))
}

/// Reverse [`encode`].
///
/// Also understands `&#39;`, `&apos;` and decimal or hexadecimal numeric
/// references. Unknown or malformed entities are kept verbatim.
#[must_use]
pub fn decode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .and_then(|semi| decode_entity(&rest[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                result.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                result.push('&');
                rest = &rest[1..];
            }
        }
    }

    result.push_str(rest);
    result
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
