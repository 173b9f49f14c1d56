//! Visible text extraction from HTML bodies

use regex::{Captures, Regex};

static ENTITY_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z][a-zA-Z0-9]{1,7});").unwrap()
});

/// Extract the visible text of an HTML fragment.
///
/// Tags and comments are removed, the contents of `script` and `style`
/// elements are dropped and character references are decoded. Whitespace is
/// left untouched, so plain text without markup passes through unchanged.
#[must_use]
pub fn visible_text(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut rest = html;
    let mut hidden_until: Option<&'static str> = None;

    while let Some(pos) = rest.find('<') {
        if hidden_until.is_none() {
            result.push_str(&rest[..pos]);
        }
        let after = &rest[pos + 1..];

        // A '<' not followed by a tag name is literal text
        if !after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
        {
            if hidden_until.is_none() {
                result.push('<');
            }
            rest = after;
            continue;
        }

        if let Some(comment) = after.strip_prefix("!--") {
            rest = comment.find("-->").map_or("", |end| &comment[end + 3..]);
            continue;
        }

        let Some(end) = after.find('>') else {
            // Unterminated tag, keep it as text
            if hidden_until.is_none() {
                result.push('<');
                result.push_str(after);
            }
            rest = "";
            break;
        };

        let tag = after[..end].to_ascii_lowercase();
        let name: String = tag
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '/')
            .collect();

        match hidden_until {
            Some(closing) if name == closing => hidden_until = None,
            Some(_) => {}
            None if name == "script" => hidden_until = Some("/script"),
            None if name == "style" => hidden_until = Some("/style"),
            None => {}
        }

        rest = &after[end + 1..];
    }

    if hidden_until.is_none() {
        result.push_str(rest);
    }

    decode_entities(&result)
}

/// Decode named and numeric character references
#[must_use]
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY_REGEX
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(entity)
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        "hellip" => '\u{2026}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "euro" => '\u{20ac}',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags() {
        let text = visible_text("<html><body><h1>Hello</h1><p>World</p></body></html>");
        assert_eq!(text, "HelloWorld");
    }

    #[test]
    fn plain_text_is_unchanged() {
        let text = "Hello,\n\n  a < b and c > d\n";
        assert_eq!(visible_text(text), text);
    }

    #[test]
    fn drops_script_and_style() {
        let text = visible_text(
            "<style>p { color: red; }</style><p>Shown</p><script>alert('x')</script>!",
        );
        assert_eq!(text, "Shown!");
    }

    #[test]
    fn drops_comments() {
        assert_eq!(visible_text("a<!-- hidden <b>x</b> -->b"), "ab");
    }

    #[test]
    fn decodes_entities() {
        assert_eq!(
            visible_text("<p>Fish &amp; Chips &lt;3 &#65;&#x42; &bogus;</p>"),
            "Fish & Chips <3 AB &bogus;"
        );
    }

    #[test]
    fn stripping_is_idempotent_for_text() {
        let once = visible_text("<div>Hello <b>there</b></div>");
        assert_eq!(visible_text(&once), once);
    }
}
