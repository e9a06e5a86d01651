//! Text cleanup for values scraped from result pages

/// Entities that survive the HTML parser when a site double-escapes text
const ENTITIES: [(&str, &str); 6] = [
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&nbsp;", " "),
    ("&amp;", "&"),
];

/// Decodes entities left in already-parsed text
///
/// `&amp;` is decoded last so `&amp;lt;` becomes `&lt;`, not `<`.
pub fn unescape_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, replacement)| {
            acc.replace(entity, replacement)
        })
}

/// Removes `<!-- ... -->` annotations embedded in text
///
/// An unterminated annotation runs to the end of the text.
pub fn strip_comments(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("<!--") {
        result.push_str(&rest[..start]);
        match rest[start + 4..].find("-->") {
            Some(end) => rest = &rest[start + 4 + end + 3..],
            None => rest = "",
        }
    }
    result.push_str(rest);

    result
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Full cleanup applied to titles and employer names
pub fn clean_text(raw: &str) -> String {
    normalize_whitespace(&strip_comments(&unescape_entities(raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape_entities("R&amp;D"), "R&D");
        assert_eq!(unescape_entities("&quot;Acme&quot;"), "\"Acme\"");
        assert_eq!(unescape_entities("O&#39;Reilly"), "O'Reilly");
        assert_eq!(unescape_entities("plain"), "plain");
    }

    #[test]
    fn test_unescape_amp_last() {
        assert_eq!(unescape_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("Rust <!--noindex-->developer"), "Rust developer");
        assert_eq!(strip_comments("<!--a-->x<!--b-->y"), "xy");
        assert_eq!(strip_comments("no comments"), "no comments");
    }

    #[test]
    fn test_strip_unterminated_comment() {
        assert_eq!(strip_comments("Engineer <!-- trailing"), "Engineer ");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Senior \n  Rust\tdeveloper "), "Senior Rust developer");
    }

    #[test]
    fn test_clean_text_decodes_then_strips() {
        assert_eq!(
            clean_text(" Backend &lt;!--noindex--&gt;developer&lt;!--/noindex--&gt; "),
            "Backend developer"
        );
        assert_eq!(clean_text("ООО &quot;Ромашка&quot;"), "ООО \"Ромашка\"");
    }
}
