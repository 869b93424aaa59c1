// Scripts for engines that can only load raw HTML through script evaluation.
// Pure string building, no engine imports.

use crate::error::BrowserError;
use crate::modules::navigation::BLANK_URL;

/// Script that replaces the current document with `body`.
///
/// A non-blank `base_url` is installed as the document's `<base>` so relative
/// links in the content resolve against it. Both strings are embedded as JSON
/// literals, which are valid JS string literals.
pub fn document_write_script(body: &str, base_url: &str) -> Result<String, BrowserError> {
    let body = serde_json::to_string(body)?;
    let base = if base_url == BLANK_URL {
        "null".to_string()
    } else {
        serde_json::to_string(base_url)?
    };

    Ok(format!(
        r#"(function() {{
    var html = {};
    var base = {};
    document.open();
    document.write(html);
    document.close();
    if (base !== null && document.head) {{
        var el = document.createElement('base');
        el.href = base;
        document.head.insertBefore(el, document.head.firstChild);
    }}
}})();"#,
        body, base
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_base_is_not_installed() {
        let script = document_write_script("<b>hi</b>", "about:blank").unwrap();
        assert!(script.contains(r#"var html = "<b>hi</b>";"#));
        assert!(script.contains("var base = null;"));
    }

    #[test]
    fn test_base_url_embedded() {
        let script = document_write_script("<p>x</p>", "https://example.com/docs/").unwrap();
        assert!(script.contains(r#"var base = "https://example.com/docs/";"#));
    }

    #[test]
    fn test_body_quotes_are_escaped() {
        let script = document_write_script("<a href=\"x\">it's</a>\n</script>", "about:blank").unwrap();
        assert!(script.contains(r#"var html = "<a href=\"x\">it's</a>\n</script>";"#));
    }
}
