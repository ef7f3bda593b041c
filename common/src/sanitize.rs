use std::sync::LazyLock;

use ammonia::Builder;

static STRIP_ALL: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut builder = Builder::empty();
    builder.clean_content_tags(["script", "style"].into_iter().collect());
    builder
});

/// Strips all markup from untrusted input and trims surrounding whitespace.
/// Script and style bodies are dropped entirely; text content of other tags
/// survives. Every free-text field passes through here before persistence.
pub fn sanitize(input: &str) -> String {
    STRIP_ALL.clean(input).to_string().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_but_keeps_text() {
        assert_eq!(sanitize("<b>Acme</b> Industries"), "Acme Industries");
        assert_eq!(sanitize("<a href=\"http://x\">link</a>"), "link");
    }

    #[test]
    fn drops_script_bodies() {
        assert_eq!(sanitize("<script>alert('x')</script>safe"), "safe");
        assert_eq!(sanitize("<style>body{}</style>plain"), "plain");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(sanitize("  hello world  "), "hello world");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(sanitize("1 Infinite Loop"), "1 Infinite Loop");
    }
}
