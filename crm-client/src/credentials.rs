use std::fmt;

/// Form field Django reads the CSRF token from.
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";
/// Header alternative to [`CSRF_FIELD`].
pub const CSRF_HEADER: &str = "X-CSRFToken";
/// Django's session cookie.
pub const SESSION_COOKIE: &str = "sessionid";

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub session_id: Option<String>,
    pub csrf_token: Option<CsrfToken>,
}

impl Credentials {
    pub fn new(session_id: Option<String>, csrf_token: Option<CsrfToken>) -> Self {
        Self {
            session_id,
            csrf_token,
        }
    }
}

/// Token attached to every mutating request.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scrape the token from the hidden `csrfmiddlewaretoken` input of a
    /// rendered page.
    pub fn from_html(html: &str) -> Option<Self> {
        html.match_indices("<input").find_map(|(start, _)| {
            let end = start + html[start..].find('>')?;
            let tag = &html[start..end];
            if attr_value(tag, "name")? != CSRF_FIELD {
                return None;
            }
            attr_value(tag, "value")
                .filter(|value| !value.is_empty())
                .map(|value| Self(value.to_string()))
        })
    }
}

// Redacted so tokens never land in logs.
impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CsrfToken(***)")
    }
}

fn attr_value<'a>(tag: &'a str, attr: &str) -> Option<&'a str> {
    for quote in ['"', '\''] {
        let needle = format!("{}={}", attr, quote);
        for (pos, _) in tag.match_indices(&needle) {
            let preceded_by_space = tag[..pos]
                .chars()
                .next_back()
                .is_some_and(char::is_whitespace);
            if !preceded_by_space {
                continue;
            }
            let rest = &tag[pos + needle.len()..];
            let close = rest.find(quote)?;
            return Some(&rest[..close]);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrapes_hidden_input() {
        let html = r#"
            <form method="post">
                <input type="hidden" name="csrfmiddlewaretoken" value="abc123XYZ">
                <input type="text" name="search">
            </form>
        "#;
        let token = CsrfToken::from_html(html).unwrap();
        assert_eq!(token.as_str(), "abc123XYZ");
    }

    #[test]
    fn handles_single_quotes_and_attribute_order() {
        let html = "<input value='tok-1' type='hidden' name='csrfmiddlewaretoken' />";
        assert_eq!(CsrfToken::from_html(html).unwrap().as_str(), "tok-1");
    }

    #[test]
    fn ignores_lookalike_attributes() {
        let html = r#"<input data-name="csrfmiddlewaretoken" value="nope">
                      <input name="csrfmiddlewaretoken" value="yes">"#;
        assert_eq!(CsrfToken::from_html(html).unwrap().as_str(), "yes");
    }

    #[test]
    fn missing_or_empty_token() {
        assert!(CsrfToken::from_html("<html><body>login</body></html>").is_none());
        assert!(
            CsrfToken::from_html(r#"<input name="csrfmiddlewaretoken" value="">"#).is_none()
        );
    }

    #[test]
    fn debug_is_redacted() {
        let token = CsrfToken::new("secret");
        assert_eq!(format!("{:?}", token), "CsrfToken(***)");
    }
}
