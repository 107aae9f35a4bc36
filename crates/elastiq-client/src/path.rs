//! Resource path templates.

use crate::{Error, Result};

/// A resource path with `{name}` placeholders, e.g. `{index}/_search/template`.
///
/// Expansion follows simple string expansion of RFC 6570: each bound value is
/// percent-encoded so that only unreserved characters (`A-Z a-z 0-9 - . _ ~`)
/// appear verbatim, which keeps every value inside its own path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathTemplate<'a> {
    template: &'a str,
}

impl<'a> PathTemplate<'a> {
    /// Creates a new path template.
    pub const fn new(template: &'a str) -> Self {
        Self { template }
    }

    /// Returns the raw template text.
    pub fn as_str(&self) -> &'a str {
        self.template
    }

    /// Expands the template with the given bindings.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::PathResolution`](crate::ErrorKind::PathResolution)
    /// error when a placeholder is unterminated or empty, when a `}` has no
    /// matching `{`, or when a placeholder has no binding.
    pub fn expand(&self, bindings: &[(&str, &str)]) -> Result<String> {
        let mut expanded = String::with_capacity(self.template.len());
        let mut rest = self.template;

        while let Some(start) = rest.find(['{', '}']) {
            let (literal, tail) = rest.split_at(start);
            expanded.push_str(literal);

            if tail.starts_with('}') {
                return Err(self.error(format!("unmatched `}}` at byte {}", self.offset(tail))));
            }

            let end = tail
                .find('}')
                .ok_or_else(|| self.error("unterminated placeholder"))?;
            let name = &tail[1..end];
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(self.error(format!("invalid placeholder name `{name}`")));
            }

            let value = bindings
                .iter()
                .find_map(|(key, value)| (*key == name).then_some(*value))
                .ok_or_else(|| self.error(format!("no binding for `{name}`")))?;
            expanded.push_str(&urlencoding::encode(value));

            rest = &tail[end + 1..];
        }

        expanded.push_str(rest);
        Ok(expanded)
    }

    fn offset(&self, tail: &str) -> usize {
        self.template.len() - tail.len()
    }

    fn error(&self, reason: impl AsRef<str>) -> Error {
        Error::path_resolution().with_message(format!(
            "cannot expand `{}`: {}",
            self.template,
            reason.as_ref()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const SEARCH_TEMPLATE: PathTemplate<'static> = PathTemplate::new("{index}/_search/template");

    #[test]
    fn test_expand_index() {
        let path = SEARCH_TEMPLATE.expand(&[("index", "my-index")]).unwrap();
        assert_eq!(path, "my-index/_search/template");
    }

    #[test]
    fn test_expand_escapes_reserved_characters() {
        let path = SEARCH_TEMPLATE.expand(&[("index", "logs/2024 a,b")]).unwrap();
        assert_eq!(path, "logs%2F2024%20a%2Cb/_search/template");

        let path = SEARCH_TEMPLATE.expand(&[("index", "a.b_c-d~e")]).unwrap();
        assert_eq!(path, "a.b_c-d~e/_search/template");
    }

    #[test]
    fn test_expand_without_placeholders() {
        let path = PathTemplate::new("_search/template").expand(&[]).unwrap();
        assert_eq!(path, "_search/template");
    }

    #[test]
    fn test_expand_multiple_placeholders() {
        let path = PathTemplate::new("{index}/_doc/{id}")
            .expand(&[("id", "1"), ("index", "books")])
            .unwrap();
        assert_eq!(path, "books/_doc/1");
    }

    #[test]
    fn test_expand_errors() {
        let cases = [
            ("{index/_search", vec![("index", "a")]),
            ("index}/_search", vec![("index", "a")]),
            ("{}/_search", vec![]),
            ("{in-dex}/_search", vec![("in-dex", "a")]),
            ("{index}/_search", vec![]),
        ];
        for (template, bindings) in cases {
            let error = PathTemplate::new(template).expand(&bindings).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::PathResolution, "{template}");
        }
    }
}
