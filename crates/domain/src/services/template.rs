//! Message template processing.
//!
//! Templates use `{{name}}` placeholders (inner whitespace allowed, names made
//! of letters, digits, `_` and `.`). Rendering fails open: a placeholder with
//! no value is left in the output exactly as written. Callers that need every
//! placeholder filled check [`missing_placeholders`] first, or use
//! [`render_strict`].

use regex::{Captures, Regex};
use std::collections::HashMap;
use thiserror::Error;

lazy_static::lazy_static! {
    static ref PLACEHOLDER_REGEX: Regex =
        Regex::new(r"\{\{\s*([A-Za-z0-9_.]+)\s*\}\}").unwrap();
}

/// Errors produced by strict template rendering.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Missing values for placeholders: {}", .0.join(", "))]
    MissingPlaceholders(Vec<String>),
}

/// Replaces every placeholder that has a value in `values`.
///
/// Unresolved placeholders are kept verbatim. Substituted values are not
/// scanned again, so a value containing `{{x}}` is inserted literally.
pub fn render(template: &str, values: &HashMap<String, String>) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures<'_>| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Distinct placeholder names in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_REGEX.captures_iter(template) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Placeholder names used by `template` that have no entry in `values`.
pub fn missing_placeholders(template: &str, values: &HashMap<String, String>) -> Vec<String> {
    placeholders(template)
        .into_iter()
        .filter(|name| !values.contains_key(name))
        .collect()
}

/// Renders the template, failing if any placeholder has no value.
pub fn render_strict(
    template: &str,
    values: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let missing = missing_placeholders(template, values);
    if !missing.is_empty() {
        return Err(TemplateError::MissingPlaceholders(missing));
    }
    Ok(render(template, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_all_resolved() {
        let rendered = render(
            "Hi {{name}}, thanks for giving {{ amount }} to {{campaign.title}}!",
            &values(&[
                ("name", "Ada"),
                ("amount", "$25.00"),
                ("campaign.title", "Clean Water"),
            ]),
        );
        assert_eq!(rendered, "Hi Ada, thanks for giving $25.00 to Clean Water!");
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn test_render_unresolved_left_verbatim() {
        let rendered = render("Hi {{name}}, your code is {{ code }}", &values(&[("name", "Ada")]));
        assert_eq!(rendered, "Hi Ada, your code is {{ code }}");
    }

    #[test]
    fn test_render_generated_names() {
        use fake::faker::name::en::{FirstName, LastName};
        use fake::Fake;

        let first: String = FirstName().fake();
        let last: String = LastName().fake();
        let rendered = render(
            "Dear {{first}} {{last}},",
            &values(&[("first", &first), ("last", &last)]),
        );
        assert_eq!(rendered, format!("Dear {} {},", first, last));
    }

    #[test]
    fn test_render_repeated_placeholder() {
        let rendered = render("{{x}}-{{x}}", &values(&[("x", "1")]));
        assert_eq!(rendered, "1-1");
    }

    #[test]
    fn test_render_value_not_rescanned() {
        let rendered = render("{{a}}", &values(&[("a", "{{b}}"), ("b", "nope")]));
        assert_eq!(rendered, "{{b}}");
    }

    #[test]
    fn test_render_ignores_malformed_tokens() {
        let template = "{name} {{ }} {{bad name}}";
        assert_eq!(render(template, &values(&[("name", "x")])), template);
    }

    #[test]
    fn test_placeholders_dedup_in_order() {
        assert_eq!(
            placeholders("{{b}} {{a}} {{b}} {{ c }}"),
            vec!["b".to_string(), "a".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_missing_placeholders() {
        let missing = missing_placeholders(
            "{{first}} {{last}} {{first}} {{email}}",
            &values(&[("first", "Ada")]),
        );
        assert_eq!(missing, vec!["last".to_string(), "email".to_string()]);
    }

    #[test]
    fn test_missing_placeholders_none() {
        assert!(missing_placeholders("no tokens here", &HashMap::new()).is_empty());
    }

    #[test]
    fn test_render_strict() {
        assert_eq!(
            render_strict("Hi {{name}}", &values(&[("name", "Ada")])).unwrap(),
            "Hi Ada"
        );
        let err = render_strict("Hi {{name}} {{x}}", &HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingPlaceholders(vec!["name".to_string(), "x".to_string()])
        );
        assert_eq!(err.to_string(), "Missing values for placeholders: name, x");
    }
}
