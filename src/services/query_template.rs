//! Placeholder substitution for value-template queries.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::domain::errors::{AnalysisError, DomainResult};

/// Rendered in place of a placeholder missing from the argument map.
pub const NO_VALUE: &str = "<no value>";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.?([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// Substitutes `{{name}}` / `{{.name}}` placeholders with values from `args`.
///
/// Unknown names render as [`NO_VALUE`]. Delimiters left over after
/// substitution mean the template is malformed.
pub fn render_query(query: &str, args: &HashMap<String, String>) -> DomainResult<String> {
    let rendered = PLACEHOLDER.replace_all(query, |caps: &regex::Captures| {
        args.get(&caps[1])
            .cloned()
            .unwrap_or_else(|| NO_VALUE.to_string())
    });

    if let Some(position) = find_stray_delimiter(&PLACEHOLDER.replace_all(query, "")) {
        return Err(AnalysisError::QueryTemplate(format!(
            "malformed placeholder near position {} in '{}'",
            position, query
        )));
    }

    Ok(rendered.into_owned())
}

fn find_stray_delimiter(stripped: &str) -> Option<usize> {
    match (stripped.find("{{"), stripped.find("}}")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitutes_all_placeholders() {
        let rendered = render_query(
            "this is a {{good}} query{{dot}}",
            &args(&[("good", "good"), ("dot", ".")]),
        )
        .unwrap();
        assert_eq!(rendered, "this is a good query.");
    }

    #[test]
    fn test_missing_args_render_no_value() {
        let rendered = render_query("this is a {{good}} query{{dot}}", &HashMap::new()).unwrap();
        assert_eq!(rendered, "this is a <no value> query<no value>");
    }

    #[test]
    fn test_dotted_and_spaced_placeholders() {
        let rendered = render_query(
            "rate(http_requests{job='{{ .job }}'}[5m])",
            &args(&[("job", "api")]),
        )
        .unwrap();
        assert_eq!(rendered, "rate(http_requests{job='api'}[5m])");
    }

    #[test]
    fn test_query_without_placeholders_is_unchanged() {
        let query = "sum(rate(errors_total[1m]))";
        assert_eq!(render_query(query, &HashMap::new()).unwrap(), query);
    }

    #[test]
    fn test_unterminated_placeholder_fails() {
        let err = render_query("value {{good", &args(&[("good", "x")])).unwrap_err();
        assert!(matches!(err, AnalysisError::QueryTemplate(_)));
    }

    #[test]
    fn test_invalid_placeholder_name_fails() {
        assert!(render_query("value {{ not valid }}", &HashMap::new()).is_err());
    }
}
