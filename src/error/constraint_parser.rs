use std::sync::OnceLock;

use regex::Regex;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// Unique indexes over document attributes are named `{collection}_{field}_key`
/// and are built on `(data ->> 'field')` expressions, so the violation detail
/// looks like `Key ((data ->> 'email'::text))=(a@example.com) already exists.`
pub struct ConstraintParser;

struct RegexPatterns {
    key_value: Regex,
    json_field: Regex,
    column_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            // Value is the last parenthesized group before "already exists"
            key_value: Regex::new(r"Key \((.+)\)=\((.*)\)(?: already exists)?")
                .expect("key/value pattern is valid"),
            json_field: Regex::new(r"->>\s*'([^']+)'").expect("json field pattern is valid"),
            column_name: Regex::new(r#"column "([^"]+)""#).expect("column pattern is valid"),
        }
    }
}

static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Parses a unique violation into `(entity, field, value)`.
    ///
    /// The constraint name gives collection and field; the detail text gives
    /// the conflicting value. Falls back to the key expression when the
    /// constraint name does not follow the naming scheme.
    pub fn parse_unique_violation(
        detail: Option<&str>,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = detail.and_then(Self::extract_key_value);
        let value = key_value
            .as_ref()
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| "duplicate_value".to_string());

        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            return Some((entity, field, value));
        }

        let (key, value) = key_value?;
        Some(("resource".to_string(), Self::field_from_key(&key), value))
    }

    /// Parses a not-null violation message into the offending column.
    pub fn parse_not_null_violation(message: &str) -> Option<String> {
        Self::patterns()
            .column_name
            .captures(message)
            .map(|caps| caps[1].to_string())
    }

    /// Splits `{collection}_{field}_key` into `(collection, field)`.
    ///
    /// The collection is the first underscore-separated segment, so
    /// multi-word fields such as `users_phone_number_key` keep their
    /// underscores.
    pub fn parse_constraint_name(constraint: &str) -> Option<(String, String)> {
        let stem = constraint
            .strip_suffix("_key")
            .or_else(|| constraint.strip_suffix("_unique"))?;
        let (entity, field) = stem.split_once('_')?;
        if entity.is_empty() || field.is_empty() {
            return None;
        }
        Some((entity.to_string(), field.to_string()))
    }

    fn extract_key_value(detail: &str) -> Option<(String, String)> {
        Self::patterns()
            .key_value
            .captures(detail)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
    }

    fn field_from_key(key: &str) -> String {
        Self::patterns()
            .json_field
            .captures(key)
            .map(|caps| caps[1].to_string())
            .unwrap_or_else(|| key.trim_matches(|c| c == '(' || c == ')').to_string())
    }
}
