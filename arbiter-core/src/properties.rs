//! Property strings: `key1=value1:key2=value2:...`.
//!
//! A colon inside a value must be escaped. Decoding accepts every escape
//! token in [`COLON_ESCAPES`]; encoding always writes [`CANONICAL_ESCAPE`].

use crate::error::PropertyError;
use std::collections::BTreeMap;

/// Property mapping, ordered by key so encoding is deterministic.
pub type Properties = BTreeMap<String, String>;

/// Tokens that, placed directly before a `:`, make it part of the value.
pub const COLON_ESCAPES: [&str; 4] = ["[@]", "\\", "[]", "__COLONESCAPE__"];

/// The escape written by [`properties_to_string`].
pub const CANONICAL_ESCAPE: &str = "__COLONESCAPE__";

/// Decode a property string.
///
/// An empty string yields an empty mapping. Each entry is split at its first
/// `=`; an entry without one is an error. Later duplicates overwrite earlier
/// ones.
pub fn parse_property_string(input: &str) -> Result<Properties, PropertyError> {
    let mut props = Properties::new();
    parse_property_string_into(&mut props, input)?;
    Ok(props)
}

/// Decode a property string into an existing mapping.
pub fn parse_property_string_into(props: &mut Properties, input: &str) -> Result<(), PropertyError> {
    if input.is_empty() {
        return Ok(());
    }
    for entry in split_unescaped(input) {
        let (key, raw_value) = entry.split_once('=').ok_or_else(|| PropertyError::InvalidEntry {
            entry: entry.to_string(),
        })?;
        props.insert(key.to_string(), unescape(raw_value));
    }
    Ok(())
}

/// Encode a mapping, escaping every colon in values.
pub fn properties_to_string(props: &Properties) -> String {
    props
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                key,
                value.replace(':', &format!("{}:", CANONICAL_ESCAPE))
            )
        })
        .collect::<Vec<_>>()
        .join(":")
}

/// Collect every `-prop <string>` pair from a command line into one mapping.
pub fn parse_command_line_properties<S: AsRef<str>>(args: &[S]) -> Result<Properties, PropertyError> {
    let mut props = Properties::new();
    let mut iter = args.iter().map(AsRef::as_ref);
    while let Some(arg) = iter.next() {
        if arg.starts_with("-prop") {
            let value = iter.next().ok_or_else(|| PropertyError::MissingArgument {
                flag: arg.to_string(),
            })?;
            parse_property_string_into(&mut props, value)?;
        }
    }
    Ok(props)
}

fn is_escaped(prefix: &str) -> bool {
    COLON_ESCAPES.iter().any(|token| prefix.ends_with(token))
}

fn split_unescaped(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in input.char_indices() {
        if c == ':' && !is_escaped(&input[..i]) {
            parts.push(&input[start..i]);
            start = i + 1;
        }
    }
    parts.push(&input[start..]);
    // trailing delimiters do not produce entries
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

fn unescape(value: &str) -> String {
    value
        .replace("[@]:", ":")
        .replace("\\:", ":")
        .replace("[]:", ":")
        .replace("__COLONESCAPE__:", ":")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn props(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_simple() {
        assert_eq!(
            parse_property_string("a=1:b=two").unwrap(),
            props(&[("a", "1"), ("b", "two")])
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_property_string("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_every_escape_form() {
        let parsed = parse_property_string(
            r"a=x[@]:y:b=x\:y:c=x[]:y:d=x__COLONESCAPE__:y",
        )
        .unwrap();
        for key in ["a", "b", "c", "d"] {
            assert_eq!(parsed[key], "x:y", "key {key}");
        }
    }

    #[test]
    fn test_value_may_contain_equals() {
        assert_eq!(
            parse_property_string("expr=a=b").unwrap(),
            props(&[("expr", "a=b")])
        );
    }

    #[test]
    fn test_invalid_entry() {
        let err = parse_property_string("a=1:oops").unwrap_err();
        assert_eq!(err.to_string(), "Invalid property 'oops'");
    }

    #[test]
    fn test_trailing_delimiters_ignored() {
        assert_eq!(parse_property_string("a=1:").unwrap(), props(&[("a", "1")]));
        assert_eq!(
            parse_property_string("a=1:b=x\\::").unwrap(),
            props(&[("a", "1"), ("b", "x:")])
        );
        assert!(parse_property_string(":").unwrap().is_empty());
        // an empty entry in the middle is still malformed
        assert!(parse_property_string("a=1::b=2").is_err());
    }

    #[test]
    fn test_encode_uses_canonical_escape() {
        let encoded = properties_to_string(&props(&[("x", "a:b"), ("y", "c")]));
        assert_eq!(encoded, "x=a__COLONESCAPE__:b:y=c");
    }

    #[test]
    fn test_round_trip_preserves_colon() {
        let original = props(&[("x", "a:b")]);
        let decoded = parse_property_string(&properties_to_string(&original)).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_round_trip_trailing_and_leading_colons() {
        let original = props(&[("a", ":"), ("b", "x:"), ("c", ":y"), ("d", "")]);
        let decoded = parse_property_string(&properties_to_string(&original)).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_command_line_properties() {
        let args = [
            "resolve",
            "-prop",
            "a=1:b=2",
            "--verbose",
            "-props",
            "b=3",
        ];
        let parsed = parse_command_line_properties(&args).unwrap();
        assert_eq!(parsed, props(&[("a", "1"), ("b", "3")]));
    }

    #[test]
    fn test_command_line_properties_missing_value() {
        assert!(matches!(
            parse_command_line_properties(&["-prop"]),
            Err(PropertyError::MissingArgument { .. })
        ));
    }
}
