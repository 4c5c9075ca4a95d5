//! Helpers for building and splitting option vectors.

use crate::error::PropertyError;
use crate::types::OptionVector;
use std::collections::BTreeMap;

/// Split on spaces, keeping double-quoted runs together.
///
/// Quotes are dropped from the output; `\"` yields a literal quote and does
/// not toggle quoting. Runs of spaces outside quotes produce no empty atoms.
pub fn split_quoted_string(input: &str) -> OptionVector {
    let mut atoms = Vec::new();
    let mut buffer = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'"') => {
                chars.next();
                buffer.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ' ' if !in_quotes => {
                if !buffer.is_empty() {
                    atoms.push(std::mem::take(&mut buffer));
                }
            }
            _ => buffer.push(c),
        }
    }
    if !buffer.is_empty() {
        atoms.push(buffer);
    }
    atoms
}

/// Wrap every string containing a space in double quotes.
pub fn quote_strings<S: AsRef<str>>(strings: &[S]) -> OptionVector {
    strings
        .iter()
        .map(|s| {
            let s = s.as_ref();
            if s.contains(' ') {
                format!("\"{}\"", s)
            } else {
                s.to_string()
            }
        })
        .collect()
}

/// Escape backslashes and double quotes so the result can be embedded in a
/// quoted option value.
pub fn escape_quotes(input: &str) -> String {
    input.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render `-key value ` pairs, sorted by key.
pub fn arg_map_to_string(args: &BTreeMap<String, String>) -> String {
    args.iter()
        .map(|(key, value)| format!("-{} {} ", key, value))
        .collect()
}

/// Drop every argument whose key contains `HIDDEN`.
pub fn remove_hidden(args: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    args.iter()
        .filter(|(key, _)| !key.contains("HIDDEN"))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Split `params` into `num_left` leading pieces, one middle piece, and
/// `num_right` trailing pieces, cutting at `delimiter`.
///
/// The middle piece keeps any inner delimiters, so nested option strings
/// survive intact.
pub fn split_nested_string(
    params: &str,
    delimiter: &str,
    num_left: usize,
    num_right: usize,
) -> Result<Vec<String>, PropertyError> {
    let mut pieces = Vec::with_capacity(num_left + num_right + 1);

    let mut start = 0;
    for found in 0..num_left {
        let end = params[start..]
            .find(delimiter)
            .map(|offset| start + offset)
            .ok_or(PropertyError::DelimiterNotFound { found, side: "left" })?;
        pieces.push(params[start..end].to_string());
        start = end + delimiter.len();
    }
    let middle_start = start;

    let mut trailing = Vec::with_capacity(num_right);
    let mut end = params.len();
    for found in 0..num_right {
        let cut = params[..end]
            .rfind(delimiter)
            .ok_or(PropertyError::DelimiterNotFound { found, side: "right" })?;
        trailing.push(params[cut + delimiter.len()..end].to_string());
        end = cut;
    }
    let middle_end = end;

    if middle_start >= middle_end {
        return Err(PropertyError::EmptyMiddle);
    }
    pieces.push(params[middle_start..middle_end].to_string());
    pieces.extend(trailing.into_iter().rev());
    Ok(pieces)
}

/// Every combination taking one element from each set.
///
/// The first set varies fastest. An empty input yields one empty combination;
/// any empty set yields no combinations.
pub fn cartesian_product<T: Clone>(sets: &[Vec<T>]) -> Vec<Vec<T>> {
    let mut combos: Vec<Vec<T>> = vec![Vec::with_capacity(sets.len())];
    for set in sets {
        let mut next = Vec::with_capacity(combos.len() * set.len());
        for item in set {
            for combo in &combos {
                let mut extended = combo.clone();
                extended.push(item.clone());
                next.push(extended);
            }
        }
        combos = next;
    }
    combos
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_quoted_string() {
        assert_eq!(
            split_quoted_string(r#"-W weka.J48  -- "-C 0.25 -M 2" x"#),
            vec!["-W", "weka.J48", "--", "-C 0.25 -M 2", "x"]
        );
    }

    #[test]
    fn test_split_escaped_quote() {
        assert_eq!(
            split_quoted_string(r#"a\"b "c \"d\" e""#),
            vec![r#"a"b"#, r#"c "d" e"#]
        );
    }

    #[test]
    fn test_split_empty() {
        assert!(split_quoted_string("   ").is_empty());
    }

    #[test]
    fn test_quote_strings() {
        assert_eq!(quote_strings(&["a", "b c"]), vec!["a", "\"b c\""]);
    }

    #[test]
    fn test_quote_then_split() {
        let original = vec!["-K".to_string(), "weka.Foo -x 1".to_string()];
        let joined = quote_strings(&original).join(" ");
        assert_eq!(split_quoted_string(&joined), original);
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_quotes(r#"a\b"c"#), r#"a\\b\"c"#);
    }

    #[test]
    fn test_arg_map_and_hidden() {
        let mut args = BTreeMap::new();
        args.insert("M".to_string(), "2".to_string());
        args.insert("C".to_string(), "0.25".to_string());
        args.insert("C_HIDDEN".to_string(), "1".to_string());

        let visible = remove_hidden(&args);
        assert_eq!(arg_map_to_string(&visible), "-C 0.25 -M 2 ");
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_split_nested_string() {
        let pieces = split_nested_string("a b c d e", " ", 1, 2).unwrap();
        assert_eq!(pieces, vec!["a", "b c", "d", "e"]);
    }

    #[test]
    fn test_split_nested_multichar_delimiter() {
        let pieces = split_nested_string("x||y||z", "||", 1, 1).unwrap();
        assert_eq!(pieces, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_split_nested_errors() {
        assert_eq!(
            split_nested_string("a b", " ", 2, 0),
            Err(PropertyError::DelimiterNotFound { found: 1, side: "left" })
        );
        assert_eq!(
            split_nested_string("a b", " ", 1, 1),
            Err(PropertyError::EmptyMiddle)
        );
    }

    #[test]
    fn test_cartesian_product() {
        let sets = vec![vec!["a", "b"], vec!["1", "2"]];
        assert_eq!(
            cartesian_product(&sets),
            vec![
                vec!["a", "1"],
                vec!["b", "1"],
                vec!["a", "2"],
                vec!["b", "2"],
            ]
        );
        assert!(cartesian_product(&[vec!["a"], Vec::<&str>::new()]).is_empty());
        assert_eq!(cartesian_product::<u8>(&[]), vec![Vec::<u8>::new()]);
    }
}
