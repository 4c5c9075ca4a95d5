//! Path normalization for user-supplied locations.

use std::path::PathBuf;

/// Expand a leading `~` and any `$VAR` / `${VAR}` references.
///
/// Returns the input unchanged when the home directory is unknown, a
/// variable is unset, or a `${` is never closed.
pub fn expand_path(input: &str) -> String {
    try_expand(input).unwrap_or_else(|| input.to_string())
}

/// [`expand_path`] as a `PathBuf`.
pub fn expand_to_path(input: &str) -> PathBuf {
    PathBuf::from(expand_path(input))
}

fn try_expand(input: &str) -> Option<String> {
    let with_home = match input.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            let home = directories::BaseDirs::new()?.home_dir().to_path_buf();
            format!("{}{}", home.display(), rest)
        }
        _ => input.to_string(),
    };
    expand_vars(&with_home)
}

fn expand_vars(input: &str) -> Option<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            let end = braced.find('}')?;
            (&braced[..end], end + 2)
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        if name.is_empty() {
            out.push('$');
        } else {
            out.push_str(&std::env::var(name).ok()?);
        }
        rest = &after[consumed..];
    }
    out.push_str(rest);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_unchanged() {
        assert_eq!(expand_path("/opt/arbiter/params"), "/opt/arbiter/params");
        assert_eq!(expand_path("relative/dir"), "relative/dir");
    }

    #[test]
    fn test_env_expansion() {
        let home = std::env::var("PATH").unwrap();
        assert_eq!(expand_path("$PATH/x"), format!("{}/x", home));
        assert_eq!(expand_path("${PATH}x"), format!("{}x", home));
    }

    #[test]
    fn test_unset_variable_returns_literal() {
        let input = "$ARBITER_SURELY_UNSET_VARIABLE_42/params";
        assert_eq!(expand_path(input), input);
    }

    #[test]
    fn test_unclosed_brace_returns_literal() {
        assert_eq!(expand_path("${PATH"), "${PATH");
    }

    #[test]
    fn test_lone_dollar_kept() {
        assert_eq!(expand_path("cost$"), "cost$");
        assert_eq!(expand_path("a$/b"), "a$/b");
    }

    #[test]
    fn test_tilde_expansion() {
        if let Some(base) = directories::BaseDirs::new() {
            let expanded = expand_path("~/params");
            assert_eq!(expanded, format!("{}/params", base.home_dir().display()));
        }
        assert_eq!(expand_path("~user/params"), "~user/params");
    }
}
