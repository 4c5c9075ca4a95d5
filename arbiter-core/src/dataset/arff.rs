//! Dense ARFF reader.
//!
//! Supports `@relation`, `@attribute` (numeric, real, integer, nominal,
//! string, date, relational) and dense `@data` rows. The last attribute is
//! taken as the class.

use super::{Attribute, AttributeType, Dataset, Instances, Value};
use crate::error::{ArbiterError, DatasetError};
use std::path::Path;

/// Read and parse an ARFF file.
pub fn load_arff(path: &Path) -> Result<Instances, ArbiterError> {
    let content = std::fs::read_to_string(path)?;
    let instances = parse_arff(&content)?;
    tracing::debug!(
        path = %path.display(),
        relation = %instances.relation_name(),
        instances = instances.num_instances(),
        "Loaded dataset"
    );
    Ok(instances)
}

/// Parse ARFF text into [`Instances`].
pub fn parse_arff(content: &str) -> Result<Instances, DatasetError> {
    let mut relation = String::new();
    let mut attributes = Vec::new();
    let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));
    let mut in_data = false;
    let mut rows = Vec::new();

    while let Some((line_no, line)) = lines.next() {
        if line.is_empty() || line.starts_with('%') {
            continue;
        }
        if in_data {
            rows.push((line_no, line));
            continue;
        }

        let (keyword, rest) = split_keyword(line);
        match keyword.to_lowercase().as_str() {
            "@relation" => {
                relation = unquote(rest).to_string();
            }
            "@attribute" => {
                let attribute = parse_attribute(rest).map_err(|message| DatasetError::Parse {
                    line: line_no,
                    message,
                })?;
                if attribute.kind == AttributeType::Relational {
                    skip_relational_block(&mut lines, &attribute.name)?;
                }
                attributes.push(attribute);
            }
            "@data" => in_data = true,
            _ => {
                return Err(DatasetError::Parse {
                    line: line_no,
                    message: format!("unexpected header line '{}'", line),
                });
            }
        }
    }

    if attributes.is_empty() {
        return Err(DatasetError::NoAttributes);
    }

    let mut instances = Instances::new(relation, attributes).with_last_as_class()?;
    for (line_no, line) in rows {
        let row = parse_row(line, instances.attributes())
            .map_err(|message| DatasetError::Parse {
                line: line_no,
                message,
            })?;
        instances.push(row)?;
    }
    Ok(instances)
}

fn split_keyword(line: &str) -> (&str, &str) {
    match line.find(char::is_whitespace) {
        Some(i) => (&line[..i], line[i..].trim()),
        None => (line, ""),
    }
}

fn unquote(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('\'') && s.ends_with('\'')) || (s.starts_with('"') && s.ends_with('"')))
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Split off a possibly quoted leading token.
fn take_name(s: &str) -> Result<(String, &str), String> {
    let s = s.trim_start();
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, q @ ('\'' | '"'))) => {
            let mut name = String::new();
            let mut escaped = false;
            for (i, c) in chars {
                if escaped {
                    name.push(c);
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    return Ok((name, &s[i + 1..]));
                } else {
                    name.push(c);
                }
            }
            Err(format!("unterminated quote in '{}'", s))
        }
        Some(_) => {
            let end = s.find(char::is_whitespace).unwrap_or(s.len());
            Ok((s[..end].to_string(), &s[end..]))
        }
        None => Err("missing attribute name".to_string()),
    }
}

fn parse_attribute(rest: &str) -> Result<Attribute, String> {
    let (name, type_spec) = take_name(rest)?;
    let type_spec = type_spec.trim();
    if type_spec.starts_with('{') {
        let close = type_spec
            .rfind('}')
            .ok_or_else(|| format!("unterminated nominal specification for '{}'", name))?;
        let values = split_row(&type_spec[1..close])?
            .into_iter()
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>();
        return Ok(Attribute {
            name,
            kind: AttributeType::Nominal(values),
        });
    }

    let (keyword, format) = split_keyword(type_spec);
    let kind = match keyword.to_lowercase().as_str() {
        "numeric" | "real" | "integer" => AttributeType::Numeric,
        "string" => AttributeType::String,
        "date" => {
            let format = unquote(format);
            AttributeType::Date((!format.is_empty()).then(|| format.to_string()))
        }
        "relational" => AttributeType::Relational,
        "" => return Err(format!("missing type for attribute '{}'", name)),
        other => return Err(format!("unknown attribute type '{}'", other)),
    };
    Ok(Attribute { name, kind })
}

fn skip_relational_block<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    name: &str,
) -> Result<(), DatasetError> {
    let mut last = 0;
    for (line_no, line) in lines.by_ref() {
        last = line_no;
        let (keyword, rest) = split_keyword(line);
        if keyword.eq_ignore_ascii_case("@end") && unquote(rest) == name {
            return Ok(());
        }
    }
    Err(DatasetError::Parse {
        line: last,
        message: format!("relational attribute '{}' has no @end", name),
    })
}

/// Split a comma-separated line, honouring single and double quotes.
fn split_row(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut was_quoted = false;

    for c in line.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some(_), '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                if current.trim().is_empty() {
                    current.clear();
                }
                quote = Some(c);
                was_quoted = true;
            }
            (None, ',') => {
                tokens.push(finish_token(&current, was_quoted));
                current.clear();
                was_quoted = false;
            }
            (None, c) if was_quoted && c.is_whitespace() => {}
            (None, c) => current.push(c),
        }
    }
    if quote.is_some() {
        return Err(format!("unterminated quote in '{}'", line));
    }
    tokens.push(finish_token(&current, was_quoted));
    Ok(tokens)
}

fn finish_token(raw: &str, quoted: bool) -> String {
    if quoted {
        raw.to_string()
    } else {
        raw.trim().to_string()
    }
}

fn parse_row(line: &str, attributes: &[Attribute]) -> Result<Vec<Value>, String> {
    if line.starts_with('{') {
        return Err("sparse instances are not supported".to_string());
    }
    let tokens = split_row(line)?;
    if tokens.len() != attributes.len() {
        return Err(format!(
            "expected {} values, found {}",
            attributes.len(),
            tokens.len()
        ));
    }

    tokens
        .into_iter()
        .zip(attributes)
        .map(|(token, attribute)| {
            if token == "?" {
                return Ok(Value::Missing);
            }
            match &attribute.kind {
                AttributeType::Numeric => token
                    .parse::<f64>()
                    .map(Value::Number)
                    .map_err(|_| format!("'{}' is not numeric ({})", token, attribute.name)),
                AttributeType::Nominal(values) => values
                    .iter()
                    .position(|v| *v == token)
                    .map(Value::Nominal)
                    .ok_or_else(|| {
                        format!("'{}' is not a declared value of '{}'", token, attribute.name)
                    }),
                AttributeType::String | AttributeType::Date(_) | AttributeType::Relational => {
                    Ok(Value::Text(token))
                }
            }
        })
        .collect()
}
