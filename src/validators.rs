//! Validation rules applied when assigning constrained fields.
//!
//! A validator is a plain function: it either accepts the candidate or
//! returns a [`ValidationError`] describing why not. Validators hold no
//! state and never modify the candidate.

use thiserror::Error;

/// A rule gating assignment of a string field.
pub type Validator = fn(&str) -> Result<(), ValidationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {rule} '{value}': {reason}")]
pub struct ValidationError {
    /// The rule that rejected the value, e.g. "gml name"
    pub rule: &'static str,
    pub value: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(rule: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self {
            rule,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

const NAME_RULE: &str = "gml name";
const PROPERTY_NAME_RULE: &str = "gml property name";

/// Accepts XML NCNames: a letter or `_`, followed by letters, digits, `_`,
/// `-` or `.`.
pub fn gml_name_validator(candidate: &str) -> Result<(), ValidationError> {
    check_ncname(candidate).map_err(|reason| ValidationError::new(NAME_RULE, candidate, reason))
}

/// Accepts property paths such as `gml:name`, `road/@id` or
/// `address[2]/street`.
///
/// Steps are separated by `/`. Each step is an optionally prefixed name,
/// optionally marked as an attribute with `@`, and optionally followed by
/// a positional predicate `[n]` with `n >= 1`. Names and prefixes follow
/// the same rule as [`gml_name_validator`].
pub fn gml_property_name_validator(candidate: &str) -> Result<(), ValidationError> {
    let fail = |reason: String| ValidationError::new(PROPERTY_NAME_RULE, candidate, reason);

    if candidate.is_empty() {
        return Err(fail("empty property name".to_string()));
    }
    for (i, step) in candidate.split('/').enumerate() {
        check_step(step).map_err(|reason| fail(format!("step {}: {reason}", i + 1)))?;
    }
    Ok(())
}

fn check_step(step: &str) -> Result<(), String> {
    if step.is_empty() {
        return Err("empty step".to_string());
    }
    let step = step.strip_prefix('@').unwrap_or(step);

    let (name, predicate) = match step.find('[') {
        Some(open) => (&step[..open], Some(&step[open..])),
        None => (step, None),
    };

    match name.split_once(':') {
        Some((prefix, local)) => {
            check_ncname(prefix).map_err(|r| format!("prefix '{prefix}': {r}"))?;
            check_ncname(local).map_err(|r| format!("name '{local}': {r}"))?;
        }
        None => check_ncname(name).map_err(|r| format!("name '{name}': {r}"))?,
    }

    if let Some(predicate) = predicate {
        let index = predicate
            .strip_prefix('[')
            .and_then(|p| p.strip_suffix(']'))
            .ok_or_else(|| format!("malformed predicate '{predicate}'"))?;
        match index.parse::<u32>() {
            Ok(n) if n >= 1 && index.bytes().all(|b| b.is_ascii_digit()) => {}
            _ => return Err(format!("predicate '{predicate}' is not a positive index")),
        }
    }
    Ok(())
}

fn check_ncname(s: &str) -> Result<(), String> {
    let mut chars = s.chars();
    match chars.next() {
        None => return Err("empty name".to_string()),
        Some(c) if c.is_alphabetic() || c == '_' => {}
        Some(c) => return Err(format!("cannot start with '{c}'")),
    }
    match chars.find(|&c| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))) {
        Some(c) => Err(format!("invalid character '{c}'")),
        None => Ok(()),
    }
}
