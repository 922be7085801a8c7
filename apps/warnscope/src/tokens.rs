//! `${ANALYSIS_ISSUES_COUNT}` token expansion.
//!
//! Supported parameters: `tool="<id>"` selects one result (composite or
//! per-tool), `type="<COUNT_TYPE>"` selects the count. Tokens with another
//! name or with unknown parameters are left as they are.

use crate::models::recorder::CountType;
use crate::models::BuildRecord;
use regex::{Captures, Regex};
use std::sync::OnceLock;

pub const ISSUES_COUNT_MACRO: &str = "ANALYSIS_ISSUES_COUNT";

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\$\{([A-Z_]+)((?:\s*,\s*\w+\s*=\s*"[^"]*")*)\s*\}"#)
            .expect("valid token regex")
    })
}

fn param_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(\w+)\s*=\s*"([^"]*)""#).expect("valid parameter regex"))
}

/// Count selected by the token parameters; `None` for unsupported tokens.
fn evaluate(caps: &Captures<'_>, record: &BuildRecord) -> Option<i64> {
    if &caps[1] != ISSUES_COUNT_MACRO {
        return None;
    }
    let mut tool: Option<&str> = None;
    let mut count_type = CountType::Total;
    for param in param_regex().captures_iter(caps.get(2).map_or("", |m| m.as_str())) {
        let value = param.get(2).map_or("", |m| m.as_str());
        match &param[1] {
            "tool" => tool = Some(value),
            "type" => count_type = value.parse().ok()?,
            _ => return None,
        }
    }
    let count = match tool {
        Some(id) => record.find(id).map_or(0, |r| r.count(count_type)),
        None => record.published().iter().map(|r| r.count(count_type)).sum(),
    };
    Some(count)
}

/// Replace every supported token in `template` with its value for `record`.
pub fn expand(template: &str, record: &BuildRecord) -> String {
    token_regex()
        .replace_all(template, |caps: &Captures<'_>| match evaluate(caps, record) {
            Some(n) => n.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
