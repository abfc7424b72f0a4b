//! Rule sets shipped with the crate, stored as JSON next to the sources.

use crate::error::{CodemodError, CodemodResult};
use crate::rules::RewriteRule;

const BUILTIN: &[(&str, &str)] = &[
    (
        "memoize-one@5.0.0",
        include_str!("../rules/memoize-one-5.0.0.json"),
    ),
    (
        "@atlaskit/avatar@19.0.0",
        include_str!("../rules/atlaskit-avatar-19.0.0.json"),
    ),
    (
        "@atlaskit/textarea@4.0.0",
        include_str!("../rules/atlaskit-textarea-4.0.0.json"),
    ),
    (
        "@atlaskit/tag@11.0.0",
        include_str!("../rules/atlaskit-tag-11.0.0.json"),
    ),
];

/// Names accepted by [`builtin`], e.g. `memoize-one@5.0.0`.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|(name, _)| *name)
}

pub fn builtin(name: &str) -> CodemodResult<Vec<RewriteRule>> {
    let (_, json) = BUILTIN
        .iter()
        .find(|(n, _)| *n == name)
        .ok_or_else(|| CodemodError::invalid_rule(name, "no built-in rule set with this name"))?;
    from_json(json)
}

/// Parse and validate a JSON array of rules.
pub fn from_json(json: &str) -> CodemodResult<Vec<RewriteRule>> {
    let rules: Vec<RewriteRule> = serde_json::from_str(json)?;
    for rule in &rules {
        rule.validate()?;
    }
    Ok(rules)
}
