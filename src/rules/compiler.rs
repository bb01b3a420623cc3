use regex::Regex;
use thiserror::Error;

use crate::rules::model::{RuleDef, RuleFile};

/// Which pattern field of a rule failed to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternField {
    Banner,
    Login,
}

impl std::fmt::Display for PatternField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternField::Banner => write!(f, "regex"),
            PatternField::Login => write!(f, "login_regex"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("rule set unreadable: {0}")]
    Unreadable(#[from] serde_yaml::Error),
    #[error("invalid {field} for rule {rule_id:?}: {source}")]
    InvalidPattern {
        rule_id: String,
        field: PatternField,
        source: regex::Error,
    },
}

/// A rule with its regexes pre-built and literal predicates flagged, so
/// matching never has to re-inspect the raw option fields to tell
/// "absent" from "present but unmatched".
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub def: RuleDef,
    pub banner_regex: Option<Regex>,
    pub login_regex: Option<Regex>,
    pub has_equals: bool,
    pub has_contains: bool,
    pub has_login_contains: bool,
}

// An empty string predicate is treated as not declared, matching the
// rule document's zero-value semantics.
fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.is_empty())
}

fn compile_pattern(
    pattern: &Option<String>,
    rule_id: &str,
    field: PatternField,
) -> Result<Option<Regex>, RuleError> {
    match pattern.as_deref().filter(|s| !s.is_empty()) {
        Some(pat) => Regex::new(pat)
            .map(Some)
            .map_err(|source| RuleError::InvalidPattern {
                rule_id: rule_id.to_string(),
                field,
                source,
            }),
        None => Ok(None),
    }
}

/// Parses the rule document and pre-compiles every pattern, preserving
/// document order exactly. Any malformed document or pattern is fatal:
/// a silently dropped rule would change match results undetectably.
pub fn compile_rules(data: &[u8]) -> Result<Vec<CompiledRule>, RuleError> {
    let file: RuleFile = serde_yaml::from_slice(data)?;

    let mut compiled = Vec::with_capacity(file.rules.len());
    for def in file.rules {
        let banner_regex = compile_pattern(&def.matcher.regex, &def.id, PatternField::Banner)?;
        let login_regex = compile_pattern(&def.matcher.login_regex, &def.id, PatternField::Login)?;

        compiled.push(CompiledRule {
            has_equals: present(&def.matcher.equals),
            has_contains: present(&def.matcher.contains),
            has_login_contains: present(&def.matcher.login_contains),
            banner_regex,
            login_regex,
            def,
        });
    }
    Ok(compiled)
}
