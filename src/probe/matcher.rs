use serde::Serialize;

use crate::rules::CompiledRule;

/// Which captured text satisfied the winning rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Banner,
    LoginBanner,
}

impl std::fmt::Display for MatchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchSource::Banner => write!(f, "banner"),
            MatchSource::LoginBanner => write!(f, "login_banner"),
        }
    }
}

/// Read-only view into the compiled rule set for the winning rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleMatch<'a> {
    pub rule: &'a CompiledRule,
    pub source: MatchSource,
}

/// First-match-wins evaluation over the compiled rules, in declared
/// order. Within a rule, predicates are checked in a fixed priority:
/// login_contains, login_regex, equals, contains, regex. Login banners
/// are operator-authored and higher-signal than the protocol line, so a
/// rule's login predicates win over its banner predicates; across
/// rules, declaration order is the tiebreaker.
///
/// Pure function of its inputs: no state survives a call, so repeated
/// evaluation with the same inputs yields the same outcome.
pub fn match_rules<'a>(
    rules: &'a [CompiledRule],
    banner: &str,
    login: &str,
) -> Option<RuleMatch<'a>> {
    for rule in rules {
        let spec = &rule.def.matcher;

        if rule.has_login_contains
            && !login.is_empty()
            && login.contains(spec.login_contains.as_deref().unwrap_or_default())
        {
            return Some(RuleMatch {
                rule,
                source: MatchSource::LoginBanner,
            });
        }
        if let Some(re) = &rule.login_regex {
            if !login.is_empty() && re.is_match(login) {
                return Some(RuleMatch {
                    rule,
                    source: MatchSource::LoginBanner,
                });
            }
        }

        if rule.has_equals && banner == spec.equals.as_deref().unwrap_or_default() {
            return Some(RuleMatch {
                rule,
                source: MatchSource::Banner,
            });
        }
        if rule.has_contains && banner.contains(spec.contains.as_deref().unwrap_or_default()) {
            return Some(RuleMatch {
                rule,
                source: MatchSource::Banner,
            });
        }
        if let Some(re) = &rule.banner_regex {
            if re.is_match(banner) {
                return Some(RuleMatch {
                    rule,
                    source: MatchSource::Banner,
                });
            }
        }
    }
    None
}
