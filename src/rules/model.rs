use serde::Deserialize;

/// Top-level shape of the fingerprint rule document.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

/// A single fingerprint rule as authored. Order in the document is the
/// order rules are evaluated in; the first matching rule wins.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDef {
    pub id: String,
    #[serde(rename = "match", default)]
    pub matcher: MatchSpec,
    /// OS display name, e.g. "Ubuntu Linux".
    pub os: String,
    #[serde(default)]
    pub os_shortname: Option<String>,
    /// Version may be absent if unknown.
    #[serde(default)]
    pub version: Option<String>,
}

/// Predicates a rule may declare. Each is optional; a rule with no
/// predicates never matches. `equals`/`contains`/`regex` are tested
/// against the protocol banner, the `login_*` pair against the login
/// banner. Regexes are searched, not anchored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchSpec {
    pub equals: Option<String>,
    pub contains: Option<String>,
    pub regex: Option<String>,
    pub login_contains: Option<String>,
    pub login_regex: Option<String>,
}
