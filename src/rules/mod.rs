pub mod compiler;
pub mod model;

pub use compiler::{compile_rules, CompiledRule, PatternField, RuleError};
pub use model::{MatchSpec, RuleDef, RuleFile};

/// Fingerprint rules baked into the binary. Compiled once at startup;
/// the compiled handle is passed around by reference after that.
pub const EMBEDDED_RULES: &[u8] = include_bytes!("banners.yml");
