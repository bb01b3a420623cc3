//! SSH banner-based OS fingerprinting.
//!
//! Captures a target's SSH protocol banner and, best-effort, its
//! pre-authentication login banner, then matches both against an
//! ordered fingerprint rule set. First match wins.

pub mod cli;
pub mod probe;
pub mod report;
pub mod rules;
