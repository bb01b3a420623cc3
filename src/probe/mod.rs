pub mod banner;
pub mod login;
pub mod matcher;

use std::time::Duration;

use tracing::debug;

use crate::report::ProbeReport;
use crate::rules::CompiledRule;

pub use matcher::{match_rules, MatchSource, RuleMatch};

/// Outcome of a single banner capture. `Failed` is distinct from a
/// successfully captured empty string, so a server that legitimately
/// sent nothing is not confused with one we never reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerCapture {
    Captured(String),
    Failed,
}

impl BannerCapture {
    /// The captured text, or "" for a failed capture. Matching treats
    /// the two the same; reporting does not have to.
    pub fn text(&self) -> &str {
        match self {
            BannerCapture::Captured(text) => text,
            BannerCapture::Failed => "",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BannerCapture::Failed)
    }
}

/// The two independent text samples taken from the target. Either may
/// be empty or failed; login banner capture in particular fails by
/// design on servers that reject the truncated handshake outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedBanners {
    pub banner: BannerCapture,
    pub login_banner: BannerCapture,
}

/// One-shot probe of a single host:port. Owns no connections between
/// calls; each capture opens and drops its own.
pub struct Prober {
    host: String,
    port: u16,
    timeout: Duration,
}

impl Prober {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Runs the full probe: protocol banner, then login banner, then
    /// rule matching. Capture failures degrade to empty strings rather
    /// than aborting; the caller always gets a well-formed report.
    pub async fn probe(&self, rules: &[CompiledRule]) -> ProbeReport {
        let banners = self.capture().await;
        let outcome = match_rules(rules, banners.banner.text(), banners.login_banner.text());
        ProbeReport::assemble(outcome, &banners)
    }

    /// Captures both banners sequentially. Each attempt gets the full
    /// timeout; a slow protocol banner does not eat into the login
    /// banner's budget.
    pub async fn capture(&self) -> CapturedBanners {
        let banner =
            match banner::read_protocol_banner(&self.host, self.port, self.timeout).await {
                Ok(text) => BannerCapture::Captured(text),
                Err(err) => {
                    debug!(host = %self.host, port = self.port, error = %err,
                        "protocol banner capture failed");
                    BannerCapture::Failed
                }
            };

        let login_banner =
            match login::read_login_banner(&self.host, self.port, self.timeout).await {
                Ok(text) => BannerCapture::Captured(text),
                Err(err) => {
                    debug!(host = %self.host, port = self.port, error = %err,
                        "login banner capture failed");
                    BannerCapture::Failed
                }
            };

        CapturedBanners {
            banner,
            login_banner,
        }
    }
}
