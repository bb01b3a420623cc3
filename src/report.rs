use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use colored::*;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::probe::{CapturedBanners, RuleMatch};

/// Final record handed to the operator. Field names and order are part
/// of the tool's JSON contract; captured banners are reported verbatim
/// even when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub os: String,
    pub os_shortname: String,
    pub source: String,
    pub rule_id: String,
    pub version: String,
    pub banner: String,
    pub login_banner: String,
}

impl ProbeReport {
    /// Merges the match outcome (or its absence) with the raw captures.
    pub fn assemble(outcome: Option<RuleMatch<'_>>, banners: &CapturedBanners) -> Self {
        let banner = banners.banner.text().to_string();
        let login_banner = banners.login_banner.text().to_string();

        match outcome {
            Some(m) => Self {
                os: m.rule.def.os.clone(),
                os_shortname: m.rule.def.os_shortname.clone().unwrap_or_default(),
                source: m.source.to_string(),
                rule_id: m.rule.def.id.clone(),
                version: m.rule.def.version.clone().unwrap_or_default(),
                banner,
                login_banner,
            },
            None => Self {
                os: "Unknown".to_string(),
                os_shortname: String::new(),
                source: "unknown".to_string(),
                rule_id: String::new(),
                version: String::new(),
                banner,
                login_banner,
            },
        }
    }
}

pub struct OutputWriter {
    format: OutputFormat,
    file: Option<PathBuf>,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, file: Option<PathBuf>) -> Result<Self> {
        Ok(Self { format, file })
    }

    pub fn write(&self, report: &ProbeReport) -> Result<()> {
        let output = match self.format {
            OutputFormat::Json => self.format_json(report)?,
            OutputFormat::Human => self.format_human(report),
        };

        match &self.file {
            Some(path) => {
                let file = File::create(path)?;
                let mut writer = BufWriter::new(file);
                writer.write_all(output.as_bytes())?;
                writer.flush()?;
            }
            None => {
                print!("{}", output);
                io::stdout().flush()?;
            }
        }

        Ok(())
    }

    fn format_json(&self, report: &ProbeReport) -> Result<String> {
        let mut out = serde_json::to_string_pretty(report)?;
        out.push('\n');
        Ok(out)
    }

    fn format_human(&self, report: &ProbeReport) -> String {
        let mut output = String::new();

        if report.source == "unknown" {
            output.push_str(&format!(
                "{} {}\n",
                "▶ OS".truecolor(255, 140, 0).bold(),
                "Unknown".truecolor(128, 128, 128)
            ));
        } else {
            let os = if report.version.is_empty() {
                report.os.clone()
            } else {
                format!("{} {}", report.os, report.version)
            };
            output.push_str(&format!(
                "{} {}\n",
                "▶ OS".truecolor(0, 255, 65).bold(),
                os.truecolor(255, 255, 255).bold()
            ));
            output.push_str(&format!(
                "  {} {} {} {}\n",
                "matched".truecolor(128, 128, 128),
                report.rule_id.truecolor(0, 212, 255),
                "via".truecolor(128, 128, 128),
                report.source.truecolor(0, 212, 255)
            ));
        }

        if !report.banner.is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "banner".truecolor(128, 128, 128),
                report.banner
            ));
        }
        if !report.login_banner.is_empty() {
            for line in report.login_banner.lines() {
                output.push_str(&format!(
                    "  {} {}\n",
                    "login ".truecolor(128, 128, 128),
                    line
                ));
            }
        }

        output
    }
}
