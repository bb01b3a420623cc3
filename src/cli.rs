use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sshprobe")]
#[command(version = "0.1.0")]
#[command(about = "SSH banner-based OS fingerprinting probe", long_about = None)]
pub struct Cli {
    #[arg(help = "Target host (IP or hostname)")]
    pub host: String,

    #[arg(
        short,
        long,
        default_value_t = 22,
        value_parser = clap::value_parser!(u16).range(1..),
        help = "Target SSH port"
    )]
    pub port: u16,

    #[arg(long, help = "Connect and read timeout in milliseconds (default: 5000)")]
    pub timeout: Option<u64>,

    #[arg(short = 'o', long, value_enum, default_value = "json", help = "Output format")]
    pub output_format: OutputFormat,

    #[arg(short = 'f', long, help = "Output file path")]
    pub output_file: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum OutputFormat {
    #[value(name = "json", help = "JSON output")]
    Json,
    #[value(name = "human", help = "Human-readable output")]
    Human,
}
