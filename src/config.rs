//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::tasks::DEFAULT_TICK_INTERVAL_MS;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "caffeine")]
#[command(about = "Keep the display awake for 15, 30, 60, 120 minutes or indefinitely")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Interval between countdown ticks in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_INTERVAL_MS)]
    pub tick_interval_ms: u64,

    /// Do not hold a systemd idle/sleep inhibitor while running
    #[arg(long)]
    pub no_inhibit: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
