//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "sandglass")]
#[command(about = "A state-managed HTTP countdown timer with desktop alerts")]
#[command(version = "1.2.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "18070")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Countdown duration preloaded at startup, in minutes
    #[arg(short, long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..=1440))]
    pub minutes: u64,

    /// Arm the countdown immediately at startup
    #[arg(long)]
    pub start: bool,

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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let config = Config::try_parse_from(["sandglass"]).unwrap();
        assert_eq!(config.port, 18070);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.minutes, 10);
        assert!(!config.start);
        assert!(!config.verbose);
        assert_eq!(config.address(), "127.0.0.1:18070");
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "sandglass", "--port", "9000", "--minutes", "25", "--start", "--verbose",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.minutes, 25);
        assert!(config.start);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn minutes_outside_one_to_1440_are_rejected() {
        assert!(Config::try_parse_from(["sandglass", "--minutes", "0"]).is_err());
        assert!(Config::try_parse_from(["sandglass", "--minutes", "1441"]).is_err());
        assert!(Config::try_parse_from(["sandglass", "--minutes", "1440"]).is_ok());
    }
}
