use std::path::PathBuf;

use clap::Parser;

/// Runtime configuration. Every value has a default, so running the binary
/// with no arguments serves `spacex_launch_dash.csv` on port 8050.
#[derive(Parser, Debug, Clone)]
#[command(name = "launch-dash")]
#[command(author, version, about = "Interactive dashboard over SpaceX launch records")]
pub struct Config {
    /// Launch records file (.csv, .json, .parquet)
    #[arg(env = "LAUNCH_DASH_DATA", default_value = "spacex_launch_dash.csv")]
    pub data: PathBuf,

    /// Address to bind the web dashboard to
    #[arg(long, env = "LAUNCH_DASH_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "LAUNCH_DASH_PORT", default_value = "8050")]
    pub port: u16,

    /// Open a native window instead of serving the web dashboard
    #[arg(long)]
    pub gui: bool,
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_need_no_arguments() {
        let config = Config::try_parse_from(["launch-dash"]).unwrap();
        assert_eq!(config.data, PathBuf::from("spacex_launch_dash.csv"));
        assert!(!config.gui);
        // The env fallbacks are not set in the test environment.
        if std::env::var_os("LAUNCH_DASH_PORT").is_none()
            && std::env::var_os("LAUNCH_DASH_HOST").is_none()
        {
            assert_eq!(config.addr(), "127.0.0.1:8050");
        }
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "launch-dash",
            "launches.parquet",
            "--host",
            "0.0.0.0",
            "-p",
            "9000",
            "--gui",
        ])
        .unwrap();
        assert_eq!(config.data, PathBuf::from("launches.parquet"));
        assert_eq!(config.addr(), "0.0.0.0:9000");
        assert!(config.gui);
    }
}
