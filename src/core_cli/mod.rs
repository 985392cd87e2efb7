use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "rouillebrowsed",
    about = "A remote file browsing and download daemon written in Rust."
)]
pub struct Cli {
    /// Port to listen on, overrides the configuration file
    pub port: Option<u16>,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory new sessions start in
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["rouillebrowsed"]).unwrap();
        assert_eq!(cli.port, None);
        assert!(cli.config.is_none());
        assert!(cli.directory.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_port_and_options() {
        let cli = Cli::try_parse_from([
            "rouillebrowsed",
            "6000",
            "-c",
            "/tmp/browse.conf",
            "--directory",
            "/srv/files",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.port, Some(6000));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/browse.conf")));
        assert_eq!(cli.directory, Some(PathBuf::from("/srv/files")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_invalid_port() {
        assert!(Cli::try_parse_from(["rouillebrowsed", "not-a-port"]).is_err());
        assert!(Cli::try_parse_from(["rouillebrowsed", "70000"]).is_err());
        assert!(Cli::try_parse_from(["rouillebrowsed", "1", "2"]).is_err());
    }
}
