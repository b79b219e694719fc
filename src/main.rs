//! boxes-datagen - Design metadata extraction for the boxes website.

use anyhow::{Context, Result};
use boxes_datagen::{BoxesExecutable, Settings};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Generate the design data file for the boxes website.
#[derive(Parser, Debug)]
#[command(name = "boxes-datagen", version, about)]
struct Cli {
    /// boxes config file to use [default: boxes-config]
    #[arg(short = 'f', long)]
    config: Option<PathBuf>,

    /// boxes executable to use [default: boxes.exe]
    #[arg(short = 'x', long)]
    executable: Option<PathBuf>,

    /// Output file to generate; x_y_z is replaced by the boxes version
    /// [default: designs-vx_y_z.yml]
    #[arg(short, long)]
    output: Option<String>,

    /// JSON file with default values for the other options
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
}

impl Cli {
    /// Combine the settings file (if any) with the command-line flags.
    fn effective_settings(self) -> Result<Settings> {
        let base = match &self.settings {
            Some(path) => Settings::load(path).context("failed to load settings")?,
            None => Settings::default(),
        };
        let settings = base.with_overrides(self.config, self.executable, self.output);
        settings.validate().context("invalid settings")?;
        Ok(settings)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let settings = cli.effective_settings()?;
    let boxes = BoxesExecutable::new(&settings.executable);
    boxes_datagen::run(&boxes, &settings).context("failed to generate design data")?;

    println!("Done.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_when_no_flags() {
        let cli = Cli::try_parse_from(["boxes-datagen"]).unwrap();
        let settings = cli.effective_settings().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "boxes-datagen",
            "-f",
            "../boxes-config",
            "-x",
            "../out/boxes",
            "-o",
            "designs-vx_y_z.yml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("../boxes-config")));
        assert_eq!(cli.executable, Some(PathBuf::from("../out/boxes")));
        assert_eq!(cli.output, Some("designs-vx_y_z.yml".to_string()));
        assert!(cli.settings.is_none());
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::try_parse_from([
            "boxes-datagen",
            "--config",
            "cfg",
            "--executable",
            "boxes",
            "--output",
            "out.yml",
        ])
        .unwrap();

        let settings = cli.effective_settings().unwrap();
        assert_eq!(settings.config, PathBuf::from("cfg"));
        assert_eq!(settings.executable, PathBuf::from("boxes"));
        assert_eq!(settings.output, "out.yml");
    }

    #[test]
    fn test_flags_override_settings_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"config": "file-config", "executable": "file-boxes"}}"#).unwrap();
        let settings_path = file.path().display().to_string();

        let cli = Cli::try_parse_from([
            "boxes-datagen",
            "--settings",
            settings_path.as_str(),
            "-x",
            "cli-boxes",
        ])
        .unwrap();

        let settings = cli.effective_settings().unwrap();
        assert_eq!(settings.config, PathBuf::from("file-config"));
        assert_eq!(settings.executable, PathBuf::from("cli-boxes"));
        assert_eq!(settings.output, "designs-vx_y_z.yml");
    }

    #[test]
    fn test_empty_flag_is_invalid() {
        let cli = Cli::try_parse_from(["boxes-datagen", "-o", ""]).unwrap();
        assert!(cli.effective_settings().is_err());
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["boxes-datagen", "--prefix", "X_"]).is_err());
    }

    #[test]
    fn test_cli_help() {
        Cli::command().debug_assert();
    }
}
