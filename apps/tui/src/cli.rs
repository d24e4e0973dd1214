use clap::{CommandFactory, Parser};

#[derive(Debug, Default, Parser)]
#[command(
    name = "launch-atlas",
    version,
    about = "Historical rocket launches on a world map"
)]
pub struct CliArgs {
    /// Print dataset stats and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the launch dataset path
    #[arg(long, value_name = "PATH")]
    pub data: Option<String>,

    /// Override the milestone feed path
    #[arg(long, value_name = "PATH")]
    pub events: Option<String>,

    /// GeoJSON file with land polygons drawn behind the markers
    #[arg(long, value_name = "PATH")]
    pub land: Option<String>,

    /// Time window granularity: month or year
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Year the timeline starts at
    #[arg(long, value_name = "YYYY")]
    pub year: Option<u32>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(path) = &self.data {
            std::env::set_var("LAUNCH_DATA", path);
        }
        if let Some(path) = &self.events {
            std::env::set_var("EVENTS_DATA", path);
        }
        if let Some(path) = &self.land {
            std::env::set_var("LAND_GEOJSON", path);
        }
        if let Some(mode) = &self.mode {
            std::env::set_var("VIEW_MODE", mode);
        }
        if let Some(year) = self.year {
            std::env::set_var("START_YEAR", year.to_string());
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse() {
        let args = CliArgs::parse_from([
            "launch-atlas",
            "--headless",
            "--json",
            "--data",
            "fixtures/launches.json",
            "--mode",
            "year",
            "--year",
            "1969",
        ]);
        assert!(args.headless);
        assert!(args.json);
        assert_eq!(args.data.as_deref(), Some("fixtures/launches.json"));
        assert_eq!(args.mode.as_deref(), Some("year"));
        assert_eq!(args.year, Some(1969));
        assert!(!args.debug);
    }

    #[test]
    fn help_mentions_every_override() {
        let help = CliArgs::help_text();
        for flag in ["--data", "--events", "--land", "--mode", "--year"] {
            assert!(help.contains(flag), "{flag} missing from help");
        }
    }
}
