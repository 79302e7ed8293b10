use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use log::{debug, info};

use crate::configuration::expand_home;
use crate::error::{PlannerError, Result};

pub const SETTINGS_FILE_NAME: &str = "choose-your-mac.conf";

/// Defaults read from a `key = value` settings file. Command line flags take
/// precedence over anything in here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    pub data_file: Option<String>,
    pub mode: Option<String>,
    pub capacity: Option<u32>,
    pub memory: Option<u32>,
    pub watch_interval: Option<Duration>,
}

impl Settings {
    pub fn new() -> Settings {
        Settings::default()
    }

    /// Looks for the settings file: the explicitly given one, then
    /// `./choose-your-mac.conf`, `~/choose-your-mac.conf` and
    /// `/etc/choose-your-mac.conf`.
    pub fn find(explicit: Option<&str>) -> Result<Option<String>> {
        if let Some(file) = explicit {
            let normalized_file = expand_home(file);
            if !Path::new(&normalized_file).exists() {
                return Err(PlannerError::Configuration(format!(
                    "config file '{}' doesn't exist.",
                    file
                )));
            }
            return Ok(Some(normalized_file));
        }

        let candidates = [
            String::from(SETTINGS_FILE_NAME),
            expand_home(&format!("~/{}", SETTINGS_FILE_NAME)),
            format!("/etc/{}", SETTINGS_FILE_NAME),
        ];
        for candidate in candidates {
            if Path::new(&candidate).exists() {
                return Ok(Some(candidate));
            }
        }

        Ok(None)
    }

    pub fn load(filename: &str) -> Result<Settings> {
        info!("read settings from {}", filename);
        let file = File::open(filename)?;
        Settings::parse(BufReader::new(file))
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Settings> {
        let mut settings = Settings::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let position_of_equal_sign = match line.find('=') {
                Some(position) => position,
                None => continue,
            };
            let key = line[..position_of_equal_sign].trim();
            let value = line[(position_of_equal_sign + 1)..].trim().to_string();

            match key {
                "data_file" => settings.data_file = Some(value),
                "mode" => settings.mode = Some(value),
                "capacity" => settings.capacity = Some(Settings::parse_gb(key, &value)?),
                "memory" => settings.memory = Some(Settings::parse_gb(key, &value)?),
                "watch_interval" => {
                    settings.watch_interval = Some(Settings::parse_interval(&value)?);
                }
                _ => debug!("ignoring unknown setting '{}'", key),
            }
        }

        Ok(settings)
    }

    fn parse_gb(key: &str, value: &str) -> Result<u32> {
        value.parse::<u32>().map_err(|_| {
            PlannerError::Configuration(format!("invalid {} value '{}'.", key, value))
        })
    }

    pub fn parse_interval(value: &str) -> Result<Duration> {
        parse_duration0::parse(value).map_err(|_| {
            PlannerError::Configuration(format!("invalid watch interval '{}'.", value))
        })
    }
}
