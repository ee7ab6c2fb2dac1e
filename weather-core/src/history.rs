use anyhow::{Context, Result};
use chrono::Local;
use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use crate::{format::format_weather, model::Weather};

/// Somewhere finished lookups are recorded.
pub trait WeatherStorage {
    fn save(&self, weather: &Weather) -> Result<()>;
}

/// Appends timestamped lookups to a plain-text file.
#[derive(Debug, Clone)]
pub struct PlainFileWeatherStorage {
    file: PathBuf,
}

impl PlainFileWeatherStorage {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn path(&self) -> &Path {
        &self.file
    }
}

impl WeatherStorage for PlainFileWeatherStorage {
    fn save(&self, weather: &Weather) -> Result<()> {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S%.6f");
        let entry = format!("{now}\n{}\n", format_weather(weather));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file)
            .with_context(|| format!("Failed to open history file: {}", self.file.display()))?;

        file.write_all(entry.as_bytes())
            .with_context(|| format!("Failed to write history file: {}", self.file.display()))?;

        tracing::debug!(path = %self.file.display(), "appended weather to history");
        Ok(())
    }
}

pub fn save_weather(weather: &Weather, storage: &dyn WeatherStorage) -> Result<()> {
    storage.save(weather)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeatherType;
    use chrono::{NaiveDateTime, TimeZone};
    use std::fs;

    fn weather(city: &str, temperature: i32) -> Weather {
        Weather {
            temperature,
            weather_type: WeatherType::Rain,
            sunrise: Local.with_ymd_and_hms(2023, 9, 16, 6, 12, 0).unwrap(),
            sunset: Local.with_ymd_and_hms(2023, 9, 16, 19, 40, 0).unwrap(),
            city: city.to_string(),
        }
    }

    #[test]
    fn creates_file_with_timestamped_entry() {
        let dir = tempfile::tempdir().unwrap();
        let storage = PlainFileWeatherStorage::new(dir.path().join("history.txt"));

        save_weather(&weather("Oslo", 3), &storage).unwrap();

        let contents = fs::read_to_string(storage.path()).unwrap();
        let (stamp, rest) = contents.split_once('\n').unwrap();

        assert!(NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S%.6f").is_ok(), "{stamp}");
        assert_eq!(rest, format!("{}\n", format_weather(&weather("Oslo", 3))));
    }

    #[test]
    fn appends_in_call_order_without_overwriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.txt");
        fs::write(&path, "earlier lookups\n").unwrap();
        let storage = PlainFileWeatherStorage::new(&path);

        for (city, t) in [("Oslo", 1), ("Bergen", 2), ("Tromso", 3)] {
            storage.save(&weather(city, t)).unwrap();
        }

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("earlier lookups\n"));

        let oslo = contents.find("Oslo, temperature 1°C").unwrap();
        let bergen = contents.find("Bergen, temperature 2°C").unwrap();
        let tromso = contents.find("Tromso, temperature 3°C").unwrap();
        assert!(oslo < bergen && bergen < tromso);

        // 1 pre-existing line, then per entry: timestamp + 3 formatted lines + blank separator.
        assert_eq!(contents.lines().count(), 1 + 3 * 5);
    }

    #[test]
    fn unwritable_location_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = PlainFileWeatherStorage::new(dir.path().join("missing").join("history.txt"));

        let err = storage.save(&weather("Oslo", 3)).unwrap_err();
        assert!(err.to_string().contains("Failed to open history file"));
    }
}
