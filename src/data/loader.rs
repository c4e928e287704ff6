use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Deserialize;

use super::error::DataError;
use super::model::{City, TripDataset, TripRecord};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const START_TIME: &str = "Start Time";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const REQUIRED_COLUMNS: [&str; 5] = [START_TIME, START_STATION, END_STATION, TRIP_DURATION, USER_TYPE];
const DEMOGRAPHIC_COLUMNS: [&str; 2] = [GENDER, BIRTH_YEAR];

/// Timestamp layouts accepted in the `Start Time` column.
/// `%.f` also matches a missing fractional part.
const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

// ---------------------------------------------------------------------------
// Dataset store: lazy, per-city loading
// ---------------------------------------------------------------------------

/// Resolves cities to their fixed CSV files under one directory and loads
/// them on demand. Nothing is cached: every call reads the file again.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    data_dir: PathBuf,
}

impl DatasetStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        DatasetStore {
            data_dir: data_dir.into(),
        }
    }

    /// Path of the CSV file backing `city`.
    pub fn path_for(&self, city: City) -> PathBuf {
        self.data_dir.join(city.file_name())
    }

    /// Load and derive all trips of `city`.
    pub fn load(&self, city: City) -> Result<TripDataset, DataError> {
        let path = self.path_for(city);
        log::info!("loading {city} trips from {}", path.display());
        let file = File::open(&path).map_err(|source| DataError::Io {
            path: path.clone(),
            source,
        })?;
        let dataset = load_reader(city, &display_name(&path), file)?;
        log::info!("loaded {} trips for {city}", dataset.len());
        Ok(dataset)
    }
}

fn display_name(path: &Path) -> String {
    path.display().to_string()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// One CSV row as text. Columns not named here (the unnamed index,
/// `End Time`, ...) are ignored. Cells cut off by a short row are `None`.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time", default)]
    start_time: Option<String>,
    #[serde(rename = "Start Station", default)]
    start_station: Option<String>,
    #[serde(rename = "End Station", default)]
    end_station: Option<String>,
    #[serde(rename = "Trip Duration", default)]
    trip_duration: Option<String>,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<String>,
}

/// Parse a city's trips from any CSV source. `source` names the input in
/// error messages.
///
/// Required header columns: `Start Time`, `Start Station`, `End Station`,
/// `Trip Duration`, `User Type`, plus `Gender` and `Birth Year` when the
/// city has demographics. Empty or absent cells load as missing values,
/// except `Start Time`, which every row needs for its derived fields. Text
/// that is present but does not parse is an error.
pub fn load_reader<R: Read>(city: City, source: &str, reader: R) -> Result<TripDataset, DataError> {
    let csv_error = |e: csv::Error| DataError::Csv {
        file: source.to_string(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();

    let demographics: &[&'static str] = if city.has_demographics() {
        &DEMOGRAPHIC_COLUMNS
    } else {
        &[]
    };
    for &column in REQUIRED_COLUMNS.iter().chain(demographics) {
        if !headers.iter().any(|h| h == column) {
            return Err(DataError::MissingColumn {
                file: source.to_string(),
                column,
            });
        }
    }

    let mut trips = Vec::new();
    for (i, result) in reader.deserialize::<RawTrip>().enumerate() {
        let row = i + 1;
        let raw = result.map_err(csv_error)?;

        let start_text = raw.start_time.unwrap_or_default();
        let start_time = parse_timestamp(&start_text).ok_or_else(|| DataError::BadTimestamp {
            file: source.to_string(),
            row,
            value: start_text.clone(),
        })?;
        let trip_duration = match non_empty(raw.trip_duration) {
            Some(text) => Some(parse_number(&text).ok_or_else(|| DataError::BadNumber {
                file: source.to_string(),
                row,
                column: TRIP_DURATION,
                value: text.clone(),
            })?),
            None => None,
        };

        // Washington never reports demographics, even if a stray column exists.
        let (gender, birth_year) = if city.has_demographics() {
            let birth_year = match non_empty(raw.birth_year) {
                Some(text) => Some(parse_birth_year(&text).ok_or_else(|| DataError::BadNumber {
                    file: source.to_string(),
                    row,
                    column: BIRTH_YEAR,
                    value: text.clone(),
                })?),
                None => None,
            };
            (non_empty(raw.gender), birth_year)
        } else {
            (None, None)
        };

        trips.push(TripRecord::new(
            start_time,
            non_empty(raw.start_station),
            non_empty(raw.end_station),
            trip_duration,
            non_empty(raw.user_type),
            gender,
            birth_year,
        ));
    }

    Ok(TripDataset::new(city, trips))
}

/// Parse a start timestamp in any of the accepted layouts.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Birth years are written as floats (`1989.0`) when the column has gaps.
fn parse_birth_year(s: &str) -> Option<i32> {
    parse_number(s)
        .filter(|v| v.fract() == 0.0 && *v >= i32::MIN as f64 && *v <= i32::MAX as f64)
        .map(|v| v as i32)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Timelike};

    const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,Female,1992.0
9031,2017-01-04 08:27:49,2017-01-04 08:34:45,416,May St & Taylor St,Wood St & Taylor St,Customer,,
";

    const WASHINGTON: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
";

    #[test]
    fn loads_chicago_rows_with_gaps() {
        let ds = load_reader(City::Chicago, "chicago.csv", CHICAGO.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);

        let first = &ds.trips[0];
        assert_eq!(first.start_station.as_deref(), Some("Wood St & Hubbard St"));
        assert_eq!(first.trip_duration, Some(321.0));
        assert_eq!(first.gender.as_deref(), Some("Male"));
        assert_eq!(first.birth_year, Some(1992));

        let last = &ds.trips[2];
        assert_eq!(last.user_type.as_deref(), Some("Customer"));
        assert_eq!(last.gender, None);
        assert_eq!(last.birth_year, None);
    }

    #[test]
    fn washington_has_no_demographics() {
        let ds = load_reader(City::Washington, "washington.csv", WASHINGTON.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert!((ds.trips[0].trip_duration.unwrap() - 489.066).abs() < 1e-9);
        assert_eq!(ds.trips[0].gender, None);
        assert_eq!(ds.trips[0].birth_year, None);
    }

    #[test]
    fn derived_fields_match_calendar() {
        let ds = load_reader(City::Chicago, "chicago.csv", CHICAGO.as_bytes()).unwrap();
        for trip in &ds.trips {
            let date = trip.start_time.date();
            assert_eq!(trip.month, date.month());
            assert_eq!(trip.weekday, date.weekday().num_days_from_monday());
            assert_eq!(trip.hour, trip.start_time.hour());
        }
        // 2017-01-04 was a Wednesday.
        assert_eq!(ds.trips[2].weekday, 2);
        assert_eq!(ds.trips[2].month, 1);
        assert_eq!(ds.trips[2].hour, 8);
    }

    #[test]
    fn missing_demographic_column_names_file_and_column() {
        let err = load_reader(City::NewYork, "new_york_city.csv", WASHINGTON.as_bytes()).unwrap_err();
        match err {
            DataError::MissingColumn { file, column } => {
                assert_eq!(file, "new_york_city.csv");
                assert_eq!(column, GENDER);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unparseable_timestamp_is_fatal() {
        let data = "Start Time,Start Station,End Station,Trip Duration,User Type\n\
                    2017-01-01 00:07:57,A,B,60,Subscriber\n\
                    yesterday,A,B,60,Subscriber\n";
        let err = load_reader(City::Washington, "washington.csv", data.as_bytes()).unwrap_err();
        match err {
            DataError::BadTimestamp { row, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(
            load_reader(City::Washington, "washington.csv", data.as_bytes())
                .unwrap_err()
                .to_string()
                .contains("washington.csv")
        );
    }

    #[test]
    fn bad_duration_is_fatal() {
        let data = "Start Time,Start Station,End Station,Trip Duration,User Type\n\
                    2017-01-01 00:07:57,A,B,long,Subscriber\n";
        let err = load_reader(City::Washington, "washington.csv", data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::BadNumber { column: TRIP_DURATION, .. }));
    }

    #[test]
    fn empty_duration_cell_is_missing() {
        let data = "Start Time,Start Station,End Station,Trip Duration,User Type\n\
                    2017-01-01 00:07:57,A,B,60,Subscriber\n\
                    2017-01-01 00:09:00,A,B,,Subscriber\n";
        let ds = load_reader(City::Washington, "washington.csv", data.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.trips[0].trip_duration, Some(60.0));
        assert_eq!(ds.trips[1].trip_duration, None);
    }

    #[test]
    fn empty_station_cells_are_missing() {
        let data = "Start Time,Start Station,End Station,Trip Duration,User Type\n\
                    2017-01-01 00:07:57,,B,60,Subscriber\n\
                    2017-01-01 00:09:00, ,,60,Subscriber\n";
        let ds = load_reader(City::Washington, "washington.csv", data.as_bytes()).unwrap();
        assert_eq!(ds.trips[0].start_station, None);
        assert_eq!(ds.trips[0].end_station.as_deref(), Some("B"));
        assert_eq!(ds.trips[1].start_station, None);
        assert_eq!(ds.trips[1].end_station, None);
        assert_eq!(ds.trips[0].station_pair(), None);
    }

    #[test]
    fn short_row_loads_trailing_cells_as_missing() {
        let data = "Start Time,Start Station,End Station,Trip Duration,User Type,Gender,Birth Year\n\
                    2017-01-01 00:07:57,A,B,60,Subscriber,Male,1980\n\
                    2017-01-02 10:00:00,A\n";
        let ds = load_reader(City::Chicago, "chicago.csv", data.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        let short = &ds.trips[1];
        assert_eq!(short.start_station.as_deref(), Some("A"));
        assert_eq!(short.end_station, None);
        assert_eq!(short.trip_duration, None);
        assert_eq!(short.user_type, None);
        assert_eq!(short.gender, None);
        assert_eq!(short.birth_year, None);
    }

    #[test]
    fn empty_start_time_is_fatal() {
        let data = "Start Time,Start Station,End Station,Trip Duration,User Type\n\
                    ,A,B,60,Subscriber\n";
        let err = load_reader(City::Washington, "washington.csv", data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::BadTimestamp { row: 1, .. }));
    }

    #[test]
    fn timestamp_layouts() {
        let expected = NaiveDate::from_ymd_opt(2017, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        for text in [
            "2017-03-05 14:30:00",
            "2017-03-05T14:30:00",
            "2017-03-05 14:30",
            "03/05/2017 14:30:00",
            "03/05/2017 14:30",
            " 2017-03-05 14:30:00.000 ",
        ] {
            assert_eq!(parse_timestamp(text), Some(expected), "{text}");
        }
        assert_eq!(parse_timestamp("2017-13-05 14:30:00"), None);
    }

    #[test]
    fn store_reports_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = DatasetStore::new(dir.path());
        let err = store.load(City::Chicago).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
        assert!(err.to_string().contains("chicago.csv"));
    }

    #[test]
    fn store_loads_only_the_requested_city() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("washington.csv"), WASHINGTON).unwrap();
        let store = DatasetStore::new(dir.path());
        let ds = store.load(City::Washington).unwrap();
        assert_eq!(ds.city, City::Washington);
        assert_eq!(ds.len(), 1);
    }
}
