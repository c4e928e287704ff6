use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};

// ---------------------------------------------------------------------------
// Fixed vocabularies
// ---------------------------------------------------------------------------

/// Months the user may filter by, index + 1 is the calendar month.
pub const MONTH_NAMES: [&str; 6] = ["january", "february", "march", "april", "may", "june"];

/// Weekdays the user may filter by, index is the weekday (Monday = 0).
pub const DAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const MONTH_LABELS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Resolve a month name (case-insensitive) to its calendar index 1–6.
pub fn parse_month(token: &str) -> Option<u32> {
    let token = token.trim().to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|name| *name == token)
        .map(|i| i as u32 + 1)
}

/// Resolve a weekday name (case-insensitive) to its index, Monday = 0.
pub fn parse_weekday(token: &str) -> Option<u32> {
    let token = token.trim().to_lowercase();
    DAY_NAMES
        .iter()
        .position(|name| *name == token)
        .map(|i| i as u32)
}

/// Display label for a calendar month 1–12.
pub fn month_label(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_LABELS.get(i as usize))
        .copied()
        .unwrap_or("?")
}

/// Display label for a weekday index, Monday = 0.
pub fn weekday_label(weekday: u32) -> &'static str {
    DAY_LABELS.get(weekday as usize).copied().unwrap_or("?")
}

// ---------------------------------------------------------------------------
// City – the identity key of a dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum City {
    Chicago,
    NewYork,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYork, City::Washington];

    /// Resolve a user-typed city name (case-insensitive).
    pub fn parse(token: &str) -> Option<City> {
        let token = token.trim().to_lowercase();
        City::ALL.into_iter().find(|city| city.key() == token)
    }

    /// The lower-case name the user types at the prompt.
    pub fn key(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYork => "new york",
            City::Washington => "washington",
        }
    }

    /// Fixed CSV file name holding this city's trips.
    pub fn file_name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYork => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    /// Whether the city's file carries `Gender` and `Birth Year` columns.
    pub fn has_demographics(&self) -> bool {
        !matches!(self, City::Washington)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            City::Chicago => write!(f, "Chicago"),
            City::NewYork => write!(f, "New York City"),
            City::Washington => write!(f, "Washington"),
        }
    }
}

// ---------------------------------------------------------------------------
// TripRecord – one row of a city file plus derived time features
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    /// Trip duration in seconds.
    pub trip_duration: Option<f64>,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    /// Calendar month 1–12.
    pub month: u32,
    /// Weekday index, Monday = 0.
    pub weekday: u32,
    /// Hour of day 0–23.
    pub hour: u32,
}

impl TripRecord {
    /// Build a record, deriving month/weekday/hour from `start_time`.
    pub fn new(
        start_time: NaiveDateTime,
        start_station: Option<String>,
        end_station: Option<String>,
        trip_duration: Option<f64>,
        user_type: Option<String>,
        gender: Option<String>,
        birth_year: Option<i32>,
    ) -> Self {
        TripRecord {
            month: start_time.month(),
            weekday: start_time.weekday().num_days_from_monday(),
            hour: start_time.hour(),
            start_time,
            start_station,
            end_station,
            trip_duration,
            user_type,
            gender,
            birth_year,
        }
    }

    /// The `start --> end` key used for the popular-trip statistic,
    /// `None` unless both stations are known.
    pub fn station_pair(&self) -> Option<String> {
        let (start, end) = (self.start_station.as_ref()?, self.end_station.as_ref()?);
        Some(format!("{start} --> {end}"))
    }
}

// ---------------------------------------------------------------------------
// TripDataset – all trips of one city
// ---------------------------------------------------------------------------

/// Non-null cell count for one column, as shown in the dataset summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    pub name: &'static str,
    pub non_null: usize,
}

#[derive(Debug, Clone)]
pub struct TripDataset {
    pub city: City,
    pub trips: Vec<TripRecord>,
}

impl TripDataset {
    pub fn new(city: City, trips: Vec<TripRecord>) -> Self {
        TripDataset { city, trips }
    }

    /// Number of trips.
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Per-column non-null counts. Demographic columns are listed only for
    /// cities whose file has them.
    pub fn column_summary(&self) -> Vec<ColumnSummary> {
        let total = self.len();
        let count = |f: fn(&TripRecord) -> bool| self.trips.iter().filter(|t| f(t)).count();

        let mut columns = vec![
            ColumnSummary { name: "Start Time", non_null: total },
            ColumnSummary {
                name: "Start Station",
                non_null: count(|t| t.start_station.is_some()),
            },
            ColumnSummary {
                name: "End Station",
                non_null: count(|t| t.end_station.is_some()),
            },
            ColumnSummary {
                name: "Trip Duration",
                non_null: count(|t| t.trip_duration.is_some()),
            },
            ColumnSummary {
                name: "User Type",
                non_null: count(|t| t.user_type.is_some()),
            },
        ];
        if self.city.has_demographics() {
            columns.push(ColumnSummary {
                name: "Gender",
                non_null: count(|t| t.gender.is_some()),
            });
            columns.push(ColumnSummary {
                name: "Birth Year",
                non_null: count(|t| t.birth_year.is_some()),
            });
        }
        columns.extend(["month", "day", "hour"].map(|name| ColumnSummary { name, non_null: total }));
        columns
    }
}

// ---------------------------------------------------------------------------
// FilterSelection – what the user asked to look at
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSelection {
    pub city: City,
    /// Calendar month 1–6, `None` for every month.
    pub month: Option<u32>,
    /// Weekday index (Monday = 0), `None` for every day.
    pub weekday: Option<u32>,
}

impl FilterSelection {
    pub fn new(city: City, month: Option<u32>, weekday: Option<u32>) -> Self {
        FilterSelection { city, month, weekday }
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = self.month.map_or("all months", month_label);
        let day = self.weekday.map_or("all days", weekday_label);
        write!(f, "{}, {month}, {day}", self.city)
    }
}
