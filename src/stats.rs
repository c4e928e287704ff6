use std::collections::BTreeMap;

use crate::data::model::TripDataset;

// ---------------------------------------------------------------------------
// Mode and value counts
// ---------------------------------------------------------------------------

/// A most-frequent value and how many rows carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeCount<T> {
    pub value: T,
    pub count: usize,
}

fn tally<T: Ord, I: IntoIterator<Item = T>>(values: I) -> BTreeMap<T, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Most frequent value of `values`, `None` when there are none.
///
/// Ties resolve to the smallest value: the tally is walked in ascending
/// order and only a strictly greater count replaces the current best.
pub fn mode<T: Ord, I: IntoIterator<Item = T>>(values: I) -> Option<ModeCount<T>> {
    let mut best: Option<ModeCount<T>> = None;
    for (value, count) in tally(values) {
        if best.as_ref().map_or(true, |b| count > b.count) {
            best = Some(ModeCount { value, count });
        }
    }
    best
}

/// Count per distinct value, most frequent first, ties by ascending value.
pub fn value_counts<T: Ord, I: IntoIterator<Item = T>>(values: I) -> Vec<(T, usize)> {
    let mut counts: Vec<(T, usize)> = tally(values).into_iter().collect();
    // stable sort keeps the ascending-value order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

// ---------------------------------------------------------------------------
// Report values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStats {
    pub month: ModeCount<u32>,
    pub weekday: ModeCount<u32>,
    pub hour: ModeCount<u32>,
}

/// Each field is `None` when no trip in the selection records that value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationStats {
    pub start: Option<ModeCount<String>>,
    pub end: Option<ModeCount<String>>,
    /// Most frequent `start --> end` combination over trips with both ends.
    pub trip: Option<ModeCount<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationStats {
    pub total_hours: f64,
    pub mean_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub latest: i32,
    pub most_common: ModeCount<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demographics {
    pub genders: Vec<(String, usize)>,
    /// `None` when no trip in the selection records a birth year.
    pub birth_years: Option<BirthYearStats>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub user_types: Vec<(String, usize)>,
    /// `None` for cities whose data has no gender or birth year.
    pub demographics: Option<Demographics>,
}

// ---------------------------------------------------------------------------
// Reporters
//
// Each returns `None` for an empty dataset. Missing cells are skipped.
// ---------------------------------------------------------------------------

/// Most frequent month, weekday and start hour.
pub fn time_stats(dataset: &TripDataset) -> Option<TimeStats> {
    let trips = &dataset.trips;
    Some(TimeStats {
        month: mode(trips.iter().map(|t| t.month))?,
        weekday: mode(trips.iter().map(|t| t.weekday))?,
        hour: mode(trips.iter().map(|t| t.hour))?,
    })
}

/// Most popular start station, end station and station pair.
pub fn station_stats(dataset: &TripDataset) -> Option<StationStats> {
    if dataset.is_empty() {
        return None;
    }
    let trips = &dataset.trips;
    let owned = |m: ModeCount<&str>| ModeCount {
        value: m.value.to_string(),
        count: m.count,
    };
    Some(StationStats {
        start: mode(trips.iter().filter_map(|t| t.start_station.as_deref())).map(owned),
        end: mode(trips.iter().filter_map(|t| t.end_station.as_deref())).map(owned),
        trip: mode(trips.iter().filter_map(|t| t.station_pair())),
    })
}

/// Total travel time in hours and mean travel time in minutes, over the
/// trips that record a duration. `None` when none does.
pub fn trip_duration_stats(dataset: &TripDataset) -> Option<DurationStats> {
    let durations: Vec<f64> = dataset.trips.iter().filter_map(|t| t.trip_duration).collect();
    if durations.is_empty() {
        return None;
    }
    let total_seconds: f64 = durations.iter().sum();
    let mean_seconds = total_seconds / durations.len() as f64;
    Some(DurationStats {
        total_hours: total_seconds / 3600.0,
        mean_minutes: mean_seconds / 60.0,
    })
}

/// User type counts, plus gender and birth year figures where the city has them.
/// Missing cells are left out of every count.
pub fn user_stats(dataset: &TripDataset) -> Option<UserStats> {
    if dataset.is_empty() {
        return None;
    }
    let trips = &dataset.trips;
    let owned_counts = |counts: Vec<(&str, usize)>| -> Vec<(String, usize)> {
        counts.into_iter().map(|(v, n)| (v.to_string(), n)).collect()
    };

    let user_types = owned_counts(value_counts(trips.iter().filter_map(|t| t.user_type.as_deref())));

    let demographics = dataset.city.has_demographics().then(|| {
        let genders = owned_counts(value_counts(trips.iter().filter_map(|t| t.gender.as_deref())));
        let years = || trips.iter().filter_map(|t| t.birth_year);
        let birth_years = match (years().min(), years().max(), mode(years())) {
            (Some(earliest), Some(latest), Some(most_common)) => Some(BirthYearStats {
                earliest,
                latest,
                most_common,
            }),
            _ => None,
        };
        Demographics { genders, birth_years }
    });

    Some(UserStats {
        user_types,
        demographics,
    })
}
