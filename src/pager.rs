use crate::data::model::{weekday_label, TripRecord};

/// Rows shown per page of raw data.
pub const PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// Waiting for an answer; the next page starts at `offset`.
    Paging { offset: usize },
    Done,
}

/// Walks a slice of trips in fixed-size windows, one page per "yes".
///
/// Any other answer ends paging for good. Asking past the end yields an
/// empty page rather than wrapping around.
#[derive(Debug)]
pub struct RawDataPager<'a> {
    trips: &'a [TripRecord],
    state: PagerState,
}

impl<'a> RawDataPager<'a> {
    pub fn new(trips: &'a [TripRecord]) -> Self {
        RawDataPager {
            trips,
            state: PagerState::Paging { offset: 0 },
        }
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    /// Feed one user answer. Returns the page to show, or `None` once done.
    pub fn respond(&mut self, answer: &str) -> Option<&'a [TripRecord]> {
        let PagerState::Paging { offset } = self.state else {
            return None;
        };
        if !answer.trim().eq_ignore_ascii_case("yes") {
            self.state = PagerState::Done;
            return None;
        }
        let start = offset.min(self.trips.len());
        let end = (offset + PAGE_SIZE).min(self.trips.len());
        self.state = PagerState::Paging {
            offset: offset + PAGE_SIZE,
        };
        Some(&self.trips[start..end])
    }
}

/// One raw row, prefixed with its position in the filtered dataset.
pub fn format_trip(index: usize, trip: &TripRecord) -> String {
    let or_blank = |v: &Option<String>| v.clone().unwrap_or_default();
    let birth_year = trip.birth_year.map(|y| y.to_string()).unwrap_or_default();
    let duration = trip.trip_duration.map(|d| format!("{d:.1}s")).unwrap_or_default();
    format!(
        "{index:>6}  {}  {duration:>10}  {} --> {}  [{}]  {} {}  (month {}, {}, hour {})",
        trip.start_time.format("%Y-%m-%d %H:%M:%S"),
        or_blank(&trip.start_station),
        or_blank(&trip.end_station),
        or_blank(&trip.user_type),
        or_blank(&trip.gender),
        birth_year,
        trip.month,
        weekday_label(trip.weekday),
        trip.hour,
    )
}
