use super::model::{TripDataset, TripRecord};

// ---------------------------------------------------------------------------
// Month / weekday filter
// ---------------------------------------------------------------------------

/// Whether a trip passes the month and weekday filters.
/// An unset filter (`None`) places no constraint.
pub fn matches(trip: &TripRecord, month: Option<u32>, weekday: Option<u32>) -> bool {
    month.map_or(true, |m| trip.month == m) && weekday.map_or(true, |d| trip.weekday == d)
}

/// Return indices of trips that pass both filters, in dataset order.
pub fn filtered_indices(dataset: &TripDataset, month: Option<u32>, weekday: Option<u32>) -> Vec<usize> {
    dataset
        .trips
        .iter()
        .enumerate()
        .filter(|(_, trip)| matches(trip, month, weekday))
        .map(|(i, _)| i)
        .collect()
}

/// Restrict a dataset to the trips matching `month` and `weekday`.
///
/// The order of trips is preserved. With both filters unset the result is
/// a copy of the whole dataset.
pub fn apply_filter(dataset: &TripDataset, month: Option<u32>, weekday: Option<u32>) -> TripDataset {
    let trips: Vec<TripRecord> = dataset
        .trips
        .iter()
        .filter(|trip| matches(trip, month, weekday))
        .cloned()
        .collect();
    log::debug!(
        "filter month={month:?} weekday={weekday:?} kept {} of {} trips",
        trips.len(),
        dataset.len()
    );
    TripDataset::new(dataset.city, trips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::City;
    use chrono::{Duration, NaiveDate};

    /// Two trips a day, 12 hours apart plus an `i % 7` hour shift, for 180
    /// days from Sunday 2017-01-01.
    fn half_year() -> TripDataset {
        let origin = NaiveDate::from_ymd_opt(2017, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let trips = (0..360)
            .map(|i| {
                TripRecord::new(
                    origin + Duration::hours(i * 12 + (i % 7)),
                    Some(format!("S{}", i % 5)),
                    Some(format!("E{}", i % 3)),
                    Some(60.0 * (i + 1) as f64),
                    Some("Subscriber".into()),
                    None,
                    None,
                )
            })
            .collect();
        TripDataset::new(City::Chicago, trips)
    }

    #[test]
    fn unset_filters_return_everything_in_order() {
        let ds = half_year();
        let out = apply_filter(&ds, None, None);
        assert_eq!(out.trips, ds.trips);
        assert_eq!(out.city, City::Chicago);
    }

    #[test]
    fn every_combination_only_keeps_matching_rows() {
        let ds = half_year();
        for month in (1..=6).map(Some).chain([None]) {
            for weekday in (0..7).map(Some).chain([None]) {
                let out = apply_filter(&ds, month, weekday);
                assert!(out.trips.iter().all(|t| matches(t, month, weekday)));
                let expected = ds.trips.iter().filter(|t| matches(t, month, weekday)).count();
                assert_eq!(out.len(), expected);
            }
        }
    }

    #[test]
    fn filter_is_stable() {
        let ds = half_year();
        let idx = filtered_indices(&ds, Some(3), Some(2));
        assert!(!idx.is_empty());
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
        let out = apply_filter(&ds, Some(3), Some(2));
        let expected: Vec<_> = idx.iter().map(|&i| ds.trips[i].clone()).collect();
        assert_eq!(out.trips, expected);
    }

    #[test]
    fn month_outside_data_yields_empty_dataset() {
        let ds = half_year();
        let out = apply_filter(&ds, Some(12), None);
        assert!(out.is_empty());
    }
}
