use std::io::{self, Write};
use std::time::Instant;

use crate::data::model::{month_label, weekday_label, FilterSelection, TripDataset};
use crate::stats::{self, ModeCount};

pub const SEPARATOR_WIDTH: usize = 40;
pub const NO_DATA: &str = "No trips match the selected filters.";

// ---------------------------------------------------------------------------
// Console reporter
// ---------------------------------------------------------------------------

/// Prints dataset statistics as human-readable text.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    /// Print how long each section took.
    pub show_timing: bool,
}

impl Reporter {
    pub fn new(show_timing: bool) -> Self {
        Reporter { show_timing }
    }

    /// Row count and per-column non-null counts of the filtered dataset.
    pub fn dataset_summary<W: Write>(
        &self,
        out: &mut W,
        selection: &FilterSelection,
        dataset: &TripDataset,
    ) -> io::Result<()> {
        writeln!(out, "\nFilters: {selection}")?;
        writeln!(out, "{} trips, columns:", dataset.len())?;
        for column in dataset.column_summary() {
            writeln!(out, "  {:<15} {:>9} non-null", column.name, column.non_null)?;
        }
        Ok(())
    }

    /// Run all four reports in their fixed order.
    pub fn all<W: Write>(&self, out: &mut W, dataset: &TripDataset) -> io::Result<()> {
        self.time_report(out, dataset)?;
        self.station_report(out, dataset)?;
        self.duration_report(out, dataset)?;
        self.user_report(out, dataset)
    }

    pub fn time_report<W: Write>(&self, out: &mut W, dataset: &TripDataset) -> io::Result<()> {
        self.section(out, "The Most Frequent Times of Travel", |out| {
            let Some(stats) = stats::time_stats(dataset) else {
                return writeln!(out, "{NO_DATA}");
            };
            let ModeCount { value, count } = stats.month;
            writeln!(out, "Most Popular Month: {} ({value}), Count: {count}", month_label(value))?;
            let ModeCount { value, count } = stats.weekday;
            writeln!(out, "Most Popular Day: {} ({value}), Count: {count}", weekday_label(value))?;
            let ModeCount { value, count } = stats.hour;
            writeln!(out, "Most Popular Hour: {value}, Count: {count}")
        })
    }

    pub fn station_report<W: Write>(&self, out: &mut W, dataset: &TripDataset) -> io::Result<()> {
        self.section(out, "The Most Popular Stations and Trip", |out| {
            let Some(stats) = stats::station_stats(dataset) else {
                return writeln!(out, "{NO_DATA}");
            };
            write_station_mode(out, "Most Popular Start Station", stats.start.as_ref())?;
            write_station_mode(out, "Most Popular End Station", stats.end.as_ref())?;
            write_station_mode(out, "Most Popular Trip", stats.trip.as_ref())
        })
    }

    pub fn duration_report<W: Write>(&self, out: &mut W, dataset: &TripDataset) -> io::Result<()> {
        self.section(out, "Trip Duration", |out| {
            let Some(stats) = stats::trip_duration_stats(dataset) else {
                if dataset.is_empty() {
                    return writeln!(out, "{NO_DATA}");
                }
                return writeln!(out, "No trip duration data.");
            };
            writeln!(out, "The total trip duration in hours: {:.2}", stats.total_hours)?;
            writeln!(out, "The mean trip duration in minutes: {:.2}", stats.mean_minutes)
        })
    }

    pub fn user_report<W: Write>(&self, out: &mut W, dataset: &TripDataset) -> io::Result<()> {
        self.section(out, "User Stats", |out| {
            let Some(stats) = stats::user_stats(dataset) else {
                return writeln!(out, "{NO_DATA}");
            };
            write_counts(out, "The counts of user types:", &stats.user_types)?;

            let Some(demographics) = stats.demographics else {
                return Ok(());
            };
            write_counts(out, "The counts of gender:", &demographics.genders)?;
            match demographics.birth_years {
                Some(years) => {
                    writeln!(out, "The earliest birth year: {}", years.earliest)?;
                    writeln!(out, "The most recent birth year: {}", years.latest)?;
                    writeln!(
                        out,
                        "The most common birth year: {}, Count: {}",
                        years.most_common.value, years.most_common.count
                    )
                }
                None => writeln!(out, "No birth year data."),
            }
        })
    }

    /// Banner, body, optional timing line, separator.
    fn section<W: Write>(
        &self,
        out: &mut W,
        title: &str,
        body: impl FnOnce(&mut W) -> io::Result<()>,
    ) -> io::Result<()> {
        writeln!(out, "\nCalculating {title}...\n")?;
        let started = Instant::now();
        body(out)?;
        if self.show_timing {
            writeln!(out, "\nThis took {} seconds.", started.elapsed().as_secs_f64())?;
        }
        writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))
    }
}

fn write_station_mode<W: Write>(out: &mut W, label: &str, mode: Option<&ModeCount<String>>) -> io::Result<()> {
    match mode {
        Some(ModeCount { value, count }) => writeln!(out, "{label}: {value}, Count: {count}"),
        None => writeln!(out, "{label}: no data"),
    }
}

fn write_counts<W: Write>(out: &mut W, heading: &str, counts: &[(String, usize)]) -> io::Result<()> {
    writeln!(out, "{heading}")?;
    for (value, count) in counts {
        writeln!(out, "  {value:<20} {count}")?;
    }
    writeln!(out, "{}", "-".repeat(10))
}
