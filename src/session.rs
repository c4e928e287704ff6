use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::data::filter::apply_filter;
use crate::data::loader::DatasetStore;
use crate::data::model::{FilterSelection, TripRecord};
use crate::pager::{format_trip, RawDataPager};
use crate::prompt::{get_filters, Prompter};
use crate::report::Reporter;

// ---------------------------------------------------------------------------
// Session loop
// ---------------------------------------------------------------------------

/// One interactive run: filters → load → reports → raw data → restart?
///
/// Nothing is kept between iterations; each one reloads its city file.
pub struct Session<R, W> {
    store: DatasetStore,
    prompter: Prompter<R, W>,
    reporter: Reporter,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(store: DatasetStore, prompter: Prompter<R, W>, reporter: Reporter) -> Self {
        Session {
            store,
            prompter,
            reporter,
        }
    }

    /// Loop until the user declines to restart or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let Some(selection) = get_filters(&mut self.prompter).context("reading filter choices")? else {
                log::debug!("input ended while choosing filters");
                return Ok(());
            };
            log::debug!("exploring {selection}");
            self.explore(&selection)?;

            let restart = self
                .prompter
                .read_answer("\nWould you like to restart? Enter yes or no.\n")?;
            if restart.as_deref() != Some("yes") {
                return Ok(());
            }
        }
    }

    fn explore(&mut self, selection: &FilterSelection) -> Result<()> {
        let full = self
            .store
            .load(selection.city)
            .with_context(|| format!("loading {} trip data", selection.city))?;
        let dataset = apply_filter(&full, selection.month, selection.weekday);
        drop(full);

        let out = self.prompter.output();
        self.reporter.dataset_summary(out, selection, &dataset)?;
        self.reporter.all(out, &dataset)?;

        self.page_raw_data(&dataset.trips)
    }

    fn page_raw_data(&mut self, trips: &[TripRecord]) -> Result<()> {
        writeln!(self.prompter.output(), "Would you like to see the raw data?")?;
        let mut pager = RawDataPager::new(trips);
        let mut shown = 0;
        while let Some(answer) = self.prompter.read_answer("Please type 'yes' or 'no': ")? {
            let Some(page) = pager.respond(&answer) else {
                break;
            };
            let out = self.prompter.output();
            if page.is_empty() {
                writeln!(out, "No more raw data.")?;
            }
            for trip in page {
                writeln!(out, "{}", format_trip(shown, trip))?;
                shown += 1;
            }
            writeln!(out, "Do you want to see more raw data?")?;
        }
        log::debug!("raw data pager stopped after {shown} rows in state {:?}", pager.state());
        Ok(())
    }
}
