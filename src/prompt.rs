use std::io::{self, BufRead, Write};

use crate::data::model::{parse_month, parse_weekday, City, FilterSelection};

// ---------------------------------------------------------------------------
// Console prompter
// ---------------------------------------------------------------------------

/// Line-based console dialogue over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Where reports and messages are written.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Print `prompt` and read one answer, trimmed and lower-cased.
    /// Returns `None` at end of input.
    pub fn read_answer(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }

    /// Ask until `validate` accepts an answer.
    ///
    /// There is no retry limit: an invalid answer prints `retry_message` and
    /// asks again. Only end of input stops the loop, returning `None`.
    pub fn ask_until<T>(
        &mut self,
        prompt: &str,
        retry_message: &str,
        validate: impl Fn(&str) -> Option<T>,
    ) -> io::Result<Option<T>> {
        loop {
            let Some(answer) = self.read_answer(prompt)? else {
                return Ok(None);
            };
            if let Some(value) = validate(&answer) {
                return Ok(Some(value));
            }
            log::debug!("rejected answer {answer:?}");
            writeln!(self.output, "{retry_message}")?;
        }
    }
}

// ---------------------------------------------------------------------------
// Filter resolution
// ---------------------------------------------------------------------------

/// How the user wants to restrict trips in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    Month,
    Day,
    Both,
    Unfiltered,
}

impl DateFilter {
    pub fn parse(token: &str) -> Option<DateFilter> {
        match token.trim().to_lowercase().as_str() {
            "month" => Some(DateFilter::Month),
            "day" => Some(DateFilter::Day),
            "both" => Some(DateFilter::Both),
            "none" => Some(DateFilter::Unfiltered),
            _ => None,
        }
    }

    pub fn wants_month(self) -> bool {
        matches!(self, DateFilter::Month | DateFilter::Both)
    }

    pub fn wants_day(self) -> bool {
        matches!(self, DateFilter::Day | DateFilter::Both)
    }
}

/// Ask for city, date filter mode, and then month and/or day as needed.
/// Returns `None` if input ends before a full selection is made.
pub fn get_filters<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> io::Result<Option<FilterSelection>> {
    writeln!(prompter.output(), "Hello! Let's explore some US bikeshare data!")?;

    writeln!(prompter.output(), "Would you like to see data for Chicago, New York, or Washington?")?;
    let Some(city) = prompter.ask_until(
        "Please type the city name: ",
        "City out of range, please try again",
        City::parse,
    )?
    else {
        return Ok(None);
    };

    writeln!(
        prompter.output(),
        "Would you like to filter the data by month, day, both, or \"none\" for no time filter?"
    )?;
    let Some(date_filter) = prompter.ask_until(
        "Specify the date filter: ",
        "Input out of range, please try again",
        DateFilter::parse,
    )?
    else {
        return Ok(None);
    };

    let mut month = None;
    if date_filter.wants_month() {
        writeln!(prompter.output(), "Which month - January, February, March, April, May, or June?")?;
        month = prompter.ask_until(
            "Specify the month: ",
            "Month out of range, please try again",
            parse_month,
        )?;
        if month.is_none() {
            return Ok(None);
        }
    }

    let mut weekday = None;
    if date_filter.wants_day() {
        writeln!(
            prompter.output(),
            "Which day - Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, or Sunday?"
        )?;
        weekday = prompter.ask_until(
            "Specify the day: ",
            "Day out of range, please try again",
            parse_weekday,
        )?;
        if weekday.is_none() {
            return Ok(None);
        }
    }

    writeln!(prompter.output(), "{}", "-".repeat(40))?;
    Ok(Some(FilterSelection::new(city, month, weekday)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str) -> (Option<FilterSelection>, String) {
        let mut prompter = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let selection = get_filters(&mut prompter).unwrap();
        (selection, String::from_utf8(prompter.output).unwrap())
    }

    #[test]
    fn invalid_city_does_not_advance() {
        let (selection, out) = run("Boston\n");
        assert_eq!(selection, None);
        assert!(out.contains("City out of range, please try again"));
        assert!(!out.contains("Specify the date filter"));
    }

    #[test]
    fn retries_until_valid_city() {
        let (selection, out) = run("Boston\nparis\n  Chicago \nnone\n");
        assert_eq!(selection, Some(FilterSelection::new(City::Chicago, None, None)));
        assert_eq!(out.matches("City out of range").count(), 2);
        assert_eq!(out.matches("Please type the city name:").count(), 3);
    }

    #[test]
    fn month_only() {
        let (selection, _) = run("new york\nmonth\nMarch\n");
        assert_eq!(selection, Some(FilterSelection::new(City::NewYork, Some(3), None)));
    }

    #[test]
    fn day_only_with_bad_day() {
        let (selection, out) = run("washington\nday\nfunday\nSunday\n");
        assert_eq!(selection, Some(FilterSelection::new(City::Washington, None, Some(6))));
        assert!(out.contains("Day out of range"));
        assert!(!out.contains("Specify the month"));
    }

    #[test]
    fn both_with_out_of_range_month() {
        let (selection, out) = run("chicago\nweek\nboth\njuly\njune\ntuesday\n");
        assert_eq!(selection, Some(FilterSelection::new(City::Chicago, Some(6), Some(1))));
        assert!(out.contains("Input out of range"));
        assert!(out.contains("Month out of range"));
    }

    #[test]
    fn end_of_input_mid_dialogue() {
        let (selection, _) = run("chicago\nboth\nmay\n");
        assert_eq!(selection, None);
    }

    #[test]
    fn read_answer_normalizes() {
        let mut prompter = Prompter::new(Cursor::new(b"  YeS \r\n".to_vec()), Vec::new());
        assert_eq!(prompter.read_answer("? ").unwrap().as_deref(), Some("yes"));
        assert_eq!(prompter.read_answer("? ").unwrap(), None);
    }
}
