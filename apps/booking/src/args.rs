use chrono::NaiveDate;
use clap::Parser;

/// Lists a provider's availability for a day and optionally books an hour.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(version, about, long_about = None)]
pub struct BookingArgs {
    /// Provider to book with; defaults to the first listed provider
    pub provider_id: Option<String>,

    /// Day to book, as YYYY-MM-DD; defaults to today
    #[arg(value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Hour of the day to book; only availability is listed when omitted
    #[arg(value_parser = clap::value_parser!(i32))]
    pub hour: Option<i32>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}', expected YYYY-MM-DD: {}", raw, e))
}
