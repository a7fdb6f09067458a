//! Human-readable and JSON output of a matching report.

use ec_01_exposure_matching::{KeyHistogram, MatchReport, MatchStatus, MatchSummary, SkippedKey};
use serde::Serialize;
use shared_types::DaySinceEpoch;

/// JSON view of a report. Key material and record internals stay out.
#[derive(Debug, Serialize)]
pub struct ReportView<'a> {
    pub status: MatchStatus,
    pub partial: bool,
    pub matching_possible: bool,
    pub keys: usize,
    pub daily_match_counts: Vec<(DaySinceEpoch, usize)>,
    pub total_matching_key_count: usize,
    pub summaries: &'a [MatchSummary],
    pub skipped: &'a [SkippedKey],
}

impl<'a> From<&'a MatchReport> for ReportView<'a> {
    fn from(report: &'a MatchReport) -> Self {
        Self {
            status: report.status(),
            partial: report.partial,
            matching_possible: report.matching_possible,
            keys: report.keys.len(),
            daily_match_counts: report.daily_match_counts().into_iter().collect(),
            total_matching_key_count: report.total_matching_key_count(),
            summaries: &report.summaries,
            skipped: &report.skipped,
        }
    }
}

fn clock(seconds_of_day: i64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds_of_day / 3600,
        (seconds_of_day / 60) % 60,
        seconds_of_day % 60
    )
}

pub fn status_line(report: &MatchReport) -> String {
    let status = match report.status() {
        MatchStatus::NotPossible => "Matching not possible: the observation log is empty".to_string(),
        MatchStatus::NoMatches => "No matches".to_string(),
        MatchStatus::Matches(n) => format!("{n} matching key-days"),
    };
    if report.partial {
        format!("{status} (cancelled, partial result)")
    } else {
        status
    }
}

pub fn print_report(report: &MatchReport) {
    println!("{}", status_line(report));

    for summary in &report.summaries {
        let key = report.key(summary.key_index);
        println!();
        println!(
            "Key #{} (rolling start {}, report type {:?})",
            summary.key_index,
            key.map(|k| k.rolling_start_interval.0).unwrap_or_default(),
            key.map(|k| k.report_type).unwrap_or_default(),
        );
        println!(
            "  {} observations, {} with unexpected metadata, tx power {}..{} dBm, min attenuation {} dB",
            summary.observation_count,
            summary.mismatched_metadata,
            summary.min_tx_power,
            summary.max_tx_power,
            summary.min_attenuation,
        );
        println!(
            "  seen {} to {} local time",
            clock(summary.first_seconds_of_day),
            clock(summary.last_seconds_of_day)
        );
        for encounter in &summary.encounters {
            let representative = encounter.representative();
            println!(
                "  encounter at {} for {}s: {} samples, closest {} dB ({:?})",
                representative.timestamp(),
                encounter.duration_secs(),
                encounter.len(),
                representative.attenuation,
                representative.band(),
            );
        }
    }

    for skipped in &report.skipped {
        println!("Skipped key #{}: {}", skipped.key_index, skipped.reason);
    }
}

pub fn print_day_counts(days: &[(DaySinceEpoch, usize)]) {
    if days.is_empty() {
        println!("No observations recorded");
        return;
    }
    for (day, count) in days {
        println!("day {:>6}  {:>8} observations", day.0, count);
    }
}

pub fn print_histogram(histogram: &KeyHistogram) {
    println!("{} keys binned", histogram.counted);
    for (day, count) in &histogram.bins {
        println!("day {:>6}  {:>8} keys", day.0, count);
    }
}
