use crate::domain::model::{Coordinate, DistanceUnit, Match, SearchReport, StoreFailure};
use crate::utils::error::Result;
use serde::Serialize;
use std::fmt::Write;

const RULE_WIDTH: usize = 60;

/// Human-readable report: header, numbered matches, then diagnostics for
/// anything that failed.
pub fn render_text(report: &SearchReport, location: &str, radius: f64, unit: DistanceUnit) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "Birthday Deals within {} {} of {}", radius, unit, location);
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    if let Some(reason) = &report.origin_error {
        let _ = writeln!(out, "Could not resolve '{}': {}", location, reason);
        return out;
    }

    if report.matches.is_empty() {
        let _ = writeln!(
            out,
            "No stores with birthday deals found in the specified radius."
        );
    } else {
        let _ = writeln!(
            out,
            "Found {} stores with birthday deals:\n",
            report.matches.len()
        );
        for (i, m) in report.matches.iter().enumerate() {
            write_match(&mut out, i + 1, m);
        }
    }

    if !report.failures.is_empty() {
        write_failures(&mut out, &report.failures);
    }
    out
}

fn write_match(out: &mut String, number: usize, m: &Match) {
    let _ = writeln!(out, "{}. {}", number, m.store_name);
    let _ = writeln!(out, "   Deal: {}", m.deal);
    let _ = writeln!(out, "   Address: {}", m.address);
    let _ = writeln!(out, "   Distance: {} {}", m.distance, m.unit);
    if let Some(rating) = &m.rating {
        match rating.reviews {
            Some(reviews) => {
                let _ = writeln!(out, "   Rating: {}/5 ({} reviews)", rating.value, reviews);
            }
            None => {
                let _ = writeln!(out, "   Rating: {}/5", rating.value);
            }
        }
    }
    let _ = writeln!(out);
}

fn write_failures(out: &mut String, failures: &[StoreFailure]) {
    let _ = writeln!(
        out,
        "⚠️  {} store searches failed and are missing from the results:",
        failures.len()
    );
    for failure in failures {
        let _ = writeln!(out, "   - {}: {}", failure.store_name, failure.reason);
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    location: &'a str,
    radius: f64,
    unit: DistanceUnit,
    origin: Option<Coordinate>,
    origin_error: Option<&'a str>,
    elapsed_ms: u64,
    matches: &'a [Match],
    failures: &'a [StoreFailure],
}

pub fn render_json(
    report: &SearchReport,
    location: &str,
    radius: f64,
    unit: DistanceUnit,
) -> Result<String> {
    let json = JsonReport {
        location,
        radius,
        unit,
        origin: report.origin,
        origin_error: report.origin_error.as_deref(),
        elapsed_ms: report.elapsed.as_millis() as u64,
        matches: &report.matches,
        failures: &report.failures,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}
