use crate::core::finder::{DealFinder, ExecutionMode};
use crate::domain::model::{Match, SearchReport};
use crate::domain::ports::{Geocoder, PlaceSearch};
use crate::utils::error::Result;
use serde::Serialize;
use std::fmt::Write;
use std::time::Duration;

/// Timings of the same search run sequentially and concurrently.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub sequential: SearchReport,
    pub concurrent: SearchReport,
}

impl Comparison {
    pub fn sequential_time(&self) -> Duration {
        self.sequential.elapsed
    }

    pub fn concurrent_time(&self) -> Duration {
        self.concurrent.elapsed
    }

    pub fn speedup(&self) -> Option<f64> {
        let concurrent = self.concurrent_time().as_secs_f64();
        (concurrent > 0.0).then(|| self.sequential_time().as_secs_f64() / concurrent)
    }

    /// Percentage of the sequential time saved by running concurrently.
    pub fn time_saved_percent(&self) -> Option<f64> {
        let sequential = self.sequential_time().as_secs_f64();
        (sequential > 0.0)
            .then(|| (sequential - self.concurrent_time().as_secs_f64()) / sequential * 100.0)
    }

    pub fn same_results(&self) -> bool {
        self.sequential.matches == self.concurrent.matches
    }
}

pub async fn compare_modes<G: Geocoder, P: PlaceSearch>(
    finder: &DealFinder<G, P>,
    location: &str,
    radius: f64,
) -> Comparison {
    tracing::info!("1. Testing sequential method...");
    let sequential = finder
        .find_with_mode(location, radius, ExecutionMode::Sequential)
        .await;
    tracing::info!(
        "Sequential method completed in {:.2} seconds",
        sequential.elapsed.as_secs_f64()
    );

    tracing::info!(
        "2. Testing concurrent method ({} workers)...",
        finder.options().max_workers
    );
    let concurrent = finder
        .find_with_mode(location, radius, ExecutionMode::Concurrent)
        .await;
    tracing::info!(
        "Concurrent method completed in {:.2} seconds",
        concurrent.elapsed.as_secs_f64()
    );

    Comparison {
        sequential,
        concurrent,
    }
}

pub fn render_comparison(comparison: &Comparison, location: &str, radius: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nPerformance Test: Birthday Deals Finder");
    let _ = writeln!(out, "Location: {}", location);
    let _ = writeln!(out, "Radius: {}", radius);
    let _ = writeln!(out, "{}", "=".repeat(60));

    let seq = comparison.sequential_time().as_secs_f64();
    let conc = comparison.concurrent_time().as_secs_f64();
    let _ = writeln!(
        out,
        "Sequential: {:.2} seconds, {} stores",
        seq,
        comparison.sequential.matches.len()
    );
    let _ = writeln!(
        out,
        "Concurrent: {:.2} seconds, {} stores",
        conc,
        comparison.concurrent.matches.len()
    );

    if let (Some(speedup), Some(saved)) = (comparison.speedup(), comparison.time_saved_percent()) {
        let _ = writeln!(out, "\nPerformance Improvement:");
        let _ = writeln!(out, "Speedup: {:.2}x faster", speedup);
        let _ = writeln!(out, "Time saved: {:.1}%", saved);
        let _ = writeln!(out, "Time reduction: {:.2} seconds", seq - conc);
    }

    if comparison.same_results() {
        let _ = writeln!(
            out,
            "\n✓ Both methods found the same stores ({})",
            comparison.sequential.matches.len()
        );
    } else {
        let _ = writeln!(
            out,
            "\n⚠ Different results: Sequential={}, Concurrent={}",
            comparison.sequential.matches.len(),
            comparison.concurrent.matches.len()
        );
    }
    out
}

#[derive(Serialize)]
struct JsonComparison<'a> {
    location: &'a str,
    radius: f64,
    sequential_ms: u64,
    concurrent_ms: u64,
    speedup: Option<f64>,
    time_saved_percent: Option<f64>,
    same_results: bool,
    matches: &'a [Match],
}

pub fn render_comparison_json(
    comparison: &Comparison,
    location: &str,
    radius: f64,
) -> Result<String> {
    let json = JsonComparison {
        location,
        radius,
        sequential_ms: comparison.sequential_time().as_millis() as u64,
        concurrent_ms: comparison.concurrent_time().as_millis() as u64,
        speedup: comparison.speedup(),
        time_saved_percent: comparison.time_saved_percent(),
        same_results: comparison.same_results(),
        matches: &comparison.concurrent.matches,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparison(seq_ms: u64, conc_ms: u64) -> Comparison {
        Comparison {
            sequential: SearchReport {
                elapsed: Duration::from_millis(seq_ms),
                ..SearchReport::default()
            },
            concurrent: SearchReport {
                elapsed: Duration::from_millis(conc_ms),
                ..SearchReport::default()
            },
        }
    }

    #[test]
    fn test_speedup_and_savings() {
        let c = comparison(1000, 250);
        assert!((c.speedup().unwrap() - 4.0).abs() < 1e-9);
        assert!((c.time_saved_percent().unwrap() - 75.0).abs() < 1e-9);
        assert!(c.same_results());

        let text = render_comparison(&c, "New York, NY", 5.0);
        assert!(text.contains("Speedup: 4.00x faster"));
        assert!(text.contains("Time saved: 75.0%"));
        assert!(text.contains("✓ Both methods found the same stores (0)"));
    }

    #[test]
    fn test_json_comparison() {
        let json = render_comparison_json(&comparison(900, 300), "Chicago, IL", 3.0).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["sequential_ms"], 900);
        assert_eq!(value["concurrent_ms"], 300);
        assert!((value["speedup"].as_f64().unwrap() - 3.0).abs() < 1e-9);
        assert_eq!(value["same_results"], true);
        assert!(value["matches"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_zero_durations_have_no_ratio() {
        let c = comparison(0, 0);
        assert!(c.speedup().is_none());
        assert!(c.time_saved_percent().is_none());
        assert!(!render_comparison(&c, "x", 1.0).contains("Speedup"));
    }
}
