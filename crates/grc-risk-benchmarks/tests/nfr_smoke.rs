//! Benchmark smoke test for the snapshot projection pipeline.

use std::time::Instant;

use grc_risk_core::RiskRecord;
use grc_risk_export::to_csv;
use grc_risk_matrix::build_matrix;
use grc_risk_summary::summarize;
use grc_risk_view::{LevelFilter, SortDirection, SortKey, view};

fn synthetic_register(size: usize) -> Vec<RiskRecord> {
    (0..size)
        .map(|index| {
            let likelihood = (index % 5) as i32 + 1;
            let impact = ((index / 5) % 5) as i32 + 1;
            RiskRecord::from_parts(
                index as i64,
                format!("Asset {index}"),
                format!("Threat {}", index % 37),
                likelihood,
                impact,
            )
        })
        .collect()
}

#[test]
fn benchmark_projection_smoke_prints_latency() {
    let records = synthetic_register(10_000);

    let start = Instant::now();
    let mut csv_bytes = 0usize;

    for round in 0..20 {
        let summary = summarize(&records);
        let matrix = build_matrix(&records);
        assert_eq!(matrix.total_count(), summary.total);

        let key = SortKey::ALL[round % SortKey::ALL.len()];
        let rows = view(&records, LevelFilter::All, "threat 1", key, SortDirection::Desc);
        csv_bytes += to_csv(&rows).len();
    }

    let elapsed_ms = start.elapsed().as_millis();
    println!("benchmark_projection_elapsed_ms={elapsed_ms}");
    println!("benchmark_projection_csv_bytes={csv_bytes}");

    // Lightweight guardrail; strict latency targets are environment-specific.
    assert!(
        elapsed_ms < 5_000,
        "projection smoke benchmark should stay bounded"
    );
}
