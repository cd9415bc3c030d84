//! Tests the filter -> search -> sort pipeline over a fixed register.

use grc_risk_core::{RiskId, RiskLevel, RiskRecord, classify};
use grc_risk_view::{LevelFilter, SortDirection, SortKey, ViewQuery, view};

fn register() -> Vec<RiskRecord> {
    vec![
        RiskRecord::from_parts(1, "Customer DB", "SQL Injection", 4, 5),
        RiskRecord::from_parts(2, "Web Portal", "XSS", 3, 3),
        RiskRecord::from_parts(3, "HR Laptop", "Theft", 2, 2),
        RiskRecord::from_parts(4, "Payment API", "Credential stuffing", 3, 5),
        RiskRecord::from_parts(5, "Backup NAS", "Ransomware", 5, 5),
        RiskRecord::from_parts(6, "Web CDN", "DDoS", 3, 3),
    ]
}

fn ids(rows: &[RiskRecord]) -> Vec<RiskId> {
    rows.iter().map(|record| record.id().clone()).collect()
}

#[test]
fn view_pipeline_tests_filters_by_level() {
    let rows = view(
        &register(),
        LevelFilter::Only(RiskLevel::Critical),
        "",
        SortKey::Id,
        SortDirection::Asc,
    );
    assert_eq!(ids(&rows), vec![RiskId::Numeric(1), RiskId::Numeric(5)]);

    let all = view(&register(), LevelFilter::All, "", SortKey::Id, SortDirection::Asc);
    assert_eq!(all.len(), 6);
}

#[test]
fn view_pipeline_tests_search_is_trimmed_and_case_insensitive() {
    let rows = view(
        &register(),
        LevelFilter::All,
        "  WEB ",
        SortKey::Id,
        SortDirection::Asc,
    );
    assert_eq!(ids(&rows), vec![RiskId::Numeric(2), RiskId::Numeric(6)]);

    // Threat text is searched as well as asset.
    let rows = view(
        &register(),
        LevelFilter::All,
        "ransom",
        SortKey::Id,
        SortDirection::Asc,
    );
    assert_eq!(ids(&rows), vec![RiskId::Numeric(5)]);

    let rows = view(&register(), LevelFilter::All, "   ", SortKey::Id, SortDirection::Asc);
    assert_eq!(rows.len(), 6);
}

#[test]
fn view_pipeline_tests_applies_filter_before_search() {
    let rows = view(
        &register(),
        LevelFilter::Only(RiskLevel::Medium),
        "web",
        SortKey::Id,
        SortDirection::Asc,
    );
    assert_eq!(ids(&rows), vec![RiskId::Numeric(2), RiskId::Numeric(6)]);

    let rows = view(
        &register(),
        LevelFilter::Only(RiskLevel::Low),
        "web",
        SortKey::Id,
        SortDirection::Asc,
    );
    assert!(rows.is_empty());
}

#[test]
fn view_pipeline_tests_sort_is_stable_in_both_directions() {
    // Records 2 and 6 share score 9; record 2 comes first in the input.
    let ascending = view(&register(), LevelFilter::All, "", SortKey::Score, SortDirection::Asc);
    assert_eq!(
        ids(&ascending),
        vec![
            RiskId::Numeric(3),
            RiskId::Numeric(2),
            RiskId::Numeric(6),
            RiskId::Numeric(4),
            RiskId::Numeric(1),
            RiskId::Numeric(5),
        ]
    );

    let descending = view(&register(), LevelFilter::All, "", SortKey::Score, SortDirection::Desc);
    assert_eq!(
        ids(&descending),
        vec![
            RiskId::Numeric(5),
            RiskId::Numeric(1),
            RiskId::Numeric(4),
            RiskId::Numeric(2),
            RiskId::Numeric(6),
            RiskId::Numeric(3),
        ]
    );
}

#[test]
fn view_pipeline_tests_level_sorts_by_literal_name() {
    let rows = view(&register(), LevelFilter::All, "", SortKey::Level, SortDirection::Asc);
    let levels: Vec<&str> = rows.iter().map(|record| record.level().as_str()).collect();
    assert_eq!(
        levels,
        vec!["Critical", "Critical", "High", "Low", "Medium", "Medium"]
    );
}

#[test]
fn view_pipeline_tests_text_sort_is_case_sensitive() {
    let records = vec![
        RiskRecord::from_parts(1, "alpha", "t", 1, 1),
        RiskRecord::from_parts(2, "Beta", "t", 1, 1),
        RiskRecord::from_parts(3, "Alpha", "t", 1, 1),
    ];
    let rows = view(&records, LevelFilter::All, "", SortKey::Asset, SortDirection::Asc);
    let assets: Vec<&str> = rows.iter().map(RiskRecord::asset).collect();
    assert_eq!(assets, vec!["Alpha", "Beta", "alpha"]);
}

#[test]
fn view_pipeline_tests_is_idempotent_and_does_not_mutate_input() {
    let records = register();
    let before = records.clone();
    let query = ViewQuery {
        level_filter: LevelFilter::All,
        search_query: "a".to_string(),
        sort: Default::default(),
    };

    let first = query.apply(&records);
    let second = query.apply(&first);
    assert_eq!(first, second);
    assert_eq!(records, before);
}

#[test]
fn view_pipeline_tests_preserves_classification_invariant() {
    for key in SortKey::ALL {
        for filter in [
            LevelFilter::All,
            LevelFilter::Only(RiskLevel::High),
            LevelFilter::Only(RiskLevel::Medium),
        ] {
            let rows = view(&register(), filter, "e", key, SortDirection::Desc);
            for record in rows {
                assert_eq!(record.score(), record.likelihood() * record.impact());
                assert_eq!(record.level(), classify(record.score()));
            }
        }
    }
}

#[test]
fn view_pipeline_tests_empty_snapshot_yields_empty_view() {
    let rows = view(&[], LevelFilter::All, "db", SortKey::Score, SortDirection::Desc);
    assert!(rows.is_empty());
}
