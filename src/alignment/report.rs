use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::error::ScoringError;
use crate::types::{AlignmentPosition, AlignmentSummary, Correction, LocalizedResult};

const PERFECT_SCORE_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    pub meta: Meta,
    pub cases: Vec<CaseReport>,
    pub aggregates: AggregateReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub strategy: String,
    pub max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_locale: Option<String>,
    pub case_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub id: String,
    pub has_reference: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<AlignmentSummary>,
    pub corrections: Vec<Correction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<AlignmentPosition>>,
    /// Set when the case was rejected instead of scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub counts: AggregateCounts,
    pub score: Option<MetricDistribution>,
    pub top_corrections: Vec<CorrectionCount>,
    pub lowest_scores: Vec<OutlierEntry>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AggregateCounts {
    pub total: u32,
    pub scored: u32,
    pub without_reference: u32,
    pub rejected: u32,
    pub perfect: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricDistribution {
    pub mean: f64,
    pub min: f64,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

/// How many cases contained a given confusion.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CorrectionCount {
    pub observed: String,
    pub reference: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlierEntry {
    pub id: String,
    pub locale: Option<String>,
    pub value: f64,
}

pub fn compute_case_report(
    id: &str,
    outcome: &Result<Option<LocalizedResult>, ScoringError>,
    include_positions: bool,
) -> CaseReport {
    match outcome {
        Ok(Some(best)) => CaseReport {
            id: id.to_string(),
            has_reference: true,
            locale: Some(best.locale.clone()),
            score: Some(best.result.score()),
            summary: Some(best.result.summary()),
            corrections: best.result.corrections().to_vec(),
            positions: include_positions.then(|| best.result.positions().to_vec()),
            error: None,
        },
        Ok(None) => CaseReport {
            id: id.to_string(),
            has_reference: false,
            locale: None,
            score: None,
            summary: None,
            corrections: Vec::new(),
            positions: None,
            error: None,
        },
        Err(err) => CaseReport {
            id: id.to_string(),
            has_reference: true,
            locale: None,
            score: None,
            summary: None,
            corrections: Vec::new(),
            positions: None,
            error: Some(err.to_string()),
        },
    }
}

pub fn aggregate_reports(cases: &[CaseReport], top_n: usize) -> AggregateReport {
    let scored: Vec<&CaseReport> = cases.iter().filter(|case| case.score.is_some()).collect();
    let scores: Vec<f64> = scored.iter().filter_map(|case| case.score).collect();
    let rejected = cases.iter().filter(|case| case.error.is_some()).count();
    let without_reference = cases.iter().filter(|case| !case.has_reference).count();
    let perfect = scores
        .iter()
        .filter(|&&score| score >= 1.0 - PERFECT_SCORE_EPS)
        .count();

    AggregateReport {
        counts: AggregateCounts {
            total: to_u32(cases.len()),
            scored: to_u32(scored.len()),
            without_reference: to_u32(without_reference),
            rejected: to_u32(rejected),
            perfect: to_u32(perfect),
        },
        score: distribution_or_none(&scores),
        top_corrections: ranked_corrections(&scored, top_n),
        lowest_scores: lowest_scores(&scored, top_n),
    }
}

fn ranked_corrections(cases: &[&CaseReport], top_n: usize) -> Vec<CorrectionCount> {
    let mut counts: HashMap<(&str, &str), u32> = HashMap::new();
    for case in cases {
        for correction in &case.corrections {
            *counts
                .entry((correction.observed.as_str(), correction.reference.as_str()))
                .or_default() += 1;
        }
    }

    let mut ranked: Vec<CorrectionCount> = counts
        .into_iter()
        .map(|((observed, reference), count)| CorrectionCount {
            observed: observed.to_string(),
            reference: reference.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.observed.cmp(&b.observed))
            .then_with(|| a.reference.cmp(&b.reference))
    });
    ranked.truncate(top_n);
    ranked
}

fn lowest_scores(cases: &[&CaseReport], top_n: usize) -> Vec<OutlierEntry> {
    let mut entries: Vec<OutlierEntry> = cases
        .iter()
        .filter_map(|case| {
            case.score.map(|value| OutlierEntry {
                id: case.id.clone(),
                locale: case.locale.clone(),
                value,
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        a.value
            .partial_cmp(&b.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    entries.truncate(top_n);
    entries
}

fn distribution_or_none(values: &[f64]) -> Option<MetricDistribution> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Some(MetricDistribution {
        mean: mean(&sorted),
        min: sorted[0],
        p10: percentile_sorted(&sorted, 0.1),
        p50: percentile_sorted(&sorted, 0.5),
        p90: percentile_sorted(&sorted, 0.9),
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn percentile_sorted(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }
    if sorted_values.len() == 1 {
        return sorted_values[0];
    }

    let clamped = percentile.clamp(0.0, 1.0);
    let max_index = (sorted_values.len() - 1) as f64;
    let rank = clamped * max_index;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted_values[lower]
    } else {
        let weight = rank - lower as f64;
        sorted_values[lower] * (1.0 - weight) + sorted_values[upper] * weight
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
