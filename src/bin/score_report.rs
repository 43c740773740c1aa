use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use phoneme_scorer::{
    aggregate_reports, compute_case_report, AlignmentStrategy, CaseReport, LocaleReference, Meta,
    PronunciationScorer, PronunciationScorerBuilder, Report, ScorerConfig,
};
use serde::Deserialize;

#[path = "score_report/json_report_formatter.rs"]
mod json_report_formatter;

const DEFAULT_TOP_CORRECTIONS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyChoice {
    #[value(name = "edit-distance")]
    EditDistance,
    Positional,
}

impl StrategyChoice {
    fn strategy(self) -> AlignmentStrategy {
        match self {
            Self::EditDistance => AlignmentStrategy::EditDistance,
            Self::Positional => AlignmentStrategy::Positional,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "score_report")]
#[command(about = "Score batches of pronunciation attempts and write a JSON report")]
struct Args {
    #[arg(long, env = "PHONEME_SCORER_CASES")]
    cases: PathBuf,
    #[arg(long, env = "PHONEME_SCORER_OUT")]
    out: Option<PathBuf>,
    /// JSON scorer config; flags below override its fields.
    #[arg(long, env = "PHONEME_SCORER_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "PHONEME_SCORER_STRATEGY", value_enum)]
    strategy: Option<StrategyChoice>,
    #[arg(long, env = "PHONEME_SCORER_MAX_TOKENS")]
    max_tokens: Option<usize>,
    #[arg(long, env = "PHONEME_SCORER_PREFERRED_LOCALE")]
    preferred_locale: Option<String>,
    #[arg(long, env = "PHONEME_SCORER_LIMIT")]
    limit: Option<usize>,
    #[arg(long, env = "PHONEME_SCORER_OFFSET", default_value_t = 0)]
    offset: usize,
    #[arg(long, env = "PHONEME_SCORER_TOP_CORRECTIONS", default_value_t = DEFAULT_TOP_CORRECTIONS)]
    top_corrections: usize,
    /// Include per-position alignments in each case entry.
    #[arg(long, env = "PHONEME_SCORER_POSITIONS", default_value_t = false)]
    positions: bool,
}

#[derive(Debug, Deserialize)]
struct ScoringCase {
    id: String,
    #[serde(default)]
    observed: Option<String>,
    /// Locale tag to reference transcription; `null` excludes the variant.
    #[serde(default)]
    references: BTreeMap<String, Option<String>>,
}

impl ScoringCase {
    fn locale_references(&self) -> Vec<LocaleReference> {
        self.references
            .iter()
            .map(|(locale, phonemes)| LocaleReference::new(locale.as_str(), phonemes.as_deref()))
            .collect()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    let mut cases = load_cases(&args.cases)?;
    if args.offset > 0 {
        cases = cases.into_iter().skip(args.offset).collect();
    }
    if let Some(limit) = args.limit {
        cases.truncate(limit);
    }
    if cases.is_empty() {
        return Err("No cases selected after applying offset/limit.".to_string());
    }

    let scorer = build_scorer(config)?;
    tracing::info!(
        cases = cases.len(),
        strategy = scorer.aligner_name(),
        max_tokens = scorer.config().max_tokens,
        "score_report: starting"
    );

    let progress = ProgressBar::new(cases.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );

    let started = Instant::now();
    let mut case_reports: Vec<CaseReport> = Vec::with_capacity(cases.len());
    for case in &cases {
        progress.set_message(case.id.clone());
        let outcome = scorer.score_locales(case.observed.as_deref(), &case.locale_references());
        if let Err(err) = &outcome {
            tracing::warn!(case = case.id.as_str(), "score_report: case rejected: {err}");
        }
        case_reports.push(compute_case_report(&case.id, &outcome, args.positions));
        progress.inc(1);
    }
    progress.finish_with_message("scoring pass complete");
    let elapsed = started.elapsed();
    tracing::info!(
        elapsed_ms = format!("{:.2}", elapsed.as_secs_f64() * 1000.0),
        "score_report: scoring finished"
    );

    let aggregates = aggregate_reports(&case_reports, args.top_corrections);
    let report = Report {
        schema_version: 1,
        meta: Meta {
            generated_at: Utc::now().to_rfc3339(),
            strategy: scorer.aligner_name().to_string(),
            max_tokens: scorer.config().max_tokens,
            preferred_locale: scorer.config().preferred_locale.clone(),
            case_count: case_reports.len(),
        },
        cases: case_reports,
        aggregates,
    };

    let out_path = resolve_out_path(&args.cases, args.out.as_ref());
    json_report_formatter::write_report(&out_path, &report)?;
    println!("{}", out_path.display());
    Ok(())
}

fn resolve_config(args: &Args) -> Result<ScorerConfig, String> {
    let mut config = match args.config.as_ref() {
        Some(path) => ScorerConfig::load(path)
            .map_err(|err| format!("Failed to load scorer config '{}': {err}", path.display()))?,
        None => ScorerConfig::default(),
    };
    if let Some(strategy) = args.strategy {
        config.strategy = strategy.strategy();
    }
    if let Some(max_tokens) = args.max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(locale) = args.preferred_locale.as_ref() {
        config.preferred_locale = Some(locale.clone());
    }
    Ok(config)
}

fn build_scorer(config: ScorerConfig) -> Result<PronunciationScorer, String> {
    PronunciationScorerBuilder::new(config)
        .build()
        .map_err(|err| format!("Failed to build scorer: {err}"))
}

fn load_cases(path: &Path) -> Result<Vec<ScoringCase>, String> {
    if !path.exists() {
        return Err(format!("Missing --cases path '{}'.", path.display()));
    }
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read cases file '{}': {err}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|err| format!("Failed to parse cases file '{}': {err}", path.display()))
}

fn resolve_out_path(cases_path: &Path, out: Option<&PathBuf>) -> PathBuf {
    if let Some(path) = out {
        return path.clone();
    }
    let stem = cases_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cases".to_string());
    cases_path.with_file_name(format!("{stem}.report.json"))
}
