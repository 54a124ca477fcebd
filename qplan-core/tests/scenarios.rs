use qplan_core::{analyze, report::render_text, AnalysisInput, Error, RuntimeSignal, Verdict};
use std::fs;
use std::path::{Path, PathBuf};

fn summary_line(avg: u64, results: u64) -> String {
    format!(
        "runs=5, totalMillis={}, averageMillis={avg}, resultCount={results}, softLimitMillis=1000, softLimitReached=false, maxRunsReached=false",
        avg * 5
    )
}

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn input(dir: &Path, base: (u64, u64), cand: (u64, u64), comparison: Option<&str>) -> AnalysisInput {
    AnalysisInput {
        baseline_log: write(dir, "baseline.log", &summary_line(base.0, base.1)),
        candidate_log: write(dir, "candidate.log", &summary_line(cand.0, cand.1)),
        comparison_log: comparison.map(|body| write(dir, "comparison.log", body)),
    }
}

#[test]
fn regression_without_comparison_log() {
    let dir = tempfile::tempdir().unwrap();
    let s = analyze(&input(dir.path(), (100, 20), (130, 20), None)).unwrap();
    assert!((s.delta_percent.unwrap() - 30.0).abs() < 1e-9);
    assert_eq!(s.runtime_signal, RuntimeSignal::Regression);
    assert_eq!(s.verdict, Verdict::PossibleRegression);
    let text = render_text(&s);
    assert!(text.contains("- delta: +30.00%\n"));
    assert!(text.contains("- verdict: possible performance regression (no semantic diff evidence provided)\n"));
}

#[test]
fn regression_with_structure_diff() {
    let dir = tempfile::tempdir().unwrap();
    let comparison = "Semantic comparison\n  optimized: plan structure=diff, joinAlgorithms=same, actualResultSizes=same, estimates=same\n";
    let s = analyze(&input(dir.path(), (100, 20), (130, 20), Some(comparison))).unwrap();
    assert_eq!(s.semantic_diff.len(), 1);
    assert!(s.plan_changes.structure);
    assert_eq!(s.verdict.as_str(), "likely performance regression with plan-shape change");
}

#[test]
fn result_count_change_overrides_delta() {
    let dir = tempfile::tempdir().unwrap();
    for cand_avg in [1, 100, 5000] {
        let s = analyze(&input(dir.path(), (100, 20), (cand_avg, 25), None)).unwrap();
        assert!(s.result_count_changed);
        assert_eq!(
            s.verdict.as_str(),
            "semantic regression risk: result count changed; runtime delta not comparable"
        );
    }
}

#[test]
fn zero_baseline_average_reports_na() {
    let dir = tempfile::tempdir().unwrap();
    let s = analyze(&input(dir.path(), (0, 20), (50, 20), None)).unwrap();
    assert_eq!(s.delta_percent, None);
    assert_eq!(s.runtime_signal, RuntimeSignal::Unknown);
    assert!(render_text(&s).contains("- delta: n/a (baseline averageMillis=0)\n"));
    assert_eq!(s.verdict, Verdict::NoClearSignal);
}

#[test]
fn no_comparison_log_prints_not_provided() {
    let dir = tempfile::tempdir().unwrap();
    let s = analyze(&input(dir.path(), (100, 20), (101, 20), None)).unwrap();
    assert!(s.semantic_diff.is_empty());
    assert!(render_text(&s).contains("- semantic diff: not provided\n"));
}

#[test]
fn comparison_log_without_rows_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let s = analyze(&input(dir.path(), (100, 20), (100, 20), Some("nothing to see\n"))).unwrap();
    assert!(s.semantic_diff.is_empty());
    assert!(render_text(&s).contains("- semantic diff: not provided\n"));
}

#[test]
fn warmup_runs_are_superseded() {
    let dir = tempfile::tempdir().unwrap();
    let baseline = format!("{}\nsome noise\n{}\n", summary_line(900, 20), summary_line(100, 20));
    let logs = AnalysisInput {
        baseline_log: write(dir.path(), "baseline.log", &baseline),
        candidate_log: write(dir.path(), "candidate.log", &summary_line(85, 20)),
        comparison_log: None,
    };
    let s = analyze(&logs).unwrap();
    assert_eq!(s.baseline.avg, 100);
    assert_eq!(s.verdict, Verdict::PossibleImprovement);
}

#[test]
fn missing_metrics_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let logs = AnalysisInput {
        baseline_log: write(dir.path(), "baseline.log", &summary_line(100, 20)),
        candidate_log: write(dir.path(), "candidate.log", "query failed before timing\n"),
        comparison_log: None,
    };
    match analyze(&logs) {
        Err(Error::MissingMetrics { path }) => assert_eq!(path, logs.candidate_log),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn unreadable_comparison_log_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut logs = input(dir.path(), (100, 20), (130, 20), None);
    logs.comparison_log = Some(dir.path().join("missing.log"));
    assert!(matches!(analyze(&logs), Err(Error::FileAccess { .. })));
}
