use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use prompt_optimizer_core::{MetricKind, MetricScore, OptimizationRecord, ResultSink, TaskCategory};
use prompt_optimizer_storage::{
    export_csv, to_csv, InMemoryResultStore, JsonlResultStore, ResultRepository,
};
use rstest::rstest;
use tempfile::TempDir;
use uuid::Uuid;

fn record(category: TaskCategory, winner_index: usize, winner: MetricScore, original_total: f64) -> OptimizationRecord {
    OptimizationRecord {
        id: Uuid::new_v4(),
        run_id: Uuid::new_v4(),
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        category,
        original_prompt: "explain machine learning".to_string(),
        winning_prompt: "Explain machine learning step by step".to_string(),
        winning_response: "Machine learning is a process.".to_string(),
        winner_index,
        candidate_count: 5,
        scores: winner,
        winner_total: winner.total(),
        original_total,
        improvement: winner.total() - original_total,
        explanation: "Variant scored highest.".to_string(),
    }
}

fn sample_records() -> Vec<OptimizationRecord> {
    vec![
        record(TaskCategory::Explanation, 2, MetricScore::new(25.0, 12.5, 20.0, 12.0), 49.5),
        record(TaskCategory::Summarization, 0, MetricScore::new(10.0, 5.0, 15.0, 10.0), 40.0),
        record(TaskCategory::Explanation, 1, MetricScore::new(20.0, 20.0, 25.0, 15.0), 60.0),
    ]
}

// ===== JSONL Store Tests =====

#[tokio::test]
async fn test_jsonl_missing_file_lists_empty() {
    let dir = TempDir::new().unwrap();
    let store = JsonlResultStore::new(dir.path().join("history.jsonl"));

    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_jsonl_append_and_list_preserves_order() {
    let dir = TempDir::new().unwrap();
    let store = JsonlResultStore::new(dir.path().join("nested").join("history.jsonl"));
    let records = sample_records();

    for r in &records {
        store.append(r).await.unwrap();
    }

    let listed = store.list().await.unwrap();
    assert_eq!(listed, records);
}

#[tokio::test]
async fn test_jsonl_writes_one_line_per_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.jsonl");
    let store = JsonlResultStore::new(&path);

    for r in &sample_records() {
        store.append(r).await.unwrap();
    }

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 3);
    assert!(contents.ends_with('\n'));
}

#[tokio::test]
async fn test_jsonl_skips_corrupt_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.jsonl");
    let store = JsonlResultStore::new(&path);
    let records = sample_records();

    store.append(&records[0]).await.unwrap();
    {
        use std::io::Write;
        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{\"id\": truncated").unwrap();
        writeln!(file).unwrap();
    }
    store.append(&records[1]).await.unwrap();

    let listed = store.list().await.unwrap();
    assert_eq!(listed, vec![records[0].clone(), records[1].clone()]);
}

#[tokio::test]
async fn test_jsonl_clear_returns_count() {
    let dir = TempDir::new().unwrap();
    let store = JsonlResultStore::new(dir.path().join("history.jsonl"));

    for r in &sample_records() {
        store.append(r).await.unwrap();
    }

    assert_eq!(store.clear().await.unwrap(), 3);
    assert!(store.list().await.unwrap().is_empty());
    assert_eq!(store.clear().await.unwrap(), 0);
}

#[tokio::test]
async fn test_jsonl_clear_without_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.jsonl");
    let store = JsonlResultStore::new(&path);

    assert_eq!(store.clear().await.unwrap(), 0);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_jsonl_concurrent_appends_are_not_interleaved() {
    let dir = TempDir::new().unwrap();
    let store = std::sync::Arc::new(JsonlResultStore::new(dir.path().join("history.jsonl")));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let r = record(
                    TaskCategory::CodeGeneration,
                    i % 3,
                    MetricScore::new(10.0, 10.0, 10.0, 10.0),
                    30.0,
                );
                store.append(&r).await.unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.list().await.unwrap().len(), 16);
}

// ===== Repository Query Tests =====

#[rstest]
#[case(TaskCategory::Explanation, 2)]
#[case(TaskCategory::Summarization, 1)]
#[case(TaskCategory::CodeGeneration, 0)]
#[tokio::test]
async fn test_list_by_category(#[case] category: TaskCategory, #[case] expected: usize) {
    let store = InMemoryResultStore::new();
    for r in &sample_records() {
        store.append(r).await.unwrap();
    }

    let listed = store.list_by_category(category).await.unwrap();
    assert_eq!(listed.len(), expected);
    assert!(listed.iter().all(|r| r.category == category));
}

#[tokio::test]
async fn test_recent_is_newest_first() {
    let store = InMemoryResultStore::new();
    let mut records = sample_records();
    for (i, r) in records.iter_mut().enumerate() {
        r.timestamp += Duration::minutes(i as i64);
        store.append(r).await.unwrap();
    }

    let recent = store.recent(None, 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, records[2].id);
    assert_eq!(recent[1].id, records[1].id);
}

#[tokio::test]
async fn test_recent_filters_before_limiting() {
    let store = InMemoryResultStore::new();
    let records = sample_records();
    for r in &records {
        store.append(r).await.unwrap();
    }

    let recent = store
        .recent(Some(TaskCategory::Explanation), 1)
        .await
        .unwrap();
    let newest_explanation = records
        .iter()
        .rev()
        .find(|r| r.category == TaskCategory::Explanation)
        .unwrap();

    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, newest_explanation.id);
}

#[tokio::test]
async fn test_memory_clear() {
    let store = InMemoryResultStore::new();
    for r in &sample_records() {
        store.append(r).await.unwrap();
    }

    assert_eq!(store.clear().await.unwrap(), 3);
    assert!(store.list().await.unwrap().is_empty());
}

// ===== Statistics Tests =====

#[tokio::test]
async fn test_statistics_over_history() {
    let store = InMemoryResultStore::new();
    for r in &sample_records() {
        store.append(r).await.unwrap();
    }

    let stats = store.statistics().await.unwrap();

    // improvements: 20.0, 0.0, 20.0
    assert_eq!(stats.total_runs, 3);
    assert_eq!(stats.variant_wins, 2);
    assert_eq!(stats.best_improvement, 20.0);
    assert_eq!(stats.worst_improvement, 0.0);
    assert!((stats.average_improvement - 40.0 / 3.0).abs() < 1e-9);
    assert_eq!(stats.improvement.median, 20.0);
    assert!((stats.variant_win_rate() - 2.0 / 3.0).abs() < 1e-9);

    assert_eq!(stats.category_counts.get(&TaskCategory::Explanation), Some(&2));
    assert_eq!(stats.category_counts.get(&TaskCategory::Summarization), Some(&1));
    assert_eq!(stats.category_counts.get(&TaskCategory::CodeGeneration), None);

    // winner totals: 69.5, 40.0, 80.0
    assert!((stats.average_winner_total - 189.5 / 3.0).abs() < 1e-9);
    assert_eq!(stats.winner_breakdown.count, 3);
    assert_eq!(stats.winner_breakdown.weakest(), Some(MetricKind::Alignment));
}

// ===== Export Tests =====

#[test]
fn test_csv_quotes_prompts_with_commas_and_quotes() {
    let mut r = record(TaskCategory::Explanation, 1, MetricScore::new(25.0, 12.5, 20.0, 12.0), 49.5);
    r.original_prompt = "explain ML, briefly".to_string();
    r.winning_prompt = "Explain \"machine learning\"".to_string();

    let csv = to_csv(&[r]);
    let lines: Vec<_> = csv.lines().collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[1],
        "2024-03-01T12:00:00+00:00,explanation,\"explain ML, briefly\",\"Explain \"\"machine learning\"\"\",49.50,69.50,20.00"
    );
}

#[tokio::test]
async fn test_export_csv_writes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out").join("history.csv");

    let rows = export_csv(&sample_records(), &path).await.unwrap();
    assert_eq!(rows, 3);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("timestamp,category,"));
    assert_eq!(contents.lines().count(), 4);
}
