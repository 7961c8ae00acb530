//! Writing a full run through the container and reading it back.

use simtrace_log::{
    EntryCategory, LogError, LogReader, ParseContext, Record, SearchRecord, SearchStats,
    SpawnStatus, StopCode, SystemEntryKind,
};
use simtrace_model::{ModelStructure, Value};
use simtrace_test_utils::*;

// ── Helpers ─────────────────────────────────────────────────────

fn run() -> Vec<Record> {
    vec![
        system(0.0, SystemEntryKind::TraceStart),
        created(0.0, MACHINE, 0, machine("lathe", 3, 1.25, false, 1)),
        created(0.0, PART, 0, part(7.5)),
        system(0.0, SystemEntryKind::SimStart),
        event(0.5, ARRIVAL, &[0]),
        operation_begin(1.0, PRODUCTION, 0, 42, &[0, 0]),
        altered(1.0, MACHINE, 0, machine("lathe", 4, 1.25, true, 2)),
        search_begin(2.0, PLANNER),
        open(0, -1, 0.0, 3.0),
        spawn(SpawnStatus::New, 1, 0, 1.0, 2.0, 0, 1.0, &[0, 0]),
        decision(1, 0),
        search_end(
            2.0,
            StopCode::Success,
            SearchStats {
                elapsed_ms: 12,
                memory: 4096,
                final_cost: 3.0,
                opened: 2,
                nodes: 2,
                added: 1,
                spawned: 1,
            },
        ),
        operation_end(3.0, PRODUCTION, 0, 42, &[0, 0]),
        rule(3.5, PRODUCTION, 1, &[0]),
        erased(4.0, PART, 0),
        result(5.0, 0, Value::Integer(17)),
        result(5.0, 3, Value::String("all parts shipped".into())),
        system(5.0, SystemEntryKind::NormalTermination),
    ]
}

/// Parse every entry, tracking the search episode the way a decoder would.
fn parse_all(model: &ModelStructure, log: &[u8]) -> Result<Vec<Record>, LogError> {
    let mut reader = LogReader::open(log)?;
    let mut active = None;
    let mut records = Vec::new();
    while let Some(entry) = reader.next_entry()? {
        let mut ctx = ParseContext::new(model);
        if let Some(dpt) = active {
            ctx = ctx.with_active_search(dpt);
        }
        let record = Record::parse(&entry, &ctx)?;
        match &record {
            Record::Search(SearchRecord::Begin { decision_point, .. }) => {
                active = Some(*decision_point)
            }
            Record::Search(SearchRecord::End { .. }) => active = None,
            _ => {}
        }
        records.push(record);
    }
    Ok(records)
}

// ── Tests ───────────────────────────────────────────────────────

#[test]
fn full_run_reads_back_unchanged() {
    let model = sample_model();
    let records = run();
    let log = encode_log(&model, &records);
    assert_eq!(parse_all(&model, &log).unwrap(), records);
}

#[test]
fn categories_follow_log_order() {
    let model = sample_model();
    let log = encode_log(&model, &run());
    let categories: Vec<_> = LogReader::open(log.as_slice())
        .unwrap()
        .entries()
        .map(|e| e.unwrap().category().unwrap())
        .collect();
    assert_eq!(categories.len(), run().len());
    assert_eq!(categories[0], EntryCategory::System);
    assert_eq!(categories[1], EntryCategory::Resource);
    assert_eq!(categories[4], EntryCategory::Pattern);
    assert_eq!(categories[7], EntryCategory::Search);
    assert_eq!(categories[15], EntryCategory::Result);
}

#[test]
fn cut_log_reports_truncation_after_complete_entries() {
    let model = sample_model();
    let records = run();
    let full = encode_log(&model, &records);
    let prefix = encode_log(&model, &records[..5]);

    // Cut inside the sixth entry.
    let cut = &full[..prefix.len() + 6];
    let mut reader = LogReader::open(cut).unwrap();
    for _ in 0..5 {
        assert!(reader.next_entry().unwrap().is_some());
    }
    assert!(matches!(
        reader.next_entry(),
        Err(LogError::TruncatedEntry { .. })
    ));
    assert_eq!(reader.entries_read(), 5);
}

#[test]
fn cut_at_entry_boundary_is_clean_end() {
    let model = sample_model();
    let records = run();
    let prefix = encode_log(&model, &records[..8]);
    let parsed = parse_all(&model, &prefix).unwrap();
    assert_eq!(parsed, records[..8].to_vec());
}

#[test]
fn spawn_after_search_end_is_rejected() {
    let model = sample_model();
    let log = encode_log(
        &model,
        &[
            search_begin(1.0, PLANNER),
            search_end(1.0, StopCode::Fail, SearchStats::default()),
            spawn(SpawnStatus::Worse, 2, 1, 0.0, 0.0, 0, 0.0, &[0, 0]),
        ],
    );
    assert!(matches!(
        parse_all(&model, &log),
        Err(LogError::SpawnOutsideSearch)
    ));
}

#[test]
fn string_parameters_survive_non_ascii() {
    let model = sample_model();
    let records = vec![created(0.0, MACHINE, 3, machine("Fräse №2", -1, 0.0, true, 0))];
    let log = encode_log(&model, &records);
    assert_eq!(parse_all(&model, &log).unwrap(), records);
}
