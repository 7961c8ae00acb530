//! Benchmark workloads for the simtrace decoder.
//!
//! Provides deterministic synthetic runs of the job-shop fixture model:
//!
//! - [`synthetic_records`]: a seeded, self-consistent record sequence
//! - [`synthetic_log`]: the same sequence framed as a binary log
//! - [`sample_reals`]: a spread of magnitudes for number formatting

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use simtrace_log::{Record, SearchStats, SpawnStatus, StopCode, SystemEntryKind};
use simtrace_model::{ModelStructure, Value};
use simtrace_test_utils::*;

/// Machines created before the simulation starts.
const MACHINES: u32 = 4;

/// Build a run of `steps` simulation steps against [`sample_model`].
///
/// Every step emits a handful of records. Search spawns only reference
/// live resources and operations only end after they began, so the whole
/// sequence translates without errors.
pub fn synthetic_records(seed: u64, steps: usize) -> Vec<Record> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(steps * 4 + 16);

    records.push(system(0.0, SystemEntryKind::TraceStart));
    for m in 0..MACHINES {
        records.push(created(0.0, MACHINE, m, machine("cell", 0, 1.0, false, 0)));
    }
    records.push(system(0.0, SystemEntryKind::SimStart));

    let mut parts: Vec<u32> = Vec::new();
    let mut next_part = 0u32;
    let mut running: Vec<(u32, u32, u32)> = Vec::new();
    let mut next_action = 0u32;

    for step in 0..steps {
        let time = step as f64 * 0.25;
        let m = rng.next_u32() % MACHINES;
        match rng.next_u32() % 8 {
            0 | 1 => {
                records.push(created(time, PART, next_part, part(unit(&mut rng) * 10.0)));
                records.push(event(time, ARRIVAL, &[next_part]));
                parts.push(next_part);
                next_part += 1;
            }
            2 if !parts.is_empty() => {
                let p = parts.swap_remove(rng.next_u32() as usize % parts.len());
                records.push(erased(time, PART, p));
            }
            3 if !parts.is_empty() => {
                let p = parts[rng.next_u32() as usize % parts.len()];
                records.push(operation_begin(time, PRODUCTION, 0, next_action, &[m, p]));
                running.push((next_action, m, p));
                next_action += 1;
            }
            4 if !running.is_empty() => {
                let (action, m, p) = running.swap_remove(0);
                records.push(operation_end(time, PRODUCTION, 0, action, &[m, p]));
            }
            5 => {
                let load = (rng.next_u32() % 100) as i32;
                let busy = rng.next_u32() % 2 == 0;
                records.push(altered(time, MACHINE, m, machine("cell", load, 1.5, busy, 1)));
                records.push(rule(time, PRODUCTION, 1, &[m]));
            }
            6 if !parts.is_empty() => search_episode(&mut rng, time, &parts, &mut records),
            _ => records.push(result(time, 1, Value::Real(unit(&mut rng)))),
        }
    }

    let end = steps as f64 * 0.25;
    for (action, m, p) in running {
        records.push(operation_end(end, PRODUCTION, 0, action, &[m, p]));
    }
    records.push(result(end, 0, Value::Integer(next_part as i32)));
    records.push(system(end, SystemEntryKind::NormalTermination));
    records
}

/// [`synthetic_records`] encoded against [`sample_model`].
pub fn synthetic_log(seed: u64, steps: usize) -> (ModelStructure, Vec<u8>) {
    let model = sample_model();
    let log = encode_log(&model, &synthetic_records(seed, steps));
    (model, log)
}

/// `n` reals spanning the plain and scientific renderings.
pub fn sample_reals(seed: u64, n: usize) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let exponent = (rng.next_u32() % 24) as i32 - 12;
            let sign = if rng.next_u32() % 2 == 0 { 1.0 } else { -1.0 };
            sign * unit(&mut rng) * 10f64.powi(exponent)
        })
        .collect()
}

fn unit(rng: &mut ChaCha8Rng) -> f64 {
    (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64
}

fn search_episode(rng: &mut ChaCha8Rng, time: f64, parts: &[u32], records: &mut Vec<Record>) {
    records.push(search_begin(time, PLANNER));
    records.push(open(0, -1, 0.0, 4.0));
    let children = 1 + rng.next_u32() % 4;
    for child in 1..=children as i32 {
        let p = parts[rng.next_u32() as usize % parts.len()];
        let m = rng.next_u32() % MACHINES;
        let status = match rng.next_u32() % 3 {
            0 => SpawnStatus::New,
            1 => SpawnStatus::Worse,
            _ => SpawnStatus::Better,
        };
        records.push(spawn(status, child, 0, 1.0, 3.0, 0, 1.0, &[p, m]));
        records.push(open(child, 0, 1.0, 3.0));
    }
    records.push(decision(1, 0));
    records.push(search_end(
        time,
        StopCode::Success,
        SearchStats {
            elapsed_ms: 1,
            memory: 1024,
            final_cost: 4.0,
            opened: children as i32 + 1,
            nodes: children as i32 + 1,
            added: children as i32,
            spawned: children as i32,
        },
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use simtrace_log::LogReader;

    #[test]
    fn synthetic_runs_are_deterministic() {
        assert_eq!(synthetic_records(7, 200), synthetic_records(7, 200));
        assert_ne!(synthetic_records(7, 200), synthetic_records(8, 200));
    }

    #[test]
    fn synthetic_log_frames_every_record() {
        let records = synthetic_records(3, 100);
        let (_, log) = synthetic_log(3, 100);
        let count = LogReader::open(log.as_slice()).unwrap().entries().count();
        assert_eq!(count, records.len());
    }

    #[test]
    fn synthetic_log_translates_cleanly() {
        use simtrace_legacy::{TraceConfig, TraceSession};

        let (model, log) = synthetic_log(11, 2_000);
        let mut session = TraceSession::new(&model, TraceConfig::default());
        let summary = session
            .translate(LogReader::open(log.as_slice()).unwrap())
            .unwrap();
        assert!(!summary.truncated_tail_dropped);
        assert!(summary.synthetic_lines > 0);
    }

    #[test]
    fn sample_reals_cover_both_renderings() {
        let reals = sample_reals(1, 500);
        assert!(reals.iter().any(|v| v.abs() >= 1e6));
        assert!(reals.iter().any(|v| v.abs() < 1.0));
    }
}
