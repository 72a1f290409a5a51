//! Per-file record extraction.
//!
//! Walks one result file's blocks and turns them into typed records in
//! the run's key space:
//! 1. Re-key every record by the allocator's merge offset
//! 2. Attach the owning OS to each test and re-key `log.test`,
//!    `message.log`, `cpu.test`, `dut.test` relations
//! 3. Track a folded status per test (status field, then log text)
//! 4. Write the folded statuses back and report the non-passers
//!
//! Files arrive half-written often enough that none of this is allowed
//! to fail: malformed content ends or skips cleanly, with the details
//! logged.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::extract::fields::{content_hash, scan_blocks};
use crate::logging::structured::LogContext;
use crate::model::keys::KeyAllocator;
use crate::model::record::{value_to_int, Record, RecordKind};
use crate::status::lattice::Status;
use crate::status::vocabulary::{first_token_in, status_from_token};

/// Everything pulled out of one OS result file.
#[derive(Debug)]
pub struct FileExtraction {
    /// Records in file order, re-keyed into the run's key space.
    pub records: Vec<Record>,
    /// Worst status across the file's tracked tests.
    pub status: Status,
    /// Chassis display name the file carried, empty if it had none.
    pub chassis_name: String,
    /// Names of tracked tests that did not pass, for the audit file.
    pub failed_tests: Vec<String>,
}

/// What one scanned block turned out to be.
enum BlockRead {
    Record(RecordKind, Value),
    Skipped,
    Truncated,
}

/// Parse a scanned block and resolve its kind.
fn read_block(block: &str, kept: usize, ctx: &LogContext) -> BlockRead {
    let value: Value = match serde_json::from_str(block) {
        Ok(value) => value,
        Err(e) => {
            // A block that scans but does not parse is a truncation
            // artifact, not a reason to drop what came before it.
            log::warn!(
                "{} TRUNCATED_RESULT error={} block_hash={} kept={}",
                ctx,
                e,
                content_hash(block),
                kept
            );
            return BlockRead::Truncated;
        }
    };

    let label = value.get("model").and_then(Value::as_str).unwrap_or("");
    match RecordKind::from_label(label) {
        Some(kind) => BlockRead::Record(kind, value),
        None => {
            log::warn!("{} UNKNOWN_MODEL label={:?}", ctx, label);
            BlockRead::Skipped
        }
    }
}

/// Shift an integer relation field by the merge offset, returning the
/// re-keyed value. A relation that is missing, non-integer, or too
/// large to shift is left untouched and warned about; the record
/// itself still merges.
fn shift_relation(
    record: &mut Record,
    field: &str,
    offset: i64,
    ctx: &LogContext,
) -> Option<i64> {
    match record
        .int_field(field)
        .and_then(|local| local.checked_add(offset))
    {
        Some(global) => {
            record.set_field(field, global);
            Some(global)
        }
        None => {
            log::warn!(
                "{} MALFORMED_RELATION kind={} pk={} field={}",
                ctx,
                record.kind.as_str(),
                record.key,
                field
            );
            None
        }
    }
}

/// Extract the records of one OS result file.
///
/// `os_key` is the pre-allocated key of the `(OS, chassis)` pair that
/// owns this file; every test record gains an `os` relation to it. The
/// allocator is advanced past the file's key block before returning.
pub fn extract_file(
    content: &str,
    os_key: i64,
    keys: &mut KeyAllocator,
    ctx: &LogContext,
) -> FileExtraction {
    let offset = keys.begin_merge();
    let mut records: Vec<Record> = Vec::new();
    let mut local_highest = 0_i64;
    let mut chassis_name = String::new();
    // Folded status per tracked test, keyed by the test's re-keyed pk.
    let mut test_status: BTreeMap<i64, Status> = BTreeMap::new();

    for block in scan_blocks(content) {
        let (kind, value) = match read_block(block, records.len(), ctx) {
            BlockRead::Record(kind, value) => (kind, value),
            BlockRead::Skipped => continue,
            BlockRead::Truncated => break,
        };

        // Chassis rows in a result file are identity, not data: keep
        // the display name, the accumulator synthesizes the real
        // chassis record with the run-wide key and status.
        if kind == RecordKind::Chassis {
            if chassis_name.is_empty() {
                if let Some(name) = value
                    .get("fields")
                    .and_then(|fields| fields.get("chassisName"))
                    .and_then(Value::as_str)
                {
                    chassis_name = name.to_string();
                }
            }
            continue;
        }

        let local_key = match value.get("pk").and_then(value_to_int) {
            Some(pk) => pk,
            None => {
                log::warn!(
                    "{} TRUNCATED_RESULT reason=missing_pk block_hash={} kept={}",
                    ctx,
                    content_hash(block),
                    records.len()
                );
                break;
            }
        };
        // Re-key before the highest-key bookkeeping: a pk the offset
        // cannot shift must not poison the allocator either.
        let key = match local_key.checked_add(offset) {
            Some(key) => key,
            None => {
                log::warn!(
                    "{} TRUNCATED_RESULT reason=pk_out_of_range block_hash={} kept={}",
                    ctx,
                    content_hash(block),
                    records.len()
                );
                break;
            }
        };
        if local_key > local_highest {
            local_highest = local_key;
        }

        let fields = value
            .get("fields")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let mut record = Record { kind, key, fields };

        match kind {
            RecordKind::Test => {
                record.set_field("os", os_key);

                let initial = match record.str_field("status") {
                    None => Status::Skipped,
                    Some(token) => match status_from_token(token) {
                        Some(status) => status,
                        None => {
                            log::warn!(
                                "{} UNRECOGNIZED_STATUS token={:?} test={}",
                                ctx,
                                token,
                                record.key
                            );
                            Status::Skipped
                        }
                    },
                };
                // First record for a key wins; later duplicates only
                // fold through their logs.
                test_status.entry(record.key).or_insert(initial);
            }
            RecordKind::Log => {
                if let Some(test_key) = shift_relation(&mut record, "test", offset, ctx) {
                    let folded = test_status.entry(test_key).or_insert(Status::Skipped);
                    if let Some(found) = first_token_in(block) {
                        *folded = folded.worse(found);
                    }
                }
            }
            RecordKind::Message => {
                let _ = shift_relation(&mut record, "log", offset, ctx);
            }
            RecordKind::Cpu | RecordKind::Dut => {
                let _ = shift_relation(&mut record, "test", offset, ctx);
            }
            // Anything else rides along re-keyed but untouched.
            _ => {}
        }

        records.push(record);
    }

    // Fold each test's final status back into its record, and note the
    // non-passers for the audit file.
    let mut failed_tests = Vec::new();
    for (&test_key, &status) in &test_status {
        let name = match records
            .iter_mut()
            .find(|r| r.kind == RecordKind::Test && r.key == test_key)
        {
            Some(record) => {
                record.set_field("status", status.as_str());
                record.str_field("testName").unwrap_or_default().to_string()
            }
            // A log referenced a test the file never defined; nothing
            // to write back to.
            None => String::new(),
        };
        if status != Status::Pass {
            failed_tests.push(name);
        }
    }

    let status = test_status
        .values()
        .copied()
        .fold(Status::Skipped, Status::worse);

    keys.commit_merge(local_highest);

    log::debug!(
        "{} EXTRACT_COMPLETE records={} tests={} status={}",
        ctx,
        records.len(),
        test_status.len(),
        status
    );

    FileExtraction {
        records,
        status,
        chassis_name,
        failed_tests,
    }
}

/// Pass-through extraction for hardware-only (logic regression) files.
///
/// Same tolerant block scan, but records ride through otherwise
/// unchanged: chassis records are kept as-is, tests get no OS
/// relation, and nothing contributes status. Re-keying still applies
/// so hardware records share the run's key space safely.
pub fn extract_hardware(content: &str, keys: &mut KeyAllocator, ctx: &LogContext) -> Vec<Record> {
    let offset = keys.begin_merge();
    let mut records: Vec<Record> = Vec::new();
    let mut local_highest = 0_i64;

    for block in scan_blocks(content) {
        let (kind, value) = match read_block(block, records.len(), ctx) {
            BlockRead::Record(kind, value) => (kind, value),
            BlockRead::Skipped => continue,
            BlockRead::Truncated => break,
        };

        let local_key = match value.get("pk").and_then(value_to_int) {
            Some(pk) => pk,
            None => {
                log::warn!(
                    "{} TRUNCATED_RESULT reason=missing_pk block_hash={} kept={}",
                    ctx,
                    content_hash(block),
                    records.len()
                );
                break;
            }
        };
        let key = match local_key.checked_add(offset) {
            Some(key) => key,
            None => {
                log::warn!(
                    "{} TRUNCATED_RESULT reason=pk_out_of_range block_hash={} kept={}",
                    ctx,
                    content_hash(block),
                    records.len()
                );
                break;
            }
        };
        if local_key > local_highest {
            local_highest = local_key;
        }

        let fields = value
            .get("fields")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let mut record = Record { kind, key, fields };

        match kind {
            RecordKind::Log | RecordKind::Cpu | RecordKind::Dut => {
                let _ = shift_relation(&mut record, "test", offset, ctx);
            }
            RecordKind::Message => {
                let _ = shift_relation(&mut record, "log", offset, ctx);
            }
            _ => {}
        }

        records.push(record);
    }

    keys.commit_merge(local_highest);
    records
}
