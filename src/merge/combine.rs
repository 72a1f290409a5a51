//! Cross-file result accumulation.
//!
//! Coordinates the full merge workflow:
//! 1. Hardware (logic regression) results pass through re-keyed
//! 2. Discovery per OS target, chassis identity from filenames
//! 3. Key pre-allocation: date first, then each chassis and its OSes
//! 4. Per-file extraction, folding statuses file -> OS -> chassis -> run
//! 5. Synthesis of `os`, `chassis`, and `date` records
//! 6. Archive write
//!
//! A chassis that shows up under several OSes is one chassis; the
//! per-OS view lives in the `os` records hanging off it.

use std::fs;
use std::path::PathBuf;

use crate::archive::audit::AuditSink;
use crate::archive::writer::{mark_archived, write_archive};
use crate::error::MergeError;
use crate::extract::fields::normalize_content;
use crate::extract::records::{extract_file, extract_hardware, FileExtraction};
use crate::merge::context::{RunConfig, RunContext};
use crate::merge::discovery::{discover_results, ResultFile};
use crate::model::keys::KeyAllocator;
use crate::model::record::{Record, RecordKind};
use crate::status::lattice::Status;

/// Outcome of one merge run.
#[derive(Debug)]
pub struct MergeOutcome {
    /// Where the archive landed; `None` when the run had nothing to
    /// merge and was skipped.
    pub archive_path: Option<PathBuf>,
    /// Result files whose records went into the archive.
    pub files_merged: usize,
    /// Records in the archive.
    pub records: usize,
    /// Worst status across the whole run.
    pub status: Status,
}

/// Bookkeeping for one observed (OS, chassis) pair.
#[derive(Debug)]
struct OsSlot {
    /// Index into the run's targets.
    target: usize,
    /// Index into the chassis slots.
    chassis: usize,
    key: i64,
    status: Status,
}

/// Bookkeeping for one observed chassis.
#[derive(Debug)]
struct ChassisSlot {
    token: String,
    key: i64,
    status: Status,
    name: String,
}

/// Merge every result file of the run into one archival record set.
pub fn combine_results(config: &RunConfig) -> Result<MergeOutcome, MergeError> {
    let ctx = RunContext::new();
    let log_ctx = ctx.log_context();

    let hardware_dir = config
        .hardware_results_dir
        .as_deref()
        .filter(|dir| dir.exists());

    // A run with no OS targets and no hardware results has nothing to
    // say; skip the archive entirely.
    if config.targets.is_empty() && hardware_dir.is_none() {
        log::debug!("{} MERGE_SKIPPED reason=nothing_ran", log_ctx);
        return Ok(MergeOutcome {
            archive_path: None,
            files_merged: 0,
            records: 0,
            status: Status::Skipped,
        });
    }

    log::info!(
        "{} MERGE_START targets={} hardware={}",
        log_ctx,
        config.targets.len(),
        hardware_dir.is_some()
    );

    let mut keys = KeyAllocator::new();
    let mut records: Vec<Record> = Vec::new();
    let mut files_merged = 0usize;
    let mut run_status = Status::Skipped;
    let audit = AuditSink::new(&config.audit_path);

    // The date record owns key 1 every run.
    let date_key = keys.allocate();

    // [1] HARDWARE PASS-THROUGH
    if let Some(dir) = hardware_dir {
        let mut paths: Vec<PathBuf> = match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
                .map(|entry| entry.path())
                .collect(),
            Err(e) => {
                log::warn!(
                    "{} HARDWARE_DIR_UNREADABLE dir={} error={}",
                    log_ctx,
                    dir.display(),
                    e
                );
                Vec::new()
            }
        };
        paths.sort();

        for path in paths {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let file_ctx = ctx.file_context(&file_name);

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    log::warn!(
                        "{} UNREADABLE_RESULT path={} error={}",
                        file_ctx,
                        path.display(),
                        e
                    );
                    continue;
                }
            };

            let extracted = extract_hardware(&normalize_content(&content), &mut keys, &file_ctx);
            log::info!("{} HARDWARE_FILE_MERGED records={}", file_ctx, extracted.len());
            records.extend(extracted);
            files_merged += 1;
        }
    }

    // [2] DISCOVERY
    let mut per_os_files: Vec<Vec<ResultFile>> = Vec::new();
    for target in &config.targets {
        let files = discover_results(&target.results_dir, &log_ctx);
        log::info!(
            "{} OS_SCAN os={} dir={} files={}",
            log_ctx,
            target.short_name,
            target.results_dir.display(),
            files.len()
        );
        per_os_files.push(files);
    }

    let unarchived = per_os_files
        .iter()
        .flatten()
        .filter(|file| !file.archived)
        .count();
    if !config.targets.is_empty() && unarchived == 0 {
        log::debug!("{} NO_RESULT_FILES", log_ctx);
    }

    // [3] IDENTITY + KEY PRE-ALLOCATION
    // Chassis union in first-seen order. Every file counts, archived
    // ones included: a chassis merged by an earlier partial run still
    // belongs in this run's record set.
    let mut chassis_slots: Vec<ChassisSlot> = Vec::new();
    for file in per_os_files.iter().flatten() {
        if !chassis_slots.iter().any(|slot| slot.token == file.chassis) {
            chassis_slots.push(ChassisSlot {
                token: file.chassis.clone(),
                key: 0,
                status: Status::Skipped,
                name: String::new(),
            });
        }
    }

    // Legacy parity: the old merge also computed the intersection of
    // the per-OS chassis sets. Nothing consumes it; it is logged so
    // operators can spot a chassis missing from one OS.
    if !config.targets.is_empty() {
        let shared: Vec<&str> = chassis_slots
            .iter()
            .filter(|slot| {
                per_os_files
                    .iter()
                    .all(|files| files.iter().any(|file| file.chassis == slot.token))
            })
            .map(|slot| slot.token.as_str())
            .collect();
        log::debug!("{} CHASSIS_INTERSECTION shared={:?}", log_ctx, shared);
    }

    let mut os_slots: Vec<OsSlot> = Vec::new();
    for (chassis_idx, chassis) in chassis_slots.iter_mut().enumerate() {
        chassis.key = keys.allocate();
        for (target_idx, files) in per_os_files.iter().enumerate() {
            let observed = files.iter().any(|file| file.chassis == chassis.token);
            if observed {
                os_slots.push(OsSlot {
                    target: target_idx,
                    chassis: chassis_idx,
                    key: keys.allocate(),
                    status: Status::Skipped,
                });
            }
        }
    }

    // [4] PER-FILE MERGE
    for (target_idx, target) in config.targets.iter().enumerate() {
        for file in &per_os_files[target_idx] {
            if file.archived {
                log::debug!("{} SKIP_ARCHIVED file={}", log_ctx, file.file_name);
                continue;
            }
            let file_ctx = ctx.file_context(&file.file_name);

            let content = match fs::read_to_string(&file.path) {
                Ok(content) => content,
                Err(e) => {
                    log::warn!(
                        "{} UNREADABLE_RESULT path={} error={}",
                        file_ctx,
                        file.path.display(),
                        e
                    );
                    continue;
                }
            };

            let os_idx = os_slots.iter().position(|slot| {
                slot.target == target_idx && chassis_slots[slot.chassis].token == file.chassis
            });
            let os_idx = match os_idx {
                Some(idx) => idx,
                None => {
                    // Pre-allocation covered every discovered file, so
                    // this cannot happen; tolerate it anyway.
                    log::warn!("{} OS_SLOT_MISSING chassis={}", file_ctx, file.chassis);
                    continue;
                }
            };

            let FileExtraction {
                records: file_records,
                status,
                chassis_name,
                failed_tests,
            } = extract_file(
                &normalize_content(&content),
                os_slots[os_idx].key,
                &mut keys,
                &file_ctx,
            );

            for test_name in &failed_tests {
                audit.append(&target.name, test_name, &file_ctx);
            }

            os_slots[os_idx].status = os_slots[os_idx].status.worse(status);
            let chassis = &mut chassis_slots[os_slots[os_idx].chassis];
            chassis.status = chassis.status.worse(os_slots[os_idx].status);
            run_status = run_status.worse(chassis.status);
            if chassis.name.is_empty() && !chassis_name.is_empty() {
                chassis.name = chassis_name;
            }

            log::info!(
                "{} FILE_MERGED os={} chassis={} records={} status={}",
                file_ctx,
                target.name,
                chassis.token,
                file_records.len(),
                status
            );

            records.extend(file_records);
            files_merged += 1;

            mark_archived(&file.path, &file_ctx);
        }
    }

    // [5] SYNTHESIS
    // Synthesized records close the archive: os, then chassis, then
    // the date record, which always sits last with key 1.
    for slot in &os_slots {
        let mut record = Record::new(RecordKind::Os, slot.key);
        record.set_field("chassis", chassis_slots[slot.chassis].key);
        record.set_field(
            "operatingSystem",
            config.targets[slot.target].name.as_str(),
        );
        record.set_field("status", slot.status.as_str());
        records.push(record);
    }

    for chassis in &chassis_slots {
        let mut record = Record::new(RecordKind::Chassis, chassis.key);
        record.set_field("chassisName", chassis.name.as_str());
        record.set_field(
            "ipNum",
            format!("192.168.{}", chassis.token.replace('_', ".")),
        );
        record.set_field("status", chassis.status.as_str());
        records.push(record);
    }

    // The run tags ride in the date record's status field; the website
    // has always shown them there.
    let mut date = Record::new(RecordKind::Date, date_key);
    date.set_field("date", ctx.stamp());
    date.set_field("status", config.tags.as_str());
    records.push(date);

    // [6] ARCHIVE
    let archive_path = write_archive(&config.archive_dir, &ctx.archive_stem(), &records, &log_ctx)?;

    log::info!(
        "{} MERGE_COMPLETE files={} records={} status={} archive={}",
        log_ctx,
        files_merged,
        records.len(),
        run_status,
        archive_path.display()
    );

    Ok(MergeOutcome {
        archive_path: Some(archive_path),
        files_merged,
        records: records.len(),
        status: run_status,
    })
}
