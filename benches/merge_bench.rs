//! Criterion benchmarks for the merge pipeline.
//!
//! Benchmarks:
//! - Status token scan over free-form log text
//! - Single-file extraction at varying test counts
//! - End-to-end combine over a synthetic result tree

use std::fs;
use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::json;

use regdb_core::extract::records::extract_file;
use regdb_core::logging::structured::LogContext;
use regdb_core::merge::combine::combine_results;
use regdb_core::merge::context::{OsTarget, RunConfig};
use regdb_core::model::keys::KeyAllocator;
use regdb_core::status::vocabulary::first_token_in;

fn criterion_config() -> Criterion {
    Criterion::default().configure_from_args()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build one result file with a chassis row and `tests` test/log/message
/// triples. Every seventh test fails.
fn synth_result(tests: usize) -> String {
    let mut blocks = vec![
        json!({
            "model": "rsinterface.chassis",
            "pk": 1,
            "fields": {"chassisName": "Crate 9", "ipNum": "192.168.101.5"}
        })
        .to_string(),
    ];

    let mut pk = 2_i64;
    for i in 0..tests {
        let status = if i % 7 == 0 { "Failed" } else { "Pass" };
        blocks.push(
            json!({
                "model": "rsinterface.test",
                "pk": pk,
                "fields": {"testName": format!("case_{i}"), "status": status}
            })
            .to_string(),
        );
        let test_pk = pk;
        pk += 1;

        blocks.push(
            json!({
                "model": "rsinterface.log",
                "pk": pk,
                "fields": {"test": test_pk, "logText": "channel sweep complete"}
            })
            .to_string(),
        );
        let log_pk = pk;
        pk += 1;

        blocks.push(
            json!({
                "model": "rsinterface.message",
                "pk": pk,
                "fields": {"log": log_pk, "messageText": "channel 0 ok"}
            })
            .to_string(),
        );
        pk += 1;
    }

    format!("[{} ]", blocks.join(",\n"))
}

// ---------------------------------------------------------------------------
// Status scan
// ---------------------------------------------------------------------------

/// Benchmark: vocabulary scan over a realistic log line mix.
fn bench_token_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("status/first_token_in");

    let text = "relay sweep ok, channel 3 ok, retrying channel 4\n"
        .repeat(40)
        + "Voltage check Failed at pin 3, device went Off during recovery\n";
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("mixed_log_text", |b| {
        b.iter(|| black_box(first_token_in(black_box(&text))));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Single-file extraction
// ---------------------------------------------------------------------------

/// Benchmark: extract one result file at varying test counts.
fn bench_extract_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract/extract_file");
    group.sample_size(50);

    for &n_tests in &[10_usize, 100, 1000] {
        let content = synth_result(n_tests);
        let ctx = LogContext::new("bench");
        group.throughput(Throughput::Elements(n_tests as u64));

        group.bench_with_input(
            BenchmarkId::new("tests", n_tests),
            &content,
            |b, content| {
                b.iter_batched(
                    KeyAllocator::new,
                    |mut keys| {
                        let os_key = keys.allocate();
                        black_box(extract_file(content, os_key, &mut keys, &ctx));
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// End-to-end combine
// ---------------------------------------------------------------------------

/// Benchmark: full combine over a two-OS result tree.
///
/// Each iteration gets a fresh tree: combining stamps the source files,
/// so a reused tree would skip everything on the second pass.
fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge/combine_results");
    group.sample_size(20);

    for &n_files in &[4_usize, 16] {
        group.throughput(Throughput::Elements(n_files as u64));

        group.bench_with_input(BenchmarkId::new("files", n_files), &n_files, |b, &count| {
            b.iter_batched(
                || {
                    let root = tempfile::tempdir().unwrap();
                    let archive_dir = root.path().join("archive");
                    fs::create_dir_all(&archive_dir).unwrap();

                    let mut targets = Vec::new();
                    for os in ["centos7", "win10"] {
                        let dir = root.path().join(os);
                        fs::create_dir_all(&dir).unwrap();
                        for i in 0..count / 2 {
                            fs::write(
                                dir.join(format!("{os}_test_101_{i}_result.json")),
                                synth_result(25),
                            )
                            .unwrap();
                        }
                        targets.push(OsTarget {
                            name: os.to_string(),
                            short_name: os.to_string(),
                            results_dir: dir,
                        });
                    }

                    let mut config = RunConfig::new(targets, archive_dir, "bench");
                    config.audit_path = root.path().join("errorFile.csv");
                    (root, config)
                },
                |(_root, config)| {
                    black_box(combine_results(&config).unwrap());
                },
                BatchSize::PerIteration,
            );
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Criterion groups
// ---------------------------------------------------------------------------

criterion_group!(
    name = status;
    config = criterion_config();
    targets = bench_token_scan
);

criterion_group!(
    name = extraction;
    config = criterion_config();
    targets = bench_extract_file
);

criterion_group!(
    name = merge;
    config = criterion_config();
    targets = bench_combine
);

criterion_main!(status, extraction, merge);
