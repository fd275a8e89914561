//! Benchmarks for the scanner and preparser.
//!
//! Run with: `cargo bench --package calla-parser`

use std::sync::Arc;

use calla_parser::diagnostics::DiagnosticReporter;
use calla_parser::preparser::{PreparseOptions, Preparser};
use calla_parser::scanner::Scanner;
use calla_source::types::SourceManager;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

const SIMPLE_FUNCTION: &str = r"
fun add(a I32, b I32) I32 =
    return a + b;
end
";

const CONTROL_FLOW: &str = r"
fun classify(x I32) I32 =
    if x > 0 do
        return 1;
    elif x < 0 do
        return -1;
    else
        return 0;
    end
end
";

const MIXED_DECLARATIONS: &str = r#"
import "std.io" as io;

val limit I32 := 1_000;

macro twice(x) = { x + x };

type Point record =
    pub x Float64 := 0.0;
    pub y Float64 := 0.0;
end

object Shape trait =
    fun area Float64;
end

fun main =
    mut total I32 := 0;

    for 0..limit :> i do
        total := total + twice!(i);
    end

    return total;
end
"#;

const NUMERIC_HEAVY: &str = r"
val a I32 := 0xdead_beefU32;
val b I32 := 0o777;
val c I32 := 0b1010_1010;
val d Float64 := 1.5e-2;
val e I32 := 42I32;
val f Float32 := 3.25F32;
";

fn sources() -> Vec<(&'static str, String)> {
    vec![
        ("simple_function", SIMPLE_FUNCTION.to_string()),
        ("control_flow", CONTROL_FLOW.to_string()),
        ("mixed_declarations", MIXED_DECLARATIONS.to_string()),
        ("numeric_heavy", NUMERIC_HEAVY.to_string()),
        // Scaling input: many copies of the same declaration block
        ("large_file", MIXED_DECLARATIONS.repeat(64)),
    ]
}

fn bench_scanner(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");

    for (name, source) in sources() {
        let _ = group.throughput(Throughput::Bytes(source.len() as u64));

        let _ = group.bench_with_input(BenchmarkId::from_parameter(name), &source, |b, source| {
            let mut manager = SourceManager::new();
            let file_id = manager.add_file("bench.cl".to_string(), source.clone());
            let manager = Arc::new(manager);

            b.iter(|| {
                let file = manager.get_file(file_id).expect("file was just added");
                let mut reporter = DiagnosticReporter::new(manager.clone());
                let tokens = Scanner::new(file_id, file, &mut reporter).run(false);

                black_box(tokens)
            });
        });
    }

    group.finish();
}

fn bench_preparser(c: &mut Criterion) {
    let mut group = c.benchmark_group("preparser");

    for (name, source) in sources() {
        let _ = group.bench_with_input(BenchmarkId::from_parameter(name), &source, |b, source| {
            let mut manager = SourceManager::new();
            let file_id = manager.add_file("bench.cl".to_string(), source.clone());
            let manager = Arc::new(manager);
            let file = manager.get_file(file_id).expect("file was just added");

            let mut reporter = DiagnosticReporter::new(manager.clone());
            let tokens = Scanner::new(file_id, file, &mut reporter).run(false);

            b.iter(|| {
                let mut reporter = DiagnosticReporter::new(manager.clone());
                let info =
                    Preparser::new(file_id, &tokens, PreparseOptions::default(), &mut reporter)
                        .run();

                black_box(info)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scanner, bench_preparser);
criterion_main!(benches);
