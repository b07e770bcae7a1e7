// Dweve XVAL - Cross-Machine Benchmark Validation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Ranking pass benchmarks.
//!
//! Run with `cargo bench --package xval-core --bench ranking`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xval_core::{build_report, parse_records, rank_store, Config, MeasurementStore};

const CURVES: &[&str] = &["p224", "p256", "p384", "p521", "curve25519", "secp256k1_dettman"];

/// Generates an x-val result document with `solutions` variants per machine.
fn generate_document(config: &Config, solutions: usize) -> String {
    let machines = config.machine_order();
    let mut doc = serde_json::Map::new();

    for curve in CURVES {
        for method in ["mul", "square"] {
            let mut records = Vec::new();
            for (i, opt_on) in machines.iter().enumerate() {
                for s in 0..solutions {
                    for (j, ran_on) in machines.iter().enumerate() {
                        let median = 100 + ((i * 31 + j * 17 + s * 7) % 50);
                        records.push(serde_json::json!({
                            "filename": format!("seed{}.asm", s),
                            "opton": opt_on,
                            "median": median,
                            "runon": ran_on,
                        }));
                    }
                }
            }
            for compiler in ["gcc", "clang"] {
                for (j, ran_on) in machines.iter().enumerate() {
                    records.push(serde_json::json!({
                        "filename": "0NA",
                        "opton": compiler,
                        "median": 140 + j,
                        "runon": ran_on,
                    }));
                }
            }
            doc.insert(format!("fiat_{}_carry_{}", curve, method), records.into());
        }
    }
    serde_json::Value::Object(doc).to_string()
}

fn load(config: &Config, content: &str) -> MeasurementStore {
    let parsed = parse_records(content, std::path::Path::new("bench.json"), config)
        .expect("generated document parses");
    MeasurementStore::from_records(parsed.measurements).0
}

fn bench_rank_store(c: &mut Criterion) {
    let config = Config::default();
    let mut group = c.benchmark_group("rank_store");

    for solutions in [1usize, 10, 50] {
        let store = load(&config, &generate_document(&config, solutions));
        let count: usize = store.groups().map(|g| g.measurement_count()).sum();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(solutions), &store, |b, store| {
            b.iter(|| {
                let rankings = rank_store(black_box(store), &config).expect("captions exist");
                black_box(rankings)
            });
        });
    }
    group.finish();
}

fn bench_full_report(c: &mut Criterion) {
    let config = Config::default();
    let content = generate_document(&config, 10);
    let mut group = c.benchmark_group("full_report");
    group.throughput(Throughput::Bytes(content.len() as u64));

    group.bench_function("parse_and_report", |b| {
        b.iter(|| {
            let store = load(&config, black_box(&content));
            black_box(build_report(&store, &config).expect("captions exist"))
        });
    });
    group.finish();
}

criterion_group!(benches, bench_rank_store, bench_full_report);
criterion_main!(benches);
