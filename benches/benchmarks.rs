use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use epiview::{group_by_attributes, group_by_field, Dataset, Measurement, ReportCache, Timestamp, Value};
use std::time::Duration;

const DAY_NS: u64 = 86_400_000_000_000;
const REGIONS: &[&str] = &["Flanders", "Wallonia", "Brussels", "Ostbelgien"];

#[derive(Debug, Clone)]
struct SyntheticRecord {
    timestamp: Timestamp,
    region: &'static str,
    total: Value,
}

impl Measurement for SyntheticRecord {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
    fn group_field_value(&self, field: &str) -> String {
        if field == "region" {
            self.region.to_string()
        } else {
            String::new()
        }
    }
    fn total_value(&self) -> Value {
        self.total
    }
    fn attribute_names(&self) -> Vec<String> {
        vec!["total".to_string(), "positive".to_string()]
    }
    fn attribute_values(&self) -> Vec<Value> {
        vec![self.total, self.total * 0.08]
    }
}

/// Deterministic xorshift stream so runs are comparable.
fn generate_records(count: usize) -> Vec<SyntheticRecord> {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    (0..count)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            SyntheticRecord {
                timestamp: ((i as u64 % 365) + 1) * DAY_NS,
                region: REGIONS[(state % REGIONS.len() as u64) as usize],
                total: (state % 1000) as f64,
            }
        })
        .collect()
}

fn bench_grouping(c: &mut Criterion) {
    let records = generate_records(20_000);

    let mut group = c.benchmark_group("grouping");
    group.bench_function("group_by_field_20k", |b| {
        b.iter(|| group_by_field(black_box(&records), black_box("region")))
    });
    group.bench_function("group_by_attributes_20k", |b| {
        b.iter(|| group_by_attributes(black_box(&records)))
    });
    group.finish();
}

fn bench_postprocessing(c: &mut Criterion) {
    let records = generate_records(20_000);
    let dataset = group_by_field(&records, "region");

    let mut group = c.benchmark_group("postprocessing");
    group.bench_function("accumulate", |b| {
        b.iter_batched(
            || dataset.clone(),
            |mut ds| {
                ds.accumulate();
                ds
            },
            BatchSize::LargeInput,
        )
    });
    group.bench_function("filter_half_range", |b| {
        b.iter_batched(
            || dataset.clone(),
            |mut ds| {
                ds.filter_by_range(0, 182 * DAY_NS);
                ds
            },
            BatchSize::LargeInput,
        )
    });
    group.bench_function("clone_for_publish", |b| b.iter(|| dataset.clone()));
    group.finish();
}

fn bench_cache_hit(c: &mut Criterion) {
    let records = generate_records(20_000);
    let cache = ReportCache::new(Duration::from_secs(3600));
    cache
        .maybe_generate("CasesByRegion", || Ok(group_by_field(&records, "region")))
        .expect("warmup generation");

    c.bench_function("cache_hit_copy_on_publish", |b| {
        b.iter(|| {
            cache
                .maybe_generate("CasesByRegion", || Ok(Dataset::new()))
                .expect("cached")
        })
    });
}

criterion_group!(benches, bench_grouping, bench_postprocessing, bench_cache_hit);
criterion_main!(benches);
