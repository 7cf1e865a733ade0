use criterion::*;
use std::time::Duration;
use superpixel_repair::arrays::LabelMap;
use superpixel_repair::common::Config;
use superpixel_repair::connectivity::{find_components, relabel_connected};
use superpixel_repair::geometry::region_size;
use superpixel_repair::merge::{enforce_minimum_size, enforce_minimum_size_up_to};
use superpixel_repair::pipeline::post_process;
use superpixel_repair::relabel::canonicalize;

/// Grid of square superpixels with jagged borders and scattered stray pixels, roughly what a
/// clustering segmentation leaves behind before connectivity is enforced.
fn synthetic_labels(width: usize, height: usize, superpixels: u32) -> LabelMap {
    let step = region_size(width, height, superpixels).unwrap() as usize;
    let blocks_x = width.div_ceil(step);
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    let mut labels = LabelMap::from_fill(0, width, height);
    for y in 0..height {
        for x in 0..width {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let jitter_x = (state % 5) as usize;
            let jitter_y = ((state >> 8) % 5) as usize;
            let bx = ((x + jitter_x).saturating_sub(2) / step).min(blocks_x - 1);
            let by = (y + jitter_y).saturating_sub(2) / step;
            let mut label = (by * blocks_x + bx) as u32;
            if (state >> 16) % 97 == 0 {
                label = ((state >> 24) % superpixels as u64) as u32;
            }
            labels[(x, y)] = label * 3 + 1;
        }
    }
    labels
}

const SIZES: [(&str, usize, usize); 3] = [("SD", 960, 540), ("HD", 1280, 720), ("FHD", 1920, 1080)];

fn bench_find_components(c: &mut Criterion) {
    sas::init();
    let mut group = c.benchmark_group("connectivity");
    for (name, width, height) in SIZES {
        let labels = synthetic_labels(width, height, 2000);
        group.bench_with_input(BenchmarkId::new("find_components", name), &labels, |b, labels| {
            b.iter(|| black_box(find_components(labels)));
        });
    }
}

fn bench_enforce_minimum_size(c: &mut Criterion) {
    sas::init();
    let mut group = c.benchmark_group("merge");
    for (name, width, height) in SIZES {
        let mut labels = synthetic_labels(width, height, 2000);
        let bound = relabel_connected(&mut labels);
        let config = Config::default();
        group.bench_with_input(
            BenchmarkId::new("enforce_minimum_size_up_to", name),
            &labels,
            |b, labels| {
                b.iter_batched(
                    || labels.clone(),
                    |mut labels| black_box(enforce_minimum_size_up_to(&mut labels, bound, &config)),
                    BatchSize::LargeInput,
                );
            },
        );
        group.bench_with_input(
            BenchmarkId::new("enforce_minimum_size", name),
            &labels,
            |b, labels| {
                b.iter_batched(
                    || labels.clone(),
                    |mut labels| black_box(enforce_minimum_size(&mut labels, 64)),
                    BatchSize::LargeInput,
                );
            },
        );
    }
}

fn bench_canonicalize(c: &mut Criterion) {
    sas::init();
    let mut group = c.benchmark_group("relabel");
    for (name, width, height) in SIZES {
        let labels = synthetic_labels(width, height, 2000);
        group.bench_with_input(BenchmarkId::new("canonicalize", name), &labels, |b, labels| {
            b.iter_batched(
                || labels.clone(),
                |mut labels| black_box(canonicalize(&mut labels)),
                BatchSize::LargeInput,
            );
        });
    }
}

fn bench_post_process(c: &mut Criterion) {
    sas::init();
    let mut group = c.benchmark_group("pipeline");
    let configs = [
        ("connectivity_only", Config::connectivity_only()),
        ("merge_fragments_1", Config::merge_fragments(1)),
        ("merge_fragments_2", Config::merge_fragments(2)),
    ];
    for (name, width, height) in SIZES {
        let labels = synthetic_labels(width, height, 2000);
        for (config_name, config) in configs.iter() {
            group.bench_with_input(
                BenchmarkId::new("post_process", format!("{name}-{config_name}")),
                &labels,
                |b, labels| {
                    b.iter_batched(
                        || labels.clone(),
                        |mut labels| black_box(post_process(&mut labels, config)),
                        BatchSize::LargeInput,
                    );
                },
            );
        }
    }
}

criterion_group!(name = benches;
config = Criterion::default().measurement_time(Duration::from_secs(30)).warm_up_time(Duration::from_secs(10));
targets = bench_find_components);
criterion_group!(name = benches1;
config = Criterion::default().measurement_time(Duration::from_secs(30)).warm_up_time(Duration::from_secs(10));
targets = bench_enforce_minimum_size);
criterion_group!(name = benches2;
config = Criterion::default().measurement_time(Duration::from_secs(30)).warm_up_time(Duration::from_secs(10));
targets = bench_canonicalize);
criterion_group!(name = benches3;
config = Criterion::default().measurement_time(Duration::from_secs(30)).warm_up_time(Duration::from_secs(10));
targets = bench_post_process);
criterion_main!(benches, benches1, benches2, benches3);
