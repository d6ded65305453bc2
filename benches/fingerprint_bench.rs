//! Benchmarks the Fingerprinter's manifest hashing (§4.1) over synthetic
//! Blu-ray and DVD directory trees of varying title counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use discident::infrastructure::fingerprint::Fingerprinter;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_bluray_tree(title_count: usize) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    let bdmv = dir.path().join("BDMV");
    fs::create_dir_all(bdmv.join("PLAYLIST")).unwrap();
    fs::create_dir_all(bdmv.join("CLIPINF")).unwrap();
    fs::write(bdmv.join("index.bdmv"), b"INDEX0200").unwrap();
    fs::write(bdmv.join("MovieObject.bdmv"), b"MOBJ0200").unwrap();

    for i in 0..title_count {
        fs::write(bdmv.join("PLAYLIST").join(format!("{i:05}.mpls")), vec![0u8; 4096]).unwrap();
        fs::write(bdmv.join("CLIPINF").join(format!("{i:05}.clpi")), vec![0u8; 2048]).unwrap();
    }

    dir
}

fn write_dvd_tree(title_count: usize) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    let video_ts = dir.path().join("VIDEO_TS");
    fs::create_dir_all(&video_ts).unwrap();
    fs::write(video_ts.join("VIDEO_TS.IFO"), vec![0u8; 2048]).unwrap();

    for i in 1..=title_count {
        fs::write(video_ts.join(format!("VTS_{i:02}_0.IFO")), vec![0u8; 2048]).unwrap();
    }

    dir
}

fn bench_bluray_manifest(c: &mut Criterion) {
    let fingerprinter = Fingerprinter::new(64 * 1024);
    let mut group = c.benchmark_group("fingerprint_bluray");

    for title_count in [1usize, 10, 50] {
        let dir = write_bluray_tree(title_count);
        group.bench_with_input(BenchmarkId::from_parameter(title_count), &dir, |b, dir| {
            b.iter(|| {
                let fp = fingerprinter
                    .compute_from_base(black_box(dir.path()), "Blu-ray")
                    .expect("compute fingerprint");
                black_box(fp)
            });
        });
    }

    group.finish();
}

fn bench_dvd_manifest(c: &mut Criterion) {
    let fingerprinter = Fingerprinter::new(64 * 1024);
    let mut group = c.benchmark_group("fingerprint_dvd");

    for title_count in [1usize, 10, 30] {
        let dir = write_dvd_tree(title_count);
        group.bench_with_input(BenchmarkId::from_parameter(title_count), &dir, |b, dir| {
            b.iter(|| {
                let fp = fingerprinter
                    .compute_from_base(black_box(dir.path()), "DVD")
                    .expect("compute fingerprint");
                black_box(fp)
            });
        });
    }

    group.finish();
}

fn bench_fallback_manifest(c: &mut Criterion) {
    let fingerprinter = Fingerprinter::new(64 * 1024);
    let mut group = c.benchmark_group("fingerprint_fallback");

    let dir = TempDir::new().expect("create temp dir");
    for i in 0..20 {
        fs::write(Path::new(dir.path()).join(format!("file_{i:03}.bin")), vec![0u8; 8192]).unwrap();
    }

    group.bench_function("unrecognized_tree", |b| {
        b.iter(|| {
            let fp = fingerprinter
                .compute_from_base(black_box(dir.path()), "")
                .expect("compute fingerprint");
            black_box(fp)
        });
    });

    group.finish();
}

criterion_group!(fingerprint_bench, bench_bluray_manifest, bench_dvd_manifest, bench_fallback_manifest);
criterion_main!(fingerprint_bench);
