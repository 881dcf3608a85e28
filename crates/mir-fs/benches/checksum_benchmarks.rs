use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mir_fs::{Algorithm, compute_file_checksum_with, list_relative_files};
use std::fs;
use tempfile::tempdir;

fn checksum_benchmark(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("audio.wav");
    fs::write(&path, vec![0x5au8; 8 * 1024 * 1024]).unwrap();

    c.bench_function("checksum::md5 (8 MiB)", |b| {
        b.iter(|| compute_file_checksum_with(black_box(&path), Algorithm::Md5).unwrap())
    });

    c.bench_function("checksum::sha256 (8 MiB)", |b| {
        b.iter(|| compute_file_checksum_with(black_box(&path), Algorithm::Sha256).unwrap())
    });
}

fn walk_benchmark(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    for track in 0..200 {
        let track_dir = dir.path().join(format!("track_{track:03}"));
        fs::create_dir_all(&track_dir).unwrap();
        fs::write(track_dir.join("audio.wav"), b"wav").unwrap();
        fs::write(track_dir.join("beats.txt"), b"0.5").unwrap();
    }

    c.bench_function("walk::list_relative_files (400 files)", |b| {
        b.iter(|| list_relative_files(black_box(dir.path())).unwrap())
    });
}

criterion_group!(benches, checksum_benchmark, walk_benchmark);
criterion_main!(benches);
