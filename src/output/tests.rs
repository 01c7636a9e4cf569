use super::*;
use crate::clusterer::Cluster;
use crate::corpus::Seed;
use crate::pipeline::{Pipeline, RunOutcome};
use crate::reducer::ProjectedPoint;
use crate::selector::{SeedSelector, SelectionSet};
use crate::trace::{TraceStore, TraceStoreBuilder};
use crate::ReduceConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

fn store_in(dir: &Path, names: &[&str]) -> TraceStore {
    let mut records = HashMap::new();
    let mut seeds = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, name.as_bytes()).unwrap();

        let mut dense = vec!["0"; 4];
        dense[i % 4] = "1";
        dense.push("x");
        records.insert(name.to_string(), dense.join(",").into_bytes());
        seeds.push(Seed::new(*name, path, name.len() as u64));
    }

    let mut builder = TraceStoreBuilder::new(4, records);
    for seed in seeds {
        builder.add_seed(seed).unwrap();
    }
    builder.build()
}

fn select_all(store: &TraceStore) -> SelectionSet {
    let clusters: Vec<Cluster> = (0..store.len() as u32)
        .map(|id| Cluster {
            id,
            members: vec![id],
            center: ProjectedPoint::default(),
        })
        .collect();
    SeedSelector::default().select(&clusters, &mut ChaCha8Rng::seed_from_u64(0))
}

#[test]
fn test_write_copies_and_creates_dir() {
    let corpus = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("min");

    let store = store_in(corpus.path(), &["a", "nested/b"]);
    let written = OutputWriter::new(&dest).write(&store, &select_all(&store)).unwrap();

    assert_eq!(written.len(), 2);
    assert_eq!(fs::read(dest.join("a")).unwrap(), b"a");
    assert_eq!(fs::read(dest.join("nested").join("b")).unwrap(), b"nested/b");
    // Sources untouched
    assert_eq!(fs::read(corpus.path().join("a")).unwrap(), b"a");
}

#[test]
fn test_write_refuses_to_overwrite() {
    let corpus = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::write(out.path().join("b"), b"keep me").unwrap();

    let store = store_in(corpus.path(), &["a", "b"]);
    let err = OutputWriter::new(out.path())
        .write(&store, &select_all(&store))
        .unwrap_err();

    assert!(matches!(err, OutputError::Exists(_)));
    assert_eq!(fs::read(out.path().join("b")).unwrap(), b"keep me");
    assert!(!out.path().join("a").exists());
}

#[test]
fn test_write_rolls_back_on_copy_failure() {
    let corpus = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("min");

    let store = store_in(corpus.path(), &["a", "b"]);
    fs::remove_file(corpus.path().join("b")).unwrap();

    let err = OutputWriter::new(&dest)
        .write(&store, &select_all(&store))
        .unwrap_err();

    assert!(matches!(err, OutputError::Copy { .. }));
    assert!(!dest.exists());
}

#[test]
fn test_rollback_removes_created_subdirectories() {
    let corpus = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::write(out.path().join("keep"), b"old").unwrap();

    let store = store_in(corpus.path(), &["deep/er/a", "z"]);
    fs::remove_file(corpus.path().join("z")).unwrap();

    let err = OutputWriter::new(out.path())
        .write(&store, &select_all(&store))
        .unwrap_err();

    assert!(matches!(err, OutputError::Copy { .. }));
    assert!(!out.path().join("deep").exists());
    assert_eq!(fs::read(out.path().join("keep")).unwrap(), b"old");
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 1);
}

#[test]
fn test_write_unknown_seed() {
    let corpus = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let big = store_in(corpus.path(), &["a", "b", "c"]);
    let small = store_in(corpus.path(), &["a"]);

    let err = OutputWriter::new(out.path())
        .write(&small, &select_all(&big))
        .unwrap_err();
    assert!(matches!(err, OutputError::UnknownSeed(_)));
}

#[test]
fn test_hash_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seed");
    fs::write(&path, b"abc").unwrap();
    assert_eq!(
        hash_file(&path).unwrap(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert!(hash_file(&dir.path().join("missing")).is_err());
}

#[test]
fn test_hash_file_spanning_many_reads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big");
    let contents: Vec<u8> = (0..3_000_000u32).map(|i| (i % 251) as u8).collect();
    fs::write(&path, &contents).unwrap();

    assert_eq!(hash_file(&path).unwrap(), hex::encode(Sha256::digest(&contents)));
}

#[test]
fn test_report_round_trip() {
    let corpus = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let store = store_in(corpus.path(), &["a", "b", "c"]);

    let config = ReduceConfig {
        feature_width: 4,
        seed: Some(1),
        ..Default::default()
    };
    let reduction = match Pipeline::new(config).unwrap().reduce(&store).unwrap() {
        RunOutcome::Reduced(r) => r,
        RunOutcome::EmptyCorpus => panic!("corpus is not empty"),
    };

    let report = RunReport::build(&store, &reduction).unwrap();
    assert_eq!(report.rng_seed, 1);
    assert_eq!(report.stats.seed_count, 3);
    assert_eq!(report.stats.selected_count, report.selected.len());
    assert_eq!(report.clusters.len(), reduction.clusters.len());
    assert!(report.selected.iter().all(|s| s.sha256.len() == 64));

    let path = out.path().join("report.json");
    report.write(&path).unwrap();
    let parsed: RunReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.stats.selected_count, report.stats.selected_count);
    assert_eq!(parsed.generator, report.generator);
}
