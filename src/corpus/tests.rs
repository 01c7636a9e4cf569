use super::*;
use std::fs;

fn names(scan: &SeedScan) -> Vec<&str> {
    scan.seeds.iter().map(|s| s.name.as_str()).collect()
}

#[test]
fn test_collect_seeds_sorted_and_skips_hidden() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b"), b"bb").unwrap();
    fs::write(dir.path().join("a"), b"a").unwrap();
    fs::write(dir.path().join(".cur_input"), b"x").unwrap();
    fs::create_dir(dir.path().join(".state")).unwrap();
    fs::write(dir.path().join(".state").join("c"), b"c").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("c"), b"ccc").unwrap();

    let scan = collect_seeds(dir.path()).unwrap();
    assert_eq!(names(&scan), vec!["a", "b", "nested/c"]);
    assert!(scan.unnamed.is_empty());
    assert_eq!(scan.seeds[0].size, 1);
    assert_eq!(scan.seeds[2].size, 3);
    assert_eq!(scan.seeds[1].path, dir.path().join("b"));
}

#[test]
fn test_collect_seeds_keeps_afl_style_names() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("id:000001,orig:a.png"), b"x").unwrap();

    let scan = collect_seeds(dir.path()).unwrap();
    assert_eq!(names(&scan), vec!["id:000001,orig:a.png"]);
}

#[cfg(unix)]
#[test]
fn test_non_utf8_name_is_reported_not_fatal() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("good"), b"g").unwrap();
    let bad = dir.path().join(OsStr::from_bytes(b"bad\xff"));
    fs::write(&bad, b"b").unwrap();

    let scan = collect_seeds(dir.path()).unwrap();
    assert_eq!(names(&scan), vec!["good"]);
    assert_eq!(scan.unnamed, vec![bad]);
}

#[test]
fn test_collect_seeds_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let result = collect_seeds(&dir.path().join("nope"));
    assert!(matches!(result, Err(CorpusError::MissingDirectory(_))));
}

#[test]
fn test_collect_seeds_empty_dir() {
    let dir = tempfile::tempdir().unwrap();
    let scan = collect_seeds(dir.path()).unwrap();
    assert!(scan.seeds.is_empty());
    assert!(scan.unnamed.is_empty());
}
