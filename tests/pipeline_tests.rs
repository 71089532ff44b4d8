//! End-to-end ingest runs over real temp directories and an in-memory catalog.

use anyhow::anyhow;
use cratedigger::catalog::{Catalog, SqliteCatalog};
use cratedigger::{CatalogItem, IngestOpts, ingest_dir};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn write_tree(root: &Path, files: &[&str]) {
    for f in files {
        let p = root.join(f);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(&p, b"not really audio").unwrap();
    }
}

fn path_str(root: &Path, rel: &str) -> String {
    root.join(rel).to_string_lossy().into_owned()
}

// --- fresh ingest ---

#[test]
fn test_fresh_scan_inserts_every_mp3_once() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), &["a.mp3", "b.mp3", "sub/c.mp3", "readme.txt"]);
    let catalog = Arc::new(SqliteCatalog::open_in_memory().unwrap());

    let summary = ingest_dir(dir.path(), Arc::clone(&catalog), &IngestOpts::default()).unwrap();
    assert_eq!(summary.inserted, 3);
    assert_eq!(summary.skipped, 0);

    let items = catalog.all_items().unwrap();
    let paths: HashSet<String> = items.iter().map(|(p, _)| p.clone()).collect();
    let ordinals: HashSet<u32> = items.iter().map(|(_, o)| *o).collect();
    assert_eq!(
        paths,
        HashSet::from([
            path_str(dir.path(), "a.mp3"),
            path_str(dir.path(), "b.mp3"),
            path_str(dir.path(), "sub/c.mp3"),
        ])
    );
    // Empty catalog seeds at 0, so the first track gets ordinal 1.
    assert_eq!(ordinals, HashSet::from([1, 2, 3]));
}

#[test]
fn test_empty_directory_is_a_successful_noop() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Arc::new(SqliteCatalog::open_in_memory().unwrap());

    let summary = ingest_dir(dir.path(), Arc::clone(&catalog), &IngestOpts::default()).unwrap();
    assert_eq!(summary.inserted, 0);
    assert_eq!(summary.skipped, 0);
    assert!(catalog.all_items().unwrap().is_empty());
}

#[test]
fn test_filter_is_case_sensitive() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), &["loud.MP3", "notes.txt", "quiet.mp3"]);
    let catalog = Arc::new(SqliteCatalog::open_in_memory().unwrap());

    let summary = ingest_dir(dir.path(), Arc::clone(&catalog), &IngestOpts::default()).unwrap();
    assert_eq!(summary.inserted, 1);

    let items = catalog.all_items().unwrap();
    assert_eq!(items, vec![(path_str(dir.path(), "quiet.mp3"), 1)]);
}

// --- dedup across runs ---

#[test]
fn test_rescan_inserts_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), &["a.mp3", "b.mp3", "sub/c.mp3"]);
    let catalog = Arc::new(SqliteCatalog::open_in_memory().unwrap());

    let first = ingest_dir(dir.path(), Arc::clone(&catalog), &IngestOpts::default()).unwrap();
    assert_eq!(first.inserted, 3);

    let second = ingest_dir(dir.path(), Arc::clone(&catalog), &IngestOpts::default()).unwrap();
    assert_eq!(second.inserted, 0);
    assert_eq!(second.skipped, 3);
    assert_eq!(catalog.all_items().unwrap().len(), 3);
}

#[test]
fn test_known_track_skipped_and_ordinals_continue_past_max() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), &["a.mp3", "b.mp3", "sub/c.mp3", "readme.txt"]);
    let catalog = Arc::new(SqliteCatalog::open_in_memory().unwrap());
    catalog
        .insert(&CatalogItem {
            id: "preexisting-id-00".to_string(),
            path: path_str(dir.path(), "a.mp3"),
            ordinal: 5,
            plays: 0,
        })
        .unwrap();

    let summary = ingest_dir(dir.path(), Arc::clone(&catalog), &IngestOpts::default()).unwrap();
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.skipped, 1);

    let items = catalog.all_items().unwrap();
    assert_eq!(items.len(), 3);
    // a.mp3 keeps its row and ordinal; no ordinal was consumed for the skip.
    assert!(items.contains(&(path_str(dir.path(), "a.mp3"), 5)));
    let new_ordinals: HashSet<u32> = items
        .iter()
        .filter(|(p, _)| *p != path_str(dir.path(), "a.mp3"))
        .map(|(_, o)| *o)
        .collect();
    assert_eq!(new_ordinals, HashSet::from([6, 7]));
}

// --- failure propagation ---

/// Catalog double whose inserts always fail; lookups behave as empty.
struct FailingInsertCatalog;

impl Catalog for FailingInsertCatalog {
    fn count_by_path(&self, _path: &Path) -> cratedigger::Result<u64> {
        Ok(0)
    }
    fn insert(&self, _item: &CatalogItem) -> cratedigger::Result<()> {
        Err(anyhow!("disk full"))
    }
    fn max_ordinal(&self) -> cratedigger::Result<Option<u32>> {
        Ok(None)
    }
}

#[test]
fn test_insert_failure_aborts_run_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let files: Vec<String> = (0..50).map(|i| format!("track{:02}.mp3", i)).collect();
    let refs: Vec<&str> = files.iter().map(String::as_str).collect();
    write_tree(dir.path(), &refs);

    let err = ingest_dir(dir.path(), Arc::new(FailingInsertCatalog), &IngestOpts::default())
        .unwrap_err();
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn test_missing_root_is_a_walk_error() {
    let dir = tempfile::tempdir().unwrap();
    let gone = dir.path().join("no_such_dir");
    let catalog = Arc::new(SqliteCatalog::open_in_memory().unwrap());

    let result = ingest_dir(&gone, Arc::clone(&catalog), &IngestOpts::default());
    assert!(result.is_err());
    assert!(catalog.all_items().unwrap().is_empty());
}

// --- permissive lookups ---

/// Existence checks fail, everything else delegates. The pipeline must treat
/// the failed check as "not found" and still insert.
struct FlakyLookupCatalog {
    inner: SqliteCatalog,
}

impl Catalog for FlakyLookupCatalog {
    fn count_by_path(&self, _path: &Path) -> cratedigger::Result<u64> {
        Err(anyhow!("catalog unreachable"))
    }
    fn insert(&self, item: &CatalogItem) -> cratedigger::Result<()> {
        self.inner.insert(item)
    }
    fn max_ordinal(&self) -> cratedigger::Result<Option<u32>> {
        self.inner.max_ordinal()
    }
}

#[test]
fn test_failed_existence_check_treated_as_new() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), &["a.mp3"]);
    let catalog = Arc::new(FlakyLookupCatalog {
        inner: SqliteCatalog::open_in_memory().unwrap(),
    });

    let summary = ingest_dir(dir.path(), Arc::clone(&catalog), &IngestOpts::default()).unwrap();
    assert_eq!(summary.inserted, 1);
    assert_eq!(catalog.inner.all_items().unwrap().len(), 1);
}

/// Max-ordinal lookups fail, everything else delegates. Seeding must fall
/// back to 0 and the run must still succeed.
struct BrokenSeedCatalog {
    inner: SqliteCatalog,
}

impl Catalog for BrokenSeedCatalog {
    fn count_by_path(&self, path: &Path) -> cratedigger::Result<u64> {
        self.inner.count_by_path(path)
    }
    fn insert(&self, item: &CatalogItem) -> cratedigger::Result<()> {
        self.inner.insert(item)
    }
    fn max_ordinal(&self) -> cratedigger::Result<Option<u32>> {
        Err(anyhow!("catalog unreachable"))
    }
}

#[test]
fn test_failed_seed_lookup_falls_back_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), &["a.mp3"]);
    let catalog = Arc::new(BrokenSeedCatalog {
        inner: SqliteCatalog::open_in_memory().unwrap(),
    });

    let summary = ingest_dir(dir.path(), Arc::clone(&catalog), &IngestOpts::default()).unwrap();
    assert_eq!(summary.inserted, 1);
    assert_eq!(catalog.inner.all_items().unwrap(), vec![(
        path_str(dir.path(), "a.mp3"),
        1
    )]);
}

// --- options ---

fn fixed_width_id(len: usize) -> String {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    format!("{:0len$}", NEXT.fetch_add(1, Ordering::Relaxed), len = len)
}

#[test]
fn test_injected_id_generator_is_used() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), &["a.mp3", "b.mp3"]);
    let catalog = Arc::new(SqliteCatalog::open_in_memory().unwrap());

    let opts = IngestOpts {
        id_gen: Some(fixed_width_id),
        ..Default::default()
    };
    let summary = ingest_dir(dir.path(), Arc::clone(&catalog), &opts).unwrap();
    assert_eq!(summary.inserted, 2);
}

#[test]
fn test_single_digester_still_covers_the_tree() {
    let dir = tempfile::tempdir().unwrap();
    write_tree(dir.path(), &["a.mp3", "b.mp3", "sub/c.mp3"]);
    let catalog = Arc::new(SqliteCatalog::open_in_memory().unwrap());

    let opts = IngestOpts {
        num_digesters: 1,
        ..Default::default()
    };
    let summary = ingest_dir(dir.path(), Arc::clone(&catalog), &opts).unwrap();
    assert_eq!(summary.inserted, 3);

    let ordinals: HashSet<u32> = catalog
        .all_items()
        .unwrap()
        .iter()
        .map(|(_, o)| *o)
        .collect();
    assert_eq!(ordinals, HashSet::from([1, 2, 3]));
}
