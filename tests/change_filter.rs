mod common;
use crate::common::{ChangeFilterBuilder, SourceFileBuilder, at, display, init_tracing};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use changed::errors::ChangedError;
use changed::fs::FileSystem;
use changed::fs::mock::MockFileSystem;
use changed::strategy::DecisionFuture;
use changed::{
    ChangeFilter, ChangeStrategy, ChangedOptions, Decision, Filtered, HasChanged, PathResolver,
    ResolvedPath, SourceFile,
};

/// Custom strategy that counts calls and always says "unchanged".
#[derive(Debug, Default)]
struct CountingUnchanged {
    calls: AtomicUsize,
}

impl HasChanged for CountingUnchanged {
    fn has_changed<'a>(
        &'a self,
        _fs: &'a dyn FileSystem,
        _source: &'a SourceFile,
        _target: &'a Path,
    ) -> DecisionFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Decision::Unchanged })
    }
}

/// Custom strategy that records every target it is asked about.
#[derive(Debug, Default)]
struct RecordingTargets {
    targets: Mutex<Vec<PathBuf>>,
}

impl HasChanged for RecordingTargets {
    fn has_changed<'a>(
        &'a self,
        _fs: &'a dyn FileSystem,
        _source: &'a SourceFile,
        target: &'a Path,
    ) -> DecisionFuture<'a> {
        self.targets.lock().unwrap().push(target.to_path_buf());
        Box::pin(async { Decision::Changed })
    }
}

/// Resolver that sends every pattern to one fixed path.
#[derive(Debug)]
struct FixedResolver {
    to: PathBuf,
    patterns: Mutex<Vec<PathBuf>>,
}

impl PathResolver for FixedResolver {
    fn resolve(&self, _fs: &dyn FileSystem, pattern: &Path) -> changed::Result<ResolvedPath> {
        self.patterns.lock().unwrap().push(pattern.to_path_buf());
        Ok(ResolvedPath::Resolved(self.to.clone()))
    }
}

#[test]
fn missing_dest_is_a_configuration_error() {
    let fs: Arc<dyn FileSystem> = Arc::new(MockFileSystem::new());

    match ChangeFilter::with_fs("", ChangedOptions::default(), fs) {
        Err(ChangedError::ConfigError(msg)) => assert!(msg.contains("`dest` required")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn cwd_defaults_to_the_filesystem_current_dir() {
    let fs = MockFileSystem::new().with_cwd("/home/dev/project");
    let filter = ChangeFilterBuilder::new("dist", &fs).cwd(None).build();

    assert_eq!(filter.cwd(), Path::new("/home/dev/project"));
    let file = SourceFileBuilder::new("a.css").build();
    assert_eq!(display(&filter.target_path(&file)), "/home/dev/project/dist/a.css");
}

#[test]
fn target_path_joins_cwd_dest_and_relative_path() {
    let fs = MockFileSystem::new();
    let file = SourceFileBuilder::new("js/app.ts").build();

    let filter = ChangeFilterBuilder::new("dist", &fs).build();
    assert_eq!(display(&filter.target_path(&file)), "/work/dist/js/app.ts");

    let filter = ChangeFilterBuilder::new("dist", &fs).extension(".js").build();
    assert_eq!(display(&filter.target_path(&file)), "/work/dist/js/app.js");

    let filter = ChangeFilterBuilder::new("/out", &fs).extension("map").build();
    assert_eq!(display(&filter.target_path(&file)), "/out/js/app.map");

    let filter = ChangeFilterBuilder::new("../public/./assets", &fs).build();
    assert_eq!(display(&filter.target_path(&file)), "/public/assets/js/app.ts");

    // An empty extension leaves the target alone.
    let filter = ChangeFilterBuilder::new("dist", &fs).extension("").build();
    assert_eq!(display(&filter.target_path(&file)), "/work/dist/js/app.ts");
}

#[test]
fn relative_path_falls_back_to_file_name_outside_base() {
    let file = SourceFile::new("/src", "/elsewhere/lib/x.js", at(0), Some(Vec::new()));
    assert_eq!(file.relative(), PathBuf::from("x.js"));

    let file = SourceFileBuilder::new("lib/x.js").base("/repo/src").build();
    assert_eq!(file.path, PathBuf::from("/repo/src/lib/x.js"));
    assert_eq!(file.relative(), PathBuf::from("lib/x.js"));
}

#[tokio::test]
async fn null_files_pass_through_under_every_strategy() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file_with_mtime("/work/dist/app.js", "same", at(500));

    let strategies = [
        ChangeStrategy::ModificationTime,
        ChangeStrategy::ContentHash,
        ChangeStrategy::custom(CountingUnchanged::default()),
    ];

    for strategy in strategies {
        let filter = ChangeFilterBuilder::new("dist", &fs).strategy(strategy).build();
        let file = SourceFileBuilder::new("app.js").null().modified(at(1)).build();

        let outcome = filter.process(file.clone()).await.unwrap();
        match outcome {
            Filtered::Forward(forwarded) => assert_eq!(forwarded, file),
            other => panic!("Expected Forward, got: {:?}", other),
        }
    }
    assert_eq!(fs.accesses(), 0, "null files must not touch the filesystem");
}

#[tokio::test]
async fn mtime_filter_forwards_newer_and_drops_older() {
    let fs = MockFileSystem::new();
    fs.add_file_with_mtime("/work/dist/app.js", "built", at(100));
    let filter = ChangeFilterBuilder::new("dist", &fs).build();

    let newer = SourceFileBuilder::new("app.js").modified(at(101)).build();
    assert!(filter.process(newer).await.unwrap().is_forwarded());

    let older = SourceFileBuilder::new("app.js").modified(at(99)).build();
    assert!(matches!(filter.process(older).await.unwrap(), Filtered::Dropped));

    let equal = SourceFileBuilder::new("app.js").modified(at(100)).build();
    assert!(matches!(filter.process(equal).await.unwrap(), Filtered::Dropped));

    let fresh = SourceFileBuilder::new("new.js").modified(at(1)).build();
    assert!(filter.process(fresh).await.unwrap().is_forwarded());
}

#[tokio::test]
async fn hash_filter_compares_against_rewritten_extension() {
    let fs = MockFileSystem::new();
    fs.add_file("/work/dist/styles/site.css", "body{}");
    let filter = ChangeFilterBuilder::new("dist", &fs)
        .strategy(ChangeStrategy::ContentHash)
        .extension(".css")
        .build();

    let same = SourceFileBuilder::new("styles/site.scss").contents("body{}").build();
    assert!(matches!(filter.process(same).await.unwrap(), Filtered::Dropped));

    let edited = SourceFileBuilder::new("styles/site.scss").contents("body{margin:0}").build();
    assert!(filter.process(edited).await.unwrap().is_forwarded());
}

#[tokio::test]
async fn unreadable_target_is_forwarded_with_an_error() {
    let fs = MockFileSystem::new();
    fs.add_file("/work/dist/secret.txt", "x");
    fs.fail_with("/work/dist/secret.txt", ErrorKind::PermissionDenied);
    let filter = ChangeFilterBuilder::new("dist", &fs).build();

    let file = SourceFileBuilder::new("secret.txt").build();
    match filter.process(file).await.unwrap() {
        Filtered::ForwardWithError(file, err) => {
            assert_eq!(file.path, PathBuf::from("/src/secret.txt"));
            assert!(err.is_recoverable());
            match err {
                ChangedError::Target { path, source } => {
                    assert_eq!(path, PathBuf::from("/src/secret.txt"));
                    assert_eq!(source.kind(), ErrorKind::PermissionDenied);
                }
                other => panic!("Expected Target error, got: {:?}", other),
            }
        }
        other => panic!("Expected ForwardWithError, got: {:?}", other),
    }
}

#[tokio::test]
async fn versioned_dest_compares_against_highest_version() {
    let fs = MockFileSystem::new();
    fs.add_file_with_mtime("/work/dist/1.0/app.js", "old", at(100));
    fs.add_file_with_mtime("/work/dist/2.0/app.js", "new", at(300));
    let filter = ChangeFilterBuilder::new("dist/[0-9.]+", &fs).build();

    // Newer than 1.0 but older than 2.0: only 2.0 counts.
    let file = SourceFileBuilder::new("app.js").modified(at(200)).build();
    assert!(matches!(filter.process(file).await.unwrap(), Filtered::Dropped));

    let file = SourceFileBuilder::new("app.js").modified(at(301)).build();
    assert!(filter.process(file).await.unwrap().is_forwarded());
}

#[tokio::test]
async fn unmatched_version_forwards_without_consulting_the_strategy() {
    let fs = MockFileSystem::new();
    fs.add_dir("/work/dist");
    let counter = Arc::new(CountingUnchanged::default());
    let filter = ChangeFilterBuilder::new(r"dist/\d+", &fs)
        .strategy(ChangeStrategy::Custom(counter.clone()))
        .build();

    let file = SourceFileBuilder::new("app.js").build();
    assert!(filter.process(file).await.unwrap().is_forwarded());
    assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn custom_strategy_is_consulted_once_per_file() {
    let fs = MockFileSystem::new();
    let counter = Arc::new(CountingUnchanged::default());
    let filter = ChangeFilterBuilder::new("dist", &fs)
        .strategy(ChangeStrategy::Custom(counter.clone()))
        .build();

    let files = ["a.js", "b.js", "c.js"].map(|f| SourceFileBuilder::new(f).build());
    let report = filter.filter_all(files).await.unwrap();

    assert!(report.forwarded.is_empty());
    assert_eq!(report.dropped, 3);
    assert_eq!(counter.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn unlistable_version_parent_is_fatal_for_the_file() {
    let fs = MockFileSystem::new();
    let filter = ChangeFilterBuilder::new("nowhere/[0-9]+", &fs).build();

    let file = SourceFileBuilder::new("app.js").build();
    let err = filter.process(file).await.unwrap_err();
    assert!(matches!(err, ChangedError::ReadDir { .. }), "got {err:?}");
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn filter_all_keeps_order_and_collects_errors() {
    let fs = MockFileSystem::new();
    fs.add_file_with_mtime("/work/dist/b.js", "b", at(100));
    fs.add_file_with_mtime("/work/dist/d.js", "d", at(100));
    fs.fail_with("/work/dist/d.js", ErrorKind::Other);
    let filter = ChangeFilterBuilder::new("dist", &fs).build();

    let files = vec![
        SourceFileBuilder::new("a.js").modified(at(50)).build(),
        SourceFileBuilder::new("b.js").modified(at(50)).build(),
        SourceFileBuilder::new("c.js").null().build(),
        SourceFileBuilder::new("d.js").modified(at(50)).build(),
    ];
    let report = filter.filter_all(files).await.unwrap();

    let names: Vec<String> = report
        .forwarded
        .iter()
        .map(|f| display(&f.relative()))
        .collect();
    assert_eq!(names, vec!["a.js", "c.js", "d.js"]);
    assert_eq!(report.dropped, 1);
    assert_eq!(report.errors.len(), 1);
}

#[tokio::test]
async fn swapped_resolver_decides_which_target_is_compared() {
    let fs = MockFileSystem::new();
    let recorder = Arc::new(RecordingTargets::default());
    let resolver = Arc::new(FixedResolver {
        to: PathBuf::from("/elsewhere/fixed.js"),
        patterns: Mutex::new(Vec::new()),
    });
    let filter = ChangeFilterBuilder::new("dist", &fs)
        .strategy(ChangeStrategy::Custom(recorder.clone()))
        .build()
        .with_resolver(resolver.clone());

    let file = SourceFileBuilder::new("js/app.js").build();
    assert!(filter.process(file).await.unwrap().is_forwarded());

    assert_eq!(
        *resolver.patterns.lock().unwrap(),
        vec![PathBuf::from("/work/dist/js/app.js")]
    );
    assert_eq!(
        *recorder.targets.lock().unwrap(),
        vec![PathBuf::from("/elsewhere/fixed.js")]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn non_utf8_target_is_looked_up_unchanged() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let name = OsStr::from_bytes(b"a\xff.js");
    let fs = MockFileSystem::new();
    fs.add_file_with_mtime(Path::new("/work/dist").join(name), "built", at(100));
    let filter = ChangeFilterBuilder::new("dist", &fs).build();

    let file = SourceFile::new("/src", Path::new("/src").join(name), at(1), Some(b"src".to_vec()));
    assert_eq!(filter.target_path(&file), Path::new("/work/dist").join(name));
    assert!(matches!(filter.process(file).await.unwrap(), Filtered::Dropped));
}
