#![allow(dead_code, unused_imports)]

use std::path::PathBuf;

use changed::fs::mock::MockFileSystem;

pub use changed_test_utils::builders::{ChangeFilterBuilder, SourceFileBuilder};
pub use changed_test_utils::{at, init_tracing, with_timeout};

/// Render a path the way the assertions spell it.
pub fn display(path: &std::path::Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// A mock tree with three version directories under `build/`.
pub fn versioned_build_tree() -> MockFileSystem {
    let fs = MockFileSystem::new();
    for v in ["1.0.0", "1.2.3", "2.0.0"] {
        fs.add_file(PathBuf::from("build").join(v).join("out.js"), format!("v{v}"));
    }
    fs
}
