use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

// Askama compiles templates into the binary and base.html links /assets, so
// both trees have to invalidate the build.
const WATCHED: &[(&str, &[&str])] = &[("templates", &["html"]), ("assets", &["css", "js", "svg"])];

fn main() {
    for (dir, extensions) in WATCHED {
        watch(Path::new(dir), extensions);
    }

    let build_id = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "dev".to_string());
    println!("cargo:rustc-env=ROSTER_BUILD_ID={}", build_id);
}

fn watch(dir: &Path, extensions: &[&str]) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    // Directory mtime catches added and removed files.
    println!("cargo:rerun-if-changed={}", dir.display());
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            watch(&path, extensions);
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.contains(&e))
        {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }
}
