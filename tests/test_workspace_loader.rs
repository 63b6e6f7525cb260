//! Loading workspaces from disk.

use std::fs;
use std::path::Path;

use tao::base::{AnalysisConfig, DocumentUri};
use tao::ide::AnalysisHost;
use tao::project::{LoadError, WorkspaceLoader};
use tempfile::{Builder, TempDir};

fn write(root: &Path, relative: &str, contents: impl AsRef<[u8]>) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn exported(host: &AnalysisHost, name: &str) -> usize {
    host.index().all_symbols().filter(|s| s.name == name).count()
}

fn uri(root: &Path, relative: &str) -> DocumentUri {
    let path = root.join(relative);
    DocumentUri::file(&path.to_string_lossy().replace('\\', "/"))
}

#[test]
fn test_load_directory_indexes_every_source_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "ui/button.tao", "share view Button {}");
    write(dir.path(), "app.tao", "use ./ui Button\napp Main { ui Shell }\nview Shell { Button }");
    write(dir.path(), "notes.txt", "view NotSource {}");

    let mut host = AnalysisHost::new();
    let loaded = WorkspaceLoader::new()
        .load_directory_into_host(dir.path(), &mut host)
        .unwrap();

    assert_eq!(loaded, 2);
    assert_eq!(host.index().file_count(), 2);
    assert_eq!(exported(&host, "NotSource"), 0);

    let app = host.file_id(&uri(dir.path(), "app.tao")).unwrap();
    assert!(host.analysis().diagnostics(app).unwrap().is_empty());
}

#[test]
fn test_load_directory_respects_configured_extension() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.tao", "view A {}");
    write(dir.path(), "b.ui", "view B {}");

    let mut host = AnalysisHost::with_config(AnalysisConfig::new().with_source_extension("ui"));
    let loaded = WorkspaceLoader::new()
        .load_directory_into_host(dir.path(), &mut host)
        .unwrap();

    assert_eq!(loaded, 1);
    assert_eq!(exported(&host, "B"), 1);
    assert_eq!(exported(&host, "A"), 0);
}

#[test]
fn test_load_missing_directory() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let mut host = AnalysisHost::new();
    let err = WorkspaceLoader::new()
        .load_directory_into_host(&missing, &mut host)
        .unwrap_err();

    assert!(matches!(err, LoadError::NotADirectory { ref path } if *path == missing));
}

#[test]
fn test_unreadable_file_does_not_stop_the_load() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "good.tao", "view Good {}");
    write(dir.path(), "bad.tao", [0xff, 0xfe, 0x00]);

    let mut host = AnalysisHost::new();
    let err = WorkspaceLoader::new()
        .load_directory_into_host(dir.path(), &mut host)
        .unwrap_err();

    let LoadError::Partial { failures } = err else {
        panic!("expected a partial load, got {err:?}");
    };
    assert_eq!(failures.len(), 1);
    assert!(matches!(&failures[0], LoadError::Io { path, .. } if path.ends_with("bad.tao")));
    assert_eq!(exported(&host, "Good"), 1);
}

#[test]
fn test_load_single_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "one.tao", "view One { Two }");

    let mut host = AnalysisHost::new();
    let file = WorkspaceLoader::new()
        .load_file_into_host(dir.path().join("one.tao"), &mut host)
        .unwrap();

    assert_eq!(host.file_id(&uri(dir.path(), "one.tao")), Some(file));
    let diags = host.analysis().diagnostics(file).unwrap();
    assert_eq!(diags.len(), 1);
    assert_eq!(&*diags[0].message, "Could not resolve reference to ViewDeclaration named 'Two'.");
}

#[test]
fn test_load_single_file_missing() {
    let dir = TempDir::new().unwrap();
    let mut host = AnalysisHost::new();
    let err = WorkspaceLoader::new()
        .load_file_into_host(dir.path().join("absent.tao"), &mut host)
        .unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(host.index().is_empty());
}

#[test]
fn test_relative_directory_resolves_exact_file_modules() {
    let dir = Builder::new().prefix("tao-ws-").tempdir_in(".").unwrap();
    let cwd = std::env::current_dir().unwrap();
    let relative = Path::new(".").join(dir.path().strip_prefix(&cwd).unwrap_or(dir.path()));
    write(&relative, "ui/views.tao", "share view PublicView {}");
    write(&relative, "app.tao", "use ./ui/views PublicView\nview Main { PublicView }");

    let mut host = AnalysisHost::new();
    let loaded = WorkspaceLoader::new()
        .load_directory_into_host(&relative, &mut host)
        .unwrap();
    assert_eq!(loaded, 2);

    let app = host.file_id(&uri(&relative, "app.tao")).unwrap();
    assert!(!host.analysis().source(app).unwrap().uri().path().starts_with("./"));
    assert!(host.analysis().diagnostics(app).unwrap().is_empty());
}
