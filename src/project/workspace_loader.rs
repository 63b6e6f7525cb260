use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::base::{DocumentUri, FileId};
use crate::hir::ScopeError;
use crate::ide::AnalysisHost;
use crate::syntax::{Parse, parse};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("directory not found: {}", path.display())]
    NotADirectory { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Scope(#[from] ScopeError),
    /// Some files could not be loaded; every other file was.
    #[error("failed to load {} file(s)", failures.len())]
    Partial { failures: Vec<LoadError> },
}

/// Loads workspace files from disk into an [`AnalysisHost`].
pub struct WorkspaceLoader;

impl WorkspaceLoader {
    pub fn new() -> Self {
        Self
    }

    /// Loads every source file below `path` into `host`.
    ///
    /// Files are read and parsed in parallel, then indexed in path order.
    /// Returns the number of files loaded, or [`LoadError::Partial`] listing
    /// the files that failed while the others are kept.
    pub fn load_directory_into_host<P: Into<PathBuf>>(
        &self,
        path: P,
        host: &mut AnalysisHost,
    ) -> Result<usize, LoadError> {
        let path = path.into();
        if !path.is_dir() {
            return Err(LoadError::NotADirectory { path });
        }

        let (paths, mut failures) = collect_file_paths(&path, &host.config().source_extension);

        let parsed: Vec<_> = paths
            .par_iter()
            .map(|file| read_and_parse(file).map(|(text, parse)| (file, text, parse)))
            .collect();

        let mut loaded = 0;
        for result in parsed {
            match result {
                Ok((file, text, parse)) => {
                    host.set_parsed(path_to_uri(file), text, parse)?;
                    loaded += 1;
                }
                Err(e) => {
                    warn!(error = %e, "[LOAD] skipping file");
                    failures.push(e);
                }
            }
        }

        info!(
            dir = %path.display(),
            loaded,
            failed = failures.len(),
            "[LOAD] workspace loaded"
        );
        if failures.is_empty() {
            Ok(loaded)
        } else {
            Err(LoadError::Partial { failures })
        }
    }

    /// Loads a single file into `host`.
    pub fn load_file_into_host<P: Into<PathBuf>>(
        &self,
        path: P,
        host: &mut AnalysisHost,
    ) -> Result<FileId, LoadError> {
        let path = path.into();
        let (text, parse) = read_and_parse(&path)?;
        Ok(host.set_parsed(path_to_uri(&path), text, parse)?)
    }
}

impl Default for WorkspaceLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Source files below `dir`, sorted by path, plus the entries that could not be walked.
fn collect_file_paths(dir: &Path, extension: &str) -> (Vec<PathBuf>, Vec<LoadError>) {
    let mut paths = Vec::new();
    let mut failures = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                let is_source = entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == extension);
                if is_source {
                    paths.push(entry.into_path());
                }
            }
            Err(e) => {
                warn!(error = %e, "[LOAD] cannot walk entry");
                failures.push(LoadError::Walk(e));
            }
        }
    }

    (paths, failures)
}

fn read_and_parse(path: &Path) -> Result<(Arc<str>, Parse), LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    let parsed = parse(&text);
    Ok((Arc::from(text), parsed))
}

/// `file` URI of a path, with `/` separators on every platform.
fn path_to_uri(path: &Path) -> DocumentUri {
    DocumentUri::file(&path.to_string_lossy().replace('\\', "/"))
}
