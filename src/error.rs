use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the file collaborator around the pipeline. The pipeline
/// itself never fails.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("\"{}\" not found! {}", path.display(), cwd.display())]
    NotFound { path: PathBuf, cwd: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}
