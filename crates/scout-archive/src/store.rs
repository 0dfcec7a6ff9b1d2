//! # Carrier Store
//!
//! One SVG file per record under `<data_dir>/saved-matches`. Archiving moves
//! a file into `saved-matches/archive`; its content is never rewritten.
//!
//! ```text
//! <data_dir>/
//!   saved-matches/
//!     254-12-1700000000.svg
//!     archive/
//!       118-3-1699990000.svg
//! ```
//!
//! Every filesystem step is bounded by the store's timeout. Listing reads
//! carrier bodies concurrently; batch operations run one independent task
//! per item and report partial failure instead of aborting.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinSet;

use crate::error::ArchiveError;
use crate::name::CARRIER_EXTENSION;

/// Directory holding saved carriers, relative to the data dir.
pub const SAVED_DIR: &str = "saved-matches";
/// Directory holding archived carriers, relative to the saved dir.
pub const ARCHIVE_DIR: &str = "archive";
/// Default bound on each filesystem step.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

/// A carrier read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredCarrier {
    /// File name, e.g. `254-12-1700000000.svg`.
    pub file_name: String,
    /// Full SVG document.
    pub body: String,
    /// Whether the file lives in the archive location.
    pub archived: bool,
}

/// A failed item in a batch operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub name: String,
    pub error: String,
}

/// Outcome of a batch operation, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    /// Whether every item succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Carrier storage rooted at a data directory.
#[derive(Debug, Clone)]
pub struct CarrierStore {
    saved: PathBuf,
    timeout: Duration,
}

impl CarrierStore {
    /// A store under `data_dir` with the given per-step timeout.
    pub fn new(data_dir: impl AsRef<Path>, timeout: Duration) -> Self {
        Self {
            saved: data_dir.as_ref().join(SAVED_DIR),
            timeout,
        }
    }

    /// The saved-carrier directory.
    pub fn saved_dir(&self) -> &Path {
        &self.saved
    }

    /// The archived-carrier directory.
    pub fn archive_dir(&self) -> PathBuf {
        self.saved.join(ARCHIVE_DIR)
    }

    fn location(&self, archived: bool) -> PathBuf {
        if archived {
            self.archive_dir()
        } else {
            self.saved.clone()
        }
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        path: &Path,
        fut: impl Future<Output = std::io::Result<T>>,
    ) -> Result<T, ArchiveError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(ArchiveError::Io {
                op,
                path: path.to_path_buf(),
                source,
            }),
            Err(_) => Err(ArchiveError::Timeout {
                op,
                path: path.to_path_buf(),
                after: self.timeout,
            }),
        }
    }

    // ─── Single-item operations ──────────────────────────────────────

    /// Write a carrier to the saved location, creating directories.
    ///
    /// Returns the written path. An existing file of the same name is
    /// replaced.
    pub async fn save(&self, name: &str, body: &str) -> Result<PathBuf, ArchiveError> {
        let name = normalize_name(name)?;
        self.bounded("create directory", &self.saved, tokio::fs::create_dir_all(&self.saved))
            .await?;
        let path = self.saved.join(&name);
        self.bounded("write", &path, tokio::fs::write(&path, body))
            .await?;
        tracing::info!(file = %name, bytes = body.len(), "carrier saved");
        Ok(path)
    }

    /// Write a carrier to the saved location only if no file of that name
    /// exists there.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if the name is taken; the existing file is untouched.
    pub async fn save_new(&self, name: &str, body: &str) -> Result<PathBuf, ArchiveError> {
        let name = normalize_name(name)?;
        self.bounded("create directory", &self.saved, tokio::fs::create_dir_all(&self.saved))
            .await?;
        let path = self.saved.join(&name);
        let write = async {
            let mut file = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await?;
            file.write_all(body.as_bytes()).await?;
            file.flush().await
        };
        match self.bounded("write", &path, write).await {
            Ok(()) => {
                tracing::info!(file = %name, bytes = body.len(), "carrier saved");
                Ok(path)
            }
            Err(ArchiveError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::AlreadyExists =>
            {
                Err(ArchiveError::AlreadyExists(name))
            }
            Err(e) => Err(e),
        }
    }

    /// Read one carrier, looking in the saved location first.
    pub async fn read(&self, name: &str) -> Result<StoredCarrier, ArchiveError> {
        let name = normalize_name(name)?;
        for archived in [false, true] {
            let path = self.location(archived).join(&name);
            match self
                .bounded("read", &path, tokio::fs::read_to_string(&path))
                .await
            {
                Ok(body) => {
                    return Ok(StoredCarrier {
                        file_name: name,
                        body,
                        archived,
                    })
                }
                Err(ArchiveError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Err(ArchiveError::NotFound(name))
    }

    /// Move a saved carrier into the archive.
    ///
    /// Fails with `AlreadyExists` if the archive already holds a carrier of
    /// the same name; neither file is touched.
    pub async fn archive(&self, name: &str) -> Result<(), ArchiveError> {
        self.relocate(name, false).await
    }

    /// Move an archived carrier back to the saved location.
    pub async fn unarchive(&self, name: &str) -> Result<(), ArchiveError> {
        self.relocate(name, true).await
    }

    async fn relocate(&self, name: &str, from_archive: bool) -> Result<(), ArchiveError> {
        let name = normalize_name(name)?;
        let from_dir = self.location(from_archive);
        let to_dir = self.location(!from_archive);
        self.bounded("create directory", &to_dir, tokio::fs::create_dir_all(&to_dir))
            .await?;
        let from = from_dir.join(&name);
        let to = to_dir.join(&name);
        if !self.bounded("stat", &from, tokio::fs::try_exists(&from)).await? {
            return Err(ArchiveError::NotFound(name));
        }
        // rename replaces an existing destination.
        if self.bounded("stat", &to, tokio::fs::try_exists(&to)).await? {
            tracing::warn!(file = %name, archived = !from_archive, "destination occupied");
            return Err(ArchiveError::AlreadyExists(name));
        }
        match self.bounded("rename", &from, tokio::fs::rename(&from, &to)).await {
            Ok(()) => {
                tracing::info!(file = %name, archived = !from_archive, "carrier moved");
                Ok(())
            }
            Err(ArchiveError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Err(ArchiveError::NotFound(name))
            }
            Err(e) => Err(e),
        }
    }

    /// Delete a carrier from whichever location holds it.
    pub async fn delete(&self, name: &str) -> Result<(), ArchiveError> {
        let name = normalize_name(name)?;
        for archived in [false, true] {
            let path = self.location(archived).join(&name);
            match self
                .bounded("remove", &path, tokio::fs::remove_file(&path))
                .await
            {
                Ok(()) => {
                    tracing::info!(file = %name, archived, "carrier deleted");
                    return Ok(());
                }
                Err(ArchiveError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Err(ArchiveError::NotFound(name))
    }

    // ─── Listing ─────────────────────────────────────────────────────

    /// List carriers in both locations, sorted by `(archived, file_name)`.
    ///
    /// A missing directory lists as empty. Individual files that cannot be
    /// read are skipped with a warning.
    pub async fn list(&self) -> Result<Vec<StoredCarrier>, ArchiveError> {
        let mut carriers = self.list_in(false).await?;
        carriers.extend(self.list_in(true).await?);
        carriers.sort_by(|a, b| (a.archived, &a.file_name).cmp(&(b.archived, &b.file_name)));
        Ok(carriers)
    }

    /// List carriers in one location, sorted by file name.
    pub async fn list_in(&self, archived: bool) -> Result<Vec<StoredCarrier>, ArchiveError> {
        let dir = self.location(archived);
        let names = self.carrier_names(&dir).await?;

        let mut tasks = JoinSet::new();
        for name in names {
            let store = self.clone();
            let path = dir.join(&name);
            tasks.spawn(async move {
                let body = store
                    .bounded("read", &path, tokio::fs::read_to_string(&path))
                    .await;
                (name, body)
            });
        }

        let mut carriers = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((file_name, Ok(body))) => carriers.push(StoredCarrier {
                    file_name,
                    body,
                    archived,
                }),
                Ok((file_name, Err(e))) => {
                    tracing::warn!(file = %file_name, error = %e, "carrier skipped");
                }
                Err(e) => return Err(ArchiveError::Task(e.to_string())),
            }
        }
        carriers.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        tracing::debug!(dir = %dir.display(), count = carriers.len(), "carriers listed");
        Ok(carriers)
    }

    async fn carrier_names(&self, dir: &Path) -> Result<Vec<String>, ArchiveError> {
        let mut entries = match self.bounded("list", dir, tokio::fs::read_dir(dir)).await {
            Ok(entries) => entries,
            Err(ArchiveError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                return Ok(Vec::new())
            }
            Err(e) => return Err(e),
        };
        let mut names = Vec::new();
        while let Some(entry) = self.bounded("list", dir, entries.next_entry()).await? {
            let is_file = self
                .bounded("stat", &entry.path(), entry.file_type())
                .await?
                .is_file();
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if is_file && name.ends_with(CARRIER_EXTENSION) {
                names.push(name);
            }
        }
        Ok(names)
    }

    // ─── Batch operations ────────────────────────────────────────────

    /// Archive each named carrier independently.
    pub async fn archive_many(&self, names: &[String]) -> Result<BatchReport, ArchiveError> {
        self.batch("archive", names, BatchOp::Archive).await
    }

    /// Unarchive each named carrier independently.
    pub async fn unarchive_many(&self, names: &[String]) -> Result<BatchReport, ArchiveError> {
        self.batch("unarchive", names, BatchOp::Unarchive).await
    }

    /// Delete each named carrier independently.
    pub async fn delete_many(&self, names: &[String]) -> Result<BatchReport, ArchiveError> {
        self.batch("delete", names, BatchOp::Delete).await
    }

    async fn batch(
        &self,
        label: &'static str,
        names: &[String],
        op: BatchOp,
    ) -> Result<BatchReport, ArchiveError> {
        let mut tasks = JoinSet::new();
        for (index, name) in names.iter().cloned().enumerate() {
            let store = self.clone();
            tasks.spawn(async move {
                let result = match op {
                    BatchOp::Archive => store.archive(&name).await,
                    BatchOp::Unarchive => store.unarchive(&name).await,
                    BatchOp::Delete => store.delete(&name).await,
                };
                (index, name, result)
            });
        }

        let mut outcomes = Vec::with_capacity(names.len());
        while let Some(joined) = tasks.join_next().await {
            outcomes.push(joined.map_err(|e| ArchiveError::Task(e.to_string()))?);
        }
        outcomes.sort_by_key(|(index, _, _)| *index);

        let mut report = BatchReport::default();
        for (_, name, result) in outcomes {
            match result {
                Ok(()) => report.succeeded.push(name),
                Err(e) => {
                    tracing::warn!(op = label, file = %name, error = %e, "batch item failed");
                    report.failed.push(BatchFailure {
                        name,
                        error: e.to_string(),
                    });
                }
            }
        }
        tracing::info!(
            op = label,
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "batch finished"
        );
        Ok(report)
    }
}

#[derive(Debug, Clone, Copy)]
enum BatchOp {
    Archive,
    Unarchive,
    Delete,
}

/// Reduce user input to a plain carrier file name.
///
/// Appends `.svg` when absent and rejects anything that could escape the
/// store directory.
pub fn normalize_name(name: &str) -> Result<String, ArchiveError> {
    let name = name.trim();
    if name.is_empty()
        || name == CARRIER_EXTENSION
        || name.contains(['/', '\\'])
        || name.starts_with('.')
    {
        return Err(ArchiveError::InvalidName(name.to_string()));
    }
    if name.ends_with(CARRIER_EXTENSION) {
        Ok(name.to_string())
    } else {
        Ok(format!("{name}{CARRIER_EXTENSION}"))
    }
}
