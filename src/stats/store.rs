use super::{PersistenceError, StatsSnapshot};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;

/// Durable storage for stats snapshots.
///
/// The store is an append-only log: `append` never updates an existing
/// row, and `load_latest` returns only the newest row by recorded
/// timestamp. The concrete store lives outside the gateway core; this
/// trait is the seam consumers plug their storage into.
///
/// # Object Safety
///
/// Object-safe and designed to be used as `Arc<dyn SnapshotStore>`.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Fetch the single newest snapshot, or `None` on first run.
    async fn load_latest(&self) -> Result<Option<StatsSnapshot>, PersistenceError>;

    /// Append a new snapshot row. Never an upsert.
    async fn append(&self, snapshot: &StatsSnapshot) -> Result<(), PersistenceError>;
}

/// In-memory snapshot store for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    rows: Mutex<Vec<StatsSnapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing history (e.g. to simulate a restart).
    pub fn with_history(rows: Vec<StatsSnapshot>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().expect("snapshot store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load_latest(&self) -> Result<Option<StatsSnapshot>, PersistenceError> {
        let rows = self.rows.lock().expect("snapshot store lock poisoned");
        Ok(rows.iter().max_by_key(|s| s.recorded_at).cloned())
    }

    async fn append(&self, snapshot: &StatsSnapshot) -> Result<(), PersistenceError> {
        let mut rows = self.rows.lock().expect("snapshot store lock poisoned");
        rows.push(snapshot.clone());
        Ok(())
    }
}

/// Append-only JSON-lines file store.
///
/// Each snapshot is one JSON object per line. Unparseable lines are
/// skipped on load (with a warning) so one corrupt row never loses the
/// whole history.
#[derive(Debug)]
pub struct JsonlSnapshotStore {
    path: PathBuf,
}

impl JsonlSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for JsonlSnapshotStore {
    async fn load_latest(&self) -> Result<Option<StatsSnapshot>, PersistenceError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut latest: Option<StatsSnapshot> = None;
        for (lineno, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StatsSnapshot>(line) {
                Ok(snapshot) => {
                    if latest
                        .as_ref()
                        .map_or(true, |l| snapshot.recorded_at > l.recorded_at)
                    {
                        latest = Some(snapshot);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = lineno + 1,
                        error = %e,
                        "Skipping unparseable snapshot row"
                    );
                }
            }
        }
        Ok(latest)
    }

    async fn append(&self, snapshot: &StatsSnapshot) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut line = serde_json::to_string(snapshot)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
