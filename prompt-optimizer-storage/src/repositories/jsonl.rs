use async_trait::async_trait;
use prompt_optimizer_core::{OptimizationRecord, Result, ResultSink};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::ResultRepository;

/// Append-only history file with one JSON record per line.
///
/// Lines that fail to parse are skipped on read, so a torn write never
/// hides the rest of the history.
pub struct JsonlResultStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> Result<Vec<OptimizationRecord>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let records = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(number, line)| match serde_json::from_str(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        line = number + 1,
                        error = %e,
                        "Skipping corrupt history line"
                    );
                    None
                }
            })
            .collect();

        Ok(records)
    }
}

#[async_trait]
impl ResultSink for JsonlResultStore {
    async fn append(&self, record: &OptimizationRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(path = %self.path.display(), record_id = %record.id, "Appended run result");
        Ok(())
    }
}

#[async_trait]
impl ResultRepository for JsonlResultStore {
    async fn list(&self) -> Result<Vec<OptimizationRecord>> {
        self.read_records().await
    }

    async fn clear(&self) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let removed = self.read_records().await?.len();

        if fs::try_exists(&self.path).await? {
            fs::write(&self.path, b"").await?;
        }

        debug!(path = %self.path.display(), removed, "Cleared run history");
        Ok(removed)
    }
}
