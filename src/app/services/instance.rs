//! Single-instance hand-off.
//!
//! The first Shard process becomes the primary: it keeps a heartbeat file
//! fresh and polls a queue file. Later launches see a fresh heartbeat,
//! append their request to the queue and exit; the primary opens the files
//! in new windows of its own event loop.

use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::app::infrastructure::error::{AppError, Result};

/// How often the primary checks the queue.
pub const POLL_INTERVAL: f64 = 0.1;
/// Minimum spacing between heartbeat writes.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);
/// A heartbeat older than this belongs to a primary that is gone.
pub const STALE_AFTER: Duration = Duration::from_secs(3);

const LOCK_FILE: &str = "primary.lock";
const QUEUE_FILE: &str = "queue.jsonl";

/// One forwarded launch. No paths means "open an empty window".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffRequest {
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct InstanceChannel {
    dir: PathBuf,
    last_heartbeat: Option<SystemTime>,
}

impl InstanceChannel {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            last_heartbeat: None,
        }
    }

    /// `%LOCALAPPDATA%\ShardEditor` on Windows, the XDG data dir elsewhere.
    pub fn default_dir() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("ShardEditor");
        path
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(LOCK_FILE)
    }

    fn queue_path(&self) -> PathBuf {
        self.dir.join(QUEUE_FILE)
    }

    /// Whether another process is currently acting as primary.
    pub fn primary_alive(&self, now: SystemTime) -> bool {
        let modified = match fs::metadata(self.lock_path()).and_then(|m| m.modified()) {
            Ok(time) => time,
            Err(_) => return false,
        };
        // A clock step backwards makes the heartbeat look like it is from
        // the future; treat that as fresh.
        now.duration_since(modified)
            .map_or(true, |age| age < STALE_AFTER)
    }

    /// Become the primary instance.
    pub fn claim(&mut self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        self.write_heartbeat(SystemTime::now())?;
        tracing::info!(pid = std::process::id(), "claimed primary instance");
        Ok(())
    }

    /// Refresh the heartbeat if it is due.
    pub fn heartbeat(&mut self, now: SystemTime) -> Result<()> {
        let due = self.last_heartbeat.map_or(true, |last| {
            now.duration_since(last)
                .map_or(true, |elapsed| elapsed >= HEARTBEAT_INTERVAL)
        });
        if due {
            self.write_heartbeat(now)?;
        }
        Ok(())
    }

    fn write_heartbeat(&mut self, now: SystemTime) -> Result<()> {
        fs::write(self.lock_path(), std::process::id().to_string())?;
        self.last_heartbeat = Some(now);
        Ok(())
    }

    /// Give up the primary role. A lock another process has since taken
    /// over is left alone.
    pub fn release(&self) {
        let lock = self.lock_path();
        let owner = fs::read_to_string(&lock).unwrap_or_default();
        if owner.trim() != std::process::id().to_string() {
            tracing::debug!(owner = owner.trim(), "instance lock belongs to another process");
            return;
        }
        if let Err(e) = fs::remove_file(&lock) {
            tracing::debug!("Could not remove instance lock: {}", e);
        }
    }

    /// Forward a launch request to the primary.
    pub fn enqueue(&self, request: &HandoffRequest) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut line = serde_json::to_string(request)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.queue_path())?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Take every pending request, oldest first.
    ///
    /// The queue is renamed away before reading, so a launch appending at
    /// the same moment lands in a fresh queue file instead of being lost.
    pub fn drain(&self) -> Result<Vec<HandoffRequest>> {
        let queue = self.queue_path();
        if !queue.exists() {
            return Ok(Vec::new());
        }

        let claimed = self.dir.join(format!("{}.{}", QUEUE_FILE, std::process::id()));
        fs::rename(&queue, &claimed)
            .map_err(|e| AppError::Instance(format!("Failed to take queue: {}", e)))?;
        let contents = fs::read_to_string(&claimed);
        let _ = fs::remove_file(&claimed);

        Ok(parse_queue(&contents?))
    }
}

fn parse_queue(contents: &str) -> Vec<HandoffRequest> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str(line) {
            Ok(request) => Some(request),
            Err(e) => {
                tracing::warn!("Skipping malformed hand-off entry: {}", e);
                None
            }
        })
        .collect()
}

/// Resolve command-line paths against the launching process's directory;
/// the primary may be running somewhere else.
pub fn absolute_paths(paths: &[PathBuf], cwd: &Path) -> Vec<PathBuf> {
    paths
        .iter()
        .map(|p| if p.is_absolute() { p.clone() } else { cwd.join(p) })
        .collect()
}
