//! Landmark feed reader
//!
//! Stands in for the pose model: opening the feed is the one-time async
//! initialization that gates `loading -> waiting`, after which it yields one
//! message per rendered frame.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tracing::{info, warn};

use super::protocol::FeedMsg;

/// Feed errors
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Failed to open landmark feed {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read landmark feed: {0}")]
    Read(#[from] std::io::Error),
}

/// Line-delimited JSON source of `FeedMsg`
pub struct LandmarkFeed<R> {
    lines: Lines<BufReader<R>>,
    line_no: usize,
    skipped: usize,
}

impl LandmarkFeed<File> {
    /// Open a feed file
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let file = File::open(path).await.map_err(|source| FeedError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Landmark feed opened");
        Ok(Self::from_reader(file))
    }
}

impl<R: AsyncRead + Unpin> LandmarkFeed<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            line_no: 0,
            skipped: 0,
        }
    }

    /// Next message, or `None` at end of feed. Blank and malformed lines are
    /// skipped.
    pub async fn next_msg(&mut self) -> Result<Option<FeedMsg>, FeedError> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<FeedMsg>(line) {
                Ok(msg) => return Ok(Some(msg)),
                Err(e) => {
                    self.skipped += 1;
                    warn!(line = self.line_no, error = %e, "Skipping malformed feed line");
                }
            }
        }
        Ok(None)
    }

    /// Lines dropped as malformed so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
