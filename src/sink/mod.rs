//! Result persistence.
//!
//! The whole [`ResultMap`] is written as one JSON document indented with four
//! spaces. The file handle is scoped to each call and dropped on every exit
//! path, including errors.

use crate::types::{AppError, Result, ResultMap};
use serde::Serialize;
use std::path::Path;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultSink;

impl ResultSink {
    /// Serialize `results` to `path`, replacing any existing file.
    pub async fn persist(results: &ResultMap, path: &Path) -> Result<()> {
        let bytes = Self::encode(results)?;

        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(|e| AppError::io(path, e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| AppError::io(path, e))?;
        file.flush().await.map_err(|e| AppError::io(path, e))?;

        tracing::info!(path = %path.display(), nodes = results.len(), "results written");
        Ok(())
    }

    /// Read a file written by [`persist`](Self::persist).
    pub async fn load(path: &Path) -> Result<ResultMap> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::io(path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn encode(results: &ResultMap) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        results.serialize(&mut serializer)?;
        buf.push(b'\n');
        Ok(buf)
    }
}
