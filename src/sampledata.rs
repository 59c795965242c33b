use crate::loader::WriteBatch;
use crate::types::RequestItems;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read every `*.json` file in `dir` as one batch, in file name order.
/// Each file holds `RequestItems` in DynamoDB JSON.
pub fn read_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<WriteBatch>> {
    let dir = dir.as_ref();

    let mut paths = fs::read_dir(dir)
        .with_context(|| format!("Failed to read: {}", dir.to_string_lossy()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to list: {}", dir.to_string_lossy()))?;

    paths.retain(|path| path.extension().map(|ext| ext == "json").unwrap_or(false));
    paths.sort();

    paths.iter().map(read_file).collect()
}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<WriteBatch> {
    let path = path.as_ref();
    debug!("Reading {}", path.to_string_lossy());

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.to_string_lossy()))?;
    let request_items: RequestItems = serde_json::from_str(&content)
        .with_context(|| format!("Failed to deserialize: {}", path.to_string_lossy()))?;

    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    Ok(WriteBatch::new(label, request_items))
}
