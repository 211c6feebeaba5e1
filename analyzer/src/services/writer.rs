use crate::error::Result;
use crate::models::{EngagementStatistics, SentimentReport, VideoMetadata};
use log::info;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const METADATA_FILE: &str = "video_metadata.json";
pub const STATISTICS_FILE: &str = "video_statistics.json";
pub const SENTIMENT_FILE: &str = "sentiment_analysis.json";

const INDENT: &[u8] = b"    ";

/// Overwrites `path` with four-space indented UTF-8 JSON. Non-ASCII text is
/// written as-is. The document goes to a temp file in the same directory and
/// is renamed over `path`, so readers see either the old or the new file.
/// Nothing is touched if serialization fails.
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(&buffer)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;
    info!("Wrote {}", path.display());
    Ok(())
}

pub fn save_metadata_to_json(metadata: &VideoMetadata, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(METADATA_FILE);
    save_json(metadata, &path)?;
    Ok(path)
}

pub fn save_statistics_to_json(statistics: &EngagementStatistics, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(STATISTICS_FILE);
    save_json(statistics, &path)?;
    Ok(path)
}

pub fn save_sentiment_analysis_to_json(report: &SentimentReport, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(SENTIMENT_FILE);
    save_json(report, &path)?;
    Ok(path)
}
