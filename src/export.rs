use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::error::{FetchError, FetchResult};
use crate::query::FilterState;
use crate::transport::Transport;

pub const DEFAULT_EXPORT_FILENAME: &str = "devices.csv";

/// A completed export: where it landed and what the server called it.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub path: PathBuf,
    pub filename: String,
    pub bytes: u64,
}

/// CSV side channel. Reuses the list's filter descriptor minus pagination,
/// so an export always covers the full filtered set — exactly what the user
/// is looking at, not just the current page.
///
/// The download goes through a named temp file in the destination
/// directory: any failure drops the handle and with it the file, so a
/// failed export never leaves a partial download behind.
pub struct CsvExportClient {
    transport: Arc<dyn Transport>,
}

impl CsvExportClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        CsvExportClient { transport }
    }

    pub async fn export(&self, filter: &FilterState, dest_dir: &Path) -> FetchResult<CsvExport> {
        let descriptor = filter.export_descriptor();
        tracing::info!("exporting devices ({})", descriptor.cache_key());

        let resp = self.transport.get_raw(descriptor.path(), descriptor.params()).await?;
        if !(200..300).contains(&resp.status) {
            return Err(FetchError::Export(format!("unexpected status {}", resp.status)));
        }

        let filename = filename_from_disposition(resp.content_disposition.as_deref())
            .unwrap_or_else(|| DEFAULT_EXPORT_FILENAME.to_string());

        let mut tmp =
            NamedTempFile::new_in(dest_dir).map_err(|e| FetchError::Export(e.to_string()))?;
        tmp.write_all(&resp.body).map_err(|e| FetchError::Export(e.to_string()))?;

        let path = dest_dir.join(&filename);
        tmp.persist(&path).map_err(|e| FetchError::Export(e.to_string()))?;

        tracing::info!("saved {} ({} bytes)", path.display(), resp.body.len());
        Ok(CsvExport { path, filename, bytes: resp.body.len() as u64 })
    }
}

/// Pulls the suggested name out of `Content-Disposition: attachment;
/// filename=<name>`. Anything missing, empty, or path-shaped falls back to
/// the default.
fn filename_from_disposition(header: Option<&str>) -> Option<String> {
    let header = header?;
    let raw = header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))?;
    let name = raw.trim().trim_matches('"');
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}
