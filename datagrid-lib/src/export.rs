//! Table export
//!
//! Every list endpoint has an `export/` sibling that renders the filtered
//! list as a spreadsheet or CSV file.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use reqwest::header::CONTENT_DISPOSITION;

use crate::GridClient;
use crate::error::ApiError;
use crate::error::Error;
use crate::table::Filters;
use crate::table::QueryParams;

/// File format requested from an export endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    /// The `format` query value, also used as file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    /// Name used when the server does not suggest one.
    pub fn default_filename(&self) -> String {
        format!("export.{}", self.as_str())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(Error::Config(format!("unsupported export format '{}'", other))),
        }
    }
}

/// A downloaded export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// File name suggested by the server, or `export.{format}`.
    pub filename: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Path of the export endpoint next to a list endpoint.
pub fn export_endpoint(endpoint: &str) -> String {
    format!("{}/export/", endpoint.trim_end_matches('/'))
}

/// Query parameters of an export request: `format` then every non-empty filter.
pub fn export_params(format: ExportFormat, filters: Option<&Filters>) -> QueryParams {
    let mut params = QueryParams::new().with("format", format.as_str());
    for (key, value) in filters.into_iter().flatten() {
        if let Some(value) = value.to_wire() {
            params.insert(key.as_str(), value);
        }
    }
    params
}

/// Extracts a safe file name from a `Content-Disposition` header value.
///
/// Only the final path component is kept; empty and dot-only names are rejected.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let raw = header.split(';').map(str::trim).find_map(|part| {
        let (name, value) = part.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("filename")
            .then(|| value.trim().trim_matches('"'))
    })?;

    let name = raw.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name.chars().all(|c| c == '.') {
        return None;
    }
    Some(name.to_string())
}

impl GridClient {
    /// Downloads the export of `endpoint` in `format`, restricted by `filters`.
    ///
    /// Errors propagate unchanged; nothing is retried.
    pub async fn export(
        &self,
        endpoint: &str,
        format: ExportFormat,
        filters: Option<&Filters>,
    ) -> Result<ExportFile, Error> {
        let path = export_endpoint(endpoint);
        let params = export_params(format, filters);
        let response = self.get(&path, &params).await?;

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| format.default_filename());

        let bytes = response.bytes().await.map_err(ApiError::from)?;
        log::debug!("exported {} ({} bytes) from {}", filename, bytes.len(), path);

        Ok(ExportFile {
            filename,
            bytes: bytes.to_vec(),
        })
    }

    /// Downloads an export and saves it into `dir`, returning the file path.
    ///
    /// The file is written under a temporary `.part` name and renamed once
    /// complete, so a failed download never leaves a truncated export behind.
    pub async fn export_to(
        &self,
        endpoint: &str,
        format: ExportFormat,
        filters: Option<&Filters>,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, Error> {
        let file = self.export(endpoint, format, filters).await?;
        let target = dir.as_ref().join(&file.filename);
        let partial = dir.as_ref().join(format!("{}.part", file.filename));

        if let Err(e) = tokio::fs::write(&partial, &file.bytes).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }
        tokio::fs::rename(&partial, &target).await?;
        Ok(target)
    }
}
