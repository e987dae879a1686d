//! File intake: turns selected CSV exports into bounded in-memory text
//! records that can be forwarded to the model.
//!
//! Contents are never parsed as CSV here. The only policy applied is the
//! character bound in [`truncate_content`]; callers must not assume full-file
//! fidelity for anything over [`MAX_FILE_CHARS`].

mod selection;

pub use selection::{FileSelection, SelectedFile};

use crate::error::IngestError;
use futures_util::future::try_join_all;
use serde::Serialize;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Upper bound on characters forwarded to the model per file.
pub const MAX_FILE_CHARS: usize = 150_000;

/// Appended exactly once to content cut at [`MAX_FILE_CHARS`].
pub const TRUNCATION_MARKER: &str = "\n\n[... TRUNCATED: file exceeded 150000 characters ...]";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One uploaded export, held by the workflow for the life of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    name: String,
    size: u64,
    content: String,
    truncated: bool,
}

impl UploadedFile {
    /// Decode raw bytes into a bounded text record.
    ///
    /// Decoding is strict: invalid UTF-8 is an error, never empty content.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self, IngestError> {
        let name = name.into();
        let size = bytes.len() as u64;
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let text = std::str::from_utf8(body).map_err(|err| IngestError::Encoding {
            name: name.clone(),
            offset: err.valid_up_to(),
        })?;

        let (content, truncated) = truncate_content(text.to_owned());
        if truncated {
            tracing::debug!(file = %name, size, "content truncated to {MAX_FILE_CHARS} chars");
        }

        Ok(Self {
            name,
            size,
            content,
            truncated,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw size in bytes before decoding and truncation.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

/// Keep at most [`MAX_FILE_CHARS`] characters, appending [`TRUNCATION_MARKER`]
/// when anything was cut. Returns the bounded text and whether it was cut.
pub fn truncate_content(mut text: String) -> (String, bool) {
    match text.char_indices().nth(MAX_FILE_CHARS) {
        Some((cut, _)) => {
            text.truncate(cut);
            text.push_str(TRUNCATION_MARKER);
            (text, true)
        }
        None => (text, false),
    }
}

/// Read a single selected file from disk.
pub async fn ingest_file(file: &SelectedFile) -> Result<UploadedFile, IngestError> {
    let bytes = read_bytes(file.path()).await.map_err(|source| IngestError::Read {
        name: file.name().to_string(),
        source,
    })?;
    UploadedFile::from_bytes(file.name(), &bytes)
}

/// Read every selected file concurrently.
///
/// All-or-nothing: the first failure is returned and every other result is
/// discarded.
pub async fn ingest_all(files: &[SelectedFile]) -> Result<Vec<UploadedFile>, IngestError> {
    if files.is_empty() {
        return Err(IngestError::Empty);
    }

    let uploaded = try_join_all(files.iter().map(|file| ingest_file(file))).await?;
    tracing::debug!(
        count = uploaded.len(),
        truncated = uploaded.iter().filter(|f| f.is_truncated()).count(),
        "ingested files"
    );
    Ok(uploaded)
}

async fn read_bytes(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).await?;
    Ok(bytes)
}
