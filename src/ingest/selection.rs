use std::path::{Path, PathBuf};

/// A file queued for ingestion, identified by its base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    path: PathBuf,
}

impl SelectedFile {
    /// Build from a path; `None` when the path has no file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_string_lossy().into_owned();
        Some(Self { name, path })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Ordered set of files picked for the next analysis.
///
/// Only `.csv` names are accepted and names are unique: a later selection
/// with an already-queued name is dropped, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    files: Vec<SelectedFile>,
}

impl FileSelection {
    /// Queue every acceptable path, returning how many were added.
    pub fn add<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut added = 0;
        for path in paths {
            let Some(file) = SelectedFile::from_path(path) else {
                continue;
            };
            if !has_csv_extension(&file.name) {
                tracing::warn!(file = %file.name, "skipping non-CSV selection");
                continue;
            }
            if self.contains(&file.name) {
                tracing::debug!(file = %file.name, "dropping duplicate selection");
                continue;
            }
            self.files.push(file);
            added += 1;
        }
        added
    }

    /// Remove a queued file by name.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|file| file.name != name);
        self.files.len() != before
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|file| file.name == name)
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(SelectedFile::name).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn has_csv_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
