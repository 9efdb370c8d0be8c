//! Module discovery and loading.
//!
//! A module is every `*.tf` file directly inside one directory, parsed and
//! kept alongside its raw text.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::model::Body;
use super::parse::parse_body;
use crate::error::Result;

/// A parsed configuration file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path used for spans and messages.
    pub path: PathBuf,
    /// Raw file contents.
    pub text: String,
    /// Unfiltered parse of the file.
    pub body: Body,
}

impl SourceFile {
    /// Parse `text` as the file at `path`.
    pub fn parse(path: impl Into<PathBuf>, text: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let text = text.into();
        let body = parse_body(&path, &text)?;
        Ok(Self { path, text, body })
    }

    /// Raw lines, without line terminators.
    pub fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }
}

/// All configuration files of one directory.
#[derive(Debug, Clone)]
pub struct Module {
    /// The module directory.
    pub dir: PathBuf,
    /// Files sorted by file name.
    pub files: Vec<SourceFile>,
}

impl Module {
    /// Load every `*.tf` file in `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut names: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "tf"))
            .collect();
        names.sort();

        let mut files = Vec::with_capacity(names.len());
        for path in names {
            debug!("Loading {}", path.display());
            let text = fs::read_to_string(&path)?;
            files.push(SourceFile::parse(path, text)?);
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            files,
        })
    }

    /// Build a module from in-memory sources, named as given, rooted at `.`.
    pub fn from_sources<'a>(sources: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut files = sources
            .into_iter()
            .map(|(name, text)| SourceFile::parse(name, text))
            .collect::<Result<Vec<_>>>()?;
        files.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(Self {
            dir: PathBuf::from("."),
            files,
        })
    }

    /// Look up a file by the path it was loaded with.
    pub fn file(&self, path: &Path) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Whether the module has no configuration files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
