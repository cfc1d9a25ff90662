//! Document loading from the data directory

use crate::error::{LocalAgentError, Result};
use glob::Pattern;
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into
const EXCLUDE_DIRS: &[&str] = &[".git", "node_modules", "__pycache__", ".venv", "target"];

/// Raw text of one loaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path of the file the text came from
    pub source: String,
    pub text: String,
}

/// Load every file under `root` whose relative path matches one of `patterns`.
///
/// A missing directory yields no documents. Files that cannot be read or
/// have no extractable text are logged and skipped.
pub fn load_documents(root: &Path, patterns: &[String]) -> Result<Vec<Document>> {
    if !root.exists() {
        tracing::warn!("Data directory not found: {}", root.display());
        return Ok(Vec::new());
    }

    let patterns = patterns
        .iter()
        .map(|p| Pattern::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut documents = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !should_skip(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path
            .strip_prefix(root)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|_| path.to_string_lossy().to_string());
        if !patterns.iter().any(|p| p.matches(&relative)) {
            continue;
        }

        match read_document(path) {
            Ok(text) if text.trim().is_empty() => {
                tracing::warn!("Skipping {}: no text content", path.display());
            }
            Ok(text) => documents.push(Document {
                source: path.to_string_lossy().to_string(),
                text,
            }),
            Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
        }
    }

    tracing::info!("Loaded {} document(s) from {}", documents.len(), root.display());
    Ok(documents)
}

fn read_document(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    if is_pdf(path) {
        pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| LocalAgentError::Parse(format!("PDF extraction failed: {}", e)))
    } else {
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

fn should_skip(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && EXCLUDE_DIRS.contains(&name.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn patterns() -> Vec<String> {
        vec!["*.md".to_string(), "*.txt".to_string()]
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let docs = load_documents(&temp.path().join("nope"), &patterns()).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_loads_matching_files_recursively() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.md"), "# Alpha").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested/b.txt"), "beta").unwrap();
        fs::write(temp.path().join("c.json"), "{}").unwrap();

        let docs = load_documents(temp.path(), &patterns()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].text, "# Alpha");
        assert!(docs[1].source.ends_with("b.txt"));
    }

    #[test]
    fn test_skips_hidden_and_blank_files() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join(".git/notes.md"), "hidden").unwrap();
        fs::write(temp.path().join("empty.md"), "   \n").unwrap();
        fs::write(temp.path().join("real.md"), "content").unwrap();

        let docs = load_documents(temp.path(), &patterns()).unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].source.ends_with("real.md"));
    }

    #[test]
    fn test_invalid_utf8_is_read_lossily() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("latin1.txt"), [b'c', b'a', b'f', 0xE9]).unwrap();

        let docs = load_documents(temp.path(), &patterns()).unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].text.starts_with("caf"));
    }

    #[test]
    fn test_bad_pattern_is_error() {
        let temp = TempDir::new().unwrap();
        let err = load_documents(temp.path(), &["[".to_string()]).unwrap_err();
        assert!(matches!(err, LocalAgentError::GlobPattern(_)));
    }
}
