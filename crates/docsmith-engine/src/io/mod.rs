use docsmith_config::Config;
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid docs directory: {0}")]
    InvalidDocsDir(String),
}

/// Read a markdown file and return its content
pub fn read_file(relative_path: &RelativePath, docs_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(docs_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Scan for markdown files under the docs root, skipping excluded paths.
///
/// Paths are relative to `docs_root` and sorted. Hidden directories are not
/// entered.
pub fn scan_markdown_files(
    docs_root: &Path,
    config: &Config,
) -> Result<Vec<RelativePathBuf>, IoError> {
    validate_docs_dir(docs_root)?;

    let mut files = Vec::new();
    scan_directory_recursive(docs_root, docs_root, config, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(
    root: &Path,
    dir: &Path,
    config: &Config,
    files: &mut Vec<RelativePathBuf>,
) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            let hidden = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with('.'));
            if !hidden {
                scan_directory_recursive(root, &path, config, files)?;
            }
        } else if let Some(ext) = path.extension()
            && ext == "md"
        {
            let Some(relative) = relative_to(root, &path) else {
                log::warn!("Skipping {}: not a valid relative path", path.display());
                continue;
            };
            if config.is_excluded(relative.as_str()) {
                log::debug!("Excluded {relative}");
                continue;
            }
            files.push(relative);
        }
    }

    Ok(())
}

fn relative_to(root: &Path, path: &Path) -> Option<RelativePathBuf> {
    let stripped = path.strip_prefix(root).ok()?;
    RelativePathBuf::from_path(stripped).ok()
}

pub fn validate_docs_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidDocsDir(format!(
            "{} does not exist or is not a directory",
            path.display()
        )));
    }

    Ok(())
}
