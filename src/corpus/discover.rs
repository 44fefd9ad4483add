//! Input discovery from a root path or a root+glob pattern.

use std::path::{is_separator, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Errors that stop discovery before any file is processed.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("input root does not exist: {}", .0.display())]
    MissingRoot(PathBuf),
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("cannot read input root {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// The files selected by an input pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Directory (or file) the walk started from.
    pub root: PathBuf,
    /// Matching files, sorted.
    pub files: Vec<PathBuf>,
}

/// Expand an input pattern into a sorted list of files.
///
/// The pattern is split at its first glob metacharacter (`*`, `?`, `[`
/// or `{`). Everything before the last path separator preceding it is the
/// walk root; the whole pattern is matched against each walked path, with
/// `*` confined to one path component. A pattern without metacharacters
/// selects every file under it, or just itself if it names a file.
pub fn discover(pattern: &str) -> Result<Discovery, DiscoveryError> {
    let (root, has_glob) = split_pattern(pattern);
    if !root.exists() {
        return Err(DiscoveryError::MissingRoot(root));
    }

    let matcher = if has_glob {
        Some(compile(pattern)?)
    } else {
        None
    };
    // A relative pattern with no directory part walks "." but matches
    // against paths without the leading "./".
    let implicit_root = has_glob && !pattern.starts_with('.') && root == Path::new(".");

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(DiscoveryError::Walk {
                    path: root.clone(),
                    source: err,
                });
            }
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let selected = match &matcher {
            None => true,
            Some(matcher) => {
                let candidate = if implicit_root {
                    path.strip_prefix(".").unwrap_or(path)
                } else {
                    path
                };
                matcher.is_match(candidate)
            }
        };
        if selected {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    debug!(root = %root.display(), files = files.len(), "discovered input files");
    Ok(Discovery { root, files })
}

/// Split a pattern into its walk root and whether it contains a glob.
fn split_pattern(pattern: &str) -> (PathBuf, bool) {
    let Some(meta) = pattern.find(|c| matches!(c, '*' | '?' | '[' | '{')) else {
        return (PathBuf::from(pattern), false);
    };

    let prefix = &pattern[..meta];
    let root = match prefix.rfind(is_separator) {
        Some(0) => PathBuf::from(&prefix[..1]),
        Some(sep) => PathBuf::from(&prefix[..sep]),
        None => PathBuf::from("."),
    };
    (root, true)
}

fn compile(pattern: &str) -> Result<GlobMatcher, DiscoveryError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| DiscoveryError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}
