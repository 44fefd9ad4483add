//! The three correlated output streams of a corpus run.
//!
//! `<stem>.json` and `<stem>.txt` receive one line per accepted file, in
//! the same order, so line *i* of one describes line *i* of the other.
//! Both live behind one mutex and are written in a single critical
//! section. `<stem>_failed.txt` has its own mutex.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::{CorpusError, CorpusOutcome};
use crate::flatten::NodeTable;

/// Paired accepted streams plus the failed stream.
pub struct OutputSink<W: Write + Send = BufWriter<File>> {
    accepted: Mutex<Accepted<W>>,
    failed: Mutex<W>,
}

struct Accepted<W> {
    json: W,
    index: W,
}

/// Paths of the streams derived from an output stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub index: PathBuf,
    pub failed: PathBuf,
}

impl OutputPaths {
    pub fn from_stem(stem: &Path) -> Self {
        let with_suffix = |suffix: &str| {
            let mut name = stem.as_os_str().to_owned();
            name.push(suffix);
            PathBuf::from(name)
        };
        Self {
            json: with_suffix(".json"),
            index: with_suffix(".txt"),
            failed: with_suffix("_failed.txt"),
        }
    }
}

impl OutputSink<BufWriter<File>> {
    /// Create (truncating) the three files for `stem`.
    pub fn create(stem: &Path) -> Result<Self, CorpusError> {
        let paths = OutputPaths::from_stem(stem);
        let open = |path: &PathBuf| {
            File::create(path)
                .map(BufWriter::new)
                .map_err(|source| CorpusError::Output {
                    path: path.clone(),
                    source,
                })
        };
        Ok(Self::new(
            open(&paths.json)?,
            open(&paths.index)?,
            open(&paths.failed)?,
        ))
    }
}

impl<W: Write + Send> OutputSink<W> {
    pub fn new(json: W, index: W, failed: W) -> Self {
        Self {
            accepted: Mutex::new(Accepted { json, index }),
            failed: Mutex::new(failed),
        }
    }

    pub fn record(&self, outcome: &CorpusOutcome) -> Result<(), CorpusError> {
        match outcome {
            CorpusOutcome::Accepted { path, table } => self.accept(path, table),
            CorpusOutcome::Rejected { path, reason } => Ok(self.reject(path, reason)?),
        }
    }

    /// Append a table and its path at the same line of both accepted streams.
    pub fn accept(&self, path: &str, table: &NodeTable) -> Result<(), CorpusError> {
        let line = table.to_json_line()?;
        let path = single_line(path);

        let mut guard = lock(&self.accepted);
        let streams = &mut *guard;
        writeln!(streams.json, "{}", line)?;
        writeln!(streams.index, "{}", path)?;
        Ok(())
    }

    /// Append `path<TAB>reason` to the failed stream.
    pub fn reject(&self, path: &str, reason: &str) -> io::Result<()> {
        let mut failed = lock(&self.failed);
        writeln!(failed, "{}\t{}", single_line(path), single_line(reason))
    }

    /// Flush all streams and hand back the writers.
    pub fn finish(self) -> io::Result<(W, W, W)> {
        let Accepted {
            mut json,
            mut index,
        } = self.accepted.into_inner().unwrap_or_else(|e| e.into_inner());
        let mut failed = self.failed.into_inner().unwrap_or_else(|e| e.into_inner());
        json.flush()?;
        index.flush()?;
        failed.flush()?;
        Ok((json, index, failed))
    }
}

/// A writer panicking mid-line only affects its own file, so a poisoned
/// lock is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Line-oriented streams cannot carry embedded line breaks or tabs.
fn single_line(text: &str) -> String {
    text.replace(['\n', '\r', '\t'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::FlatNode;
    use tempfile::TempDir;

    fn memory_sink() -> OutputSink<Vec<u8>> {
        OutputSink::new(Vec::new(), Vec::new(), Vec::new())
    }

    fn table() -> NodeTable {
        NodeTable::from(vec![FlatNode::new(0, "root")])
    }

    #[test]
    fn test_output_paths() {
        let paths = OutputPaths::from_stem(Path::new("out/corpus"));
        assert_eq!(paths.json, PathBuf::from("out/corpus.json"));
        assert_eq!(paths.index, PathBuf::from("out/corpus.txt"));
        assert_eq!(paths.failed, PathBuf::from("out/corpus_failed.txt"));
    }

    #[test]
    fn test_paired_lines() {
        let sink = memory_sink();
        sink.accept("a/A.java", &table()).unwrap();
        sink.reject("a/B.java", "too few nodes").unwrap();
        sink.accept("a/C.java", &table()).unwrap();

        let (json, index, failed) = sink.finish().unwrap();
        let json = String::from_utf8(json).unwrap();
        let index = String::from_utf8(index).unwrap();
        assert_eq!(json.lines().count(), 2);
        assert_eq!(index, "a/A.java\na/C.java\n");
        assert_eq!(String::from_utf8(failed).unwrap(), "a/B.java\ttoo few nodes\n");
        assert!(json.lines().all(|l| l == r#"[{"id":0,"type":"root"}]"#));
    }

    #[test]
    fn test_reasons_stay_on_one_line() {
        let sink = memory_sink();
        sink.reject("A.java", "bad\ninput\there").unwrap();
        let (_, _, failed) = sink.finish().unwrap();
        assert_eq!(String::from_utf8(failed).unwrap(), "A.java\tbad input here\n");
    }

    #[test]
    fn test_create_files() {
        let dir = TempDir::new().unwrap();
        let stem = dir.path().join("corpus");
        let sink = OutputSink::create(&stem).unwrap();
        sink.accept("A.java", &table()).unwrap();
        sink.finish().unwrap();

        assert!(dir.path().join("corpus.json").exists());
        assert!(dir.path().join("corpus_failed.txt").exists());
        let index = std::fs::read_to_string(dir.path().join("corpus.txt")).unwrap();
        assert_eq!(index, "A.java\n");
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let stem = dir.path().join("absent/corpus");
        match OutputSink::create(&stem) {
            Err(CorpusError::Output { path, .. }) => {
                assert_eq!(path, dir.path().join("absent/corpus.json"))
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected output error"),
        }
    }
}
