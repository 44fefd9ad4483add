//! Parallel per-file pipeline: read, parse, flatten, filter, record.

use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::{CorpusError, CorpusOutcome, FileError, NodeBounds, OutputSink, RunSummary};
use crate::flatten::{flatten, Granularity, NodeTable, PolicyTable};
use crate::parser::{ParseMode, SourceParser};

/// Stack size of worker threads, large enough for `MAX_DEPTH` nesting.
pub const WORKER_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Accepted files between progress log lines.
const PROGRESS_INTERVAL: usize = 1000;

/// Flattens a list of files concurrently into an `OutputSink`.
#[derive(Clone)]
pub struct CorpusRunner {
    base_dir: PathBuf,
    table: &'static dyn PolicyTable,
    bounds: NodeBounds,
    mode: ParseMode,
    jobs: Option<usize>,
}

impl CorpusRunner {
    /// Create a runner reporting paths relative to `base_dir`.
    ///
    /// A relative `base_dir` is resolved against the current directory.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: absolute(base_dir.as_ref()),
            table: Granularity::Fine.table(),
            bounds: NodeBounds::default(),
            mode: ParseMode::File,
            jobs: None,
        }
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.table = granularity.table();
        self
    }

    /// Use a custom policy table.
    pub fn table(mut self, table: &'static dyn PolicyTable) -> Self {
        self.table = table;
        self
    }

    pub fn bounds(mut self, bounds: NodeBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Worker count; `None` uses the available parallelism.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Path as written to the output streams.
    ///
    /// Paths under the base directory are written relative to it, whether
    /// given absolute or relative; others are written as given.
    pub fn relative_path(&self, path: &Path) -> String {
        let resolved = absolute(path);
        match resolved.strip_prefix(&self.base_dir) {
            Ok(relative) => relative.to_string_lossy().into_owned(),
            Err(_) => path.to_string_lossy().into_owned(),
        }
    }

    /// Read, parse and flatten one file, then apply the size bounds.
    pub fn process_file(&self, path: &Path) -> Result<NodeTable, FileError> {
        let source = std::fs::read(path)?;
        let parsed = SourceParser::new().parse(&source, self.mode)?;
        let table = flatten(&parsed, self.table)?;
        self.bounds.check(table.len())?;
        Ok(table)
    }

    /// Process one file into its outcome. Never fails.
    pub fn outcome(&self, path: &Path) -> CorpusOutcome {
        let relative = self.relative_path(path);
        match self.process_file(path) {
            Ok(table) => CorpusOutcome::Accepted {
                path: relative,
                table,
            },
            Err(err) => {
                if let FileError::Flatten(cause) = &err {
                    if cause.is_policy_gap() {
                        warn!(path = %relative, error = %cause, "policy table gap");
                    }
                }
                debug!(path = %relative, reason = %err, "file rejected");
                CorpusOutcome::Rejected {
                    path: relative,
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Process every file and record each outcome in `sink`.
    ///
    /// Per-file failures become rejected outcomes; only pool setup and
    /// output errors abort the run.
    pub fn run<W: Write + Send>(
        &self,
        files: &[PathBuf],
        sink: &OutputSink<W>,
    ) -> Result<RunSummary, CorpusError> {
        let mut builder = rayon::ThreadPoolBuilder::new()
            .stack_size(WORKER_STACK_SIZE)
            .thread_name(|i| format!("astcorpus-worker-{}", i));
        if let Some(jobs) = self.jobs {
            builder = builder.num_threads(jobs);
        }
        let pool = builder.build()?;

        info!(
            files = files.len(),
            granularity = self.table.name(),
            workers = pool.current_num_threads(),
            "processing corpus"
        );

        let accepted = AtomicUsize::new(0);
        let rejected = AtomicUsize::new(0);

        pool.install(|| {
            files.par_iter().try_for_each(|path| {
                let outcome = self.outcome(path);
                sink.record(&outcome)?;
                match outcome {
                    CorpusOutcome::Accepted { .. } => {
                        let done = accepted.fetch_add(1, Ordering::Relaxed) + 1;
                        if done % PROGRESS_INTERVAL == 0 {
                            info!(accepted = done, "progress");
                        }
                    }
                    CorpusOutcome::Rejected { .. } => {
                        rejected.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Ok::<(), CorpusError>(())
            })
        })?;

        let summary = RunSummary {
            accepted: accepted.into_inner(),
            rejected: rejected.into_inner(),
        };
        info!(
            accepted = summary.accepted,
            rejected = summary.rejected,
            "corpus processed"
        );
        Ok(summary)
    }
}

/// Join a relative path onto the current directory and drop `.` components.
fn absolute(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::{
        CoarsePolicy, FinePolicy, FlattenError, OperatorStyle, Policy, Slot, SlotPolicy,
    };
    use crate::parser::SyntaxKind;
    use std::fs;
    use tempfile::TempDir;

    /// Fine table that treats assignments as semantic operators, which
    /// have no canonical name for `=`.
    struct AssignmentAsOperator;

    impl PolicyTable for AssignmentAsOperator {
        fn name(&self) -> &'static str {
            "assignment-as-operator"
        }

        fn policy(&self, kind: SyntaxKind) -> Policy {
            match kind {
                SyntaxKind::AssignmentExpression => Policy::Operator(OperatorStyle::Semantic),
                other => FinePolicy.policy(other),
            }
        }

        fn slot(&self, slot: Slot) -> SlotPolicy {
            FinePolicy.slot(slot)
        }

        fn keeps_modifiers(&self) -> bool {
            true
        }
    }

    static ASSIGNMENT_AS_OPERATOR: AssignmentAsOperator = AssignmentAsOperator;
    static COARSE: CoarsePolicy = CoarsePolicy;

    const SMALL: &str = "class A { void f() { g(1); } }";

    #[test]
    fn test_relative_path() {
        let runner = CorpusRunner::new("/data/corpus");
        assert_eq!(
            runner.relative_path(Path::new("/data/corpus/a/A.java")),
            "a/A.java"
        );
        assert_eq!(
            runner.relative_path(Path::new("/elsewhere/B.java")),
            "/elsewhere/B.java"
        );
    }

    #[test]
    fn test_relative_path_from_current_directory() {
        let cwd = std::env::current_dir().unwrap();
        let runner = CorpusRunner::new(".");
        assert_eq!(
            runner.relative_path(&cwd.join("testdata/java/Bubble.java")),
            "testdata/java/Bubble.java"
        );
        assert_eq!(
            runner.relative_path(Path::new("./testdata/java/Bubble.java")),
            "testdata/java/Bubble.java"
        );
        assert_eq!(
            runner.relative_path(Path::new("testdata/java/Bubble.java")),
            "testdata/java/Bubble.java"
        );
    }

    #[test]
    fn test_relative_base_dir() {
        let cwd = std::env::current_dir().unwrap();
        let runner = CorpusRunner::new("testdata");
        assert_eq!(
            runner.relative_path(&cwd.join("testdata/java/Bubble.java")),
            "java/Bubble.java"
        );
    }

    #[test]
    fn test_process_file_applies_bounds() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.java");
        fs::write(&path, SMALL).unwrap();

        let len = CorpusRunner::new(dir.path())
            .bounds(NodeBounds::new(0, 1000))
            .process_file(&path)
            .unwrap()
            .len();

        let at_min = CorpusRunner::new(dir.path()).bounds(NodeBounds::new(len, len + 1));
        assert!(at_min.process_file(&path).is_ok());

        let above = CorpusRunner::new(dir.path()).bounds(NodeBounds::new(len + 1, len + 10));
        let err = above.process_file(&path).unwrap_err();
        assert_eq!(err.to_string(), "too few nodes");

        let at_max = CorpusRunner::new(dir.path()).bounds(NodeBounds::new(0, len));
        let err = at_max.process_file(&path).unwrap_err();
        assert_eq!(err.to_string(), "too many nodes");
    }

    #[test]
    fn test_custom_table_matches_builtin() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.java");
        fs::write(&path, SMALL).unwrap();

        let bounds = NodeBounds::new(0, 1000);
        let custom = CorpusRunner::new(dir.path())
            .table(&COARSE)
            .bounds(bounds)
            .process_file(&path)
            .unwrap();
        let builtin = CorpusRunner::new(dir.path())
            .granularity(Granularity::Coarse)
            .bounds(bounds)
            .process_file(&path)
            .unwrap();
        assert_eq!(custom, builtin);
    }

    #[test]
    fn test_unknown_operator_rejects_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Assign.java");
        fs::write(&path, "class Assign { void f() { int x; x = 1; } }").unwrap();

        let runner = CorpusRunner::new(dir.path())
            .table(&ASSIGNMENT_AS_OPERATOR)
            .bounds(NodeBounds::new(0, 1000));
        match runner.process_file(&path) {
            Err(FileError::Flatten(err @ FlattenError::UnknownOperator { .. })) => {
                assert!(err.is_policy_gap());
            }
            other => panic!("expected unknown operator, got {:?}", other),
        }

        match runner.outcome(&path) {
            CorpusOutcome::Rejected { path, reason } => {
                assert_eq!(path, "Assign.java");
                assert_eq!(
                    reason,
                    "policy gap: no canonical name for operator `=`"
                );
            }
            CorpusOutcome::Accepted { .. } => panic!("gap must reject the file"),
        }

        let sink = OutputSink::new(Vec::<u8>::new(), Vec::new(), Vec::new());
        let summary = runner.run(&[path], &sink).unwrap();
        assert_eq!(summary.rejected, 1);
        let (json, _, failed) = sink.finish().unwrap();
        assert!(json.is_empty());
        assert_eq!(
            String::from_utf8(failed).unwrap(),
            "Assign.java\tpolicy gap: no canonical name for operator `=`\n"
        );
    }

    #[test]
    fn test_unreadable_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let runner = CorpusRunner::new(dir.path());
        match runner.outcome(&dir.path().join("Missing.java")) {
            CorpusOutcome::Rejected { path, .. } => assert_eq!(path, "Missing.java"),
            CorpusOutcome::Accepted { .. } => panic!("missing file must be rejected"),
        }
    }

    #[test]
    fn test_run_partitions_outcomes() {
        let dir = TempDir::new().unwrap();
        let mut files = Vec::new();
        for i in 0..24 {
            let path = dir.path().join(format!("F{}.java", i));
            let source = if i % 3 == 0 {
                "class Broken { void f( { }".to_string()
            } else {
                format!("class F{} {{ int f() {{ return {}; }} }}", i, i)
            };
            fs::write(&path, source).unwrap();
            files.push(path);
        }

        let sink = OutputSink::new(Vec::<u8>::new(), Vec::new(), Vec::new());
        let summary = CorpusRunner::new(dir.path())
            .bounds(NodeBounds::new(1, 1000))
            .jobs(Some(4))
            .run(&files, &sink)
            .unwrap();
        assert_eq!(summary.accepted, 16);
        assert_eq!(summary.rejected, 8);

        let (json, index, failed) = sink.finish().unwrap();
        let json = String::from_utf8(json).unwrap();
        let index = String::from_utf8(index).unwrap();
        let failed = String::from_utf8(failed).unwrap();
        assert_eq!(json.lines().count(), 16);
        assert_eq!(index.lines().count(), 16);
        assert_eq!(failed.lines().count(), 8);

        // Line i of the JSON stream belongs to line i of the index stream.
        for (line, path) in json.lines().zip(index.lines()) {
            let table: NodeTable = serde_json::from_str(line).unwrap();
            let class = table.get(1).unwrap();
            let expected = path.trim_end_matches(".java");
            assert_eq!(class.value.as_deref(), Some(expected));
        }
    }
}
