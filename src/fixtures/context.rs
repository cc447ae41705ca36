//! Per-scenario and per-worker context supplied by the test runner.

use camino::Utf8PathBuf;

/// Describes the test currently executing a scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestInfo {
    /// Scenario title.
    pub title: String,
    /// Titles from the feature down to the scenario.
    pub title_path: Vec<String>,
    /// Generated test file, when known.
    pub file: Option<Utf8PathBuf>,
    /// Zero-based retry attempt.
    pub retry: u32,
}

impl TestInfo {
    /// Create test information for a scenario title.
    pub fn new(title: impl Into<String>) -> Self {
        let title_value = title.into();
        Self {
            title_path: vec![title_value.clone()],
            title: title_value,
            ..Self::default()
        }
    }
}

/// Identifies the test type a scenario was generated against.
///
/// Projects may extend the base test with their own fixtures; the handle
/// names which extension is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestHandle {
    /// Name of the test type.
    pub name: String,
}

impl TestHandle {
    /// Create a handle for the named test type.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for TestHandle {
    fn default() -> Self {
        Self::new("base")
    }
}

/// Everything the engine needs to know about the running scenario.
///
/// Stored in the resource bag under [`super::BDD_CONTEXT`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioContext {
    /// Tags of the scenario, e.g. `["@foo", "@bar"]`.
    pub tags: Vec<String>,
    /// The running test.
    pub test_info: TestInfo,
    /// The running test type.
    pub test: TestHandle,
}

impl ScenarioContext {
    /// Create a context for a titled scenario with the given tags.
    pub fn new<I, S>(title: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            test_info: TestInfo::new(title),
            test: TestHandle::default(),
        }
    }

    /// Replace the test type handle.
    #[must_use]
    pub fn with_test(mut self, test: TestHandle) -> Self {
        self.test = test;
        self
    }
}

/// Describes the worker running a batch of scenarios.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerInfo {
    /// Unique index of the worker process.
    pub worker_index: usize,
    /// Index among workers running in parallel.
    pub parallel_index: usize,
    /// Project the worker belongs to.
    pub project: String,
}

/// Everything the engine needs to know about the running worker.
///
/// Stored in the resource bag under [`super::WORKER_CONTEXT`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerContext {
    /// The running worker.
    pub worker_info: WorkerInfo,
}
