//! Evaluation Form Controller
//!
//! Holds the state behind the playground form: the selected metric, the
//! ordered test list, the last result and whether a submission is in
//! flight. The only I/O is the test file and the `Evaluator` it is handed.
//!
//! **Submission lifecycle:** Idle → Loading → Idle. `begin_submit` enters
//! Loading, `finish_submit` always returns to Idle, success or not. A second
//! `begin_submit` while loading is allowed; callers disable their trigger.
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::client::Evaluator;
use crate::config::DEFAULT_METRIC;
use crate::error::{FormError, ImportError, TransportError};
use crate::test_file;
use crate::types::{EvaluationRequest, EvaluationResult, TestCaseField, TestCaseList, TestEntry};

pub const SUBMIT_LABEL: &str = "Evaluate";
pub const SUBMIT_LABEL_LOADING: &str = "Evaluating...";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Loading {
        id: Uuid,
        metric: String,
        test_count: usize,
        started_at: DateTime<Utc>,
    },
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SubmissionState::Loading { .. })
    }
}

#[derive(Debug, Clone)]
pub struct EvaluationForm {
    metric: String,
    tests: TestCaseList,
    result: Option<EvaluationResult>,
    state: SubmissionState,
}

impl Default for EvaluationForm {
    fn default() -> Self {
        Self::new(DEFAULT_METRIC)
    }
}

impl EvaluationForm {
    /// Fresh form with a single empty test case
    pub fn new(metric: &str) -> Self {
        Self {
            metric: metric.to_string(),
            tests: vec![TestEntry::default()],
            result: None,
            state: SubmissionState::Idle,
        }
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn set_metric(&mut self, metric: &str) {
        self.metric = metric.to_string();
    }

    pub fn tests(&self) -> &[TestEntry] {
        &self.tests
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        self.result.as_ref()
    }

    /// Pretty JSON of the last result, if any
    pub fn render_result(&self) -> Option<String> {
        self.result.as_ref().map(EvaluationResult::render)
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Label for the submit control
    pub fn submit_label(&self) -> &'static str {
        if self.is_loading() {
            SUBMIT_LABEL_LOADING
        } else {
            SUBMIT_LABEL
        }
    }

    /// Removal is offered only while more than one test remains
    pub fn can_remove(&self) -> bool {
        self.tests.len() > 1
    }

    fn check_index(&self, index: usize) -> Result<(), FormError> {
        if index < self.tests.len() {
            Ok(())
        } else {
            Err(FormError::IndexOutOfRange {
                index,
                len: self.tests.len(),
            })
        }
    }

    /// Replace test `index` with a copy that has `field` set to `value`.
    ///
    /// Imported elements that are not JSON objects have no fields to set.
    pub fn update_field(
        &mut self,
        index: usize,
        field: TestCaseField,
        value: &str,
    ) -> Result<(), FormError> {
        self.check_index(index)?;
        let updated = self.tests[index]
            .with_field(field, value)
            .ok_or(FormError::NotAnObject { index })?;
        self.tests[index] = updated;
        Ok(())
    }

    /// Append an empty test case
    pub fn add_test(&mut self) {
        self.tests.push(TestEntry::default());
    }

    /// Remove test `index`. Refused while only one test remains.
    pub fn remove_test(&mut self, index: usize) -> Result<TestEntry, FormError> {
        self.check_index(index)?;
        if !self.can_remove() {
            return Err(FormError::LastTestCase);
        }
        Ok(self.tests.remove(index))
    }

    /// Replace the whole list from JSON text.
    ///
    /// On failure the current list is kept and the reason is logged; the
    /// error is returned for callers that want it.
    pub fn import_from_str(&mut self, contents: &str) -> Result<usize, ImportError> {
        self.apply_import(test_file::parse_test_list(contents))
    }

    /// Replace the whole list from a file on disk
    pub fn import_from_file(&mut self, path: &Path) -> Result<usize, ImportError> {
        self.apply_import(test_file::read_test_file(path))
    }

    fn apply_import(
        &mut self,
        parsed: Result<TestCaseList, ImportError>,
    ) -> Result<usize, ImportError> {
        match parsed {
            Ok(tests) => {
                let count = tests.len();
                self.tests = tests;
                debug!(test_count = count, "Imported test list");
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, kept = self.tests.len(), "Discarded test import");
                Err(e)
            }
        }
    }

    /// Pretty-printed JSON of the current list
    pub fn export_to_string(&self) -> Result<String, FormError> {
        test_file::to_pretty_json(&self.tests)
    }

    /// Write `tests.json` into `dir`
    pub fn export_to_file(&self, dir: &Path) -> Result<PathBuf, FormError> {
        let path = test_file::write_test_file(dir, &self.tests)?;
        info!(path = %path.display(), test_count = self.tests.len(), "Exported test list");
        Ok(path)
    }

    /// Write the list to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<(), FormError> {
        test_file::write_test_file_to(path, &self.tests)
    }

    /// Enter Loading and snapshot the request body
    pub fn begin_submit(&mut self) -> EvaluationRequest {
        if let SubmissionState::Loading { id, .. } = &self.state {
            debug!(previous = %id, "Submission started while another is in flight");
        }

        let request = EvaluationRequest {
            metric: self.metric.clone(),
            tests: self.tests.clone(),
        };

        let id = Uuid::new_v4();
        info!(
            submission_id = %id,
            metric = %request.metric,
            test_count = request.tests.len(),
            "Submitting for evaluation"
        );

        self.state = SubmissionState::Loading {
            id,
            metric: request.metric.clone(),
            test_count: request.tests.len(),
            started_at: Utc::now(),
        };

        request
    }

    /// Store the outcome and return to Idle
    pub fn finish_submit(&mut self, outcome: Result<Value, TransportError>) -> &EvaluationResult {
        let (id, elapsed_ms) = match &self.state {
            SubmissionState::Loading { id, started_at, .. } => (
                Some(*id),
                (Utc::now() - *started_at).num_milliseconds(),
            ),
            SubmissionState::Idle => (None, 0),
        };

        let result = match outcome {
            Ok(value) => {
                info!(submission_id = ?id, elapsed_ms, "Evaluation completed");
                EvaluationResult::Response(value)
            }
            Err(e) => {
                warn!(submission_id = ?id, elapsed_ms, error = %e, "Evaluation failed");
                EvaluationResult::transport_failed()
            }
        };

        self.state = SubmissionState::Idle;
        self.result.insert(result)
    }

    /// Send `{metric, tests}` to the evaluator and record what comes back
    #[instrument(skip_all)]
    pub async fn submit<E>(&mut self, evaluator: &E) -> &EvaluationResult
    where
        E: Evaluator + ?Sized,
    {
        let request = self.begin_submit();
        let outcome = evaluator.evaluate(&request).await;
        self.finish_submit(outcome)
    }
}
