// Single test case form, the playground's first iteration

use serde_json::Value;
use tracing::{info, warn};

use crate::client::Evaluator;
use crate::error::TransportError;
use crate::types::{SingleEvaluationRequest, TestCaseField};

/// Result text shown when the single-case exchange fails
pub const SINGLE_FAILURE_TEXT: &str = "Error running evaluation";

#[derive(Debug, Clone, Default)]
pub struct SingleCaseForm {
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
    result: Option<String>,
    loading: bool,
}

impl SingleCaseForm {
    pub fn new(input: &str, expected_output: &str, actual_output: &str) -> Self {
        Self {
            input: input.to_string(),
            expected_output: expected_output.to_string(),
            actual_output: actual_output.to_string(),
            ..Self::default()
        }
    }

    pub fn set_field(&mut self, field: TestCaseField, value: &str) {
        let slot = match field {
            TestCaseField::Input => &mut self.input,
            TestCaseField::ExpectedOutput => &mut self.expected_output,
            TestCaseField::ActualOutput => &mut self.actual_output,
        };
        *slot = value.to_string();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Displayed result text: pretty JSON, or the failure message
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn request(&self) -> SingleEvaluationRequest {
        SingleEvaluationRequest {
            input: self.input.clone(),
            expected_output: self.expected_output.clone(),
            actual_output: self.actual_output.clone(),
        }
    }

    /// Enter Loading and snapshot the request body
    pub fn begin_submit(&mut self) -> SingleEvaluationRequest {
        self.loading = true;
        self.request()
    }

    /// Store the result text and leave Loading, on success or failure
    pub fn finish_submit(&mut self, outcome: Result<Value, TransportError>) -> &str {
        let text = match outcome {
            Ok(value) => {
                info!("Single-case evaluation completed");
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            }
            Err(e) => {
                warn!(error = %e, "Single-case evaluation failed");
                SINGLE_FAILURE_TEXT.to_string()
            }
        };

        self.loading = false;
        self.result.insert(text)
    }

    pub async fn submit<E>(&mut self, evaluator: &E) -> &str
    where
        E: Evaluator + ?Sized,
    {
        let request = self.begin_submit();
        let outcome = evaluator.evaluate_single(&request).await;
        self.finish_submit(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EvaluationRequest;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingEvaluator {
        seen: Mutex<Vec<SingleEvaluationRequest>>,
        reply: Option<Value>,
    }

    #[async_trait]
    impl Evaluator for RecordingEvaluator {
        async fn evaluate(&self, _request: &EvaluationRequest) -> Result<Value, TransportError> {
            unreachable!("single-case form never posts a batch")
        }

        async fn evaluate_single(
            &self,
            request: &SingleEvaluationRequest,
        ) -> Result<Value, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Some(value) => Ok(value.clone()),
                None => Err(TransportError::Decode(
                    serde_json::from_str::<Value>("not json").unwrap_err(),
                )),
            }
        }
    }

    #[tokio::test]
    async fn test_success_renders_pretty_json() {
        let evaluator = RecordingEvaluator {
            seen: Mutex::new(Vec::new()),
            reply: Some(serde_json::json!({"score": 1.0, "success": true, "reason": "match"})),
        };
        let mut form = SingleCaseForm::new("2+2", "4", "4");

        let text = form.submit(&evaluator).await.to_string();

        assert!(text.contains("\"score\": 1.0"));
        assert!(!form.is_loading());
        assert_eq!(evaluator.seen.lock().unwrap()[0].expected_output, "4");
    }

    #[tokio::test]
    async fn test_failure_shows_message() {
        let evaluator = RecordingEvaluator {
            seen: Mutex::new(Vec::new()),
            reply: None,
        };
        let mut form = SingleCaseForm::default();
        form.set_field(TestCaseField::Input, "hello");

        form.submit(&evaluator).await;

        assert_eq!(form.result(), Some(SINGLE_FAILURE_TEXT));
        assert!(!form.is_loading());
        assert_eq!(evaluator.seen.lock().unwrap()[0].input, "hello");
    }

    #[test]
    fn test_loading_between_begin_and_finish() {
        let mut form = SingleCaseForm::new("q", "a", "b");
        assert!(!form.is_loading());

        let request = form.begin_submit();
        assert!(form.is_loading());
        assert!(form.result().is_none());
        assert_eq!(request.actual_output, "b");

        form.finish_submit(Ok(serde_json::json!({"score": 0.0})));
        assert!(!form.is_loading());
        assert!(form.result().unwrap().contains("\"score\": 0.0"));
    }

    #[test]
    fn test_failure_also_leaves_loading() {
        let mut form = SingleCaseForm::default();
        form.begin_submit();

        let err = serde_json::from_str::<Value>("oops").unwrap_err();
        let text = form.finish_submit(Err(TransportError::Decode(err))).to_string();

        assert_eq!(text, SINGLE_FAILURE_TEXT);
        assert!(!form.is_loading());
    }
}
