use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Message shown when a batch submission never produced a response body.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Failed to evaluate";

/// One well-formed row of the evaluation form.
///
/// Keys the form does not know about are carried through `extra` so an
/// imported file exports unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TestCase {
    pub fn new(input: &str, expected_output: &str, actual_output: &str) -> Self {
        Self {
            input: input.to_string(),
            expected_output: expected_output.to_string(),
            actual_output: actual_output.to_string(),
            extra: Map::new(),
        }
    }

    /// Copy of this case with one field replaced
    pub fn with_field(&self, field: TestCaseField, value: &str) -> Self {
        let mut updated = self.clone();
        *updated.field_mut(field) = value.to_string();
        updated
    }

    pub fn field(&self, field: TestCaseField) -> &str {
        match field {
            TestCaseField::Input => &self.input,
            TestCaseField::ExpectedOutput => &self.expected_output,
            TestCaseField::ActualOutput => &self.actual_output,
        }
    }

    fn field_mut(&mut self, field: TestCaseField) -> &mut String {
        match field {
            TestCaseField::Input => &mut self.input,
            TestCaseField::ExpectedOutput => &mut self.expected_output,
            TestCaseField::ActualOutput => &mut self.actual_output,
        }
    }
}

/// Element of the test list.
///
/// Imported arrays are not shape-checked: an element that is not a complete
/// test case is held as `Raw` and written back and submitted untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestEntry {
    Case(TestCase),
    Raw(Value),
}

impl Default for TestEntry {
    fn default() -> Self {
        TestEntry::Case(TestCase::default())
    }
}

impl From<TestCase> for TestEntry {
    fn from(case: TestCase) -> Self {
        TestEntry::Case(case)
    }
}

impl TestEntry {
    /// Classify an imported element, keeping it as-is if it is not a test case
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value::<TestCase>(value.clone()) {
            Ok(case) => TestEntry::Case(case),
            Err(_) => TestEntry::Raw(value),
        }
    }

    pub fn as_case(&self) -> Option<&TestCase> {
        match self {
            TestEntry::Case(case) => Some(case),
            TestEntry::Raw(_) => None,
        }
    }

    /// String value of `field`, if the element has one
    pub fn field(&self, field: TestCaseField) -> Option<&str> {
        match self {
            TestEntry::Case(case) => Some(case.field(field)),
            TestEntry::Raw(value) => value.get(field.as_str()).and_then(Value::as_str),
        }
    }

    /// Copy with `field` set to `value`.
    ///
    /// A raw object gets the key set as a string and becomes a `Case` once it
    /// has all three string fields. A raw non-object has no fields: `None`.
    pub fn with_field(&self, field: TestCaseField, value: &str) -> Option<Self> {
        match self {
            TestEntry::Case(case) => Some(TestEntry::Case(case.with_field(field, value))),
            TestEntry::Raw(Value::Object(map)) => {
                let mut map = map.clone();
                map.insert(field.as_str().to_string(), Value::String(value.to_string()));
                Some(TestEntry::from_value(Value::Object(map)))
            }
            TestEntry::Raw(_) => None,
        }
    }
}

/// Ordered test list; insertion order is display and submission order.
pub type TestCaseList = Vec<TestEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestCaseField {
    Input,
    ExpectedOutput,
    ActualOutput,
}

impl TestCaseField {
    pub const ALL: [TestCaseField; 3] = [
        TestCaseField::Input,
        TestCaseField::ExpectedOutput,
        TestCaseField::ActualOutput,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestCaseField::Input => "input",
            TestCaseField::ExpectedOutput => "expected_output",
            TestCaseField::ActualOutput => "actual_output",
        }
    }
}

impl fmt::Display for TestCaseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestCaseField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "input" => Ok(TestCaseField::Input),
            "expected_output" | "expected" => Ok(TestCaseField::ExpectedOutput),
            "actual_output" | "actual" => Ok(TestCaseField::ActualOutput),
            other => Err(format!(
                "unknown field '{}' (expected input, expected_output or actual_output)",
                other
            )),
        }
    }
}

/// Batch payload posted to `/api/evaluate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub metric: String,
    pub tests: TestCaseList,
}

/// Payload of the earlier single-case form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleEvaluationRequest {
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
}

/// What the form displays after a submission settles.
///
/// The evaluator's body is opaque; a response with an error status is still
/// a `Response`. Only a failed exchange becomes `TransportFailed`.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationResult {
    Response(Value),
    TransportFailed(String),
}

impl EvaluationResult {
    pub fn transport_failed() -> Self {
        EvaluationResult::TransportFailed(TRANSPORT_FAILURE_MESSAGE.to_string())
    }

    pub fn is_transport_failure(&self) -> bool {
        matches!(self, EvaluationResult::TransportFailed(_))
    }

    /// JSON value shown to the user
    pub fn display_value(&self) -> Value {
        match self {
            EvaluationResult::Response(value) => value.clone(),
            EvaluationResult::TransportFailed(message) => {
                serde_json::json!({ "error": message })
            }
        }
    }

    /// Pretty-printed display text
    pub fn render(&self) -> String {
        let value = self.display_value();
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
    }
}
