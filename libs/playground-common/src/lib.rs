pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod single;
pub mod test_file;
pub mod types;


pub use client::{Evaluator, HttpEvaluator};
pub use config::Config;
pub use error::{FormError, ImportError, TransportError};
pub use form::{EvaluationForm, SubmissionState};
pub use single::SingleCaseForm;
pub use types::{
    EvaluationRequest, EvaluationResult, TestCase, TestCaseField, TestCaseList, TestEntry,
};
