use crate::models::param_type::{ParamType, ReturnType};
use crate::models::question::QuestionKind;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ParameterPayload {
    #[validate(length(min = 1, message = "Parameter name cannot be empty"))]
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCasePayload {
    /// JSON object serialized as text, keyed by parameter name.
    pub input: String,
    pub expected_output: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "default_case_points")]
    pub points: i32,
}

fn default_case_points() -> i32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionPayload {
    pub kind: QuestionKind,
    #[validate(length(min = 1, message = "Prompt cannot be empty"))]
    pub prompt: String,
    #[serde(default = "default_question_points")]
    #[validate(range(min = 1, message = "Points must be positive"))]
    pub points: i32,

    // multiple choice
    pub options: Option<Vec<String>>,
    pub correct_option: Option<i32>,

    // coding
    pub function_name: Option<String>,
    pub return_type: Option<ReturnType>,
    #[validate(nested)]
    pub parameters: Option<Vec<ParameterPayload>>,
    pub test_cases: Option<Vec<TestCasePayload>>,
}

fn default_question_points() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuestionPayload {
    pub prompt: Option<String>,
    #[validate(range(min = 1, message = "Points must be positive"))]
    pub points: Option<i32>,

    pub options: Option<Vec<String>>,
    pub correct_option: Option<i32>,

    pub function_name: Option<String>,
    pub return_type: Option<ReturnType>,
    #[validate(nested)]
    pub parameters: Option<Vec<ParameterPayload>>,
    pub test_cases: Option<Vec<TestCasePayload>>,
}
