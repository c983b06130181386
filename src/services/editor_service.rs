use crate::error::{Error, Result};
use crate::models::param_type::{ParamType, ReturnType, ScalarKind};
use crate::models::parameter::Parameter;
use crate::models::test_case::TestCase;
use crate::services::generator_service::{DriverParam, DriverRequest, DriverTestCase};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// In-memory editing model of a coding question's function signature,
/// parameter list and test-case list.
///
/// The editor owns both lists for the duration of an edit session and keeps
/// two invariants at the boundary of every operation: display order is a
/// dense permutation of `[0, len)` for each list independently, and test-case
/// inputs are JSON objects keyed by parameter name (checked by `validate`,
/// the single gate before persistence).
#[derive(Debug, Clone)]
pub struct QuestionEditor {
    function_name: String,
    return_type: ReturnType,
    parameters: Vec<Parameter>,
    test_cases: Vec<TestCase>,
}

impl Default for QuestionEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionEditor {
    pub fn new() -> Self {
        Self {
            function_name: String::new(),
            return_type: ReturnType::Void,
            parameters: Vec::new(),
            test_cases: Vec::new(),
        }
    }

    /// Rebuild an editor from persisted records. Children arrive in whatever
    /// order the store returned them; both lists are re-sorted by their
    /// persisted display order and renumbered densely.
    pub fn load(
        function_name: String,
        return_type: ReturnType,
        mut parameters: Vec<Parameter>,
        mut test_cases: Vec<TestCase>,
    ) -> Self {
        parameters.sort_by_key(|p| p.display_order);
        test_cases.sort_by_key(|t| t.display_order);
        let mut editor = Self {
            function_name,
            return_type,
            parameters,
            test_cases,
        };
        editor.renumber_parameters();
        editor.renumber_test_cases();
        editor
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn set_function_name(&mut self, name: impl Into<String>) {
        self.function_name = name.into();
    }

    pub fn return_type(&self) -> ReturnType {
        self.return_type
    }

    pub fn set_return_type(&mut self, return_type: ReturnType) {
        self.return_type = return_type;
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    pub fn into_parts(self) -> (Vec<Parameter>, Vec<TestCase>) {
        (self.parameters, self.test_cases)
    }

    // ── Parameter operations ──

    /// Append a blank parameter (empty name, default scalar type). Existing
    /// test cases are not touched; a missing key surfaces at `validate`.
    pub fn add_parameter(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        self.parameters.push(Parameter {
            id,
            name: String::new(),
            param_type: ParamType::Scalar(ScalarKind::Int),
            display_order: self.parameters.len() as i32,
        });
        id
    }

    pub fn rename_parameter(&mut self, id: Uuid, name: impl Into<String>) -> Result<()> {
        self.parameter_mut(id)?.name = name.into();
        Ok(())
    }

    /// Change a parameter's declared type. Values already stored in test
    /// cases keep their old runtime type until the cell is edited again.
    pub fn retype_parameter(&mut self, id: Uuid, param_type: ParamType) -> Result<()> {
        self.parameter_mut(id)?.param_type = param_type;
        Ok(())
    }

    pub fn remove_parameter(&mut self, id: Uuid) -> Result<()> {
        let before = self.parameters.len();
        self.parameters.retain(|p| p.id != id);
        if self.parameters.len() == before {
            return Err(Error::NotFound("Parameter not found".to_string()));
        }
        self.renumber_parameters();
        Ok(())
    }

    /// Swap the parameter at `index` with its neighbour. Moves past either
    /// boundary are no-ops.
    pub fn move_parameter(&mut self, index: usize, direction: Direction) {
        let len = self.parameters.len();
        let target = match direction {
            Direction::Up if index > 0 && index < len => index - 1,
            Direction::Down if index + 1 < len => index + 1,
            _ => return,
        };
        self.parameters.swap(index, target);
        self.renumber_parameters();
    }

    // ── Test-case operations ──

    /// Append a test case whose input maps every current parameter name to
    /// its type-appropriate default, worth one point and visible.
    pub fn add_test_case(&mut self) -> Uuid {
        let mut input = Map::new();
        for p in &self.parameters {
            input.insert(p.name.clone(), p.param_type.default_value());
        }
        let id = Uuid::new_v4();
        self.test_cases.push(TestCase {
            id,
            input: JsonValue::Object(input).to_string(),
            expected_output: String::new(),
            hidden: false,
            points: 1,
            display_order: self.test_cases.len() as i32,
        });
        id
    }

    pub fn set_expected_output(&mut self, id: Uuid, expected: impl Into<String>) -> Result<()> {
        self.test_case_mut(id)?.expected_output = expected.into();
        Ok(())
    }

    pub fn set_hidden(&mut self, id: Uuid, hidden: bool) -> Result<()> {
        self.test_case_mut(id)?.hidden = hidden;
        Ok(())
    }

    pub fn set_points(&mut self, id: Uuid, points: i32) -> Result<()> {
        self.test_case_mut(id)?.points = points;
        Ok(())
    }

    /// Coerce `raw` per the named parameter's declared type and write it into
    /// the test case's input mapping.
    ///
    /// A stored input that no longer parses as a JSON object rejects the edit
    /// with `MalformedInput` rather than dropping it silently.
    pub fn set_test_case_value(
        &mut self,
        test_case_id: Uuid,
        param_name: &str,
        raw: &str,
    ) -> Result<()> {
        let param_type = self
            .parameters
            .iter()
            .find(|p| p.name == param_name)
            .map(|p| p.param_type)
            .ok_or_else(|| Error::NotFound(format!("No parameter named '{}'", param_name)))?;
        let case = self
            .test_cases
            .iter_mut()
            .find(|t| t.id == test_case_id)
            .ok_or_else(|| Error::NotFound("Test case not found".to_string()))?;

        let mut input = match serde_json::from_str::<JsonValue>(&case.input) {
            Ok(JsonValue::Object(map)) => map,
            _ => {
                tracing::warn!(test_case = %test_case_id, "stored test case input is not a JSON object");
                return Err(Error::MalformedInput(case.input.clone()));
            }
        };
        input.insert(param_name.to_string(), param_type.coerce(raw));
        case.input = JsonValue::Object(input).to_string();
        Ok(())
    }

    pub fn remove_test_case(&mut self, id: Uuid) -> Result<()> {
        let before = self.test_cases.len();
        self.test_cases.retain(|t| t.id != id);
        if self.test_cases.len() == before {
            return Err(Error::NotFound("Test case not found".to_string()));
        }
        self.renumber_test_cases();
        Ok(())
    }

    pub fn move_test_case(&mut self, index: usize, direction: Direction) {
        let len = self.test_cases.len();
        let target = match direction {
            Direction::Up if index > 0 && index < len => index - 1,
            Direction::Down if index + 1 < len => index + 1,
            _ => return,
        };
        self.test_cases.swap(index, target);
        self.renumber_test_cases();
    }

    // ── Gates ──

    /// Pre-submission gate: every test-case input must parse as a JSON
    /// object carrying a key for every declared parameter, and parameter
    /// names must be distinct. Returns the first failure.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for p in &self.parameters {
            if !seen.insert(p.name.as_str()) {
                return Err(Error::DuplicateParameter(p.name.clone()));
            }
        }

        for case in &self.test_cases {
            let parsed: JsonValue = serde_json::from_str(&case.input)
                .map_err(|_| Error::MalformedInput(case.input.clone()))?;
            let input = parsed
                .as_object()
                .ok_or_else(|| Error::MalformedInput(case.input.clone()))?;
            for p in &self.parameters {
                if !input.contains_key(&p.name) {
                    return Err(Error::MissingParameter(p.name.clone()));
                }
            }
        }
        Ok(())
    }

    /// Reduce the edit session to a generation request. Fails locally, before
    /// any network call: prerequisites as `MissingInformation`, an unparsable
    /// input as `InvalidTestCaseInput` naming the offending raw text.
    pub fn generation_request(&self) -> Result<DriverRequest> {
        if self.function_name.trim().is_empty() {
            return Err(Error::MissingInformation(
                "function name is required".to_string(),
            ));
        }
        if self.parameters.is_empty() {
            return Err(Error::MissingInformation(
                "at least one parameter is required".to_string(),
            ));
        }
        if self.test_cases.is_empty() {
            return Err(Error::MissingInformation(
                "at least one test case is required".to_string(),
            ));
        }

        let mut cases = Vec::with_capacity(self.test_cases.len());
        for case in &self.test_cases {
            let input: JsonValue = serde_json::from_str(&case.input)
                .map_err(|_| Error::InvalidTestCaseInput(case.input.clone()))?;
            cases.push(DriverTestCase {
                input,
                expected_output: case.expected_output.clone(),
                points: case.points,
            });
        }

        Ok(DriverRequest {
            function_name: self.function_name.clone(),
            return_type: self.return_type,
            parameters: self
                .parameters
                .iter()
                .map(|p| DriverParam {
                    name: p.name.clone(),
                    param_type: p.param_type,
                })
                .collect(),
            test_cases: cases,
        })
    }

    fn parameter_mut(&mut self, id: Uuid) -> Result<&mut Parameter> {
        self.parameters
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound("Parameter not found".to_string()))
    }

    fn test_case_mut(&mut self, id: Uuid) -> Result<&mut TestCase> {
        self.test_cases
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::NotFound("Test case not found".to_string()))
    }

    fn renumber_parameters(&mut self) {
        for (i, p) in self.parameters.iter_mut().enumerate() {
            p.display_order = i as i32;
        }
    }

    fn renumber_test_cases(&mut self) {
        for (i, t) in self.test_cases.iter_mut().enumerate() {
            t.display_order = i as i32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn editor_with_params(specs: &[(&str, &str)]) -> QuestionEditor {
        let mut editor = QuestionEditor::new();
        for (name, tag) in specs {
            let id = editor.add_parameter();
            editor.rename_parameter(id, *name).unwrap();
            editor.retype_parameter(id, tag.parse().unwrap()).unwrap();
        }
        editor
    }

    fn orders(editor: &QuestionEditor) -> Vec<i32> {
        editor.parameters().iter().map(|p| p.display_order).collect()
    }

    #[test]
    fn parameter_order_stays_dense() {
        let mut editor = editor_with_params(&[("a", "int"), ("b", "string"), ("c", "char")]);
        assert_eq!(orders(&editor), vec![0, 1, 2]);

        let b = editor.parameters()[1].id;
        editor.remove_parameter(b).unwrap();
        assert_eq!(orders(&editor), vec![0, 1]);
        assert_eq!(editor.parameters()[1].name, "c");

        editor.move_parameter(1, Direction::Up);
        assert_eq!(editor.parameters()[0].name, "c");
        assert_eq!(orders(&editor), vec![0, 1]);

        // Boundary moves are no-ops.
        editor.move_parameter(0, Direction::Up);
        editor.move_parameter(1, Direction::Down);
        editor.move_parameter(7, Direction::Down);
        assert_eq!(editor.parameters()[0].name, "c");
        assert_eq!(orders(&editor), vec![0, 1]);
    }

    #[test]
    fn test_case_order_stays_dense() {
        let mut editor = editor_with_params(&[("a", "int")]);
        let first = editor.add_test_case();
        let _second = editor.add_test_case();
        let _third = editor.add_test_case();

        editor.remove_test_case(first).unwrap();
        let orders: Vec<i32> = editor.test_cases().iter().map(|t| t.display_order).collect();
        assert_eq!(orders, vec![0, 1]);

        editor.move_test_case(0, Direction::Down);
        let orders: Vec<i32> = editor.test_cases().iter().map(|t| t.display_order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn default_input_round_trips() {
        let mut editor = editor_with_params(&[
            ("n", "int"),
            ("ratio", "double"),
            ("flags", "boolean[]"),
            ("letters", "char[]"),
            ("words", "string[]"),
        ]);
        let id = editor.add_test_case();
        let case = editor.test_cases().iter().find(|t| t.id == id).unwrap();
        let parsed: JsonValue = serde_json::from_str(&case.input).unwrap();
        assert_eq!(
            parsed,
            json!({
                "n": 0,
                "ratio": 0.0,
                "flags": [false, false],
                "letters": ["a", "b"],
                "words": ["", ""],
            })
        );
        assert_eq!(case.points, 1);
        assert!(!case.hidden);
    }

    #[test]
    fn scenario_valid_single_int() {
        let mut editor = editor_with_params(&[("a", "int")]);
        let id = editor.add_test_case();
        editor.set_test_case_value(id, "a", "5").unwrap();
        editor.set_expected_output(id, "5").unwrap();
        assert!(editor.validate().is_ok());
        // Validation is idempotent.
        assert!(editor.validate().is_ok());
    }

    #[test]
    fn scenario_missing_parameter_named() {
        let mut editor = editor_with_params(&[("a", "int")]);
        let id = editor.add_test_case();
        editor.set_test_case_value(id, "a", "5").unwrap();

        // A parameter added after the fact is not backfilled into existing
        // test cases; validation reports the gap.
        let b = editor.add_parameter();
        editor.rename_parameter(b, "b").unwrap();
        editor
            .retype_parameter(b, "string".parse().unwrap())
            .unwrap();

        let err = editor.validate().unwrap_err();
        assert!(matches!(err, Error::MissingParameter(name) if name == "b"));
    }

    #[test]
    fn scenario_malformed_input() {
        let mut editor = editor_with_params(&[("a", "int")]);
        let id = editor.add_test_case();
        editor
            .test_cases
            .iter_mut()
            .find(|t| t.id == id)
            .unwrap()
            .input = "not json".to_string();

        let err = editor.validate().unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn array_input_is_not_a_mapping() {
        let mut editor = editor_with_params(&[("a", "int")]);
        let id = editor.add_test_case();
        editor
            .test_cases
            .iter_mut()
            .find(|t| t.id == id)
            .unwrap()
            .input = "[1, 2]".to_string();

        let err = editor.validate().unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn scenario_comma_list_coerces_to_int_array() {
        let mut editor = editor_with_params(&[("xs", "int[]")]);
        let id = editor.add_test_case();
        editor.set_test_case_value(id, "xs", "1, 2, 3").unwrap();

        let case = editor.test_cases().iter().find(|t| t.id == id).unwrap();
        let parsed: JsonValue = serde_json::from_str(&case.input).unwrap();
        assert_eq!(parsed["xs"], json!([1, 2, 3]));
    }

    #[test]
    fn cell_edit_against_corrupt_input_is_rejected() {
        let mut editor = editor_with_params(&[("a", "int")]);
        let id = editor.add_test_case();
        editor
            .test_cases
            .iter_mut()
            .find(|t| t.id == id)
            .unwrap()
            .input = "{{broken".to_string();

        let err = editor.set_test_case_value(id, "a", "5").unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        // The stored input is left untouched.
        assert_eq!(editor.test_cases()[0].input, "{{broken");
    }

    #[test]
    fn retype_does_not_recoerce_existing_values() {
        let mut editor = editor_with_params(&[("a", "int")]);
        let id = editor.add_test_case();
        editor.set_test_case_value(id, "a", "7").unwrap();

        let a = editor.parameters()[0].id;
        editor.retype_parameter(a, "string".parse().unwrap()).unwrap();

        let parsed: JsonValue = serde_json::from_str(&editor.test_cases()[0].input).unwrap();
        assert_eq!(parsed["a"], json!(7));

        // The next cell edit applies the new type.
        editor.set_test_case_value(id, "a", "7").unwrap();
        let parsed: JsonValue = serde_json::from_str(&editor.test_cases()[0].input).unwrap();
        assert_eq!(parsed["a"], json!("7"));
    }

    #[test]
    fn duplicate_parameter_names_rejected() {
        let editor = editor_with_params(&[("a", "int"), ("a", "string")]);
        let err = editor.validate().unwrap_err();
        assert!(matches!(err, Error::DuplicateParameter(name) if name == "a"));
    }

    #[test]
    fn scenario_generation_without_test_cases() {
        let mut editor = editor_with_params(&[("a", "int")]);
        editor.set_function_name("solve");
        editor.set_return_type("int".parse().unwrap());

        let err = editor.generation_request().unwrap_err();
        assert!(matches!(err, Error::MissingInformation(_)));
    }

    #[test]
    fn generation_requires_function_name_and_parameters() {
        let mut editor = QuestionEditor::new();
        assert!(matches!(
            editor.generation_request().unwrap_err(),
            Error::MissingInformation(_)
        ));

        editor.set_function_name("  ");
        assert!(matches!(
            editor.generation_request().unwrap_err(),
            Error::MissingInformation(_)
        ));

        editor.set_function_name("solve");
        assert!(matches!(
            editor.generation_request().unwrap_err(),
            Error::MissingInformation(_)
        ));
    }

    #[test]
    fn generation_request_carries_parsed_inputs() {
        let mut editor = editor_with_params(&[("a", "int"), ("b", "string")]);
        editor.set_function_name("concat");
        editor.set_return_type("string".parse().unwrap());
        let id = editor.add_test_case();
        editor.set_test_case_value(id, "a", "4").unwrap();
        editor.set_test_case_value(id, "b", "x").unwrap();
        editor.set_expected_output(id, "4x").unwrap();
        editor.set_points(id, 3).unwrap();

        let request = editor.generation_request().unwrap();
        assert_eq!(request.function_name, "concat");
        assert_eq!(request.parameters.len(), 2);
        assert_eq!(request.test_cases.len(), 1);
        assert_eq!(request.test_cases[0].input, json!({"a": 4, "b": "x"}));
        assert_eq!(request.test_cases[0].expected_output, "4x");
        assert_eq!(request.test_cases[0].points, 3);
    }

    #[test]
    fn generation_fails_fast_on_unparsable_input() {
        let mut editor = editor_with_params(&[("a", "int")]);
        editor.set_function_name("solve");
        let id = editor.add_test_case();
        editor
            .test_cases
            .iter_mut()
            .find(|t| t.id == id)
            .unwrap()
            .input = "oops".to_string();

        let err = editor.generation_request().unwrap_err();
        assert!(matches!(err, Error::InvalidTestCaseInput(raw) if raw == "oops"));
    }

    #[test]
    fn load_restores_dense_order_from_sparse_records() {
        let params = vec![
            Parameter {
                id: Uuid::new_v4(),
                name: "b".to_string(),
                param_type: "string".parse().unwrap(),
                display_order: 7,
            },
            Parameter {
                id: Uuid::new_v4(),
                name: "a".to_string(),
                param_type: "int".parse().unwrap(),
                display_order: 2,
            },
        ];
        let editor = QuestionEditor::load("f".to_string(), ReturnType::Void, params, vec![]);
        assert_eq!(editor.parameters()[0].name, "a");
        assert_eq!(orders(&editor), vec![0, 1]);
    }
}
