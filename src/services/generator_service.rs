use crate::error::{Error, Result};
use crate::models::driver_code::DriverCode;
use crate::models::param_type::{ParamType, ReturnType};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::time::Duration;
use uuid::Uuid;

/// Request shape sent to the remote driver-code generator: the finalized
/// function signature plus the test cases reduced to graded triples.
#[derive(Debug, Clone, Serialize)]
pub struct DriverRequest {
    pub function_name: String,
    pub return_type: ReturnType,
    pub parameters: Vec<DriverParam>,
    pub test_cases: Vec<DriverTestCase>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverParam {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverTestCase {
    pub input: JsonValue,
    pub expected_output: String,
    pub points: i32,
}

#[derive(Clone)]
pub struct GeneratorService {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeneratorService {
    pub fn new(endpoint: String, api_key: String, client: Client) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }

    /// Call the remote generator and return the question's new driver code.
    ///
    /// A transport failure or a non-success status surfaces the remote
    /// message as `GenerationFailed`; a success body lacking either source
    /// string is `InvalidGeneratorResponse`.
    pub async fn generate_driver(
        &self,
        question_id: Uuid,
        request: &DriverRequest,
    ) -> Result<DriverCode> {
        tracing::info!(%question_id, function = %request.function_name, "requesting driver generation");

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .timeout(Duration::from_secs(120))
            .send()
            .await
            .map_err(|e| Error::GenerationFailed(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::GenerationFailed(format!("{}: {}", status, text)));
        }

        let body: JsonValue = res
            .json()
            .await
            .map_err(|e| Error::GenerationFailed(e.to_string()))?;

        Self::parse_response(question_id, &body)
    }

    pub fn parse_response(question_id: Uuid, body: &JsonValue) -> Result<DriverCode> {
        let java = body.get("java_code").and_then(|v| v.as_str());
        let python = body.get("python_code").and_then(|v| v.as_str());
        match (java, python) {
            (Some(java), Some(python)) => Ok(DriverCode {
                question_id,
                java_code: java.to_string(),
                python_code: python.to_string(),
            }),
            _ => Err(Error::InvalidGeneratorResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_response_accepts_both_sources() {
        let question_id = Uuid::new_v4();
        let body = json!({"java_code": "class D {}", "python_code": "pass"});
        let driver = GeneratorService::parse_response(question_id, &body).unwrap();
        assert_eq!(driver.question_id, question_id);
        assert_eq!(driver.java_code, "class D {}");
        assert_eq!(driver.python_code, "pass");
    }

    #[test]
    fn parse_response_rejects_missing_source() {
        let body = json!({"java_code": "class D {}"});
        let err = GeneratorService::parse_response(Uuid::new_v4(), &body).unwrap_err();
        assert!(matches!(err, Error::InvalidGeneratorResponse));

        let body = json!({"java_code": "class D {}", "python_code": 42});
        let err = GeneratorService::parse_response(Uuid::new_v4(), &body).unwrap_err();
        assert!(matches!(err, Error::InvalidGeneratorResponse));
    }

    #[test]
    fn request_serializes_type_tags() {
        let request = DriverRequest {
            function_name: "sum".to_string(),
            return_type: "int".parse().unwrap(),
            parameters: vec![DriverParam {
                name: "xs".to_string(),
                param_type: "int[]".parse().unwrap(),
            }],
            test_cases: vec![DriverTestCase {
                input: json!({"xs": [1, 2]}),
                expected_output: "3".to_string(),
                points: 1,
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["return_type"], json!("int"));
        assert_eq!(value["parameters"][0]["type"], json!("int[]"));
        assert_eq!(value["test_cases"][0]["input"]["xs"], json!([1, 2]));
    }
}
