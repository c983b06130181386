use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Generated harness source tied one-to-one to a coding question, one string
/// per target language. Overwritten wholesale on regeneration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriverCode {
    pub question_id: Uuid,
    pub java_code: String,
    pub python_code: String,
}

impl DriverCode {
    /// Static boilerplate assigned to a freshly created coding question
    /// before any generation has been requested.
    pub fn boilerplate(question_id: Uuid, function_name: &str) -> Self {
        Self {
            question_id,
            java_code: format!(
                "public class Driver {{\n    // calls {}() against each test case\n    public static void main(String[] args) {{\n    }}\n}}\n",
                function_name
            ),
            python_code: format!(
                "# calls {}() against each test case\nif __name__ == \"__main__\":\n    pass\n",
                function_name
            ),
        }
    }
}
