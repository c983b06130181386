use crate::dto::question_dto::{
    CreateQuestionPayload, ParameterPayload, TestCasePayload, UpdateQuestionPayload,
};
use crate::error::{Error, Result};
use crate::models::driver_code::DriverCode;
use crate::models::param_type::ReturnType;
use crate::models::parameter::Parameter;
use crate::models::question::{Question, QuestionKind};
use crate::models::test_case::TestCase;
use crate::services::editor_service::QuestionEditor;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

#[derive(Debug, serde::Serialize)]
pub struct QuestionBundle {
    #[serde(flatten)]
    pub question: Question,
    pub parameters: Vec<Parameter>,
    pub test_cases: Vec<TestCase>,
    pub driver_code: Option<DriverCode>,
}

#[derive(FromRow)]
struct QuestionRow {
    id: Uuid,
    quiz_id: Uuid,
    kind: String,
    prompt: String,
    points: i32,
    display_order: i32,
    options: Option<JsonValue>,
    correct_option: Option<i32>,
    function_name: Option<String>,
    return_type: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<QuestionRow> for Question {
    type Error = Error;

    fn try_from(row: QuestionRow) -> Result<Self> {
        Ok(Question {
            id: row.id,
            quiz_id: row.quiz_id,
            kind: row.kind.parse()?,
            prompt: row.prompt,
            points: row.points,
            display_order: row.display_order,
            options: row.options,
            correct_option: row.correct_option,
            function_name: row.function_name,
            return_type: row.return_type.as_deref().map(str::parse).transpose()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ParameterRow {
    id: Uuid,
    name: String,
    param_type: String,
    display_order: i32,
}

impl TryFrom<ParameterRow> for Parameter {
    type Error = Error;

    fn try_from(row: ParameterRow) -> Result<Self> {
        Ok(Parameter {
            id: row.id,
            name: row.name,
            param_type: row.param_type.parse()?,
            display_order: row.display_order,
        })
    }
}

const QUESTION_COLUMNS: &str = "id, quiz_id, kind, prompt, points, display_order, options, \
     correct_option, function_name, return_type, created_at, updated_at";

#[derive(Clone)]
pub struct QuestionService {
    pool: PgPool,
}

impl QuestionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_question(
        &self,
        quiz_id: Uuid,
        payload: CreateQuestionPayload,
    ) -> Result<QuestionBundle> {
        let _: (Uuid,) = sqlx::query_as("SELECT id FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .fetch_one(&self.pool)
            .await?;

        match payload.kind {
            QuestionKind::MultipleChoice => self.create_multiple_choice(quiz_id, payload).await,
            QuestionKind::Coding => self.create_coding(quiz_id, payload).await,
        }
    }

    async fn create_multiple_choice(
        &self,
        quiz_id: Uuid,
        payload: CreateQuestionPayload,
    ) -> Result<QuestionBundle> {
        let options = payload
            .options
            .ok_or_else(|| Error::BadRequest("Multiple choice questions require options".to_string()))?;
        let correct = payload.correct_option.ok_or_else(|| {
            Error::BadRequest("Multiple choice questions require a correct option".to_string())
        })?;
        check_correct_option(options.len(), correct)?;

        let display_order = self.next_display_order(quiz_id).await?;
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            r#"
            INSERT INTO questions (quiz_id, kind, prompt, points, display_order, options, correct_option)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {QUESTION_COLUMNS}
            "#
        ))
        .bind(quiz_id)
        .bind(QuestionKind::MultipleChoice.to_string())
        .bind(&payload.prompt)
        .bind(payload.points)
        .bind(display_order)
        .bind(serde_json::to_value(&options)?)
        .bind(correct)
        .fetch_one(&self.pool)
        .await?;

        Ok(QuestionBundle {
            question: row.try_into()?,
            parameters: Vec::new(),
            test_cases: Vec::new(),
            driver_code: None,
        })
    }

    async fn create_coding(
        &self,
        quiz_id: Uuid,
        payload: CreateQuestionPayload,
    ) -> Result<QuestionBundle> {
        let function_name = payload
            .function_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| Error::MissingInformation("function name is required".to_string()))?;
        let return_type = payload
            .return_type
            .ok_or_else(|| Error::MissingInformation("return type is required".to_string()))?;

        let editor = editor_from_payload(
            function_name.clone(),
            return_type,
            payload.parameters.unwrap_or_default(),
            payload.test_cases.unwrap_or_default(),
        );
        // The single hard gate before a question and its test cases hit the
        // store.
        editor.validate()?;
        let (parameters, test_cases) = editor.into_parts();

        let display_order = self.next_display_order(quiz_id).await?;
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            r#"
            INSERT INTO questions (quiz_id, kind, prompt, points, display_order, function_name, return_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {QUESTION_COLUMNS}
            "#
        ))
        .bind(quiz_id)
        .bind(QuestionKind::Coding.to_string())
        .bind(&payload.prompt)
        .bind(payload.points)
        .bind(display_order)
        .bind(&function_name)
        .bind(return_type.to_string())
        .fetch_one(&mut *tx)
        .await?;

        insert_children(&mut tx, row.id, &parameters, &test_cases).await?;

        let driver_code = DriverCode::boilerplate(row.id, &function_name);
        sqlx::query(
            "INSERT INTO driver_codes (question_id, java_code, python_code) VALUES ($1, $2, $3)",
        )
        .bind(driver_code.question_id)
        .bind(&driver_code.java_code)
        .bind(&driver_code.python_code)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(QuestionBundle {
            question: row.try_into()?,
            parameters,
            test_cases,
            driver_code: Some(driver_code),
        })
    }

    pub async fn get_question(&self, question_id: Uuid) -> Result<QuestionBundle> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"
        ))
        .bind(question_id)
        .fetch_one(&self.pool)
        .await?;

        self.load_children(row.try_into()?).await
    }

    pub async fn list_questions(&self, quiz_id: Uuid) -> Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE quiz_id = $1 ORDER BY display_order"
        ))
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Save an existing question. For coding questions the parameter and
    /// test-case sets are replaced wholesale (delete all, re-insert), never
    /// diffed.
    pub async fn update_question(
        &self,
        question_id: Uuid,
        payload: UpdateQuestionPayload,
    ) -> Result<QuestionBundle> {
        let existing = self.get_question(question_id).await?;

        match existing.question.kind {
            QuestionKind::MultipleChoice => {
                self.update_multiple_choice(existing, payload).await
            }
            QuestionKind::Coding => self.update_coding(existing, payload).await,
        }
    }

    async fn update_multiple_choice(
        &self,
        existing: QuestionBundle,
        payload: UpdateQuestionPayload,
    ) -> Result<QuestionBundle> {
        let option_count = match &payload.options {
            Some(options) => options.len(),
            None => existing
                .question
                .options
                .as_ref()
                .and_then(|v| v.as_array())
                .map(|a| a.len())
                .unwrap_or(0),
        };
        if let Some(correct) = payload.correct_option.or(existing.question.correct_option) {
            check_correct_option(option_count, correct)?;
        }

        let options_json = match payload.options {
            Some(options) => Some(serde_json::to_value(options)?),
            None => None,
        };

        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            r#"
            UPDATE questions
            SET
                prompt = COALESCE($1, prompt),
                points = COALESCE($2, points),
                options = COALESCE($3, options),
                correct_option = COALESCE($4, correct_option),
                updated_at = NOW()
            WHERE id = $5
            RETURNING {QUESTION_COLUMNS}
            "#
        ))
        .bind(&payload.prompt)
        .bind(payload.points)
        .bind(options_json)
        .bind(payload.correct_option)
        .bind(existing.question.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(QuestionBundle {
            question: row.try_into()?,
            parameters: Vec::new(),
            test_cases: Vec::new(),
            driver_code: None,
        })
    }

    async fn update_coding(
        &self,
        existing: QuestionBundle,
        payload: UpdateQuestionPayload,
    ) -> Result<QuestionBundle> {
        let question_id = existing.question.id;
        let function_name = payload
            .function_name
            .clone()
            .or(existing.question.function_name)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| Error::MissingInformation("function name is required".to_string()))?;
        let return_type: ReturnType = payload
            .return_type
            .or(existing.question.return_type)
            .ok_or_else(|| Error::MissingInformation("return type is required".to_string()))?;

        let parameters = match payload.parameters {
            Some(params) => payload_parameters(params),
            None => existing.parameters,
        };
        let test_cases = match payload.test_cases {
            Some(cases) => payload_test_cases(cases),
            None => existing.test_cases,
        };

        let editor = QuestionEditor::load(function_name.clone(), return_type, parameters, test_cases);
        editor.validate()?;
        let (parameters, test_cases) = editor.into_parts();

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            r#"
            UPDATE questions
            SET
                prompt = COALESCE($1, prompt),
                points = COALESCE($2, points),
                function_name = $3,
                return_type = $4,
                updated_at = NOW()
            WHERE id = $5
            RETURNING {QUESTION_COLUMNS}
            "#
        ))
        .bind(&payload.prompt)
        .bind(payload.points)
        .bind(&function_name)
        .bind(return_type.to_string())
        .bind(question_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM parameters WHERE question_id = $1")
            .bind(question_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM test_cases WHERE question_id = $1")
            .bind(question_id)
            .execute(&mut *tx)
            .await?;
        insert_children(&mut tx, question_id, &parameters, &test_cases).await?;

        tx.commit().await?;

        Ok(QuestionBundle {
            question: row.try_into()?,
            parameters,
            test_cases,
            driver_code: existing.driver_code,
        })
    }

    pub async fn delete_question(&self, question_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Overwrite the question's driver code wholesale.
    pub async fn save_driver_code(&self, driver: &DriverCode) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO driver_codes (question_id, java_code, python_code)
            VALUES ($1, $2, $3)
            ON CONFLICT (question_id)
            DO UPDATE SET java_code = EXCLUDED.java_code, python_code = EXCLUDED.python_code
            "#,
        )
        .bind(driver.question_id)
        .bind(&driver.java_code)
        .bind(&driver.python_code)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Rebuild an edit session from a loaded coding-question bundle.
    pub fn editor_for(bundle: &QuestionBundle) -> Result<QuestionEditor> {
        let function_name = bundle
            .question
            .function_name
            .clone()
            .ok_or_else(|| Error::BadRequest("Not a coding question".to_string()))?;
        let return_type = bundle
            .question
            .return_type
            .ok_or_else(|| Error::BadRequest("Not a coding question".to_string()))?;
        Ok(QuestionEditor::load(
            function_name,
            return_type,
            bundle.parameters.clone(),
            bundle.test_cases.clone(),
        ))
    }

    async fn next_display_order(&self, quiz_id: Uuid) -> Result<i32> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE quiz_id = $1")
            .bind(quiz_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as i32)
    }

    async fn load_children(&self, question: Question) -> Result<QuestionBundle> {
        if question.kind != QuestionKind::Coding {
            return Ok(QuestionBundle {
                question,
                parameters: Vec::new(),
                test_cases: Vec::new(),
                driver_code: None,
            });
        }

        let parameter_rows = sqlx::query_as::<_, ParameterRow>(
            "SELECT id, name, param_type, display_order FROM parameters \
             WHERE question_id = $1 ORDER BY display_order",
        )
        .bind(question.id)
        .fetch_all(&self.pool)
        .await?;
        let parameters = parameter_rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>>>()?;

        let test_cases = sqlx::query_as::<_, TestCase>(
            "SELECT id, input, expected_output, hidden, points, display_order FROM test_cases \
             WHERE question_id = $1 ORDER BY display_order",
        )
        .bind(question.id)
        .fetch_all(&self.pool)
        .await?;

        let driver_code = sqlx::query_as::<_, DriverCode>(
            "SELECT question_id, java_code, python_code FROM driver_codes WHERE question_id = $1",
        )
        .bind(question.id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(QuestionBundle {
            question,
            parameters,
            test_cases,
            driver_code,
        })
    }
}

fn check_correct_option(option_count: usize, correct: i32) -> Result<()> {
    if option_count < 2 {
        return Err(Error::BadRequest(
            "Multiple choice questions require at least two options".to_string(),
        ));
    }
    if correct < 0 || correct as usize >= option_count {
        return Err(Error::BadRequest(
            "Correct option index is out of range".to_string(),
        ));
    }
    Ok(())
}

fn payload_parameters(params: Vec<ParameterPayload>) -> Vec<Parameter> {
    params
        .into_iter()
        .enumerate()
        .map(|(i, p)| Parameter {
            id: Uuid::new_v4(),
            name: p.name,
            param_type: p.param_type,
            display_order: i as i32,
        })
        .collect()
}

fn payload_test_cases(cases: Vec<TestCasePayload>) -> Vec<TestCase> {
    cases
        .into_iter()
        .enumerate()
        .map(|(i, c)| TestCase {
            id: Uuid::new_v4(),
            input: c.input,
            expected_output: c.expected_output,
            hidden: c.hidden,
            points: c.points,
            display_order: i as i32,
        })
        .collect()
}

async fn insert_children(
    tx: &mut Transaction<'_, Postgres>,
    question_id: Uuid,
    parameters: &[Parameter],
    test_cases: &[TestCase],
) -> Result<()> {
    for p in parameters {
        sqlx::query(
            "INSERT INTO parameters (id, question_id, name, param_type, display_order) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(p.id)
        .bind(question_id)
        .bind(&p.name)
        .bind(p.param_type.to_string())
        .bind(p.display_order)
        .execute(&mut **tx)
        .await?;
    }
    for t in test_cases {
        sqlx::query(
            "INSERT INTO test_cases (id, question_id, input, expected_output, hidden, points, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(t.id)
        .bind(question_id)
        .bind(&t.input)
        .bind(&t.expected_output)
        .bind(t.hidden)
        .bind(t.points)
        .bind(t.display_order)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

fn editor_from_payload(
    function_name: String,
    return_type: ReturnType,
    params: Vec<ParameterPayload>,
    cases: Vec<TestCasePayload>,
) -> QuestionEditor {
    QuestionEditor::load(
        function_name,
        return_type,
        payload_parameters(params),
        payload_test_cases(cases),
    )
}
