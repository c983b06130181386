use crate::models::question::{Question, QuestionKind};
use serde_json::{json, Value as JsonValue};

pub struct GradingService;

#[derive(Debug, Clone)]
pub struct GradeOutcome {
    pub earned_points: i32,
    pub max_points: i32,
    pub breakdown: Vec<JsonValue>,
}

impl GradingService {
    /// Grade a submission against a quiz's questions.
    ///
    /// Multiple-choice answers compare the selected index to the stored
    /// correct index. Coding answers carry the runner's per-case pass counts
    /// and score proportionally to the question's points.
    pub fn grade(questions: &[Question], answers: &[JsonValue]) -> GradeOutcome {
        let mut earned_points: i32 = 0;
        let mut max_points: i32 = 0;
        let mut breakdown: Vec<JsonValue> = Vec::new();

        for q in questions {
            max_points += q.points;
            let question_id = q.id.to_string();
            let answer = answers.iter().find(|a| {
                a.get("question_id").and_then(|v| v.as_str()) == Some(question_id.as_str())
            });
            let given = answer
                .and_then(|a| a.get("answer").cloned())
                .unwrap_or(JsonValue::Null);

            match q.kind {
                QuestionKind::MultipleChoice => {
                    let selected = given
                        .as_i64()
                        .or_else(|| given.get("selected").and_then(|v| v.as_i64()));
                    let is_correct = matches!(
                        (selected, q.correct_option),
                        (Some(sel), Some(correct)) if sel == correct as i64
                    );
                    let points_earned = if is_correct { q.points } else { 0 };
                    earned_points += points_earned;
                    breakdown.push(json!({
                        "question_id": question_id,
                        "type": "multiple_choice",
                        "selected": selected,
                        "correct_option": q.correct_option,
                        "points_earned": points_earned,
                        "max_points": q.points,
                        "is_correct": is_correct,
                    }));
                }
                QuestionKind::Coding => {
                    let passed = given.get("passed_cases").and_then(|v| v.as_i64()).unwrap_or(0);
                    let total = given.get("total_cases").and_then(|v| v.as_i64()).unwrap_or(0);
                    let points_earned = if total > 0 {
                        let ratio = (passed.clamp(0, total) as f64) / (total as f64);
                        ((q.points as f64) * ratio).round() as i32
                    } else {
                        0
                    };
                    earned_points += points_earned;
                    breakdown.push(json!({
                        "question_id": question_id,
                        "type": "coding",
                        "passed_cases": passed,
                        "total_cases": total,
                        "points_earned": points_earned,
                        "max_points": q.points,
                        "is_correct": total > 0 && passed >= total,
                    }));
                }
            }
        }

        GradeOutcome {
            earned_points,
            max_points,
            breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn mcq(points: i32, correct: i32) -> Question {
        Question {
            id: Uuid::new_v4(),
            quiz_id: Uuid::new_v4(),
            kind: QuestionKind::MultipleChoice,
            prompt: "pick one".to_string(),
            points,
            display_order: 0,
            options: Some(json!(["a", "b", "c", "d"])),
            correct_option: Some(correct),
            function_name: None,
            return_type: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn coding(points: i32) -> Question {
        Question {
            id: Uuid::new_v4(),
            quiz_id: Uuid::new_v4(),
            kind: QuestionKind::Coding,
            prompt: "write a function".to_string(),
            points,
            display_order: 1,
            options: None,
            correct_option: None,
            function_name: Some("solve".to_string()),
            return_type: Some("int".parse().unwrap()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn full_marks_for_all_correct() {
        let questions = vec![mcq(2, 1), mcq(3, 0)];
        let answers = vec![
            json!({"question_id": questions[0].id.to_string(), "answer": 1}),
            json!({"question_id": questions[1].id.to_string(), "answer": 0}),
        ];
        let outcome = GradingService::grade(&questions, &answers);
        assert_eq!(outcome.earned_points, 5);
        assert_eq!(outcome.max_points, 5);
        assert!(outcome.breakdown.iter().all(|b| b["is_correct"] == json!(true)));
    }

    #[test]
    fn wrong_and_missing_answers_score_zero() {
        let questions = vec![mcq(2, 1), mcq(3, 2)];
        let answers = vec![json!({"question_id": questions[0].id.to_string(), "answer": 3})];
        let outcome = GradingService::grade(&questions, &answers);
        assert_eq!(outcome.earned_points, 0);
        assert_eq!(outcome.max_points, 5);
    }

    #[test]
    fn selected_object_form_is_accepted() {
        let questions = vec![mcq(1, 2)];
        let answers = vec![json!({
            "question_id": questions[0].id.to_string(),
            "answer": {"selected": 2}
        })];
        let outcome = GradingService::grade(&questions, &answers);
        assert_eq!(outcome.earned_points, 1);
    }

    #[test]
    fn coding_scores_proportionally() {
        let questions = vec![coding(10)];
        let answers = vec![json!({
            "question_id": questions[0].id.to_string(),
            "answer": {"passed_cases": 3, "total_cases": 4}
        })];
        let outcome = GradingService::grade(&questions, &answers);
        assert_eq!(outcome.earned_points, 8);
        assert_eq!(outcome.max_points, 10);
        assert_eq!(outcome.breakdown[0]["is_correct"], json!(false));
    }

    #[test]
    fn coding_with_no_cases_scores_zero() {
        let questions = vec![coding(10)];
        let answers = vec![json!({
            "question_id": questions[0].id.to_string(),
            "answer": {"passed_cases": 0, "total_cases": 0}
        })];
        let outcome = GradingService::grade(&questions, &answers);
        assert_eq!(outcome.earned_points, 0);
    }
}
