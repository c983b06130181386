use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn admin_api_end_to_end() {
    dotenvy::dotenv().ok();
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("GENERATOR_URL", "http://localhost/generate");
    env::set_var("GENERATOR_API_KEY", "gen-test");
    env::set_var("ADMIN_RPS", "100");
    env::set_var("PUBLIC_RPS", "100");

    quiz_console_backend::config::init_config().expect("init config");

    let pool = quiz_console_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let app_state = quiz_console_backend::AppState::new(pool.clone());
    let app = Router::new()
        .route(
            "/api/admin/quizzes",
            post(quiz_console_backend::routes::quiz::create_quiz),
        )
        .route(
            "/api/admin/quizzes/:id/questions",
            post(quiz_console_backend::routes::question::create_question),
        )
        .route(
            "/api/admin/questions/:id",
            get(quiz_console_backend::routes::question::get_question)
                .patch(quiz_console_backend::routes::question::update_question),
        )
        .route(
            "/api/admin/quizzes/:id/export",
            get(quiz_console_backend::routes::export::export_results_csv),
        )
        .layer(axum::middleware::from_fn(
            quiz_console_backend::middleware::auth::require_admin,
        ))
        .with_state(app_state.clone());

    let author_id = Uuid::new_v4();
    #[derive(serde::Serialize)]
    struct Claims {
        sub: String,
        exp: usize,
        role: Option<String>,
    }
    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
    let token = encode(
        &Header::default(),
        &Claims {
            sub: author_id.to_string(),
            exp,
            role: Some("admin".into()),
        },
        &EncodingKey::from_secret(
            quiz_console_backend::config::get_config()
                .jwt_secret
                .as_bytes(),
        ),
    )
    .expect("sign token");
    let auth = format!("Bearer {}", token);

    let create_quiz_body = json!({
        "title": "IT Quiz",
        "description": "Desc",
        "duration_minutes": 45,
        "passing_score": 70.0,
        "shuffle_questions": false
    });
    let req = Request::builder()
        .method("POST")
        .uri("/api/admin/quizzes")
        .header("content-type", "application/json")
        .header("authorization", auth.clone())
        .body(Body::from(create_quiz_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let quiz: JsonValue = serde_json::from_slice(&bytes).unwrap();
    let quiz_id = Uuid::parse_str(quiz["id"].as_str().unwrap()).unwrap();

    let create_question_body = json!({
        "kind": "coding",
        "prompt": "Sum the array",
        "points": 5,
        "function_name": "sum_all",
        "return_type": "int",
        "parameters": [
            {"name": "xs", "type": "int[]"}
        ],
        "test_cases": [
            {"input": "{\"xs\": [1, 2, 3]}", "expected_output": "6", "hidden": false, "points": 1}
        ]
    });
    let req = Request::builder()
        .method("POST")
        .uri(format!("/api/admin/quizzes/{}/questions", quiz_id))
        .header("content-type", "application/json")
        .header("authorization", auth.clone())
        .body(Body::from(create_question_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let question: JsonValue = serde_json::from_slice(&bytes).unwrap();
    let question_id = Uuid::parse_str(question["id"].as_str().unwrap()).unwrap();
    assert_eq!(question["parameters"][0]["type"], json!("int[]"));
    assert!(question["driver_code"]["java_code"].as_str().is_some());

    // Saving with a new parameter set replaces children wholesale.
    let update_body = json!({
        "parameters": [
            {"name": "xs", "type": "int[]"},
            {"name": "start", "type": "int"}
        ],
        "test_cases": [
            {"input": "{\"xs\": [1, 2, 3], \"start\": 0}", "expected_output": "6"}
        ]
    });
    let req = Request::builder()
        .method("PATCH")
        .uri(format!("/api/admin/questions/{}", question_id))
        .header("content-type", "application/json")
        .header("authorization", auth.clone())
        .body(Body::from(update_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let req = Request::builder()
        .method("GET")
        .uri(format!("/api/admin/questions/{}", question_id))
        .header("authorization", auth.clone())
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let reloaded: JsonValue = serde_json::from_slice(&bytes).unwrap();
    let params = reloaded["parameters"].as_array().unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(params[1]["name"], json!("start"));
    assert_eq!(params[1]["display_order"], json!(1));

    // A save whose test cases miss a declared parameter is rejected.
    let invalid_update = json!({
        "parameters": [
            {"name": "xs", "type": "int[]"},
            {"name": "start", "type": "int"}
        ],
        "test_cases": [
            {"input": "{\"xs\": [1]}", "expected_output": "1"}
        ]
    });
    let req = Request::builder()
        .method("PATCH")
        .uri(format!("/api/admin/questions/{}", question_id))
        .header("content-type", "application/json")
        .header("authorization", auth.clone())
        .body(Body::from(invalid_update.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The owner can export results as a data URL.
    let req = Request::builder()
        .method("GET")
        .uri(format!("/api/admin/quizzes/{}/export", quiz_id))
        .header("authorization", auth)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let export: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert!(export["url"]
        .as_str()
        .unwrap()
        .starts_with("data:text/csv;base64,"));
}
