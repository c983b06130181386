pub mod attempt_service;
pub mod editor_service;
pub mod export_service;
pub mod generator_service;
pub mod grading_service;
pub mod question_service;
pub mod quiz_service;
