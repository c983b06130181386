pub mod attempt_dto;
pub mod question_dto;
pub mod quiz_dto;
