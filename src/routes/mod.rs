pub mod attempt;
pub mod export;
pub mod health;
pub mod question;
pub mod quiz;
