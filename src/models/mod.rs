pub mod attempt;
pub mod driver_code;
pub mod param_type;
pub mod parameter;
pub mod question;
pub mod quiz;
pub mod test_case;
