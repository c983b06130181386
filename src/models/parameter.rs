use crate::models::param_type::ParamType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A typed parameter of a coding question's solution function.
///
/// `display_order` is a dense zero-based index; every editor operation that
/// touches the parameter list renumbers it to stay a permutation of
/// `[0, count)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub display_order: i32,
}
