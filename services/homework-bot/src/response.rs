//! Shape checks for the homework status API payload

use serde_json::Value;

pub const HOMEWORKS_FIELD: &str = "homeworks";
pub const CURRENT_DATE_FIELD: &str = "current_date";

/// Ways a payload can fail the shape check
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    #[error("response is not a JSON object")]
    NotAMapping,

    #[error("response has no \"{0}\" field")]
    MissingField(&'static str),

    #[error("\"homeworks\" is not a list")]
    WrongType,
}

/// A payload that passed [`validate`], borrowing from the original value
#[derive(Debug, Clone, Copy)]
pub struct CheckedResponse<'a> {
    pub homeworks: &'a [Value],
    /// Server time of the response, when the API sends one
    pub current_date: Option<&'a Value>,
}

impl<'a> CheckedResponse<'a> {
    /// The most recently updated record, which the API lists first
    pub fn latest(&self) -> Option<&'a Value> {
        self.homeworks.first()
    }
}

/// Check that `response` is an object with a list of homeworks.
///
/// `current_date` is carried through when present but never required.
pub fn validate(response: &Value) -> Result<CheckedResponse<'_>, ResponseError> {
    let object = response.as_object().ok_or(ResponseError::NotAMapping)?;

    let homeworks = object
        .get(HOMEWORKS_FIELD)
        .ok_or(ResponseError::MissingField(HOMEWORKS_FIELD))?;
    let current_date = object.get(CURRENT_DATE_FIELD);

    let homeworks = homeworks.as_array().ok_or(ResponseError::WrongType)?;

    Ok(CheckedResponse {
        homeworks: homeworks.as_slice(),
        current_date,
    })
}
