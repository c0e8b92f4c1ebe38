use serde::{Deserialize, Serialize};

use super::RequestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Uniform envelope views consume: exactly one of `ok` / `err` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub ok: Option<T>,
    pub err: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(value: T) -> Self {
        Self {
            status: ResponseStatus::Ok,
            ok: Some(value),
            err: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            ok: None,
            err: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResponseStatus::Ok
    }

    pub fn into_result(self) -> Result<T, String> {
        match (self.status, self.ok) {
            (ResponseStatus::Ok, Some(value)) => Ok(value),
            (_, _) => Err(self.err.unwrap_or_else(|| String::from("Unknown error"))),
        }
    }
}

impl<T> From<Result<T, RequestError>> for ApiResponse<T> {
    fn from(result: Result<T, RequestError>) -> Self {
        match result {
            Ok(value) => ApiResponse::ok(value),
            Err(e) => ApiResponse::err(e.to_string()),
        }
    }
}
