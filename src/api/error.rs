use thiserror::Error;

/// Failure of a call to the course backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    /// no response was received, the detail is only kept for logs
    #[error("Network Error")]
    Network(String),

    /// the server rejected the request, its body is what users get to see
    #[error("{}", server_message(.status, .body))]
    Server { status: u16, body: String },

    #[error("Failed to read response body: {0}")]
    Decode(String),
}

fn server_message(status: &u16, body: &str) -> String {
    if body.trim().is_empty() {
        format!("Server returned an error: {}", status)
    } else {
        body.to_string()
    }
}

impl From<ureq::Error> for RequestError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(status, response) => RequestError::Server {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => RequestError::Network(transport.to_string()),
        }
    }
}

/// Extracts the id the backend answers a create call with, either a bare
/// number or a JSON object carrying `id`.
pub fn created_id(body: &str) -> Option<i64> {
    let body = body.trim();
    if let Ok(id) = body.parse::<i64>() {
        return Some(id);
    }

    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("id").and_then(|id| id.as_i64()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_surface_body_verbatim() {
        let response = ureq::Response::new(409, "Conflict", "Chapter name already taken").unwrap();
        let err = RequestError::from(ureq::Error::Status(409, response));

        assert_eq!(
            err,
            RequestError::Server {
                status: 409,
                body: "Chapter name already taken".into()
            }
        );
        assert_eq!(err.to_string(), "Chapter name already taken");
    }

    #[test]
    fn empty_bodies_fall_back_to_status() {
        let err = RequestError::Server {
            status: 500,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "Server returned an error: 500");
    }

    #[test]
    fn network_errors_are_generic() {
        let err = RequestError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network Error");
    }

    #[test]
    fn reads_created_ids() {
        assert_eq!(created_id("42"), Some(42));
        assert_eq!(created_id(" 7\n"), Some(7));
        assert_eq!(created_id(r#"{"id": 9, "name": "x"}"#), Some(9));
        assert_eq!(created_id("created"), None);
    }
}
