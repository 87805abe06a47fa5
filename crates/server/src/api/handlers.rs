pub mod comments;
pub mod moderation;
pub mod notifications;
pub mod votes;

use axum::http::HeaderMap;

use crate::error::{AppError, AppResult};

/// Header carrying the caller's user id. Authentication itself is
/// upstream; the engine trusts the id it is handed.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity for mutating endpoints; missing or malformed is 401.
pub fn require_user(headers: &HeaderMap) -> AppResult<i64> {
    optional_user(headers)?
        .ok_or_else(|| AppError::unauthorized(format!("Missing {} header", USER_ID_HEADER)))
}

/// Caller identity for read endpoints; absent means an anonymous viewer.
pub fn optional_user(headers: &HeaderMap) -> AppResult<Option<i64>> {
    let Some(value) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    let id = value
        .to_str()
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| {
            AppError::unauthorized(format!("Invalid {} header", USER_ID_HEADER))
        })?;
    Ok(Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_user_header_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(optional_user(&headers).unwrap(), None);
        assert!(matches!(
            require_user(&headers),
            Err(AppError::Unauthorized(_))
        ));

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("42"));
        assert_eq!(require_user(&headers).unwrap(), 42);

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("best-girl"));
        assert!(matches!(
            optional_user(&headers),
            Err(AppError::Unauthorized(_))
        ));
    }
}
