//! `Authorization` header parsing.

use super::token::BearerToken;
use thiserror::Error;

/// Why an `Authorization` header could not be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationHeaderError {
    #[error("Missing Authorization header")]
    Missing,

    #[error("Invalid Authorization header format")]
    Malformed,
}

/// Parse `Bearer <token>`.
///
/// The header must be exactly two space-separated segments, the first being
/// the literal `Bearer` and the second a non-empty token.
pub fn parse_bearer_header(value: &str) -> Result<BearerToken, AuthorizationHeaderError> {
    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] => {
            BearerToken::try_new(*token).ok_or(AuthorizationHeaderError::Malformed)
        }
        _ => Err(AuthorizationHeaderError::Malformed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bearer_token() {
        let token = parse_bearer_header("Bearer abc.def.ghi").unwrap();
        assert_eq!(token.secret(), "abc.def.ghi");
    }

    #[test]
    fn rejects_wrong_scheme() {
        assert_eq!(
            parse_bearer_header("Basic dXNlcjpwYXNz"),
            Err(AuthorizationHeaderError::Malformed)
        );
        assert_eq!(
            parse_bearer_header("bearer abc"),
            Err(AuthorizationHeaderError::Malformed)
        );
    }

    #[test]
    fn rejects_missing_token() {
        assert_eq!(
            parse_bearer_header("Bearer"),
            Err(AuthorizationHeaderError::Malformed)
        );
        assert_eq!(
            parse_bearer_header("Bearer "),
            Err(AuthorizationHeaderError::Malformed)
        );
    }

    #[test]
    fn rejects_extra_segments() {
        assert_eq!(
            parse_bearer_header("Bearer abc def"),
            Err(AuthorizationHeaderError::Malformed)
        );
        assert_eq!(
            parse_bearer_header("Bearer  abc"),
            Err(AuthorizationHeaderError::Malformed)
        );
    }
}
