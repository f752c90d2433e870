//! Access token value objects

/// A non-empty bearer credential.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Returns `None` for an empty token.
    pub fn try_new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// The raw token, for building an `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BearerToken(<{} chars>)", self.0.len())
    }
}

/// Outcome of a token acquisition.
///
/// Acquisition never fails outright: any problem (no cached account, expired
/// refresh token, network failure) is reported as `Unauthenticated` and the
/// remote service gets to reject the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessToken {
    Token(BearerToken),
    Unauthenticated,
}

impl AccessToken {
    /// Wrap a raw token string; empty strings become `Unauthenticated`.
    pub fn from_raw(token: impl Into<String>) -> Self {
        match BearerToken::try_new(token) {
            Some(token) => AccessToken::Token(token),
            None => AccessToken::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AccessToken::Token(_))
    }

    pub fn bearer(&self) -> Option<&BearerToken> {
        match self {
            AccessToken::Token(token) => Some(token),
            AccessToken::Unauthenticated => None,
        }
    }
}

impl From<BearerToken> for AccessToken {
    fn from(token: BearerToken) -> Self {
        AccessToken::Token(token)
    }
}
