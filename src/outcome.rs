//! Three-way result returned by every handler for expected conditions

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    /// Rejected: invalid transition, failed write, and the like
    Failure(String),
    NotFound(String),
}

impl<T> Outcome<T> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message) | Self::NotFound(message) => Some(message),
        }
    }
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(message) => Outcome::Failure(message),
            Self::NotFound(message) => Outcome::NotFound(message),
        }
    }

    /// HTTP status an adapter should answer with. `created` selects 201 for a success.
    pub fn status_code(&self, created: bool) -> u16 {
        match self {
            Self::Success(_) if created => 201,
            Self::Success(_) => 200,
            Self::Failure(_) => 400,
            Self::NotFound(_) => 404,
        }
    }
}
