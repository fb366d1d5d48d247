use crate::request::Operation;
use crate::types::SignatureStatus;
use crate::validation::ValidationErrors;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("{}", describe(.operation, .from))]
    InvalidTransition {
        from: SignatureStatus,
        operation: Operation,
    },
}

/// Raised by the entity constructor when a required field is blank.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum IdError {
    #[error("request id is not valid bech32: {0}")]
    Malformed(String),
    #[error("request id has prefix '{0}', expected 'sigreq'")]
    WrongPrefix(String),
    #[error("request id carries {0} bytes, expected 16")]
    WrongLength(usize),
}

/// Errors that stop an operation before it yields an [`Outcome`](crate::outcome::Outcome).
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("One or more validation failures have occurred.")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl TransitionError {
    pub fn from_status(&self) -> SignatureStatus {
        match self {
            Self::InvalidTransition { from, .. } => *from,
        }
    }
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unexpected(_) => 500,
        }
    }
    /// Text safe to hand back to a caller. Internal failures are not described.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(errors) => format!("{self} {errors}"),
            Self::Unexpected(_) => "An error occurred while processing your request.".into(),
        }
    }
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Unexpected(_) => None,
        }
    }
}

fn describe(operation: &Operation, from: &SignatureStatus) -> String {
    match operation {
        Operation::Send => format!("Cannot send request in {from} status"),
        Operation::Resend => format!("Cannot resend request in {from} status"),
        Operation::Cancel => format!("Cannot cancel request in {from} status"),
        Operation::MarkSigned => format!("Cannot mark as signed when status is {from}"),
        Operation::MarkExpired => format!("Cannot mark as expired when status is {from}"),
    }
}
