//! The signature request aggregate and its status state machine
use super::error::{RequestError, TransitionError};
use super::types::{RequestId, SignatureStatus, TimeStamp};
use chrono::{DateTime, Utc};

/// Named operations that may move a request between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Send,
    Resend,
    Cancel,
    MarkSigned,
    MarkExpired,
}

// Status is only ever changed through the transition methods below. Decoding
// is the one other way in, and it restores what a transition already produced.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct SignatureRequest {
    #[n(0)]
    id: RequestId,
    #[n(1)]
    document_name: String,
    #[n(2)]
    document_content: String, // base64
    #[n(3)]
    signer_email: String,
    #[n(4)]
    signer_name: String,
    #[n(5)]
    message: Option<String>,
    #[n(6)]
    created_at: TimeStamp<Utc>,
    #[n(7)]
    status: SignatureStatus,
}

/// Read projection handed to callers. Never carries the document itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestView {
    pub id: RequestId,
    pub document_name: String,
    pub signer_email: String,
    pub signer_name: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: SignatureStatus,
}

impl SignatureStatus {
    /// Where `operation` takes a request currently in `self`, without touching any entity.
    pub fn transition(self, operation: Operation) -> Result<SignatureStatus, TransitionError> {
        use SignatureStatus::*;

        let next = match (operation, self) {
            (Operation::Send | Operation::Resend, Draft | Expired) => Some(Sent),
            (Operation::Cancel, Signed | Cancelled) => None,
            (Operation::Cancel, _) => Some(Cancelled),
            (Operation::MarkSigned, Sent) => Some(Signed),
            (Operation::MarkExpired, Sent) => Some(Expired),
            _ => None,
        };

        next.ok_or(TransitionError::InvalidTransition {
            from: self,
            operation,
        })
    }
}

impl SignatureRequest {
    /// A fresh request in `Draft`. Blank required fields are refused here as
    /// well as in validation, so no caller can store an unnamed request.
    pub fn create(
        document_name: impl Into<String>,
        document_content: impl Into<String>,
        signer_email: impl Into<String>,
        signer_name: impl Into<String>,
        message: Option<String>,
    ) -> Result<Self, RequestError> {
        let document_name = required(document_name.into(), "Document name")?;
        let document_content = required(document_content.into(), "Document content")?;
        let signer_email = required(signer_email.into(), "Signer email")?;
        let signer_name = required(signer_name.into(), "Signer name")?;

        Ok(Self {
            id: RequestId::new(),
            document_name,
            document_content,
            signer_email,
            signer_name,
            message,
            created_at: TimeStamp::new(),
            status: SignatureStatus::Draft,
        })
    }

    pub fn id(&self) -> RequestId {
        self.id
    }
    pub fn document_name(&self) -> &str {
        &self.document_name
    }
    pub fn document_content(&self) -> &str {
        &self.document_content
    }
    pub fn signer_email(&self) -> &str {
        &self.signer_email
    }
    pub fn signer_name(&self) -> &str {
        &self.signer_name
    }
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at.to_datetime_utc()
    }
    pub fn status(&self) -> SignatureStatus {
        self.status
    }

    /// Applies `operation`, leaving the status untouched when it is not allowed.
    pub fn apply(&mut self, operation: Operation) -> Result<SignatureStatus, TransitionError> {
        self.status = self.status.transition(operation)?;
        Ok(self.status)
    }

    pub fn send(&mut self) -> Result<SignatureStatus, TransitionError> {
        self.apply(Operation::Send)
    }
    pub fn resend(&mut self) -> Result<SignatureStatus, TransitionError> {
        self.apply(Operation::Resend)
    }
    pub fn cancel(&mut self) -> Result<SignatureStatus, TransitionError> {
        self.apply(Operation::Cancel)
    }
    // completion callbacks from the signing provider land here
    pub fn mark_signed(&mut self) -> Result<SignatureStatus, TransitionError> {
        self.apply(Operation::MarkSigned)
    }
    pub fn mark_expired(&mut self) -> Result<SignatureStatus, TransitionError> {
        self.apply(Operation::MarkExpired)
    }

    pub fn view(&self) -> RequestView {
        RequestView::from(self)
    }
}

fn required(value: String, label: &'static str) -> Result<String, RequestError> {
    if value.trim().is_empty() {
        return Err(RequestError::MissingField(label));
    }
    Ok(value)
}

impl From<&SignatureRequest> for RequestView {
    fn from(request: &SignatureRequest) -> Self {
        Self {
            id: request.id,
            document_name: request.document_name.clone(),
            signer_email: request.signer_email.clone(),
            signer_name: request.signer_name.clone(),
            message: request.message.clone(),
            created_at: request.created_at(),
            status: request.status,
        }
    }
}
