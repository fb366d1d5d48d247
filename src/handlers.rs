//! Command and query handlers, one per operation
use super::outcome::Outcome;
use super::repository::SignatureRepository;
use super::request::{Operation, RequestView, SignatureRequest};
use super::types::{RequestId, SignatureStatus};
use std::sync::Arc;

/// Input for creating a request. `document_content` is base64 text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSignatureRequest {
    pub document_name: String,
    pub document_content: String,
    pub signer_email: String,
    pub signer_name: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetAllRequests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetRequestById {
    pub id: RequestId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetRequestStatus {
    pub id: RequestId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendRequest {
    pub id: RequestId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResendRequest {
    pub id: RequestId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelRequest {
    pub id: RequestId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadDocument {
    pub id: RequestId,
}

/// Handles one request type. Expected conditions come back as an [`Outcome`];
/// `Err` means something outside the domain broke.
pub trait Handler<Q> {
    type Output;

    fn handle(&self, request: Q) -> anyhow::Result<Outcome<Self::Output>>;
}

/// Every handler, sharing one repository.
pub struct SignatureHandlers<R: SignatureRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: SignatureRepository + ?Sized> SignatureHandlers<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    // load, transition, then persist the transitioned entity exactly once
    fn transition(&self, id: RequestId, operation: Operation) -> anyhow::Result<Outcome<()>> {
        let Some(mut request) = self.repository.get_by_id(&id)? else {
            return Ok(not_found(&id));
        };

        if let Err(err) = request.apply(operation) {
            tracing::warn!(%id, ?operation, error = %err, "rejected e-signature transition");
            return Ok(Outcome::failure(err.to_string()));
        }

        if !self.repository.update(&request)? {
            tracing::warn!(%id, ?operation, "update reported no stored request");
            return Ok(Outcome::failure("Failed to update e-signature request"));
        }

        tracing::info!(%id, ?operation, status = %request.status(), "e-signature request updated");
        Ok(Outcome::Success(()))
    }
}

fn not_found<T>(id: &RequestId) -> Outcome<T> {
    Outcome::not_found(format!("E-signature request with ID {id} not found"))
}

impl<R: SignatureRepository + ?Sized> Handler<CreateSignatureRequest> for SignatureHandlers<R> {
    type Output = RequestView;

    fn handle(&self, request: CreateSignatureRequest) -> anyhow::Result<Outcome<RequestView>> {
        let entity = match SignatureRequest::create(
            request.document_name,
            request.document_content,
            request.signer_email,
            request.signer_name,
            request.message,
        ) {
            Ok(entity) => entity,
            Err(err) => {
                tracing::warn!(error = %err, "refused e-signature request");
                return Ok(Outcome::failure(err.to_string()));
            }
        };

        match self.repository.create(entity) {
            Ok(created) => {
                tracing::info!(id = %created.id(), "created new e-signature request");
                Ok(Outcome::Success(created.view()))
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to create e-signature request");
                Ok(Outcome::failure(err.to_string()))
            }
        }
    }
}

impl<R: SignatureRepository + ?Sized> Handler<GetAllRequests> for SignatureHandlers<R> {
    type Output = Vec<RequestView>;

    fn handle(&self, _: GetAllRequests) -> anyhow::Result<Outcome<Vec<RequestView>>> {
        let views = self
            .repository
            .get_all()?
            .iter()
            .map(RequestView::from)
            .collect();

        Ok(Outcome::Success(views))
    }
}

impl<R: SignatureRepository + ?Sized> Handler<GetRequestById> for SignatureHandlers<R> {
    type Output = RequestView;

    fn handle(&self, request: GetRequestById) -> anyhow::Result<Outcome<RequestView>> {
        Ok(match self.repository.get_by_id(&request.id)? {
            Some(entity) => Outcome::Success(entity.view()),
            None => not_found(&request.id),
        })
    }
}

impl<R: SignatureRepository + ?Sized> Handler<GetRequestStatus> for SignatureHandlers<R> {
    type Output = SignatureStatus;

    fn handle(&self, request: GetRequestStatus) -> anyhow::Result<Outcome<SignatureStatus>> {
        Ok(match self.repository.get_by_id(&request.id)? {
            Some(entity) => Outcome::Success(entity.status()),
            None => not_found(&request.id),
        })
    }
}

impl<R: SignatureRepository + ?Sized> Handler<SendRequest> for SignatureHandlers<R> {
    type Output = ();

    fn handle(&self, request: SendRequest) -> anyhow::Result<Outcome<()>> {
        self.transition(request.id, Operation::Send)
    }
}

impl<R: SignatureRepository + ?Sized> Handler<ResendRequest> for SignatureHandlers<R> {
    type Output = ();

    fn handle(&self, request: ResendRequest) -> anyhow::Result<Outcome<()>> {
        self.transition(request.id, Operation::Resend)
    }
}

impl<R: SignatureRepository + ?Sized> Handler<CancelRequest> for SignatureHandlers<R> {
    type Output = ();

    fn handle(&self, request: CancelRequest) -> anyhow::Result<Outcome<()>> {
        self.transition(request.id, Operation::Cancel)
    }
}

impl<R: SignatureRepository + ?Sized> Handler<DownloadDocument> for SignatureHandlers<R> {
    type Output = Vec<u8>;

    fn handle(&self, request: DownloadDocument) -> anyhow::Result<Outcome<Vec<u8>>> {
        Ok(match self.repository.get_document(&request.id)? {
            Some(bytes) => Outcome::Success(bytes),
            None => Outcome::not_found(format!(
                "Document not found for e-signature request with ID {}",
                request.id
            )),
        })
    }
}
