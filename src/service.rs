//! Service layer API for signature request operations
use super::config::{ServiceConfig, StorageBackend};
use super::error::ServiceError;
use super::handlers::{
    CancelRequest, CreateSignatureRequest, DownloadDocument, GetAllRequests, GetRequestById,
    GetRequestStatus, Handler, ResendRequest, SendRequest, SignatureHandlers,
};
use super::outcome::Outcome;
use super::pipeline::ValidationPipeline;
use super::repository::{InMemoryRepository, SignatureRepository};
use super::request::RequestView;
use super::sled_store::SledRepository;
use super::types::{RequestId, SignatureStatus};
use super::validation::CreateRequestValidator;
use std::sync::Arc;

/// The eight operations, each routed through validation to its handler.
pub struct SignatureService<R: SignatureRepository + ?Sized> {
    handlers: SignatureHandlers<R>,
    create_validation: ValidationPipeline<CreateSignatureRequest>,
}

impl<R: SignatureRepository + ?Sized> SignatureService<R> {
    /// Uses the default creation limits.
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_config(repository, &ServiceConfig::default())
    }

    pub fn with_config(repository: Arc<R>, config: &ServiceConfig) -> Self {
        Self {
            handlers: SignatureHandlers::new(repository),
            create_validation: ValidationPipeline::new()
                .with(CreateRequestValidator::new(config.limits)),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        self.handlers.repository()
    }

    pub fn create_request(
        &self,
        request: CreateSignatureRequest,
    ) -> Result<Outcome<RequestView>, ServiceError> {
        tracing::debug!(
            document = %request.document_name,
            signer = %request.signer_email,
            "creating e-signature request"
        );
        self.create_validation.dispatch(&self.handlers, request)
    }

    pub fn get_all_requests(&self) -> Result<Outcome<Vec<RequestView>>, ServiceError> {
        self.run(GetAllRequests)
    }

    pub fn get_request_by_id(&self, id: RequestId) -> Result<Outcome<RequestView>, ServiceError> {
        self.run(GetRequestById { id })
    }

    pub fn send_request(&self, id: RequestId) -> Result<Outcome<()>, ServiceError> {
        self.run(SendRequest { id })
    }

    pub fn resend_request(&self, id: RequestId) -> Result<Outcome<()>, ServiceError> {
        self.run(ResendRequest { id })
    }

    pub fn cancel_request(&self, id: RequestId) -> Result<Outcome<()>, ServiceError> {
        self.run(CancelRequest { id })
    }

    pub fn get_request_status(
        &self,
        id: RequestId,
    ) -> Result<Outcome<SignatureStatus>, ServiceError> {
        self.run(GetRequestStatus { id })
    }

    pub fn download_document(&self, id: RequestId) -> Result<Outcome<Vec<u8>>, ServiceError> {
        self.run(DownloadDocument { id })
    }

    // operations without registered validators go straight to their handler
    fn run<Q>(
        &self,
        request: Q,
    ) -> Result<Outcome<<SignatureHandlers<R> as Handler<Q>>::Output>, ServiceError>
    where
        SignatureHandlers<R>: Handler<Q>,
    {
        Ok(self.handlers.handle(request)?)
    }
}

impl SignatureService<dyn SignatureRepository> {
    /// Opens whichever backend `config.storage` names.
    pub fn from_config(config: &ServiceConfig) -> anyhow::Result<Self> {
        let repository: Arc<dyn SignatureRepository> = match &config.storage {
            StorageBackend::InMemory => Arc::new(InMemoryRepository::new()),
            StorageBackend::Sled { path } => Arc::new(SledRepository::open(path)?),
        };
        tracing::info!(storage = ?config.storage, "signature service ready");

        Ok(Self::with_config(repository, config))
    }
}
