//! Storage contract for signature requests, plus the in-memory reference store
use super::request::SignatureRequest;
use super::types::RequestId;
use super::validation::decode_base64;
use anyhow::{Context, anyhow};
use std::collections::HashMap;
use std::sync::RwLock;

/// What the handlers need from storage. `Err` is reserved for failures of the
/// store itself; absence and stale ids are reported through the return values.
pub trait SignatureRepository: Send + Sync {
    /// Persists a new request along with its decoded document bytes.
    fn create(&self, request: SignatureRequest) -> anyhow::Result<SignatureRequest>;
    fn get_by_id(&self, id: &RequestId) -> anyhow::Result<Option<SignatureRequest>>;
    fn get_all(&self) -> anyhow::Result<Vec<SignatureRequest>>;
    /// Overwrites a stored request. `false` when the id was never created.
    fn update(&self, request: &SignatureRequest) -> anyhow::Result<bool>;
    fn get_document(&self, id: &RequestId) -> anyhow::Result<Option<Vec<u8>>>;
}

// Locks only keep the maps sound. Two writers racing on one id both succeed
// and the later update wins.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    requests: RwLock<HashMap<RequestId, SignatureRequest>>,
    documents: RwLock<HashMap<RequestId, Vec<u8>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) fn decode_document(request: &SignatureRequest) -> anyhow::Result<Vec<u8>> {
    decode_base64(request.document_content())
        .with_context(|| format!("document content of {} is not base64", request.id()))
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("in-memory store lock poisoned")
}

impl SignatureRepository for InMemoryRepository {
    fn create(&self, request: SignatureRequest) -> anyhow::Result<SignatureRequest> {
        let document = decode_document(&request)?;

        self.documents
            .write()
            .map_err(poisoned)?
            .insert(request.id(), document);
        self.requests
            .write()
            .map_err(poisoned)?
            .insert(request.id(), request.clone());

        Ok(request)
    }

    fn get_by_id(&self, id: &RequestId) -> anyhow::Result<Option<SignatureRequest>> {
        Ok(self.requests.read().map_err(poisoned)?.get(id).cloned())
    }

    fn get_all(&self) -> anyhow::Result<Vec<SignatureRequest>> {
        Ok(self
            .requests
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect())
    }

    fn update(&self, request: &SignatureRequest) -> anyhow::Result<bool> {
        let mut requests = self.requests.write().map_err(poisoned)?;

        match requests.get_mut(&request.id()) {
            Some(stored) => {
                *stored = request.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get_document(&self, id: &RequestId) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.documents.read().map_err(poisoned)?.get(id).cloned())
    }
}
