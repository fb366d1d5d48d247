//! Embedded persistence backed by sled
use super::repository::{SignatureRepository, decode_document};
use super::request::SignatureRequest;
use super::types::RequestId;
use anyhow::Context;
use sled::{Batch, Db};
use std::sync::Arc;

const REQUEST_PREFIX: &[u8] = b"request:";
const DIGEST_PREFIX: &[u8] = b"digest:";
const DOCUMENT_PREFIX: &[u8] = b"document:";

/// Requests live under `request:<id bytes>` as CBOR. Documents are content
/// addressed under `document:<sha256 hex>` with `digest:<id bytes>` pointing at them.
pub struct SledRepository {
    instance: Arc<sled::Db>,
}

impl SledRepository {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    pub fn open(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let db = sled::open(path)
            .with_context(|| format!("failed to open sled database at {}", path.display()))?;

        Ok(Self::new(Arc::new(db)))
    }

    pub fn db(&self) -> &Db {
        &self.instance
    }

    fn load(&self, id: &RequestId) -> anyhow::Result<Option<SignatureRequest>> {
        match self.instance.get(request_key(id))? {
            Some(bytes) => {
                let request = minicbor::decode(&bytes)
                    .with_context(|| format!("corrupt request record for {id}"))?;
                Ok(Some(request))
            }
            None => Ok(None),
        }
    }
}

fn request_key(id: &RequestId) -> Vec<u8> {
    [REQUEST_PREFIX, id.as_bytes().as_slice()].concat()
}

fn digest_key(id: &RequestId) -> Vec<u8> {
    [DIGEST_PREFIX, id.as_bytes().as_slice()].concat()
}

fn document_key(digest: &str) -> Vec<u8> {
    [DOCUMENT_PREFIX, digest.as_bytes()].concat()
}

impl SignatureRepository for SledRepository {
    fn create(&self, request: SignatureRequest) -> anyhow::Result<SignatureRequest> {
        let document = decode_document(&request)?;
        let digest = sha256::digest(&document);

        // record, digest pointer and document go in together
        let mut batch = Batch::default();
        batch.insert(document_key(&digest), document);
        batch.insert(digest_key(&request.id()), digest.as_bytes());
        batch.insert(request_key(&request.id()), minicbor::to_vec(&request)?);
        self.instance.apply_batch(batch)?;

        Ok(request)
    }

    fn get_by_id(&self, id: &RequestId) -> anyhow::Result<Option<SignatureRequest>> {
        self.load(id)
    }

    fn get_all(&self) -> anyhow::Result<Vec<SignatureRequest>> {
        self.instance
            .scan_prefix(REQUEST_PREFIX)
            .map(|entry| {
                let (_, bytes) = entry?;
                minicbor::decode(&bytes).context("corrupt request record")
            })
            .collect()
    }

    fn update(&self, request: &SignatureRequest) -> anyhow::Result<bool> {
        let key = request_key(&request.id());
        if !self.instance.contains_key(&key)? {
            return Ok(false);
        }

        self.instance.insert(key, minicbor::to_vec(request)?)?;
        Ok(true)
    }

    fn get_document(&self, id: &RequestId) -> anyhow::Result<Option<Vec<u8>>> {
        let Some(digest) = self.instance.get(digest_key(id))? else {
            return Ok(None);
        };
        let digest = std::str::from_utf8(&digest).context("document digest is not utf-8")?;

        Ok(self
            .instance
            .get(document_key(digest))?
            .map(|bytes| bytes.to_vec()))
    }
}
