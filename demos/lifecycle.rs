//! Walks one request through its lifecycle against the configured backend.
//!
//! ESIG_STORAGE_PATH=/tmp/esig.db RUST_LOG=debug cargo run --example lifecycle

use anyhow::Context;
use base64::{Engine, engine::general_purpose::STANDARD};
use esig_request::{
    config::ServiceConfig, handlers::CreateSignatureRequest, outcome::Outcome,
    service::SignatureService,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    let service = SignatureService::from_config(&config)?;

    let created = service.create_request(CreateSignatureRequest {
        document_name: "Contract.pdf".into(),
        document_content: STANDARD.encode("hello"),
        signer_email: "a@b.com".into(),
        signer_name: "Alice".into(),
        message: Some("Please sign by Friday".into()),
    })?;
    let view = created.into_value().context("create did not succeed")?;
    println!("created {} ({})", view.id, view.status);

    report("send", service.send_request(view.id)?);
    report("send again", service.send_request(view.id)?);
    report("cancel", service.cancel_request(view.id)?);
    report("cancel again", service.cancel_request(view.id)?);

    if let Outcome::Success(status) = service.get_request_status(view.id)? {
        println!("final status: {status}");
    }
    if let Outcome::Success(bytes) = service.download_document(view.id)? {
        println!("document: {}", String::from_utf8_lossy(&bytes));
    }

    Ok(())
}

fn report(step: &str, outcome: Outcome<()>) {
    match outcome {
        Outcome::Success(()) => println!("{step}: ok"),
        other => println!(
            "{step}: {} ({})",
            other.error().unwrap_or_default(),
            other.status_code(false)
        ),
    }
}
