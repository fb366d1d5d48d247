//! Pre-condition checks run before a request reaches its handler
use super::config::ValidationLimits;
use super::handlers::CreateSignatureRequest;
use base64::{Engine, engine::general_purpose::STANDARD};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

pub const DOCUMENT_NAME: &str = "documentName";
pub const DOCUMENT_CONTENT: &str = "documentContent";
pub const SIGNER_EMAIL: &str = "signerEmail";
pub const SIGNER_NAME: &str = "signerName";
pub const MESSAGE: &str = "message";

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Field name to every message raised against it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

pub trait Validator<Q>: Send + Sync {
    fn validate(&self, request: &Q) -> ValidationErrors;
}

/// Rules for creating a request. Every rule runs, nothing stops at the first hit.
#[derive(Debug, Clone, Default)]
pub struct CreateRequestValidator {
    limits: ValidationLimits,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_owned()).or_default().push(message.into());
    }
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl CreateRequestValidator {
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }
}

impl Validator<CreateSignatureRequest> for CreateRequestValidator {
    fn validate(&self, request: &CreateSignatureRequest) -> ValidationErrors {
        let limits = &self.limits;
        let mut errors = ValidationErrors::new();

        if is_blank(&request.document_name) {
            errors.add(DOCUMENT_NAME, "Document name is required.");
        }
        if exceeds(&request.document_name, limits.max_document_name) {
            errors.add(
                DOCUMENT_NAME,
                format!(
                    "Document name must not exceed {} characters.",
                    limits.max_document_name
                ),
            );
        }

        if is_blank(&request.document_content) {
            errors.add(DOCUMENT_CONTENT, "Document content is required.");
        } else if decode_base64(&request.document_content).is_err() {
            errors.add(DOCUMENT_CONTENT, "Document content must be a valid base64 string.");
        }

        if is_blank(&request.signer_email) {
            errors.add(SIGNER_EMAIL, "Signer email is required.");
        } else if !EMAIL.is_match(request.signer_email.trim()) {
            errors.add(SIGNER_EMAIL, "A valid signer email address is required.");
        }

        if is_blank(&request.signer_name) {
            errors.add(SIGNER_NAME, "Signer name is required.");
        }
        if exceeds(&request.signer_name, limits.max_signer_name) {
            errors.add(
                SIGNER_NAME,
                format!(
                    "Signer name must not exceed {} characters.",
                    limits.max_signer_name
                ),
            );
        }

        if let Some(message) = &request.message {
            if exceeds(message, limits.max_message) {
                errors.add(
                    MESSAGE,
                    format!("Message must not exceed {} characters.", limits.max_message),
                );
            }
        }

        errors
    }
}

/// Standard base64 with any ASCII whitespace ignored, so line-wrapped (MIME
/// style) content decodes the same as a single line.
pub(crate) fn decode_base64(content: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = content
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\r' | '\n'))
        .collect();

    STANDARD.decode(compact)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn exceeds(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CreateSignatureRequest {
        CreateSignatureRequest {
            document_name: "Contract.pdf".into(),
            document_content: STANDARD.encode("hello"),
            signer_email: "a@b.com".into(),
            signer_name: "Alice".into(),
            message: Some("Please sign".into()),
        }
    }

    #[test]
    fn accepts_valid_input() {
        let errors = CreateRequestValidator::default().validate(&valid());
        assert!(errors.is_empty(), "{errors}");
    }

    #[test]
    fn collects_every_violation() {
        let request = CreateSignatureRequest {
            document_name: String::new(),
            document_content: "***".into(),
            signer_email: "not-an-email".into(),
            signer_name: "x".repeat(101),
            message: Some("m".repeat(1001)),
        };

        let errors = CreateRequestValidator::default().validate(&request);
        let fields: Vec<&str> = errors.fields().collect();

        assert_eq!(
            fields,
            vec![DOCUMENT_CONTENT, DOCUMENT_NAME, MESSAGE, SIGNER_EMAIL, SIGNER_NAME]
        );
    }

    #[test]
    fn length_limits_are_inclusive() {
        let mut request = valid();
        request.document_name = "d".repeat(255);
        request.signer_name = "s".repeat(100);
        request.message = Some("m".repeat(1000));

        assert!(CreateRequestValidator::default().validate(&request).is_empty());
    }

    #[test]
    fn limits_are_configurable() {
        let validator = CreateRequestValidator::new(ValidationLimits {
            max_document_name: 8,
            ..ValidationLimits::default()
        });

        let errors = validator.validate(&valid());
        assert_eq!(
            errors.get(DOCUMENT_NAME).unwrap(),
            ["Document name must not exceed 8 characters."]
        );
    }

    #[test]
    fn blank_content_reports_required_only() {
        let mut request = valid();
        request.document_content = "   ".into();

        let errors = CreateRequestValidator::default().validate(&request);
        assert_eq!(
            errors.get(DOCUMENT_CONTENT).unwrap(),
            ["Document content is required."]
        );
    }

    #[test]
    fn wrapped_base64_is_accepted() {
        let mut request = valid();
        request.document_content = "aGVs\r\nbG8=".into();
        assert!(CreateRequestValidator::default().validate(&request).is_empty());

        assert_eq!(decode_base64(" aGVs\tbG8=\n").unwrap(), b"hello");
        assert!(decode_base64("aGV s b").is_err());
    }

    #[test]
    fn merge_appends_per_field() {
        let mut a = ValidationErrors::new();
        a.add(SIGNER_NAME, "one");
        let mut b = ValidationErrors::new();
        b.add(SIGNER_NAME, "two");
        b.add(MESSAGE, "three");

        a.merge(b);
        assert_eq!(a.get(SIGNER_NAME).unwrap(), ["one", "two"]);
        assert_eq!(a.to_string(), "message: three; signerName: one; signerName: two");
    }
}
