//! Validation step composed in front of a handler
use super::error::ServiceError;
use super::handlers::Handler;
use super::outcome::Outcome;
use super::validation::{ValidationErrors, Validator};

/// Runs every registered validator before dispatching to a handler. Any
/// violation stops the request there, with all errors merged.
pub struct ValidationPipeline<Q> {
    validators: Vec<Box<dyn Validator<Q>>>,
}

impl<Q> Default for ValidationPipeline<Q> {
    fn default() -> Self {
        Self {
            validators: Vec::new(),
        }
    }
}

impl<Q> ValidationPipeline<Q> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, validator: impl Validator<Q> + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn validate(&self, request: &Q) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for validator in &self.validators {
            errors.merge(validator.validate(request));
        }
        errors
    }

    pub fn dispatch<H>(&self, handler: &H, request: Q) -> Result<Outcome<H::Output>, ServiceError>
    where
        H: Handler<Q>,
    {
        let errors = self.validate(&request);
        if !errors.is_empty() {
            tracing::warn!(%errors, "request failed validation");
            return Err(ServiceError::Validation(errors));
        }

        Ok(handler.handle(request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Echo {
        calls: Cell<usize>,
    }

    impl Handler<String> for Echo {
        type Output = String;

        fn handle(&self, request: String) -> anyhow::Result<Outcome<String>> {
            self.calls.set(self.calls.get() + 1);
            Ok(Outcome::Success(request))
        }
    }

    struct NotEmpty;
    struct ShorterThan(usize);

    impl Validator<String> for NotEmpty {
        fn validate(&self, request: &String) -> ValidationErrors {
            let mut errors = ValidationErrors::new();
            if request.is_empty() {
                errors.add("value", "must not be empty");
            }
            errors
        }
    }

    impl Validator<String> for ShorterThan {
        fn validate(&self, request: &String) -> ValidationErrors {
            let mut errors = ValidationErrors::new();
            if request.len() >= self.0 {
                errors.add("value", format!("must be shorter than {}", self.0));
            }
            errors
        }
    }

    #[test]
    fn empty_pipeline_passes_through() {
        let handler = Echo { calls: Cell::new(0) };
        let pipeline = ValidationPipeline::<String>::new();

        let outcome = pipeline.dispatch(&handler, "hi".to_string()).unwrap();
        assert_eq!(outcome, Outcome::Success("hi".to_string()));
        assert_eq!(handler.calls.get(), 1);
    }

    #[test]
    fn violations_short_circuit_and_aggregate() {
        let handler = Echo { calls: Cell::new(0) };
        let pipeline = ValidationPipeline::new()
            .with(NotEmpty)
            .with(ShorterThan(0));

        let err = pipeline.dispatch(&handler, String::new()).unwrap_err();
        let errors = err.validation_errors().unwrap();

        assert_eq!(
            errors.get("value").unwrap(),
            ["must not be empty", "must be shorter than 0"]
        );
        assert_eq!(handler.calls.get(), 0);
        assert_eq!(err.status_code(), 400);
    }
}
