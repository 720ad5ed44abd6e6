use std::time::SystemTime;

use log::{debug, info};
use serde::Serialize;

use crate::error::{ContractValidationError, ParseError};
use crate::parse::{self, spec::OpenApiSpec};

/// What a successful validation reports back to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractSummary {
    /// The `openapi` version string, e.g. `3.0.3`.
    pub openapi: String,
    pub title: String,
    pub version: String,
    pub path_count: usize,
    pub schema_count: usize,
}

const UNTITLED: &str = "Untitled";
const UNVERSIONED: &str = "Unversioned";

impl ContractSummary {
    pub fn of(spec: &OpenApiSpec) -> Self {
        let info = spec.info.as_ref();
        Self {
            openapi: spec.openapi.clone(),
            title: info
                .and_then(|i| i.title.clone())
                .unwrap_or_else(|| UNTITLED.to_string()),
            version: info
                .and_then(|i| i.version.clone())
                .unwrap_or_else(|| UNVERSIONED.to_string()),
            path_count: spec.paths.len(),
            schema_count: spec.schema_count(),
        }
    }
}

/// Result of one validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid(ContractSummary),
    /// Nothing to validate; not an error, but nothing is cached either.
    Empty,
    Invalid(ContractValidationError),
}

/// The last contract that validated successfully.
#[derive(Debug, Clone)]
pub struct ValidatedContract {
    pub content: String,
    pub spec: OpenApiSpec,
    pub validated_at: SystemTime,
}

/// A validation that has been accepted but not yet run.
///
/// Hand it back to [`ContractValidator::finish`]; until then the validator
/// refuses new requests.
#[derive(Debug)]
#[must_use = "a pending validation blocks the validator until finished"]
pub struct PendingValidation {
    content: String,
}

/// Validates OpenAPI contracts one at a time and remembers the last good one.
#[derive(Debug, Default)]
pub struct ContractValidator {
    in_progress: bool,
    validated: Option<ValidatedContract>,
}

impl ContractValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Accept a validation request. Returns `None`, dropping the request,
    /// while another validation is in flight.
    pub fn begin(&mut self, content: &str) -> Option<PendingValidation> {
        if self.in_progress {
            debug!("validation already in progress, ignoring request");
            return None;
        }
        self.in_progress = true;
        Some(PendingValidation {
            content: content.to_string(),
        })
    }

    /// Run an accepted validation and release the validator.
    pub fn finish(&mut self, pending: PendingValidation) -> ValidationOutcome {
        let outcome = self.run(pending.content);
        self.in_progress = false;
        outcome
    }

    /// Validate immediately. `None` when a validation is already in flight.
    pub fn validate(&mut self, content: &str) -> Option<ValidationOutcome> {
        let pending = self.begin(content)?;
        Some(self.finish(pending))
    }

    /// The last successfully validated contract, if any.
    pub fn validated(&self) -> Option<&ValidatedContract> {
        self.validated.as_ref()
    }

    pub fn clear(&mut self) {
        self.validated = None;
    }

    fn run(&mut self, content: String) -> ValidationOutcome {
        if content.trim().is_empty() {
            self.validated = None;
            return ValidationOutcome::Empty;
        }

        match check_contract(&content) {
            Ok(spec) => {
                let summary = ContractSummary::of(&spec);
                info!(
                    "contract valid: {} {} ({} paths, {} schemas)",
                    summary.title, summary.version, summary.path_count, summary.schema_count
                );
                self.validated = Some(ValidatedContract {
                    content,
                    spec,
                    validated_at: SystemTime::now(),
                });
                ValidationOutcome::Valid(summary)
            }
            Err(err) => {
                debug!("contract rejected: {err}");
                self.validated = None;
                ValidationOutcome::Invalid(err)
            }
        }
    }
}

/// Parse and check a contract, reporting where parsing stopped on failure.
pub fn check_contract(content: &str) -> Result<OpenApiSpec, ContractValidationError> {
    let spec = if parse::looks_like_json(content) {
        let mut de = serde_json::Deserializer::from_str(content);
        let spec: OpenApiSpec = serde_path_to_error::deserialize(&mut de).map_err(|err| {
            let path = err.path().to_string();
            let inner = err.into_inner();
            let location = format!("line {}, column {}", inner.line(), inner.column());
            rejection(ParseError::Json(inner), &path, Some(location))
        })?;
        de.end()
            .map_err(|err| rejection(ParseError::Json(err), ".", None))?;
        spec
    } else {
        let de = serde_yaml_ng::Deserializer::from_str(content);
        serde_path_to_error::deserialize::<_, OpenApiSpec>(de).map_err(|err| {
            let path = err.path().to_string();
            let inner = err.into_inner();
            let location = inner
                .location()
                .map(|l| format!("line {}, column {}", l.line(), l.column()));
            rejection(ParseError::Yaml(inner), &path, location)
        })?
    };

    parse::validate_version(&spec).map_err(|err| rejection(err, ".", None))?;
    Ok(spec)
}

fn rejection(err: ParseError, path: &str, location: Option<String>) -> ContractValidationError {
    let mut details = Vec::new();
    if path != "." && !path.is_empty() {
        details.push(format!("Path: {path}"));
    }
    if let Some(location) = location {
        details.push(location);
    }
    ContractValidationError {
        message: err.to_string(),
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "openapi: 3.0.3\ninfo:\n  title: Payments\n  version: 2.1.0\npaths: {}\n";

    #[test]
    fn test_valid_yaml_summary() {
        let spec = check_contract(MINIMAL).unwrap();
        let summary = ContractSummary::of(&spec);
        assert_eq!(summary.openapi, "3.0.3");
        assert_eq!(summary.title, "Payments");
        assert_eq!(summary.version, "2.1.0");
        assert_eq!(summary.path_count, 0);
    }

    #[test]
    fn test_missing_info_uses_placeholders() {
        let spec = check_contract(r#"{"openapi": "3.1.0"}"#).unwrap();
        let summary = ContractSummary::of(&spec);
        assert_eq!(summary.title, "Untitled");
        assert_eq!(summary.version, "Unversioned");
    }

    #[test]
    fn test_swagger_2_is_rejected() {
        let err = check_contract("openapi: '2.0'\n").unwrap_err();
        assert!(err.message.contains("unsupported OpenAPI version"));
    }

    #[test]
    fn test_missing_version_is_rejected() {
        let err = check_contract("info:\n  title: x\n").unwrap_err();
        assert!(err.message.contains("openapi"));
    }

    #[test]
    fn test_error_path_is_reported() {
        let yaml = "openapi: 3.0.0\nservers:\n  - description: no url\n";
        let err = check_contract(yaml).unwrap_err();
        assert!(err.details.iter().any(|d| d.starts_with("Path: servers")));
    }

    #[test]
    fn test_json_syntax_error_has_location() {
        let err = check_contract("{\"openapi\": \"3.0.0\",").unwrap_err();
        assert!(err.message.starts_with("failed to parse JSON"));
        assert!(err.details.iter().any(|d| d.starts_with("line 1")));
    }
}
