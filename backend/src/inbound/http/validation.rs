//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every request validation failure becomes an `invalid_request` error whose
//! details name the offending field and a stable machine code.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    Error, LoginValidationError, MovieId, MovieValidationError, RegistrationValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn field_error(field: &str, message: impl Into<String>, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(
        field,
        format!("missing required field: {field}"),
        ErrorCode::MissingField,
    )
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

/// Parse a path segment as a movie identifier.
pub(crate) fn parse_movie_id(value: &str, field: FieldName) -> Result<MovieId, Error> {
    MovieId::parse(value).map_err(|_| invalid_uuid_error(field, value))
}

/// How a `GET /movies/{term}` path segment is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LookupTerm {
    Id(MovieId),
    Title(String),
}

impl LookupTerm {
    /// Terms shaped like a UUID are identifiers; anything else is a title.
    pub(crate) fn classify(raw: &str) -> Self {
        match Uuid::parse_str(raw.trim()) {
            Ok(uuid) => Self::Id(MovieId::from(uuid)),
            Err(_) => Self::Title(raw.to_owned()),
        }
    }
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => missing_field_error(FieldName::new("email")),
        LoginValidationError::EmptyPassword => missing_field_error(FieldName::new("password")),
    }
}

pub(crate) fn map_registration_validation_error(err: RegistrationValidationError) -> Error {
    field_error(err.field(), err.to_string(), ErrorCode::InvalidValue)
}

pub(crate) fn map_movie_validation_error(err: MovieValidationError) -> Error {
    let field = match &err {
        MovieValidationError::InvalidId => "id",
        MovieValidationError::EmptyField { field }
        | MovieValidationError::FieldTooLong { field, .. } => *field,
        MovieValidationError::EmptyChanges => "body",
        MovieValidationError::InvalidLimit { .. } => "limit",
    };
    field_error(field, err.to_string(), ErrorCode::InvalidValue)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1b4e28ba-2fa1-11d2-883f-0016d3cca427", true)]
    #[case(" 1B4E28BA-2FA1-11D2-883F-0016D3CCA427 ", true)]
    #[case("A New Hope", false)]
    #[case("1b4e28ba", false)]
    fn uuid_shaped_terms_are_ids(#[case] raw: &str, #[case] is_id: bool) {
        assert_eq!(matches!(LookupTerm::classify(raw), LookupTerm::Id(_)), is_id);
    }

    #[rstest]
    fn titles_are_kept_verbatim() {
        assert_eq!(
            LookupTerm::classify("The Empire Strikes Back"),
            LookupTerm::Title("The Empire Strikes Back".to_owned())
        );
    }

    #[rstest]
    fn invalid_ids_report_field_and_value() {
        let err = parse_movie_id("nope", FieldName::new("id")).expect_err("invalid id");

        assert_eq!(err.message(), "id must be a valid UUID");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "id", "value": "nope", "code": "invalid_uuid"}))
        );
    }

    #[rstest]
    fn registration_errors_name_the_request_field() {
        let err = map_registration_validation_error(RegistrationValidationError::PasswordTooWeak);
        assert_eq!(
            err.details().and_then(|d| d.get("field")),
            Some(&json!("password"))
        );
    }

    #[rstest]
    #[case(MovieValidationError::EmptyChanges, "body")]
    #[case(MovieValidationError::InvalidLimit { max: 100 }, "limit")]
    #[case(MovieValidationError::EmptyField { field: "title" }, "title")]
    fn movie_errors_name_the_request_field(
        #[case] err: MovieValidationError,
        #[case] field: &str,
    ) {
        let mapped = map_movie_validation_error(err);
        assert_eq!(
            mapped.details().and_then(|d| d.get("field")),
            Some(&json!(field))
        );
    }
}
