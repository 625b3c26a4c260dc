//! Error types for EWS request building and response/time zone decoding.

use thiserror::Error;

use crate::timezone::TargetKind;
use crate::version::ExchangeVersion;

/// Errors that can occur while validating, writing or reading EWS payloads.
#[derive(Error, Debug)]
pub enum EwsError {
    #[error("Required argument '{0}' is missing")]
    MissingArgument(&'static str),

    #[error("{name} must be between {min} and {max} (got {value})")]
    ArgumentOutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error(
        "'{value}' is only valid for Exchange version {introduced} or later (requested version is {negotiated})"
    )]
    VersionIncompatible {
        value: String,
        introduced: ExchangeVersion,
        negotiated: ExchangeVersion,
    },

    #[error(
        "Request {request} is only supported by Exchange version {minimum} or later (requested version is {negotiated})"
    )]
    RequestNotSupported {
        request: &'static str,
        minimum: ExchangeVersion,
        negotiated: ExchangeVersion,
    },

    #[error(
        "Property {property} can't be used in {request} requests: only summary properties are allowed"
    )]
    NonSummaryProperty {
        property: &'static str,
        request: &'static str,
    },

    #[error("Unknown time zone transition type: {0}")]
    UnknownTransitionType(String),

    #[error("Unsupported time zone transition target kind: {0}")]
    UnsupportedTargetKind(String),

    #[error("{kind} '{id}' not found in time zone definition")]
    TargetNotFound { kind: TargetKind, id: String },

    #[error("Duplicate {kind} id '{id}' in time zone definition")]
    DuplicateTimeZoneEntity { kind: TargetKind, id: String },

    #[error("Invalid time zone definition: {0}")]
    InvalidTimeZoneDefinition(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] roxmltree::Error),

    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::Error),

    #[error("Unexpected XML: {0}")]
    UnexpectedXml(String),

    #[error("Invalid value '{value}' for {element}")]
    InvalidXmlValue { element: String, value: String },

    #[error("Expected {expected} response message(s), got {actual}")]
    ResponseMessageCount { expected: usize, actual: usize },

    #[error("SOAP fault {code}: {message}")]
    SoapFault { code: String, message: String },

    #[error("Service returned {code}: {message}")]
    ServiceResponse { code: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EwsError {
    pub(crate) fn invalid_value(element: &str, value: &str) -> Self {
        EwsError::InvalidXmlValue {
            element: element.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type alias for EWS operations.
pub type EwsResult<T> = Result<T, EwsError>;
