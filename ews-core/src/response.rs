//! Fields common to every EWS response message.

use std::str::FromStr;

use roxmltree::Node;

use crate::error::{EwsError, EwsResult};
use crate::xml::{self, names};

/// Outcome class of one response message (`ResponseClass` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceResult {
    Success,
    Warning,
    Error,
}

impl FromStr for ServiceResult {
    type Err = EwsError;

    fn from_str(s: &str) -> EwsResult<Self> {
        match s {
            "Success" => Ok(ServiceResult::Success),
            "Warning" => Ok(ServiceResult::Warning),
            "Error" => Ok(ServiceResult::Error),
            other => Err(EwsError::invalid_value(names::ATTR_RESPONSE_CLASS, other)),
        }
    }
}

/// How an operation reacts to response messages whose class is `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorHandling {
    /// Hand error messages back to the caller inside the response list.
    ReturnErrors,
    /// Fail the whole call on the first error message.
    ThrowOnError,
}

/// Result class, code and text of a response message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub result: ServiceResult,
    pub error_code: String,
    pub error_message: Option<String>,
}

impl ServiceResponse {
    pub fn read_from_xml(message: Node<'_, '_>) -> EwsResult<Self> {
        let result = xml::required_attribute(message, names::ATTR_RESPONSE_CLASS)?.parse()?;
        let error_code =
            xml::element_text(xml::required_child(message, names::RESPONSE_CODE)?).to_string();
        let error_message = xml::child(message, names::MESSAGE_TEXT)
            .map(|n| xml::element_text(n).to_string());

        Ok(ServiceResponse {
            result,
            error_code,
            error_message,
        })
    }

    /// Whether the message carries operation-specific elements.
    pub fn has_details(&self) -> bool {
        self.result != ServiceResult::Error
    }

    pub fn into_error(self) -> EwsError {
        EwsError::ServiceResponse {
            message: self.error_message.unwrap_or_else(|| self.error_code.clone()),
            code: self.error_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_message() {
        let doc = roxmltree::Document::parse(
            r#"<m:SyncFolderItemsResponseMessage xmlns:m="urn:m" ResponseClass="Error">
  <m:MessageText>The specified folder could not be found in the store.</m:MessageText>
  <m:ResponseCode>ErrorFolderNotFound</m:ResponseCode>
</m:SyncFolderItemsResponseMessage>"#,
        )
        .unwrap();

        let response = ServiceResponse::read_from_xml(doc.root_element()).unwrap();
        assert_eq!(response.result, ServiceResult::Error);
        assert_eq!(response.error_code, "ErrorFolderNotFound");
        assert!(!response.has_details());

        match response.into_error() {
            EwsError::ServiceResponse { code, message } => {
                assert_eq!(code, "ErrorFolderNotFound");
                assert_eq!(message, "The specified folder could not be found in the store.");
            }
            other => panic!("Expected ServiceResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_response_class() {
        let doc = roxmltree::Document::parse(
            r#"<Message ResponseClass="Maybe"><ResponseCode>NoError</ResponseCode></Message>"#,
        )
        .unwrap();
        assert!(matches!(
            ServiceResponse::read_from_xml(doc.root_element()),
            Err(EwsError::InvalidXmlValue { .. })
        ));
    }
}
