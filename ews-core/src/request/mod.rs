//! The SOAP envelope shared by every operation.
//!
//! A request type describes its element names, version floor and fields
//! through [`ServiceRequest`]; the functions here own the ordering around
//! it: version gate, validation, serialization, then response parsing.

mod sync_folder_items;

pub use sync_folder_items::{
    ChangeType, ItemChange, SyncFolderItemsRequest, SyncFolderItemsResponse, SyncFolderItemsScope,
};

use roxmltree::{Document, Node};
use tracing::{debug, trace};

use crate::error::{EwsError, EwsResult};
use crate::response::{ServiceErrorHandling, ServiceResponse, ServiceResult};
use crate::service::ExchangeService;
use crate::version::{Capability, ExchangeVersion};
use crate::xml::{self, EwsXmlWriter, XmlNamespace, names};

pub trait ServiceRequest {
    /// What one response message decodes into.
    type Response;

    fn xml_element_name(&self) -> &'static str;
    fn response_xml_element_name(&self) -> &'static str;
    fn response_message_xml_element_name(&self) -> &'static str;

    fn minimum_required_server_version(&self) -> ExchangeVersion;
    fn expected_response_message_count(&self) -> usize;

    fn error_handling(&self) -> ServiceErrorHandling {
        ServiceErrorHandling::ThrowOnError
    }

    /// Operation-specific checks. Runs only once the version floor passed.
    fn validate(&self, service: &ExchangeService) -> EwsResult<()>;

    /// Writes the children of the operation element, in wire order.
    fn write_elements_to_xml(
        &self,
        writer: &mut EwsXmlWriter,
        service: &ExchangeService,
    ) -> EwsResult<()>;

    /// Decodes the operation-specific part of one response message.
    fn read_response(
        &self,
        response: ServiceResponse,
        message: Node<'_, '_>,
    ) -> EwsResult<Self::Response>;
}

/// Version floor, then the request's own checks, then the session time zone.
pub fn validate_request<R: ServiceRequest + ?Sized>(
    request: &R,
    service: &ExchangeService,
) -> EwsResult<()> {
    let negotiated = service.requested_server_version();
    let minimum = request.minimum_required_server_version();
    if negotiated < minimum {
        return Err(EwsError::RequestNotSupported {
            request: request.xml_element_name(),
            minimum,
            negotiated,
        });
    }

    request.validate(service)?;

    if let Some(time_zone) = service.time_zone() {
        if negotiated.supports(Capability::TimeZoneContextHeader) {
            time_zone.validate()?;
        }
    }
    Ok(())
}

/// Serializes the full SOAP document without validating.
pub fn write_request<R: ServiceRequest + ?Sized>(
    request: &R,
    service: &ExchangeService,
) -> EwsResult<String> {
    let version = service.requested_server_version();
    let mut writer = EwsXmlWriter::new();

    writer.write_declaration()?;
    writer.write_start_element_with_attributes(
        XmlNamespace::Soap,
        names::ENVELOPE,
        &[
            ("xmlns:soap", XmlNamespace::Soap.uri()),
            ("xmlns:t", XmlNamespace::Types.uri()),
            ("xmlns:m", XmlNamespace::Messages.uri()),
        ],
    )?;

    writer.write_start_element(XmlNamespace::Soap, names::HEADER)?;
    writer.write_empty_element(
        XmlNamespace::Types,
        names::REQUEST_SERVER_VERSION,
        &[(names::ATTR_VERSION, version.as_str())],
    )?;
    if let Some(time_zone) = service.time_zone() {
        if version.supports(Capability::TimeZoneContextHeader) {
            writer.write_start_element(XmlNamespace::Types, names::TIME_ZONE_CONTEXT)?;
            time_zone.write_to_xml(&mut writer)?;
            writer.write_end_element()?;
        }
    }
    writer.write_end_element()?;

    writer.write_start_element(XmlNamespace::Soap, names::BODY)?;
    writer.write_start_element(XmlNamespace::Messages, request.xml_element_name())?;
    request.write_elements_to_xml(&mut writer, service)?;
    writer.write_end_element()?;
    writer.write_end_element()?;

    writer.write_end_element()?;
    writer.into_string()
}

/// Validates then serializes. Nothing is produced when validation fails.
pub fn emit<R: ServiceRequest + ?Sized>(
    request: &R,
    service: &ExchangeService,
) -> EwsResult<String> {
    validate_request(request, service)?;
    let document = write_request(request, service)?;
    debug!(
        request = request.xml_element_name(),
        version = %service.requested_server_version(),
        bytes = document.len(),
        "emitted request"
    );
    Ok(document)
}

/// Parses a SOAP response document into one value per response message.
pub fn parse_response<R: ServiceRequest + ?Sized>(
    request: &R,
    document: &str,
) -> EwsResult<Vec<R::Response>> {
    let doc = Document::parse(document)?;
    let envelope = doc.root_element();
    let body = xml::required_child(envelope, names::BODY)?;

    if let Some(fault) = xml::child(body, names::FAULT) {
        let code = xml::child(fault, names::FAULT_CODE)
            .map(xml::element_text)
            .unwrap_or("");
        let message = xml::child(fault, names::FAULT_STRING)
            .map(xml::element_text)
            .unwrap_or("");
        debug!(code, message, "soap fault");
        return Err(EwsError::SoapFault {
            code: code.to_string(),
            message: message.to_string(),
        });
    }

    let response = xml::required_child(body, request.response_xml_element_name())?;
    let messages = xml::required_child(response, names::RESPONSE_MESSAGES)?;
    let message_name = request.response_message_xml_element_name();
    let message_nodes: Vec<Node> = xml::child_elements(messages)
        .filter(|n| n.tag_name().name() == message_name)
        .collect();

    let expected = request.expected_response_message_count();
    if message_nodes.len() != expected {
        return Err(EwsError::ResponseMessageCount {
            expected,
            actual: message_nodes.len(),
        });
    }

    let mut responses = Vec::with_capacity(expected);
    for node in message_nodes {
        let service_response = ServiceResponse::read_from_xml(node)?;
        trace!(
            code = %service_response.error_code,
            result = ?service_response.result,
            "response message"
        );
        if service_response.result == ServiceResult::Error
            && request.error_handling() == ServiceErrorHandling::ThrowOnError
        {
            return Err(service_response.into_error());
        }
        responses.push(request.read_response(service_response, node)?);
    }

    debug!(
        request = request.xml_element_name(),
        messages = responses.len(),
        "parsed response"
    );
    Ok(responses)
}
