//! XML plumbing shared by requests, responses and time zone payloads.

mod duration;
pub mod names;
mod reader;
mod writer;

pub use duration::{format_xs_duration, parse_xs_duration};
pub use reader::*;
pub use writer::EwsXmlWriter;

pub const SOAP_NS_URI: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const TYPES_NS_URI: &str = "http://schemas.microsoft.com/exchange/services/2006/types";
pub const MESSAGES_NS_URI: &str = "http://schemas.microsoft.com/exchange/services/2006/messages";

/// Namespaces an EWS element can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlNamespace {
    Soap,
    Types,
    Messages,
}

impl XmlNamespace {
    pub fn prefix(&self) -> &'static str {
        match self {
            XmlNamespace::Soap => "soap",
            XmlNamespace::Types => "t",
            XmlNamespace::Messages => "m",
        }
    }

    pub fn uri(&self) -> &'static str {
        match self {
            XmlNamespace::Soap => SOAP_NS_URI,
            XmlNamespace::Types => TYPES_NS_URI,
            XmlNamespace::Messages => MESSAGES_NS_URI,
        }
    }

    /// Qualified element name, e.g. `t:Period`.
    pub fn qualify(&self, local_name: &str) -> String {
        format!("{}:{}", self.prefix(), local_name)
    }
}
