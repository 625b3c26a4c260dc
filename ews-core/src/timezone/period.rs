use chrono::TimeDelta;
use roxmltree::Node;

use crate::error::EwsResult;
use crate::xml::{self, EwsXmlWriter, XmlNamespace, names};

/// A block of time with a fixed bias from UTC (standard time, daylight time, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeZonePeriod {
    pub id: String,
    pub name: String,
    /// Minutes subtracted from local time to get UTC, as sent on the wire.
    pub bias: TimeDelta,
}

impl TimeZonePeriod {
    pub fn new(id: impl Into<String>, name: impl Into<String>, bias: TimeDelta) -> Self {
        TimeZonePeriod {
            id: id.into(),
            name: name.into(),
            bias,
        }
    }

    /// Offset of local time from UTC during this period.
    pub fn utc_offset(&self) -> TimeDelta {
        -self.bias
    }

    pub(crate) fn read_from_xml(node: Node<'_, '_>) -> EwsResult<Self> {
        xml::expect_element(node, names::PERIOD)?;
        Ok(TimeZonePeriod {
            id: xml::required_id(node)?.to_string(),
            name: node.attribute(names::ATTR_NAME).unwrap_or_default().to_string(),
            bias: xml::parse_xs_duration(xml::required_attribute(node, names::ATTR_BIAS)?)?,
        })
    }

    pub fn write_to_xml(&self, writer: &mut EwsXmlWriter) -> EwsResult<()> {
        let bias = xml::format_xs_duration(self.bias);
        writer.write_empty_element(
            XmlNamespace::Types,
            names::PERIOD,
            &[
                (names::ATTR_BIAS, bias.as_str()),
                (names::ATTR_NAME, self.name.as_str()),
                (names::ATTR_ID, self.id.as_str()),
            ],
        )
    }
}
