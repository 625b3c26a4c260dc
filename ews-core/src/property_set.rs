//! Property sets: which item fields a request asks the server to return.

use std::fmt;

use indexmap::IndexSet;

use crate::error::{EwsError, EwsResult};
use crate::validation::{validate_capability, validate_summary_properties};
use crate::version::{Capability, ExchangeVersion};
use crate::xml::{EwsXmlWriter, XmlNamespace, names};

/// The base shape a property set extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BasePropertySet {
    #[default]
    IdOnly,
    FirstClassProperties,
}

impl BasePropertySet {
    pub fn as_str(&self) -> &'static str {
        match self {
            BasePropertySet::IdOnly => "IdOnly",
            BasePropertySet::FirstClassProperties => "AllProperties",
        }
    }
}

/// Body format requested for items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Best,
    Html,
    Text,
}

impl BodyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyType::Best => "Best",
            BodyType::Html => "HTML",
            BodyType::Text => "Text",
        }
    }
}

/// Kind of object a property set shapes; selects the shape element name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceObjectType {
    Item,
    Folder,
}

/// Item properties that can be requested by field URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemProperty {
    ItemId,
    ParentFolderId,
    ItemClass,
    Subject,
    Sensitivity,
    Body,
    Attachments,
    DateTimeReceived,
    Size,
    Categories,
    Importance,
    InReplyTo,
    HasAttachments,
    MimeContent,
    DisplayTo,
    DisplayCc,
    LastModifiedTime,
    UniqueBody,
    ConversationId,
    StoreEntryId,
    TextBody,
}

impl ItemProperty {
    pub fn field_uri(&self) -> &'static str {
        match self {
            ItemProperty::ItemId => "item:ItemId",
            ItemProperty::ParentFolderId => "item:ParentFolderId",
            ItemProperty::ItemClass => "item:ItemClass",
            ItemProperty::Subject => "item:Subject",
            ItemProperty::Sensitivity => "item:Sensitivity",
            ItemProperty::Body => "item:Body",
            ItemProperty::Attachments => "item:Attachments",
            ItemProperty::DateTimeReceived => "item:DateTimeReceived",
            ItemProperty::Size => "item:Size",
            ItemProperty::Categories => "item:Categories",
            ItemProperty::Importance => "item:Importance",
            ItemProperty::InReplyTo => "item:InReplyTo",
            ItemProperty::HasAttachments => "item:HasAttachments",
            ItemProperty::MimeContent => "item:MimeContent",
            ItemProperty::DisplayTo => "item:DisplayTo",
            ItemProperty::DisplayCc => "item:DisplayCc",
            ItemProperty::LastModifiedTime => "item:LastModifiedTime",
            ItemProperty::UniqueBody => "item:UniqueBody",
            ItemProperty::ConversationId => "item:ConversationId",
            ItemProperty::StoreEntryId => "item:StoreEntryId",
            ItemProperty::TextBody => "item:TextBody",
        }
    }

    /// Summary properties are the ones FindItem/SyncFolderItems can return
    /// without fetching the whole item.
    pub fn is_summary(&self) -> bool {
        !matches!(
            self,
            ItemProperty::Body
                | ItemProperty::Attachments
                | ItemProperty::MimeContent
                | ItemProperty::UniqueBody
                | ItemProperty::TextBody
        )
    }

    pub fn introduced_in(&self) -> ExchangeVersion {
        match self {
            ItemProperty::UniqueBody | ItemProperty::ConversationId => {
                ExchangeVersion::Exchange2010
            }
            ItemProperty::StoreEntryId => ExchangeVersion::Exchange2010_SP2,
            ItemProperty::TextBody => ExchangeVersion::Exchange2013,
            _ => ExchangeVersion::Exchange2007_SP1,
        }
    }
}

impl fmt::Display for ItemProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_uri())
    }
}

/// A base shape plus an ordered set of additional properties.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertySet {
    base: BasePropertySet,
    additional: IndexSet<ItemProperty>,
    requested_body_type: Option<BodyType>,
    filter_html_content: Option<bool>,
}

impl PropertySet {
    pub fn new(base: BasePropertySet) -> Self {
        PropertySet {
            base,
            ..Default::default()
        }
    }

    pub fn id_only() -> Self {
        Self::new(BasePropertySet::IdOnly)
    }

    pub fn first_class_properties() -> Self {
        Self::new(BasePropertySet::FirstClassProperties)
    }

    pub fn with_properties(
        base: BasePropertySet,
        properties: impl IntoIterator<Item = ItemProperty>,
    ) -> Self {
        let mut set = Self::new(base);
        set.additional.extend(properties);
        set
    }

    /// Adds a property; duplicates keep their first position.
    pub fn add(&mut self, property: ItemProperty) {
        self.additional.insert(property);
    }

    pub fn base(&self) -> BasePropertySet {
        self.base
    }

    pub fn additional_properties(&self) -> impl Iterator<Item = &ItemProperty> {
        self.additional.iter()
    }

    pub fn contains(&self, property: ItemProperty) -> bool {
        self.additional.contains(&property)
    }

    pub fn set_requested_body_type(&mut self, body_type: Option<BodyType>) {
        self.requested_body_type = body_type;
    }

    pub fn set_filter_html_content(&mut self, filter: Option<bool>) {
        self.filter_html_content = filter;
    }

    /// Checks the set against the request it will be sent with.
    ///
    /// Properties newer than the requested version are rejected, and when
    /// `summary_properties_only` is set the first non-summary property fails
    /// validation.
    pub fn validate_for_request(
        &self,
        request: &'static str,
        version: ExchangeVersion,
        summary_properties_only: bool,
    ) -> EwsResult<()> {
        for property in &self.additional {
            if version < property.introduced_in() {
                return Err(EwsError::VersionIncompatible {
                    value: property.field_uri().to_string(),
                    introduced: property.introduced_in(),
                    negotiated: version,
                });
            }
        }

        if self.filter_html_content.is_some() {
            validate_capability(
                names::FILTER_HTML_CONTENT,
                Capability::FilterHtmlContent,
                version,
            )?;
        }

        validate_summary_properties(self, request, summary_properties_only)
    }

    /// Writes `<m:ItemShape>` (or `FolderShape`) for this set.
    pub fn write_to_xml(
        &self,
        writer: &mut EwsXmlWriter,
        object_type: ServiceObjectType,
    ) -> EwsResult<()> {
        let shape = match object_type {
            ServiceObjectType::Item => names::ITEM_SHAPE,
            ServiceObjectType::Folder => names::FOLDER_SHAPE,
        };
        writer.write_start_element(XmlNamespace::Messages, shape)?;
        writer.write_element_value(XmlNamespace::Types, names::BASE_SHAPE, self.base.as_str())?;

        if let Some(body_type) = self.requested_body_type {
            writer.write_element_value(XmlNamespace::Types, names::BODY_TYPE, body_type.as_str())?;
        }
        if let Some(filter) = self.filter_html_content {
            writer.write_element_value(XmlNamespace::Types, names::FILTER_HTML_CONTENT, filter)?;
        }

        if !self.additional.is_empty() {
            writer.write_start_element(XmlNamespace::Types, names::ADDITIONAL_PROPERTIES)?;
            for property in &self.additional {
                writer.write_empty_element(
                    XmlNamespace::Types,
                    names::FIELD_URI,
                    &[(names::ATTR_FIELD_URI, property.field_uri())],
                )?;
            }
            writer.write_end_element()?;
        }

        writer.write_end_element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_newer_than_version_is_rejected() {
        let set =
            PropertySet::with_properties(BasePropertySet::IdOnly, [ItemProperty::ConversationId]);

        assert!(matches!(
            set.validate_for_request("SyncFolderItems", ExchangeVersion::Exchange2007_SP1, true),
            Err(EwsError::VersionIncompatible {
                introduced: ExchangeVersion::Exchange2010,
                ..
            })
        ));
        assert!(
            set.validate_for_request("SyncFolderItems", ExchangeVersion::Exchange2010, true)
                .is_ok()
        );
    }

    #[test]
    fn test_filter_html_content_requires_2010() {
        let mut set = PropertySet::id_only();
        set.set_filter_html_content(Some(true));

        assert!(
            set.validate_for_request("SyncFolderItems", ExchangeVersion::Exchange2007_SP1, false)
                .is_err()
        );
        assert!(
            set.validate_for_request("SyncFolderItems", ExchangeVersion::Exchange2010, false)
                .is_ok()
        );
    }

    #[test]
    fn test_write_item_shape_keeps_insertion_order() {
        let mut set = PropertySet::first_class_properties();
        set.add(ItemProperty::Subject);
        set.add(ItemProperty::DateTimeReceived);
        set.add(ItemProperty::Subject);

        let mut writer = EwsXmlWriter::new();
        set.write_to_xml(&mut writer, ServiceObjectType::Item).unwrap();
        let xml = writer.into_string().unwrap();

        assert_eq!(
            xml,
            "<m:ItemShape><t:BaseShape>AllProperties</t:BaseShape><t:AdditionalProperties>\
<t:FieldURI FieldURI=\"item:Subject\"/><t:FieldURI FieldURI=\"item:DateTimeReceived\"/>\
</t:AdditionalProperties></m:ItemShape>"
        );
    }

    #[test]
    fn test_id_only_shape_omits_additional_properties() {
        let mut writer = EwsXmlWriter::new();
        PropertySet::id_only()
            .write_to_xml(&mut writer, ServiceObjectType::Folder)
            .unwrap();
        assert_eq!(
            writer.into_string().unwrap(),
            "<m:FolderShape><t:BaseShape>IdOnly</t:BaseShape></m:FolderShape>"
        );
    }
}
