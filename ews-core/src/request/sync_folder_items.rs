use std::fmt;

use roxmltree::Node;

use super::ServiceRequest;
use crate::error::{EwsError, EwsResult};
use crate::ids::{FolderId, ItemId, ItemIdList};
use crate::property_set::{PropertySet, ServiceObjectType};
use crate::response::ServiceResponse;
use crate::service::ExchangeService;
use crate::validation::{required, validate_enum_value};
use crate::version::{Capability, ExchangeVersion};
use crate::xml::{self, EwsXmlWriter, XmlNamespace, names};

const MIN_CHANGES_RETURNED: i32 = 1;
const MAX_CHANGES_RETURNED: i32 = 512;

/// Which items of a folder a sync covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncFolderItemsScope {
    #[default]
    NormalItems,
    /// Also returns folder-associated (hidden) items.
    NormalAndAssociatedItems,
}

impl fmt::Display for SyncFolderItemsScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyncFolderItemsScope::NormalItems => "NormalItems",
            SyncFolderItemsScope::NormalAndAssociatedItems => "NormalAndAssociatedItems",
        })
    }
}

/// Incremental item sync of one folder.
///
/// `sync_state` is the opaque token from the previous response; leave it
/// unset for the first call.
#[derive(Debug, Clone)]
pub struct SyncFolderItemsRequest {
    pub property_set: Option<PropertySet>,
    pub sync_folder_id: Option<FolderId>,
    pub sync_scope: SyncFolderItemsScope,
    pub sync_state: Option<String>,
    ignored_item_ids: ItemIdList,
    max_changes_returned: i32,
}

impl Default for SyncFolderItemsRequest {
    fn default() -> Self {
        SyncFolderItemsRequest {
            property_set: None,
            sync_folder_id: None,
            sync_scope: SyncFolderItemsScope::default(),
            sync_state: None,
            ignored_item_ids: ItemIdList::new(),
            max_changes_returned: 100,
        }
    }
}

impl SyncFolderItemsRequest {
    pub fn new(property_set: PropertySet, sync_folder_id: FolderId) -> Self {
        SyncFolderItemsRequest {
            property_set: Some(property_set),
            sync_folder_id: Some(sync_folder_id),
            ..Default::default()
        }
    }

    pub fn max_changes_returned(&self) -> i32 {
        self.max_changes_returned
    }

    /// Accepts 1..=512. Out of range values leave the current value untouched.
    pub fn set_max_changes_returned(&mut self, value: i32) -> EwsResult<()> {
        if !(MIN_CHANGES_RETURNED..=MAX_CHANGES_RETURNED).contains(&value) {
            return Err(EwsError::ArgumentOutOfRange {
                name: "MaxChangesReturned",
                value: value.into(),
                min: MIN_CHANGES_RETURNED.into(),
                max: MAX_CHANGES_RETURNED.into(),
            });
        }
        self.max_changes_returned = value;
        Ok(())
    }

    pub fn ignored_item_ids(&self) -> &ItemIdList {
        &self.ignored_item_ids
    }

    pub fn ignored_item_ids_mut(&mut self) -> &mut ItemIdList {
        &mut self.ignored_item_ids
    }
}

impl ServiceRequest for SyncFolderItemsRequest {
    type Response = SyncFolderItemsResponse;

    fn xml_element_name(&self) -> &'static str {
        names::SYNC_FOLDER_ITEMS
    }

    fn response_xml_element_name(&self) -> &'static str {
        names::SYNC_FOLDER_ITEMS_RESPONSE
    }

    fn response_message_xml_element_name(&self) -> &'static str {
        names::SYNC_FOLDER_ITEMS_RESPONSE_MESSAGE
    }

    fn minimum_required_server_version(&self) -> ExchangeVersion {
        ExchangeVersion::Exchange2007_SP1
    }

    fn expected_response_message_count(&self) -> usize {
        1
    }

    fn validate(&self, service: &ExchangeService) -> EwsResult<()> {
        let version = service.requested_server_version();
        let property_set = required(self.property_set.as_ref(), "PropertySet")?;
        let folder_id = required(self.sync_folder_id.as_ref(), names::SYNC_FOLDER_ID)?;

        folder_id.validate(version)?;
        validate_enum_value(
            &self.sync_scope,
            Capability::SyncFolderItemsScope.introduced_in(),
            version,
        )?;
        // Only summary properties come back from a sync.
        property_set.validate_for_request(names::SYNC_FOLDER_ITEMS, version, true)
    }

    fn write_elements_to_xml(
        &self,
        writer: &mut EwsXmlWriter,
        service: &ExchangeService,
    ) -> EwsResult<()> {
        let property_set = required(self.property_set.as_ref(), "PropertySet")?;
        let folder_id = required(self.sync_folder_id.as_ref(), names::SYNC_FOLDER_ID)?;

        property_set.write_to_xml(writer, ServiceObjectType::Item)?;

        writer.write_start_element(XmlNamespace::Messages, names::SYNC_FOLDER_ID)?;
        folder_id.write_to_xml(writer)?;
        writer.write_end_element()?;

        if let Some(sync_state) = &self.sync_state {
            writer.write_element_value(XmlNamespace::Messages, names::SYNC_STATE, sync_state)?;
        }
        self.ignored_item_ids
            .write_to_xml(writer, XmlNamespace::Messages, names::IGNORE)?;
        writer.write_element_value(
            XmlNamespace::Messages,
            names::MAX_CHANGES_RETURNED,
            self.max_changes_returned,
        )?;

        if service
            .requested_server_version()
            .supports(Capability::SyncFolderItemsScope)
        {
            writer.write_element_value(
                XmlNamespace::Messages,
                names::SYNC_SCOPE,
                self.sync_scope,
            )?;
        }
        Ok(())
    }

    fn read_response(
        &self,
        response: ServiceResponse,
        message: Node<'_, '_>,
    ) -> EwsResult<SyncFolderItemsResponse> {
        SyncFolderItemsResponse::read_from_xml(response, message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Create,
    Update,
    Delete,
    ReadFlagChange,
}

impl ChangeType {
    fn from_xml_element_name(name: &str) -> EwsResult<Self> {
        match name {
            names::CREATE => Ok(ChangeType::Create),
            names::UPDATE => Ok(ChangeType::Update),
            names::DELETE => Ok(ChangeType::Delete),
            names::READ_FLAG_CHANGE => Ok(ChangeType::ReadFlagChange),
            other => Err(EwsError::UnexpectedXml(format!("unknown sync change {other}"))),
        }
    }
}

/// One entry of the `Changes` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemChange {
    pub change_type: ChangeType,
    pub item_id: ItemId,
    /// Element name of the changed item (`Message`, `CalendarItem`, ...);
    /// only creates and updates carry one.
    pub item_type: Option<String>,
    /// Only set for `ReadFlagChange`.
    pub is_read: Option<bool>,
}

impl ItemChange {
    fn read_from_xml(node: Node<'_, '_>) -> EwsResult<Self> {
        let change_type = ChangeType::from_xml_element_name(node.tag_name().name())?;
        match change_type {
            ChangeType::Create | ChangeType::Update => {
                let item = xml::child_elements(node).next().ok_or_else(|| {
                    EwsError::UnexpectedXml(format!(
                        "{} change has no item",
                        node.tag_name().name()
                    ))
                })?;
                Ok(ItemChange {
                    change_type,
                    item_id: ItemId::read_from_xml(xml::required_child(item, names::ITEM_ID)?)?,
                    item_type: Some(item.tag_name().name().to_string()),
                    is_read: None,
                })
            }
            ChangeType::Delete => Ok(ItemChange {
                change_type,
                item_id: ItemId::read_from_xml(xml::required_child(node, names::ITEM_ID)?)?,
                item_type: None,
                is_read: None,
            }),
            ChangeType::ReadFlagChange => Ok(ItemChange {
                change_type,
                item_id: ItemId::read_from_xml(xml::required_child(node, names::ITEM_ID)?)?,
                item_type: None,
                is_read: Some(xml::read_child_value(node, names::IS_READ)?),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFolderItemsResponse {
    pub response: ServiceResponse,
    /// Token for the next call. `None` on error messages.
    pub sync_state: Option<String>,
    pub more_changes_available: bool,
    pub changes: Vec<ItemChange>,
}

impl SyncFolderItemsResponse {
    fn read_from_xml(response: ServiceResponse, message: Node<'_, '_>) -> EwsResult<Self> {
        if !response.has_details() {
            return Ok(SyncFolderItemsResponse {
                response,
                sync_state: None,
                more_changes_available: false,
                changes: Vec::new(),
            });
        }

        let sync_state =
            xml::element_text(xml::required_child(message, names::SYNC_STATE)?).to_string();
        let includes_last: bool =
            xml::read_child_value(message, names::INCLUDES_LAST_ITEM_IN_RANGE)?;
        let changes = match xml::child(message, names::CHANGES) {
            Some(changes) => xml::child_elements(changes)
                .map(ItemChange::read_from_xml)
                .collect::<EwsResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(SyncFolderItemsResponse {
            response,
            sync_state: Some(sync_state),
            more_changes_available: !includes_last,
            changes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::WellKnownFolderName;
    use crate::property_set::{BasePropertySet, ItemProperty};
    use crate::request::{emit, parse_response, write_request};
    use crate::response::ServiceResult;

    fn inbox_request() -> SyncFolderItemsRequest {
        SyncFolderItemsRequest::new(
            PropertySet::id_only(),
            FolderId::well_known(WellKnownFolderName::Inbox),
        )
    }

    fn body_of(xml: &str) -> &str {
        let start = xml.find("<m:SyncFolderItems>").unwrap();
        let end = xml.find("</m:SyncFolderItems>").unwrap() + "</m:SyncFolderItems>".len();
        &xml[start..end]
    }

    #[test]
    fn test_max_changes_returned_range() {
        let mut request = SyncFolderItemsRequest::default();
        assert_eq!(request.max_changes_returned(), 100);

        assert!(matches!(
            request.set_max_changes_returned(0),
            Err(EwsError::ArgumentOutOfRange { value: 0, min: 1, max: 512, .. })
        ));
        assert_eq!(request.max_changes_returned(), 100);

        request.set_max_changes_returned(512).unwrap();
        assert_eq!(request.max_changes_returned(), 512);

        assert!(request.set_max_changes_returned(513).is_err());
        assert_eq!(request.max_changes_returned(), 512);
    }

    #[test]
    fn test_max_changes_returned_accepts_whole_range() {
        let mut request = SyncFolderItemsRequest::default();
        for value in 1..=512 {
            request.set_max_changes_returned(value).unwrap();
            assert_eq!(request.max_changes_returned(), value);
        }

        request.set_max_changes_returned(1).unwrap();
        for value in [-1, i32::MIN, 0, 513, i32::MAX] {
            assert!(
                matches!(
                    request.set_max_changes_returned(value),
                    Err(EwsError::ArgumentOutOfRange { .. })
                ),
                "{value} should be rejected"
            );
            assert_eq!(request.max_changes_returned(), 1);
        }
    }

    #[test]
    fn test_missing_fields_are_named() {
        let service = ExchangeService::default();

        let mut request = inbox_request();
        request.property_set = None;
        assert!(matches!(
            request.validate(&service),
            Err(EwsError::MissingArgument("PropertySet"))
        ));

        let mut request = inbox_request();
        request.sync_folder_id = None;
        assert!(matches!(
            request.validate(&service),
            Err(EwsError::MissingArgument("SyncFolderId"))
        ));
    }

    #[test]
    fn test_scope_is_version_gated() {
        let mut request = inbox_request();
        request.sync_scope = SyncFolderItemsScope::NormalAndAssociatedItems;

        let legacy = ExchangeService::new(ExchangeVersion::Exchange2007_SP1);
        match request.validate(&legacy) {
            Err(EwsError::VersionIncompatible {
                value,
                introduced,
                negotiated,
            }) => {
                assert_eq!(value, "NormalAndAssociatedItems");
                assert_eq!(introduced, ExchangeVersion::Exchange2010);
                assert_eq!(negotiated, ExchangeVersion::Exchange2007_SP1);
            }
            other => panic!("Expected VersionIncompatible, got {:?}", other),
        }

        for version in ExchangeVersion::ALL
            .into_iter()
            .filter(|v| *v >= ExchangeVersion::Exchange2010)
        {
            for scope in [
                SyncFolderItemsScope::NormalItems,
                SyncFolderItemsScope::NormalAndAssociatedItems,
            ] {
                request.sync_scope = scope;
                assert!(request.validate(&ExchangeService::new(version)).is_ok());
            }
        }
    }

    #[test]
    fn test_folder_validated_against_version() {
        let request = SyncFolderItemsRequest::new(
            PropertySet::id_only(),
            FolderId::well_known(WellKnownFolderName::ArchiveRoot),
        );
        assert!(matches!(
            request.validate(&ExchangeService::new(ExchangeVersion::Exchange2010)),
            Err(EwsError::VersionIncompatible { .. })
        ));
        assert!(
            request
                .validate(&ExchangeService::new(ExchangeVersion::Exchange2010_SP1))
                .is_ok()
        );
    }

    #[test]
    fn test_non_summary_property_rejected() {
        let request = SyncFolderItemsRequest::new(
            PropertySet::with_properties(
                BasePropertySet::IdOnly,
                [ItemProperty::Subject, ItemProperty::Body],
            ),
            FolderId::well_known(WellKnownFolderName::Inbox),
        );
        match emit(&request, &ExchangeService::default()) {
            Err(EwsError::NonSummaryProperty { property, request }) => {
                assert_eq!(property, "item:Body");
                assert_eq!(request, "SyncFolderItems");
            }
            other => panic!("Expected NonSummaryProperty, got {:?}", other),
        }
    }

    #[test]
    fn test_minimal_body() {
        let request = inbox_request();
        let xml = emit(&request, &ExchangeService::new(ExchangeVersion::Exchange2010)).unwrap();

        assert_eq!(
            body_of(&xml),
            "<m:SyncFolderItems>\
<m:ItemShape><t:BaseShape>IdOnly</t:BaseShape></m:ItemShape>\
<m:SyncFolderId><t:DistinguishedFolderId Id=\"inbox\"/></m:SyncFolderId>\
<m:MaxChangesReturned>100</m:MaxChangesReturned>\
<m:SyncScope>NormalItems</m:SyncScope>\
</m:SyncFolderItems>"
        );
    }

    #[test]
    fn test_full_body_field_order() {
        let mut request = SyncFolderItemsRequest::new(
            PropertySet::with_properties(
                BasePropertySet::FirstClassProperties,
                [ItemProperty::Subject],
            ),
            FolderId::Id {
                id: "AAMkAD".into(),
                change_key: Some("AQAAAB".into()),
            },
        );
        request.sync_state = Some("H4sIAAA=".into());
        request.sync_scope = SyncFolderItemsScope::NormalAndAssociatedItems;
        request.ignored_item_ids_mut().add(ItemId::new("item-1"));
        request.ignored_item_ids_mut().add(ItemId::with_change_key("item-2", "ck"));
        request.set_max_changes_returned(25).unwrap();

        let xml = emit(&request, &ExchangeService::new(ExchangeVersion::Exchange2013)).unwrap();

        assert_eq!(
            body_of(&xml),
            "<m:SyncFolderItems>\
<m:ItemShape><t:BaseShape>AllProperties</t:BaseShape>\
<t:AdditionalProperties><t:FieldURI FieldURI=\"item:Subject\"/></t:AdditionalProperties>\
</m:ItemShape>\
<m:SyncFolderId><t:FolderId Id=\"AAMkAD\" ChangeKey=\"AQAAAB\"/></m:SyncFolderId>\
<m:SyncState>H4sIAAA=</m:SyncState>\
<m:Ignore><t:ItemId Id=\"item-1\"/><t:ItemId Id=\"item-2\" ChangeKey=\"ck\"/></m:Ignore>\
<m:MaxChangesReturned>25</m:MaxChangesReturned>\
<m:SyncScope>NormalAndAssociatedItems</m:SyncScope>\
</m:SyncFolderItems>"
        );
    }

    #[test]
    fn test_scope_never_written_below_2010() {
        let mut request = inbox_request();
        request.sync_scope = SyncFolderItemsScope::NormalAndAssociatedItems;

        let service = ExchangeService::new(ExchangeVersion::Exchange2007_SP1);
        let xml = write_request(&request, &service).unwrap();
        assert!(!xml.contains("SyncScope"));
        assert!(
            xml.contains("<m:MaxChangesReturned>100</m:MaxChangesReturned></m:SyncFolderItems>")
        );
    }

    const RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Header>
    <h:ServerVersionInfo MajorVersion="14"
        xmlns:h="http://schemas.microsoft.com/exchange/services/2006/types" />
  </s:Header>
  <s:Body>
    <m:SyncFolderItemsResponse
        xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages"
        xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types">
      <m:ResponseMessages>
        <m:SyncFolderItemsResponseMessage ResponseClass="Success">
          <m:ResponseCode>NoError</m:ResponseCode>
          <m:SyncState>H4sIAAAAAAAEAO29B2Acf</m:SyncState>
          <m:IncludesLastItemInRange>false</m:IncludesLastItemInRange>
          <m:Changes>
            <t:Create>
              <t:Message><t:ItemId Id="AAMkA1" ChangeKey="CQAAA1" /></t:Message>
            </t:Create>
            <t:Update>
              <t:CalendarItem><t:ItemId Id="AAMkA2" ChangeKey="DwAAA2" /></t:CalendarItem>
            </t:Update>
            <t:Delete><t:ItemId Id="AAMkA3" /></t:Delete>
            <t:ReadFlagChange>
              <t:ItemId Id="AAMkA4" ChangeKey="CQAAA4" />
              <t:IsRead>true</t:IsRead>
            </t:ReadFlagChange>
          </m:Changes>
        </m:SyncFolderItemsResponseMessage>
      </m:ResponseMessages>
    </m:SyncFolderItemsResponse>
  </s:Body>
</s:Envelope>"#;

    #[test]
    fn test_parse_sync_response() {
        let responses = parse_response(&inbox_request(), RESPONSE).unwrap();
        assert_eq!(responses.len(), 1);

        let response = &responses[0];
        assert_eq!(response.response.result, ServiceResult::Success);
        assert_eq!(response.sync_state.as_deref(), Some("H4sIAAAAAAAEAO29B2Acf"));
        assert!(response.more_changes_available);

        let kinds: Vec<_> = response.changes.iter().map(|c| c.change_type).collect();
        assert_eq!(
            kinds,
            vec![
                ChangeType::Create,
                ChangeType::Update,
                ChangeType::Delete,
                ChangeType::ReadFlagChange
            ]
        );
        assert_eq!(response.changes[0].item_type.as_deref(), Some("Message"));
        assert_eq!(response.changes[1].item_type.as_deref(), Some("CalendarItem"));
        assert_eq!(response.changes[1].item_id, ItemId::with_change_key("AAMkA2", "DwAAA2"));
        assert_eq!(response.changes[2].item_id, ItemId::new("AAMkA3"));
        assert_eq!(response.changes[3].is_read, Some(true));
    }

    #[test]
    fn test_parse_folder_not_found() {
        let document = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>
<m:SyncFolderItemsResponse xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages">
  <m:ResponseMessages>
    <m:SyncFolderItemsResponseMessage ResponseClass="Error">
      <m:MessageText>The specified folder could not be found in the store.</m:MessageText>
      <m:ResponseCode>ErrorSyncFolderNotFound</m:ResponseCode>
    </m:SyncFolderItemsResponseMessage>
  </m:ResponseMessages>
</m:SyncFolderItemsResponse></s:Body></s:Envelope>"#;

        match parse_response(&inbox_request(), document) {
            Err(EwsError::ServiceResponse { code, message }) => {
                assert_eq!(code, "ErrorSyncFolderNotFound");
                assert_eq!(message, "The specified folder could not be found in the store.");
            }
            other => panic!("Expected ServiceResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_change_fails() {
        let document = RESPONSE
            .replace("<t:Delete>", "<t:Move>")
            .replace("</t:Delete>", "</t:Move>");
        assert!(matches!(
            parse_response(&inbox_request(), &document),
            Err(EwsError::UnexpectedXml(_))
        ));
    }
}
