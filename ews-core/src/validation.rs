//! Request-side validators shared by all operations.

use std::fmt::Display;

use crate::error::{EwsError, EwsResult};
use crate::property_set::PropertySet;
use crate::version::{Capability, ExchangeVersion};

/// Returns the value of a required field or fails naming it.
pub fn required<'a, T>(value: Option<&'a T>, name: &'static str) -> EwsResult<&'a T> {
    value.ok_or(EwsError::MissingArgument(name))
}

/// Checks an enum value introduced at `introduced` against the negotiated version.
///
/// The protocol default is accepted at every version; any other value needs
/// `negotiated >= introduced`.
pub fn validate_enum_value<E>(
    value: &E,
    introduced: ExchangeVersion,
    negotiated: ExchangeVersion,
) -> EwsResult<()>
where
    E: Default + PartialEq + Display,
{
    if *value == E::default() || negotiated >= introduced {
        Ok(())
    } else {
        Err(EwsError::VersionIncompatible {
            value: value.to_string(),
            introduced,
            negotiated,
        })
    }
}

/// Checks that a feature named `name` may be used at the negotiated version.
pub fn validate_capability(
    name: &str,
    capability: Capability,
    negotiated: ExchangeVersion,
) -> EwsResult<()> {
    if negotiated.supports(capability) {
        Ok(())
    } else {
        Err(EwsError::VersionIncompatible {
            value: name.to_string(),
            introduced: capability.introduced_in(),
            negotiated,
        })
    }
}

/// Fails on the first requested property outside the summary subset.
pub fn validate_summary_properties(
    property_set: &PropertySet,
    request: &'static str,
    summary_properties_only: bool,
) -> EwsResult<()> {
    if !summary_properties_only {
        return Ok(());
    }
    match property_set.additional_properties().find(|p| !p.is_summary()) {
        Some(property) => Err(EwsError::NonSummaryProperty {
            property: property.field_uri(),
            request,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property_set::{BasePropertySet, ItemProperty};
    use crate::request::SyncFolderItemsScope;

    #[test]
    fn test_required_names_missing_field() {
        let missing: Option<&String> = None;
        match required(missing, "SyncFolderId") {
            Err(EwsError::MissingArgument(name)) => assert_eq!(name, "SyncFolderId"),
            other => panic!("Expected MissingArgument, got {:?}", other),
        }
        let present = "x".to_string();
        assert_eq!(required(Some(&present), "SyncState").unwrap(), "x");
    }

    #[test]
    fn test_default_enum_value_is_valid_everywhere() {
        for version in ExchangeVersion::ALL {
            assert!(
                validate_enum_value(
                    &SyncFolderItemsScope::NormalItems,
                    ExchangeVersion::Exchange2010,
                    version
                )
                .is_ok()
            );
        }
    }

    #[test]
    fn test_non_default_enum_value_carries_versions() {
        let err = validate_enum_value(
            &SyncFolderItemsScope::NormalAndAssociatedItems,
            ExchangeVersion::Exchange2010,
            ExchangeVersion::Exchange2007_SP1,
        )
        .unwrap_err();

        match err {
            EwsError::VersionIncompatible {
                value,
                introduced,
                negotiated,
            } => {
                assert_eq!(value, "NormalAndAssociatedItems");
                assert_eq!(introduced, ExchangeVersion::Exchange2010);
                assert_eq!(negotiated, ExchangeVersion::Exchange2007_SP1);
            }
            other => panic!("Expected VersionIncompatible, got {:?}", other),
        }
    }

    #[test]
    fn test_summary_check_names_first_offender() {
        let set = PropertySet::with_properties(
            BasePropertySet::IdOnly,
            [ItemProperty::Subject, ItemProperty::MimeContent, ItemProperty::Body],
        );

        match validate_summary_properties(&set, "SyncFolderItems", true) {
            Err(EwsError::NonSummaryProperty { property, request }) => {
                assert_eq!(property, "item:MimeContent");
                assert_eq!(request, "SyncFolderItems");
            }
            other => panic!("Expected NonSummaryProperty, got {:?}", other),
        }

        assert!(validate_summary_properties(&set, "GetItem", false).is_ok());
    }

    #[test]
    fn test_capability_check() {
        assert!(
            validate_capability(
                "TimeZoneContext",
                Capability::TimeZoneContextHeader,
                ExchangeVersion::Exchange2010_SP1
            )
            .is_ok()
        );
        assert!(matches!(
            validate_capability(
                "TimeZoneContext",
                Capability::TimeZoneContextHeader,
                ExchangeVersion::Exchange2007_SP1
            ),
            Err(EwsError::VersionIncompatible { .. })
        ));
    }
}
