//! Client-side codec for Exchange Web Services.
//!
//! This crate builds and validates EWS SOAP requests and decodes their responses:
//! - `request` for the envelope and the `SyncFolderItems` operation
//! - `timezone` for time zone definitions and their transitions
//! - `config` and `service` for the negotiated version and session settings
//!
//! Transport is left to the caller.

pub mod config;
pub mod error;
pub mod ids;
pub mod property_set;
pub mod request;
pub mod response;
pub mod service;
pub mod timezone;
pub mod validation;
pub mod version;
pub mod xml;

pub use config::ServiceConfig;
pub use error::{EwsError, EwsResult};
pub use ids::{FolderId, ItemId, ItemIdList, WellKnownFolderName};
pub use property_set::{BasePropertySet, BodyType, ItemProperty, PropertySet};
pub use request::{
    ServiceRequest, SyncFolderItemsRequest, SyncFolderItemsResponse, SyncFolderItemsScope, emit,
    parse_response,
};
pub use response::{ServiceErrorHandling, ServiceResponse, ServiceResult};
pub use service::ExchangeService;
pub use timezone::{
    TimeZoneDefinition, TimeZonePeriod, TimeZoneTransition, TimeZoneTransitionGroup,
    TransitionTarget,
};
pub use version::{Capability, ExchangeVersion};
