//! Protocol versions and the features each one introduced.
//!
//! Every version-conditional rule in the crate goes through [`Capability`],
//! so the full list of gated wire fields and enum values lives here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EwsError, EwsResult};

/// Exchange server versions, ordered oldest to newest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[allow(non_camel_case_types)]
pub enum ExchangeVersion {
    Exchange2007_SP1,
    Exchange2010,
    Exchange2010_SP1,
    #[default]
    Exchange2010_SP2,
    Exchange2013,
}

impl ExchangeVersion {
    pub const ALL: [ExchangeVersion; 5] = [
        ExchangeVersion::Exchange2007_SP1,
        ExchangeVersion::Exchange2010,
        ExchangeVersion::Exchange2010_SP1,
        ExchangeVersion::Exchange2010_SP2,
        ExchangeVersion::Exchange2013,
    ];

    /// Value of the `RequestServerVersion/@Version` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeVersion::Exchange2007_SP1 => "Exchange2007_SP1",
            ExchangeVersion::Exchange2010 => "Exchange2010",
            ExchangeVersion::Exchange2010_SP1 => "Exchange2010_SP1",
            ExchangeVersion::Exchange2010_SP2 => "Exchange2010_SP2",
            ExchangeVersion::Exchange2013 => "Exchange2013",
        }
    }

    /// Whether a session negotiated at this version may use `capability`.
    pub fn supports(self, capability: Capability) -> bool {
        self >= capability.introduced_in()
    }
}

impl fmt::Display for ExchangeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeVersion {
    type Err = EwsError;

    fn from_str(s: &str) -> EwsResult<Self> {
        ExchangeVersion::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| EwsError::invalid_value("ExchangeVersion", s))
    }
}

/// Protocol features that only exist from a given server version onwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `SyncScope` element of SyncFolderItems and the `SyncFolderItemsScope` enum.
    SyncFolderItemsScope,
    /// `TimeZoneContext` SOAP header carrying a full time zone definition.
    TimeZoneContextHeader,
    /// `FilterHtmlContent` element of item shapes.
    FilterHtmlContent,
    /// Archive and recoverable-items distinguished folders.
    ArchiveFolders,
    /// Folders added with the 2013 mailbox schema (conflicts, sync issues, ...).
    Exchange2013Folders,
}

impl Capability {
    pub const fn introduced_in(self) -> ExchangeVersion {
        match self {
            Capability::SyncFolderItemsScope => ExchangeVersion::Exchange2010,
            Capability::TimeZoneContextHeader => ExchangeVersion::Exchange2010,
            Capability::FilterHtmlContent => ExchangeVersion::Exchange2010,
            Capability::ArchiveFolders => ExchangeVersion::Exchange2010_SP1,
            Capability::Exchange2013Folders => ExchangeVersion::Exchange2013,
        }
    }
}
