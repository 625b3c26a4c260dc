//! Session context shared by every request.

use crate::config::ServiceConfig;
use crate::error::EwsResult;
use crate::timezone::TimeZoneDefinition;
use crate::version::ExchangeVersion;

/// The negotiated protocol version and session-wide settings.
///
/// Transport, credentials and endpoint discovery live outside this crate;
/// this only carries what changes the bytes of a request.
#[derive(Debug, Clone, Default)]
pub struct ExchangeService {
    requested_server_version: ExchangeVersion,
    time_zone: Option<TimeZoneDefinition>,
}

impl ExchangeService {
    pub fn new(requested_server_version: ExchangeVersion) -> Self {
        ExchangeService {
            requested_server_version,
            time_zone: None,
        }
    }

    /// Builds a session from a loaded config, reading its time zone file if set.
    pub fn from_config(config: &ServiceConfig) -> EwsResult<Self> {
        Ok(ExchangeService {
            requested_server_version: config.requested_server_version,
            time_zone: config.load_time_zone()?,
        })
    }

    pub fn with_time_zone(mut self, time_zone: TimeZoneDefinition) -> Self {
        self.time_zone = Some(time_zone);
        self
    }

    pub fn requested_server_version(&self) -> ExchangeVersion {
        self.requested_server_version
    }

    /// Time zone sent in the `TimeZoneContext` header, when the version allows it.
    pub fn time_zone(&self) -> Option<&TimeZoneDefinition> {
        self.time_zone.as_ref()
    }
}
