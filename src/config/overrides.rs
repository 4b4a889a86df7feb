//! Command-line and environment overrides.
//!
//! Precedence: defaults < config file < `PORT` < explicit flags.

use std::net::SocketAddr;

use crate::config::schema::{FixtureConfig, LogFormat};
use crate::fixture::{DispatchMode, FailureVariant};

/// Values supplied outside the config file. `None` leaves the file's value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub failure_status: Option<FailureVariant>,
    pub success_every: Option<u64>,
    pub dispatch: Option<DispatchMode>,
    pub log_format: Option<LogFormat>,
}

impl Overrides {
    /// Apply onto `config`.
    ///
    /// `port` only replaces the port of whatever bind address is in effect;
    /// an explicit `bind_address` wins over it. An address that does not
    /// parse is left as written so validation reports it.
    pub fn apply(&self, config: &mut FixtureConfig) {
        if let Some(port) = self.port {
            if let Ok(mut addr) = config.listener.bind_address.parse::<SocketAddr>() {
                addr.set_port(port);
                config.listener.bind_address = addr.to_string();
            }
        }
        if let Some(bind_address) = &self.bind_address {
            config.listener.bind_address = bind_address.clone();
        }
        if let Some(failure_status) = self.failure_status {
            config.fixture.failure_status = failure_status.into();
        }
        if let Some(success_every) = self.success_every {
            config.fixture.success_every = success_every;
        }
        if let Some(dispatch) = self.dispatch {
            config.fixture.dispatch = dispatch;
        }
        if let Some(log_format) = self.log_format {
            config.observability.log_format = log_format;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_overrides_change_nothing() {
        let mut config = FixtureConfig::default();
        Overrides::default().apply(&mut config);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.fixture.failure_status.variant().unwrap(), FailureVariant::InternalServerError);
    }

    #[test]
    fn test_port_keeps_host() {
        let mut config = FixtureConfig::default();
        config.listener.bind_address = "127.0.0.1:8080".into();
        Overrides { port: Some(4242), ..Default::default() }.apply(&mut config);
        assert_eq!(config.listener.bind_address, "127.0.0.1:4242");
    }

    #[test]
    fn test_port_on_default_address_listens_on_all_interfaces() {
        let mut config = FixtureConfig::default();
        Overrides { port: Some(4242), ..Default::default() }.apply(&mut config);
        assert_eq!(config.listener.bind_address, "0.0.0.0:4242");
    }

    #[test]
    fn test_port_leaves_unparseable_address_for_validation() {
        let mut config = FixtureConfig::default();
        config.listener.bind_address = "localhost:8080".into();
        Overrides { port: Some(4242), ..Default::default() }.apply(&mut config);
        assert_eq!(config.listener.bind_address, "localhost:8080");
    }

    #[test]
    fn test_bind_address_beats_port() {
        let mut config = FixtureConfig::default();
        Overrides {
            port: Some(4242),
            bind_address: Some("127.0.0.1:7000".into()),
            ..Default::default()
        }
        .apply(&mut config);
        assert_eq!(config.listener.bind_address, "127.0.0.1:7000");
    }

    #[test]
    fn test_fixture_overrides() {
        let mut config = FixtureConfig::default();
        Overrides {
            failure_status: Some(FailureVariant::ServiceUnavailable),
            success_every: Some(2),
            dispatch: Some(DispatchMode::Sequential),
            log_format: Some(LogFormat::Json),
            ..Default::default()
        }
        .apply(&mut config);

        assert_eq!(config.fixture.failure_status.variant().unwrap(), FailureVariant::ServiceUnavailable);
        assert_eq!(config.fixture.success_every, 2);
        assert_eq!(config.fixture.dispatch, DispatchMode::Sequential);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }
}
