//! # Dependency Injection / 依赖注入模块
//!
//! The only place that depends on `bd-infra` and `bd-app` together. It
//! assembles adapters behind their ports and makes no decisions of its own.
//! 仅负责组装，不做业务决策。

use std::sync::Arc;

use bd_app::{ListController, ListResource, ListView, QueryCache};
use bd_core::ports::{ClockPort, ErrorReporterPort, TransportPort};
use bd_core::{ClientConfig, ListEntity, ListParams, QueryOptions};
use bd_infra::{ReqwestTransport, SystemClock, TracingErrorReporter, TransportBuildError};
use thiserror::Error;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Error)]
pub enum WiringError {
    #[error("failed to build HTTP transport: {0}")]
    Transport(#[from] TransportBuildError),
}

/// Everything a list screen needs, shared across screens.
#[derive(Clone)]
pub struct AppDeps {
    pub config: ClientConfig,
    pub transport: Arc<dyn TransportPort>,
    pub clock: Arc<dyn ClockPort>,
    pub reporter: Arc<dyn ErrorReporterPort>,
    pub cache: Arc<QueryCache>,
    pub query_options: QueryOptions,
}

impl AppDeps {
    /// Assemble from already-built ports. Tests use this with fakes.
    pub fn from_parts(
        config: ClientConfig,
        transport: Arc<dyn TransportPort>,
        clock: Arc<dyn ClockPort>,
        reporter: Arc<dyn ErrorReporterPort>,
    ) -> Self {
        let cache = Arc::new(QueryCache::new(Arc::clone(&clock), config.cache.max_entries));
        let query_options = QueryOptions::from_config(&config.cache);
        Self {
            config,
            transport,
            clock,
            reporter,
            cache,
            query_options,
        }
    }

    pub fn resource<E: ListEntity>(&self) -> Arc<ListResource<E>> {
        Arc::new(ListResource::new(Arc::clone(&self.transport)))
    }

    /// Controller for one list screen. `filters` without a `per_page` get the
    /// configured default.
    pub fn controller<E: ListEntity>(
        &self,
        filters: ListParams,
    ) -> (ListController<E>, watch::Receiver<ListView<E>>) {
        let filters = if filters.requested_per_page().is_some() {
            filters
        } else {
            filters.per_page(self.config.list.default_per_page)
        };
        ListController::new(
            Arc::clone(&self.cache),
            self.resource::<E>(),
            Arc::clone(&self.reporter),
            self.query_options.clone(),
            filters,
        )
    }
}

/// Wire production adapters from configuration.
pub fn wire_dependencies(config: ClientConfig) -> Result<AppDeps, WiringError> {
    let transport = ReqwestTransport::new(&config.api)?;
    info!(base_url = %transport.base_url(), "Wiring list-query dependencies");

    Ok(AppDeps::from_parts(
        config,
        Arc::new(transport),
        Arc::new(SystemClock),
        Arc::new(TracingErrorReporter),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bd_core::entities::VoucherType;
    use bd_core::params::keys;
    use bd_core::ParamValue;

    #[test]
    fn wires_cache_from_config() {
        let mut config = ClientConfig::default();
        config.cache.stale_time_ms = 1_000;
        config.cache.keep_previous_data = false;

        let deps = wire_dependencies(config).unwrap();

        assert_eq!(deps.query_options.stale_time_ms(), 1_000);
        assert!(!deps.query_options.keep_previous_data);
        assert!(deps.cache.is_empty());
    }

    #[test]
    fn invalid_base_url_is_a_wiring_error() {
        let mut config = ClientConfig::default();
        config.api.base_url = "::not-a-url::".to_string();

        assert!(matches!(
            wire_dependencies(config),
            Err(WiringError::Transport(TransportBuildError::InvalidBaseUrl { .. }))
        ));
    }

    #[tokio::test]
    async fn controller_gets_default_per_page() {
        let deps = wire_dependencies(ClientConfig::default()).unwrap();

        let (controller, _views) = deps.controller::<VoucherType>(ListParams::new().page(2));
        assert_eq!(controller.filters().get(keys::PER_PAGE), Some(&ParamValue::UInt(15)));

        let (controller, _views) = deps.controller::<VoucherType>(ListParams::new().per_page(50));
        assert_eq!(controller.filters().get(keys::PER_PAGE), Some(&ParamValue::UInt(50)));
    }
}
