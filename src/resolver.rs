//! Per-dependency version resolution
//!
//! Queries the primary registry and falls back to the secondary one only
//! when the primary answers 404. Every other primary failure is final.
//! At most one failure id is allocated per dependency.

use crate::aggregator::ErrorSink;
use crate::domain::{LibrarySpec, RegistryQueryResult, ResolutionOutcome};
use crate::error::RegistryError;
use crate::registry::Registry;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves one declaration against the two registries
#[derive(Clone)]
pub struct Resolver {
    primary: Arc<dyn Registry>,
    secondary: Arc<dyn Registry>,
}

impl Resolver {
    /// Create a new resolver
    pub fn new(primary: Arc<dyn Registry>, secondary: Arc<dyn Registry>) -> Self {
        Self { primary, secondary }
    }

    /// Resolve a declaration, recording any failure in the sink
    pub async fn resolve(&self, spec: LibrarySpec, sink: &ErrorSink) -> ResolutionOutcome {
        match self.fetch(&spec.name).await {
            Ok(result) if result.latest().is_some() => ResolutionOutcome::resolved(spec, result),
            Ok(result) => {
                let message = format!("{} returned no usable version", result.source);
                Self::fail(spec, message, sink)
            }
            Err(e) => Self::fail(spec, e.to_string(), sink),
        }
    }

    /// Query the primary, then the secondary on 404
    async fn fetch(&self, name: &str) -> Result<RegistryQueryResult, RegistryError> {
        match self.primary.fetch_latest(name).await {
            Err(e) if e.is_not_found() => {
                debug!(library = name, "not on primary, trying secondary");
                self.secondary.fetch_latest(name).await
            }
            other => other,
        }
    }

    fn fail(spec: LibrarySpec, message: String, sink: &ErrorSink) -> ResolutionOutcome {
        warn!(library = %spec.name, "couldn't resolve: {}", message);
        let id = sink.record(&spec, message);
        ResolutionOutcome::failed(spec, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::ErrorAggregator;
    use crate::domain::RegistrySource;
    use crate::registry::MockRegistry;

    fn found(source: RegistrySource, version: &str) -> Result<RegistryQueryResult, RegistryError> {
        Ok(RegistryQueryResult::new(source, version.to_string()))
    }

    fn primary_returning(
        result: Result<RegistryQueryResult, RegistryError>,
    ) -> MockRegistry {
        let mut primary = MockRegistry::new();
        primary
            .expect_fetch_latest()
            .times(1)
            .return_once(move |_| result);
        primary
    }

    fn secondary_never() -> MockRegistry {
        let mut secondary = MockRegistry::new();
        secondary.expect_fetch_latest().never();
        secondary
    }

    fn secondary_returning(
        result: Result<RegistryQueryResult, RegistryError>,
    ) -> MockRegistry {
        let mut secondary = MockRegistry::new();
        secondary
            .expect_fetch_latest()
            .times(1)
            .return_once(move |_| result);
        secondary
    }

    fn resolver(primary: MockRegistry, secondary: MockRegistry) -> Resolver {
        Resolver::new(Arc::new(primary), Arc::new(secondary))
    }

    #[tokio::test]
    async fn test_primary_success_skips_secondary() {
        let resolver = resolver(
            primary_returning(found(RegistrySource::Primary, "1.2.0")),
            secondary_never(),
        );
        let aggregator = ErrorAggregator::new();

        let outcome = resolver
            .resolve(LibrarySpec::new("libA", "1.0.0"), &aggregator.sink())
            .await;

        assert_eq!(outcome.failure_id, None);
        let result = outcome.result.unwrap();
        assert_eq!(result.source, RegistrySource::Primary);
        assert_eq!(result.latest(), Some("1.2.0"));
        assert!(aggregator.close().await.is_empty());
    }

    #[tokio::test]
    async fn test_primary_404_falls_back_to_secondary() {
        let resolver = resolver(
            primary_returning(Err(RegistryError::unavailable("libB", "Primary", 404))),
            secondary_returning(found(RegistrySource::Secondary, "2.0.0")),
        );
        let aggregator = ErrorAggregator::new();

        let outcome = resolver
            .resolve(LibrarySpec::new("libB", "2.0.0"), &aggregator.sink())
            .await;

        let result = outcome.result.unwrap();
        assert_eq!(result.source, RegistrySource::Secondary);
        assert_eq!(result.latest(), Some("2.0.0"));
        assert!(aggregator.close().await.is_empty());
    }

    #[tokio::test]
    async fn test_both_fail_records_single_error() {
        let resolver = resolver(
            primary_returning(Err(RegistryError::unavailable("libC", "Primary", 404))),
            secondary_returning(Err(RegistryError::unavailable("libC", "Secondary", 404))),
        );
        let aggregator = ErrorAggregator::new();

        let outcome = resolver
            .resolve(LibrarySpec::new("libC", "1.0.0"), &aggregator.sink())
            .await;

        assert!(outcome.result.is_none());
        let records = aggregator.close().await;
        assert_eq!(records.len(), 1);
        assert_eq!(Some(records[0].id), outcome.failure_id);
        assert_eq!(records[0].library_name, "libC");
        assert_eq!(records[0].current_version, "1.0.0");
        assert!(records[0].message.contains("Secondary"));
    }

    #[tokio::test]
    async fn test_primary_server_error_does_not_fall_back() {
        let resolver = resolver(
            primary_returning(Err(RegistryError::unavailable("libE", "Primary", 500))),
            secondary_never(),
        );
        let aggregator = ErrorAggregator::new();

        let outcome = resolver
            .resolve(LibrarySpec::new("libE", "1.0.0"), &aggregator.sink())
            .await;

        assert!(outcome.is_failure());
        assert_eq!(aggregator.close().await.len(), 1);
    }

    #[tokio::test]
    async fn test_primary_transport_error_does_not_fall_back() {
        let resolver = resolver(
            primary_returning(Err(RegistryError::transport(
                "libF",
                "Primary",
                "connection refused",
            ))),
            secondary_never(),
        );
        let aggregator = ErrorAggregator::new();

        let outcome = resolver
            .resolve(LibrarySpec::new("libF", "1.0.0"), &aggregator.sink())
            .await;

        assert!(outcome.is_failure());
        let records = aggregator.close().await;
        assert_eq!(records.len(), 1);
        assert!(records[0].message.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_primary_decode_error_does_not_fall_back() {
        let resolver = resolver(
            primary_returning(Err(RegistryError::decode("libG", "Primary", "EOF"))),
            secondary_never(),
        );
        let aggregator = ErrorAggregator::new();

        let outcome = resolver
            .resolve(LibrarySpec::new("libG", "1.0.0"), &aggregator.sink())
            .await;

        assert!(outcome.is_failure());
        assert_eq!(aggregator.close().await.len(), 1);
    }

    #[tokio::test]
    async fn test_result_without_version_is_recorded() {
        let empty = RegistryQueryResult {
            source: RegistrySource::Primary,
            latest_version: None,
            published_at: None,
        };
        let resolver = resolver(primary_returning(Ok(empty)), secondary_never());
        let aggregator = ErrorAggregator::new();

        let outcome = resolver
            .resolve(LibrarySpec::new("libH", "1.0.0"), &aggregator.sink())
            .await;

        assert!(outcome.is_failure());
        let records = aggregator.close().await;
        assert_eq!(records.len(), 1);
        assert!(records[0].message.contains("no usable version"));
    }
}
