//! Concurrent dispatch of dependency resolutions
//!
//! This module provides:
//! - One spawned resolution task per declaration, launched as it arrives
//! - A join over a task count discovered incrementally
//! - Error aggregation closed only after every task has finished
//!
//! The run is complete when the declaration channel has closed (dispatch
//! finished) and the task set is empty. Both conditions are tracked
//! explicitly, so a task finishing before the next declaration arrives
//! never ends the run early.

use crate::aggregator::ErrorAggregator;
use crate::domain::{ErrorRecord, LibrarySpec, ResolutionOutcome};
use crate::registry::{HttpClient, PrimaryRegistry, Registry, SecondaryRegistry};
use crate::resolver::Resolver;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{Id, JoinSet};
use tracing::{debug, error};

/// Everything a run produced
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// One outcome per declaration, in completion order
    pub outcomes: Vec<ResolutionOutcome>,
    /// Failures in arrival order
    pub errors: Vec<ErrorRecord>,
}

impl RunReport {
    /// Returns the number of failed outcomes
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// Returns true if any dependency failed to resolve
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Orchestrator for a resolution run
pub struct Orchestrator {
    resolver: Resolver,
}

impl Orchestrator {
    /// Create an orchestrator over the default registry adapters
    pub fn new(client: HttpClient, primary_url: &str, secondary_url: &str) -> Self {
        Self::with_registries(
            Arc::new(PrimaryRegistry::new(client.clone(), primary_url)),
            Arc::new(SecondaryRegistry::new(client, secondary_url)),
        )
    }

    /// Create an orchestrator over arbitrary registries
    pub fn with_registries(primary: Arc<dyn Registry>, secondary: Arc<dyn Registry>) -> Self {
        Self {
            resolver: Resolver::new(primary, secondary),
        }
    }

    /// Resolve a finite list of declarations
    pub async fn run_specs(&self, specs: Vec<LibrarySpec>) -> RunReport {
        let (tx, rx) = mpsc::channel(specs.len().max(1));
        tokio::spawn(async move {
            for spec in specs {
                if tx.send(spec).await.is_err() {
                    break;
                }
            }
        });
        self.run(rx).await
    }

    /// Resolve every declaration received on the channel
    pub async fn run(&self, specs: mpsc::Receiver<LibrarySpec>) -> RunReport {
        self.run_with(specs, |_| {}).await
    }

    /// Resolve every declaration received on the channel, reporting each
    /// outcome as soon as it completes
    pub async fn run_with<F>(
        &self,
        mut specs: mpsc::Receiver<LibrarySpec>,
        mut on_outcome: F,
    ) -> RunReport
    where
        F: FnMut(&ResolutionOutcome),
    {
        let aggregator = ErrorAggregator::new();
        let mut tasks = JoinSet::new();
        let mut pending: HashMap<Id, LibrarySpec> = HashMap::new();
        let mut outcomes = Vec::new();
        let mut dispatching = true;

        loop {
            tokio::select! {
                received = specs.recv(), if dispatching => match received {
                    Some(spec) => {
                        let resolver = self.resolver.clone();
                        let sink = aggregator.sink();
                        let task_spec = spec.clone();
                        let handle = tasks.spawn(async move {
                            resolver.resolve(task_spec, &sink).await
                        });
                        debug!(library = %spec.name, in_flight = tasks.len(), "dispatched");
                        pending.insert(handle.id(), spec);
                    }
                    None => {
                        debug!(dispatched = outcomes.len() + tasks.len(), "dispatch finished");
                        dispatching = false;
                    }
                },
                Some(joined) = tasks.join_next_with_id(), if !tasks.is_empty() => {
                    let outcome = match joined {
                        Ok((id, outcome)) => {
                            pending.remove(&id);
                            outcome
                        }
                        Err(e) => {
                            // A panicking resolver still owes its declaration an outcome
                            let Some(spec) = pending.remove(&e.id()) else {
                                error!("lost track of a failed resolution task: {}", e);
                                continue;
                            };
                            let failure_id = aggregator
                                .sink()
                                .record(&spec, format!("resolution task failed: {}", e));
                            ResolutionOutcome::failed(spec, failure_id)
                        }
                    };
                    on_outcome(&outcome);
                    outcomes.push(outcome);
                }
                else => break,
            }
        }

        let errors = aggregator.close().await;
        debug!(
            outcomes = outcomes.len(),
            errors = errors.len(),
            "run complete"
        );

        RunReport { outcomes, errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RegistryQueryResult, RegistrySource};
    use crate::error::RegistryError;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Registry that answers from a fixed table after an optional delay
    struct StubRegistry {
        source: RegistrySource,
        versions: HashMap<String, String>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl StubRegistry {
        fn new(source: RegistrySource, versions: &[(&str, &str)]) -> Self {
            Self {
                source,
                versions: versions
                    .iter()
                    .map(|(n, v)| (n.to_string(), v.to_string()))
                    .collect(),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl Registry for StubRegistry {
        fn source(&self) -> RegistrySource {
            self.source
        }

        async fn fetch_latest(&self, name: &str) -> Result<RegistryQueryResult, RegistryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if name == "panics" {
                panic!("stub asked to panic");
            }
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.versions.get(name) {
                Some(v) => Ok(RegistryQueryResult::new(self.source, v.clone())),
                None => Err(RegistryError::unavailable(
                    name,
                    self.source.display_name(),
                    404,
                )),
            }
        }
    }

    fn orchestrator(primary: StubRegistry, secondary: StubRegistry) -> Orchestrator {
        Orchestrator::with_registries(Arc::new(primary), Arc::new(secondary))
    }

    fn assert_ids_correlate(report: &RunReport) {
        let outcome_ids: Vec<u32> = report.outcomes.iter().filter_map(|o| o.failure_id).collect();
        let unique: HashSet<u32> = outcome_ids.iter().copied().collect();
        let record_ids: HashSet<u32> = report.errors.iter().map(|r| r.id).collect();
        assert_eq!(unique.len(), outcome_ids.len(), "duplicate failure ids");
        assert_eq!(unique, record_ids);
        assert_eq!(report.errors.len(), report.failure_count());
    }

    #[tokio::test]
    async fn test_empty_input_completes() {
        let orch = orchestrator(
            StubRegistry::new(RegistrySource::Primary, &[]),
            StubRegistry::new(RegistrySource::Secondary, &[]),
        );
        let report = orch.run_specs(Vec::new()).await;

        assert!(report.outcomes.is_empty());
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn test_one_outcome_per_spec() {
        let orch = orchestrator(
            StubRegistry::new(RegistrySource::Primary, &[("libA", "1.2.0")])
                .with_delay(Duration::from_millis(5)),
            StubRegistry::new(RegistrySource::Secondary, &[("libB", "2.0.0")]),
        );
        let specs: Vec<LibrarySpec> = (0..30)
            .map(|i| match i % 3 {
                0 => LibrarySpec::new("libA", "1.0.0"),
                1 => LibrarySpec::new("libB", "2.0.0"),
                _ => LibrarySpec::new(format!("missing{}", i), "1.0.0"),
            })
            .collect();

        let report = orch.run_specs(specs).await;

        assert_eq!(report.outcomes.len(), 30);
        assert_eq!(report.errors.len(), 10);
        assert_ids_correlate(&report);
    }

    #[tokio::test]
    async fn test_first_task_finishing_early_does_not_end_run() {
        let orch = orchestrator(
            StubRegistry::new(RegistrySource::Primary, &[("fast", "1.0.0"), ("slow", "1.0.0")]),
            StubRegistry::new(RegistrySource::Secondary, &[]),
        );
        let (tx, rx) = mpsc::channel(1);

        let producer = tokio::spawn(async move {
            tx.send(LibrarySpec::new("fast", "1.0.0")).await.unwrap();
            // Let the first resolution finish before issuing more work
            tokio::time::sleep(Duration::from_millis(50)).await;
            tx.send(LibrarySpec::new("slow", "1.0.0")).await.unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
            tx.send(LibrarySpec::new("gone", "1.0.0")).await.unwrap();
        });

        let mut seen = Vec::new();
        let report = orch
            .run_with(rx, |outcome| seen.push(outcome.spec.name.clone()))
            .await;
        producer.await.unwrap();

        assert_eq!(seen, vec!["fast", "slow", "gone"]);
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.errors.len(), 1);
        assert_ids_correlate(&report);
    }

    #[tokio::test]
    async fn test_secondary_only_called_on_404() {
        let primary = Arc::new(StubRegistry::new(
            RegistrySource::Primary,
            &[("libA", "1.2.0")],
        ));
        let secondary = Arc::new(StubRegistry::new(
            RegistrySource::Secondary,
            &[("libB", "2.0.0")],
        ));
        let orch = Orchestrator::with_registries(primary.clone(), secondary.clone());

        let report = orch
            .run_specs(vec![
                LibrarySpec::new("libA", "1.0.0"),
                LibrarySpec::new("libB", "2.0.0"),
            ])
            .await;

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(primary.calls.load(Ordering::SeqCst), 2);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 1);
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn test_panicking_task_still_yields_outcome() {
        let orch = orchestrator(
            StubRegistry::new(RegistrySource::Primary, &[("libA", "1.2.0")]),
            StubRegistry::new(RegistrySource::Secondary, &[]),
        );

        let report = orch
            .run_specs(vec![
                LibrarySpec::new("libA", "1.0.0"),
                LibrarySpec::new("panics", "1.0.0"),
            ])
            .await;

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].library_name, "panics");
        assert_ids_correlate(&report);
    }

    #[test]
    fn test_run_report_default() {
        let report = RunReport::default();
        assert_eq!(report.failure_count(), 0);
        assert!(!report.has_errors());
    }
}
