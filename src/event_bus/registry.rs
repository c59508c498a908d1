use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;

use crate::error::AppError;
use crate::metrics::Metrics;
use super::core::{DomainEvent, Reaction};

// ============================================================================
// Event Registry - explicit publish/subscribe
// ============================================================================
//
// Responsibilities:
// 1. Map event-type tag -> ordered list of reactions (built once)
// 2. Dispatch synchronously on publish, in registration order
// 3. Stop at the first failing reaction and hand its error to the publisher
//
// No retries, no deduplication, no queue: a reaction runs on the task that
// published the event.
//
// ============================================================================

/// Type-erased reaction so reactions for different event types can share
/// one map.
#[async_trait]
trait ErasedReaction: Send + Sync {
    fn name(&self) -> &'static str;

    async fn react_any(&self, event: &(dyn Any + Send + Sync)) -> Result<(), AppError>;
}

struct TypedReaction<E, R> {
    reaction: R,
    _event: PhantomData<fn(&E)>,
}

#[async_trait]
impl<E, R> ErasedReaction for TypedReaction<E, R>
where
    E: DomainEvent,
    R: Reaction<E> + 'static,
{
    fn name(&self) -> &'static str {
        self.reaction.name()
    }

    async fn react_any(&self, event: &(dyn Any + Send + Sync)) -> Result<(), AppError> {
        let event = event.downcast_ref::<E>().ok_or_else(|| {
            AppError::Internal(format!(
                "reaction {} received an event that is not {}",
                self.reaction.name(),
                E::event_type()
            ))
        })?;

        self.reaction.react(event).await
    }
}

/// Builder used at process start; the built registry is immutable.
#[derive(Default)]
pub struct EventRegistryBuilder {
    reactions: HashMap<&'static str, Vec<Arc<dyn ErasedReaction>>>,
    metrics: Option<Arc<Metrics>>,
}

impl EventRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reaction for `E`. Reactions run in the order they were added.
    pub fn subscribe<E, R>(mut self, reaction: R) -> Self
    where
        E: DomainEvent,
        R: Reaction<E> + 'static,
    {
        let entry = self.reactions.entry(E::event_type()).or_default();
        entry.push(Arc::new(TypedReaction {
            reaction,
            _event: PhantomData,
        }));
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> EventRegistry {
        for (event_type, reactions) in &self.reactions {
            let names: Vec<&str> = reactions.iter().map(|r| r.name()).collect();
            tracing::info!(event_type = %event_type, reactions = ?names, "Registered reactions");
        }

        EventRegistry {
            reactions: self.reactions,
            metrics: self.metrics,
        }
    }
}

pub struct EventRegistry {
    reactions: HashMap<&'static str, Vec<Arc<dyn ErasedReaction>>>,
    metrics: Option<Arc<Metrics>>,
}

impl EventRegistry {
    pub fn builder() -> EventRegistryBuilder {
        EventRegistryBuilder::new()
    }

    /// Names of the reactions bound to `event_type`, in dispatch order
    pub fn reaction_names(&self, event_type: &str) -> Vec<&'static str> {
        self.reactions
            .get(event_type)
            .map(|reactions| reactions.iter().map(|r| r.name()).collect())
            .unwrap_or_default()
    }

    /// Run every reaction registered for `E`, in order.
    ///
    /// Returns the first reaction error; reactions after it do not run and
    /// reactions before it are not undone.
    pub async fn publish<E: DomainEvent>(&self, event: &E) -> Result<(), AppError> {
        let event_type = E::event_type();
        let aggregate_id = event.aggregate_id();

        let Some(reactions) = self.reactions.get(event_type) else {
            tracing::debug!(event_type = %event_type, aggregate_id, "No reactions registered");
            return Ok(());
        };

        if let Some(metrics) = &self.metrics {
            metrics.events_published.with_label_values(&[event_type]).inc();
        }

        tracing::debug!(
            event_type = %event_type,
            aggregate_id,
            reaction_count = reactions.len(),
            "Publishing event"
        );

        for reaction in reactions {
            let started = Instant::now();
            let result = reaction.react_any(event).await;

            if let Some(metrics) = &self.metrics {
                metrics
                    .reaction_duration
                    .with_label_values(&[reaction.name()])
                    .observe(started.elapsed().as_secs_f64());
            }

            if let Err(err) = result {
                tracing::error!(
                    event_type = %event_type,
                    aggregate_id,
                    reaction = reaction.name(),
                    error = %err,
                    "Reaction failed, remaining reactions skipped"
                );

                if let Some(metrics) = &self.metrics {
                    metrics
                        .reactions_failed
                        .with_label_values(&[event_type, reaction.name()])
                        .inc();
                }

                return Err(err);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Clone, Debug)]
    struct Pinged(i64);

    impl DomainEvent for Pinged {
        fn event_type() -> &'static str { "test.pinged" }

        fn aggregate_id(&self) -> i64 {
            self.0
        }
    }

    #[derive(Clone, Debug)]
    struct Ignored;

    impl DomainEvent for Ignored {
        fn event_type() -> &'static str { "test.ignored" }

        fn aggregate_id(&self) -> i64 {
            0
        }
    }

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl Reaction<Pinged> for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn react(&self, event: &Pinged) -> Result<(), AppError> {
            self.log.lock().unwrap().push(format!("{}:{}", self.name, event.0));
            if self.fail {
                return Err(AppError::not_found("Product", 99));
            }
            Ok(())
        }
    }

    fn recorder(name: &'static str, log: &Arc<Mutex<Vec<String>>>, fail: bool) -> Recorder {
        Recorder { name, log: log.clone(), fail }
    }

    #[tokio::test]
    async fn test_reactions_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = EventRegistry::builder()
            .subscribe::<Pinged, _>(recorder("first", &log, false))
            .subscribe::<Pinged, _>(recorder("second", &log, false))
            .build();

        registry.publish(&Pinged(7)).await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["first:7", "second:7"]);
        assert_eq!(registry.reaction_names("test.pinged"), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_failing_reaction_stops_later_reactions() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = EventRegistry::builder()
            .subscribe::<Pinged, _>(recorder("first", &log, true))
            .subscribe::<Pinged, _>(recorder("second", &log, false))
            .build();

        let result = registry.publish(&Pinged(1)).await;

        assert!(matches!(result, Err(AppError::NotFound { entity: "Product", .. })));
        assert_eq!(*log.lock().unwrap(), vec!["first:1"]);
    }

    #[tokio::test]
    async fn test_publish_without_reactions_is_noop() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = EventRegistry::builder()
            .subscribe::<Pinged, _>(recorder("only", &log, false))
            .build();

        registry.publish(&Ignored).await.unwrap();

        assert!(log.lock().unwrap().is_empty());
        assert!(registry.reaction_names("test.ignored").is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_counted() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = EventRegistry::builder()
            .with_metrics(metrics.clone())
            .subscribe::<Pinged, _>(recorder("broken", &log, true))
            .build();

        let _ = registry.publish(&Pinged(3)).await;

        assert_eq!(
            metrics.events_published.with_label_values(&["test.pinged"]).get(),
            1
        );
        assert_eq!(
            metrics
                .reactions_failed
                .with_label_values(&["test.pinged", "broken"])
                .get(),
            1
        );
    }
}
