//! The collection extension hook.
//!
//! Third parties widen the attribute set fetched per product (and may add
//! query clauses) without touching the core list pipeline. Listeners form an
//! explicit ordered chain: each takes the in-progress delta by value and
//! returns the next one, so there is no shared mutable state at dispatch
//! time. A failing listener aborts the whole list call.

use std::sync::Arc;

use indexmap::IndexSet;
use storefront_catalog::ProductQuery;
use tracing::debug;

use crate::error::ListenerError;

/// The in-progress state a listener may extend: the attribute request set
/// and the query being assembled.
#[derive(Debug)]
pub struct CollectionDelta {
    /// Attribute codes to additionally fetch and echo per product.
    pub attributes: IndexSet<String>,
    /// The query under assembly. Reserved controls already applied cannot be
    /// removed; the builder exposes no way to unapply them.
    pub query: ProductQuery,
}

impl CollectionDelta {
    pub fn new(query: ProductQuery) -> Self {
        Self {
            attributes: IndexSet::new(),
            query,
        }
    }
}

/// A registered extension listener.
///
/// Listeners run synchronously in registration order; each one completes
/// before the next starts.
pub trait CollectionListener: Send + Sync {
    /// Name used in diagnostics and failure messages.
    fn name(&self) -> &str;

    /// Consumes the current delta and returns the extended one.
    fn apply(&self, delta: CollectionDelta) -> Result<CollectionDelta, ListenerError>;
}

/// Adapter turning a plain function into a [`CollectionListener`].
pub struct FnListener<F> {
    name: String,
    function: F,
}

impl<F> FnListener<F>
where
    F: Fn(CollectionDelta) -> Result<CollectionDelta, ListenerError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, function: F) -> Self {
        Self {
            name: name.into(),
            function,
        }
    }
}

impl<F> CollectionListener for FnListener<F>
where
    F: Fn(CollectionDelta) -> Result<CollectionDelta, ListenerError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, delta: CollectionDelta) -> Result<CollectionDelta, ListenerError> {
        (self.function)(delta)
    }
}

/// Folds the delta through every listener in registration order.
pub(crate) fn run_listeners(
    listeners: &[Arc<dyn CollectionListener>],
    mut delta: CollectionDelta,
) -> Result<CollectionDelta, ListenerError> {
    for listener in listeners {
        delta = listener.apply(delta)?;
        debug!(
            listener = listener.name(),
            attribute_count = delta.attributes.len(),
            "collection listener applied"
        );
    }
    Ok(delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appending_listener(name: &str, code: &'static str) -> Arc<dyn CollectionListener> {
        Arc::new(FnListener::new(name, move |mut delta: CollectionDelta| {
            delta.attributes.insert(code.to_string());
            Ok(delta)
        }))
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let listeners = vec![appending_listener("first", "color"), appending_listener("second", "size")];
        let delta = run_listeners(&listeners, CollectionDelta::new(ProductQuery::new())).expect("run listeners");

        let attributes: Vec<&str> = delta.attributes.iter().map(String::as_str).collect();
        assert_eq!(attributes, vec!["color", "size"]);
    }

    #[test]
    fn failing_listener_aborts_the_chain() {
        let failing: Arc<dyn CollectionListener> = Arc::new(FnListener::new("broken", |_delta| {
            Err(ListenerError::new("broken", "backend unavailable"))
        }));
        let listeners = vec![appending_listener("first", "color"), failing, appending_listener("late", "size")];

        let error = run_listeners(&listeners, CollectionDelta::new(ProductQuery::new())).expect_err("expected abort");
        assert_eq!(error.listener, "broken");
    }

    #[test]
    fn listeners_may_extend_the_query() {
        let listener: Arc<dyn CollectionListener> = Arc::new(FnListener::new("selector", |mut delta: CollectionDelta| {
            delta.query = delta.query.select_attribute("manufacturer");
            Ok(delta)
        }));

        let delta = run_listeners(&[listener], CollectionDelta::new(ProductQuery::new())).expect("run listeners");
        assert!(delta.query.selected_attributes().contains("manufacturer"));
    }
}
