//! # Dispatch: Tag-Keyed Handler Table
//!
//! Routes a payload to the handler registered for its discriminant. The
//! fallback is supplied at construction, so a `Dispatcher` can always
//! produce an output: an unrecognised tag is a logged condition, never an
//! error.

use ahash::AHashMap;
use std::sync::Arc;

/// A payload that carries its own routing tag.
pub trait Discriminant {
    fn discriminant(&self) -> &str;
}

impl Discriminant for String {
    fn discriminant(&self) -> &str {
        self
    }
}

type Handler<P, R> = Arc<dyn Fn(&P) -> R + Send + Sync>;
type Fallback<P, R> = Arc<dyn Fn(&str, &P) -> R + Send + Sync>;

pub struct Dispatcher<P, R> {
    handlers: AHashMap<String, Handler<P, R>>,
    fallback: Fallback<P, R>,
}

impl<P, R> Clone for Dispatcher<P, R> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
            fallback: self.fallback.clone(),
        }
    }
}

impl<P, R> Dispatcher<P, R>
where
    P: Discriminant,
{
    /// Create a dispatcher whose unknown-tag arm is `fallback`.
    pub fn new<F>(fallback: F) -> Self
    where
        F: Fn(&str, &P) -> R + Send + Sync + 'static,
    {
        Self {
            handlers: AHashMap::new(),
            fallback: Arc::new(fallback),
        }
    }

    /// Register `handler` for `tag`, replacing any previous handler.
    pub fn on<F>(mut self, tag: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&P) -> R + Send + Sync + 'static,
    {
        self.handlers.insert(tag.into(), Arc::new(handler));
        self
    }

    pub fn handles(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn dispatch(&self, payload: &P) -> R {
        let tag = payload.discriminant();
        match self.handlers.get(tag) {
            Some(handler) => handler(payload),
            None => {
                tracing::warn!(discriminant = %tag, "No handler for discriminant, using fallback");
                (self.fallback)(tag, payload)
            }
        }
    }
}

impl<P, R> std::fmt::Debug for Dispatcher<P, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("tags", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
