//! Route table: registration, lookup, and the tagged match outcome.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use faasgate_model::{GateError, GateResult};
use http::Method;

use crate::dispatch::Handler;
use crate::pattern::PathPattern;

/// A single (pattern, method) → handler binding.
pub struct Route {
    pattern: PathPattern,
    method: Method,
    handler: Arc<dyn Handler>,
}

impl Route {
    /// The registered path pattern.
    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// The registered HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The bound handler.
    #[must_use]
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// The outcome of resolving a request path and method against the table.
///
/// 404 and 405 are ordinary outcomes here, not errors; only a matched route
/// carries a handler to invoke.
#[derive(Debug)]
pub enum RouteMatch<'a> {
    /// A route matched both path and method.
    Matched(&'a Route),
    /// No registered pattern matches the path at all.
    NotFound,
    /// At least one pattern matches the path, but none for this method.
    /// Carries the union of methods registered for the path, sorted and
    /// deduplicated, for the `Allow` header.
    MethodNotAllowed(Vec<Method>),
}

/// Immutable set of routes, built once and read concurrently thereafter.
///
/// Construction goes through [`RouteTableBuilder`]; after
/// [`build`](RouteTableBuilder::build) the table is never mutated, so the
/// lookup path needs no locks.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Start building a table.
    #[must_use]
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolve a normalized path and method to a [`RouteMatch`].
    ///
    /// Precedence: an exact (non-wildcard) pattern match always beats a
    /// wildcard match; among wildcard candidates the first registered wins.
    /// Method mismatches on a matching path are tracked for 405 generation.
    #[must_use]
    pub fn resolve(&self, path: &str, method: &Method) -> RouteMatch<'_> {
        let mut wildcard_hit: Option<&Route> = None;
        let mut allowed: BTreeSet<&str> = BTreeSet::new();
        let mut path_matched = false;

        for route in &self.routes {
            if !route.pattern.matches(path) {
                continue;
            }
            path_matched = true;
            allowed.insert(route.method.as_str());
            if route.method != *method {
                continue;
            }
            if route.pattern.is_wildcard() {
                // First registered wildcard wins; keep scanning for an exact hit.
                wildcard_hit.get_or_insert(route);
            } else {
                return RouteMatch::Matched(route);
            }
        }

        if let Some(route) = wildcard_hit {
            return RouteMatch::Matched(route);
        }
        if path_matched {
            let methods = allowed
                .into_iter()
                .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
                .collect();
            return RouteMatch::MethodNotAllowed(methods);
        }
        RouteMatch::NotFound
    }
}

/// Builder for [`RouteTable`].
///
/// Not safe to share across threads while routes are still being added;
/// registration must complete entirely before the table is published (the
/// [`Registry`](crate::registry::Registry) enforces this).
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    routes: Vec<Route>,
}

impl RouteTableBuilder {
    /// Register a (pattern, method) → handler binding.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] for an invalid pattern and
    /// [`GateError::DuplicateRoute`] when the exact (pattern, method) pair
    /// is already registered.
    pub fn route(
        &mut self,
        pattern: &str,
        method: Method,
        handler: Arc<dyn Handler>,
    ) -> GateResult<&mut Self> {
        let pattern = PathPattern::parse(pattern)?;
        if self
            .routes
            .iter()
            .any(|r| r.pattern == pattern && r.method == method)
        {
            return Err(GateError::DuplicateRoute {
                pattern: pattern.as_str().to_owned(),
                method,
            });
        }
        self.routes.push(Route {
            pattern,
            method,
            handler,
        });
        Ok(self)
    }

    /// Finish building. Registration order is preserved and determines
    /// precedence among overlapping wildcard patterns.
    #[must_use]
    pub fn build(self) -> RouteTable {
        RouteTable {
            routes: self.routes,
        }
    }
}
