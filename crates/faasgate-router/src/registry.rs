//! One-time route table bootstrap.
//!
//! A serverless cold start can see several concurrent first invocations.
//! [`Registry::get_or_init`] guarantees that exactly one of them constructs
//! the table while the rest block and then share the published `Arc`. After
//! publication the read path is lock-free.

use std::sync::{Arc, OnceLock};

use faasgate_model::GateResult;
use parking_lot::Mutex;

use crate::table::{RouteTable, RouteTableBuilder};

/// Process-lifetime owner of the route table.
///
/// The registry is a plain value owned by whoever manages the process
/// lifetime (the hosting binary, a test); it is not ambient global state.
#[derive(Debug, Default)]
pub struct Registry {
    table: OnceLock<Arc<RouteTable>>,
    init: Mutex<()>,
}

impl Registry {
    /// Create an uninitialized registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// The published table, if initialization has completed.
    #[must_use]
    pub fn get(&self) -> Option<Arc<RouteTable>> {
        self.table.get().cloned()
    }

    /// Get the table, initializing it through `loader` on first call.
    ///
    /// Under concurrent first callers, exactly one loader runs; the others
    /// block on the init guard and then observe the published table. A
    /// loader failure publishes nothing: it surfaces as a startup error to
    /// the caller rather than silently serving from an empty table, and a
    /// later caller may attempt initialization again.
    ///
    /// # Errors
    ///
    /// Propagates whatever the loader fails with (`DuplicateRoute`,
    /// `Config`, ...).
    pub fn get_or_init<F>(&self, loader: F) -> GateResult<Arc<RouteTable>>
    where
        F: FnOnce(&mut RouteTableBuilder) -> GateResult<()>,
    {
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }

        let _guard = self.init.lock();
        // A concurrent caller may have won the race while we waited.
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }

        let mut builder = RouteTable::builder();
        loader(&mut builder)?;
        let table = Arc::new(builder.build());
        tracing::info!(routes = table.len(), "route table initialized");

        // The guard is held, so the cell is necessarily empty.
        let _ = self.table.set(Arc::clone(&table));
        Ok(table)
    }
}
