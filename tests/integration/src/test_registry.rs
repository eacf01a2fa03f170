//! Registry cold-start bootstrap tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use faasgate_model::GateError;
    use faasgate_router::{Dispatcher, Registry, RouteTable};
    use http::Method;

    use crate::{canonical_request, register_test_routes};

    #[test]
    fn test_should_build_table_once_under_concurrent_cold_start() {
        let registry = Arc::new(Registry::new());
        let constructions = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let constructions = Arc::clone(&constructions);
                std::thread::spawn(move || {
                    registry
                        .get_or_init(|b| {
                            constructions.fetch_add(1, Ordering::SeqCst);
                            register_test_routes(b)
                        })
                        .unwrap()
                })
            })
            .collect();

        let tables: Vec<Arc<RouteTable>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        for table in &tables[1..] {
            assert!(Arc::ptr_eq(&tables[0], table));
        }
    }

    #[test]
    fn test_should_fail_startup_when_loader_fails() {
        let registry = Registry::new();
        let err = registry
            .get_or_init(|b| {
                register_test_routes(b)?;
                // A second registration of an existing binding.
                register_test_routes(b)
            })
            .unwrap_err();

        assert!(matches!(err, GateError::DuplicateRoute { .. }));
        assert!(
            registry.get().is_none(),
            "a failed load must never publish an empty or partial table",
        );
    }

    #[tokio::test]
    async fn test_should_dispatch_against_registry_published_table() {
        let registry = Registry::new();
        let table = registry.get_or_init(register_test_routes).unwrap();
        let dispatcher = Dispatcher::new(table);

        let resp = dispatcher
            .dispatch(canonical_request(Method::GET, "/api/HttpExample"))
            .await;
        assert_eq!(resp.status().as_u16(), 200);
    }
}
