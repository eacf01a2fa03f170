//! Dispatch outcome integration tests.

#[cfg(test)]
mod tests {
    use faasgate_model::QueryMap;
    use http::Method;

    use crate::{canonical_request, test_dispatcher};

    #[tokio::test]
    async fn test_should_serve_greeting_route() {
        let (dispatcher, _) = test_dispatcher();
        let req = faasgate_model::CanonicalRequest::builder()
            .method("GET")
            .path("/api/HttpExample")
            .query(QueryMap::parse("name=rust"))
            .build()
            .unwrap();

        let resp = dispatcher.dispatch(req).await;
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(resp.body().unwrap().as_bytes(), b"Hello, rust!");
    }

    #[tokio::test]
    async fn test_should_return_404_for_unregistered_path() {
        let (dispatcher, observer) = test_dispatcher();
        let resp = dispatcher
            .dispatch(canonical_request(Method::GET, "/api/Unknown"))
            .await;
        assert_eq!(resp.status().as_u16(), 404);
        assert!(observer.records().is_empty(), "a 404 is not a failure");
    }

    #[tokio::test]
    async fn test_should_return_405_with_sorted_allow_header() {
        let (dispatcher, _) = test_dispatcher();
        let resp = dispatcher
            .dispatch(canonical_request(Method::DELETE, "/api/HttpExample"))
            .await;
        assert_eq!(resp.status().as_u16(), 405);
        assert_eq!(
            resp.headers()
                .get(http::header::ALLOW)
                .and_then(|v| v.to_str().ok()),
            Some("GET"),
        );
    }

    #[tokio::test]
    async fn test_should_match_wildcard_with_deep_path() {
        let (dispatcher, _) = test_dispatcher();
        let resp = dispatcher
            .dispatch(canonical_request(Method::GET, "/files/reports/2026/q3.pdf"))
            .await;
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(resp.body().unwrap().as_bytes(), b"/files/reports/2026/q3.pdf");
    }

    #[tokio::test]
    async fn test_should_not_match_wildcard_base_path() {
        let (dispatcher, _) = test_dispatcher();
        let resp = dispatcher
            .dispatch(canonical_request(Method::GET, "/files"))
            .await;
        assert_eq!(resp.status().as_u16(), 404, "wildcard needs at least one extra segment");
    }

    #[tokio::test]
    async fn test_should_mask_handler_failure_as_generic_500() {
        let (dispatcher, observer) = test_dispatcher();
        let resp = dispatcher
            .dispatch(canonical_request(Method::GET, "/boom"))
            .await;

        assert_eq!(resp.status().as_u16(), 500);
        let body = std::str::from_utf8(resp.body().unwrap().as_bytes()).unwrap();
        assert!(
            !body.contains("backing store"),
            "failure detail must not leak to the caller",
        );

        let records = observer.records();
        assert_eq!(records.len(), 1, "one failure, one report");
        assert!(records[0].contains("backing store unavailable"));
    }

    #[tokio::test]
    async fn test_should_keep_serving_after_a_failure() {
        let (dispatcher, _) = test_dispatcher();
        let failed = dispatcher
            .dispatch(canonical_request(Method::GET, "/boom"))
            .await;
        assert_eq!(failed.status().as_u16(), 500);

        let ok = dispatcher
            .dispatch(canonical_request(Method::GET, "/api/HttpExample"))
            .await;
        assert_eq!(ok.status().as_u16(), 200);
    }
}
