//! Stream-pair pipeline tests: pull request in, push sink out.

#[cfg(test)]
mod tests {
    use faasgate_gcloud::{BufferedRequest, BufferedSink, ClosedSink};

    use crate::test_dispatcher;

    async fn run(mut native: BufferedRequest) -> BufferedSink {
        let (dispatcher, _) = test_dispatcher();
        let req = faasgate_gcloud::decode(&mut native).unwrap();
        let resp = dispatcher.dispatch(req).await;
        let mut sink = BufferedSink::new();
        faasgate_gcloud::encode(&resp, &mut sink);
        sink
    }

    #[tokio::test]
    async fn test_should_serve_greeting_through_sink() {
        let sink = run(BufferedRequest::new("GET", "/api/HttpExample?name=stream")).await;

        assert_eq!(sink.status(), 200);
        assert_eq!(sink.header("content-type"), Some("text/plain"));
        assert_eq!(sink.body(), b"Hello, stream!");
        assert!(sink.is_closed(), "encode must finish the sink");
    }

    #[tokio::test]
    async fn test_should_push_head_before_body() {
        // BufferedSink rejects late head writes, so a completed encode is
        // itself proof the head went out before the first body byte.
        let sink = run(
            BufferedRequest::new("POST", "/api/upload").body(&b"chunked payload"[..]),
        )
        .await;

        assert_eq!(sink.status(), 200);
        assert_eq!(sink.header("x-received-bytes"), Some("15"));
        assert_eq!(sink.body(), &[0xde, 0xad, 0xbe, 0xef]);
    }

    #[tokio::test]
    async fn test_should_report_404_through_sink() {
        let sink = run(BufferedRequest::new("GET", "/missing")).await;
        assert_eq!(sink.status(), 404);
    }

    #[tokio::test]
    async fn test_should_mask_handler_failure_through_sink() {
        let sink = run(BufferedRequest::new("GET", "/boom")).await;
        assert_eq!(sink.status(), 500);
        assert_eq!(sink.body(), b"internal error");
    }

    #[tokio::test]
    async fn test_should_swallow_writes_to_torn_down_sink() {
        let (dispatcher, _) = test_dispatcher();
        let mut native = BufferedRequest::new("GET", "/api/HttpExample");
        let req = faasgate_gcloud::decode(&mut native).unwrap();
        let resp = dispatcher.dispatch(req).await;

        // The runtime already dropped the connection; encoding must not panic
        // or surface an error to the dispatch layer.
        let mut sink = ClosedSink;
        faasgate_gcloud::encode(&resp, &mut sink);
    }
}
