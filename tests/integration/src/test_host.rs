//! Standalone hyper host tests over a real socket.

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use faasgate_hyper::GateHttpService;
    use faasgate_router::{Dispatcher, RouteTable};
    use hyper_util::rt::{TokioExecutor, TokioIo};
    use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use crate::register_test_routes;

    /// Bind an ephemeral port, serve the test routes on it, and return the
    /// bound address. Connections are served until the test process exits.
    async fn spawn_host() -> SocketAddr {
        let mut builder = RouteTable::builder();
        register_test_routes(&mut builder).unwrap();
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(builder.build())));
        let service = GateHttpService::new(dispatcher);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let mut http = HttpConnBuilder::new(TokioExecutor::new());
            http.http1().half_close(true);
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc).into_owned();
                tokio::spawn(async move {
                    let _ = conn.await;
                });
            }
        });

        addr
    }

    /// Issue one HTTP/1.1 request and return the raw response text.
    async fn raw_request(addr: SocketAddr, target: &str) -> String {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (mut reader, mut writer) = stream.into_split();

        let request =
            format!("GET {target} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
        writer.write_all(request.as_bytes()).await.unwrap();
        writer.shutdown().await.unwrap();

        let mut response = String::new();
        reader.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_should_serve_greeting_over_the_wire() {
        let addr = spawn_host().await;
        let response = raw_request(addr, "/api/HttpExample?name=wire").await;

        assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
        assert!(response.ends_with("Hello, wire!"));
        assert!(response.to_ascii_lowercase().contains("content-type: text/plain"));
    }

    #[tokio::test]
    async fn test_should_stamp_invocation_id_on_every_response() {
        let addr = spawn_host().await;
        let first = raw_request(addr, "/api/HttpExample").await;
        let second = raw_request(addr, "/api/HttpExample").await;

        let id = |resp: &str| -> String {
            resp.lines()
                .find_map(|l| {
                    l.to_ascii_lowercase()
                        .strip_prefix("x-faasgate-invocation-id:")
                        .map(|v| v.trim().to_owned())
                })
                .expect("invocation id header present")
        };
        assert_ne!(id(&first), id(&second), "each invocation gets a fresh id");
    }

    #[tokio::test]
    async fn test_should_serve_404_over_the_wire() {
        let addr = spawn_host().await;
        let response = raw_request(addr, "/definitely/missing").await;
        assert!(response.starts_with("HTTP/1.1 404"), "got: {response}");
    }

    #[tokio::test]
    async fn test_should_serve_405_with_allow_over_the_wire() {
        let addr = spawn_host().await;
        let response = raw_request(addr, "/api/upload").await;

        assert!(response.starts_with("HTTP/1.1 405"), "got: {response}");
        assert!(response.to_ascii_lowercase().contains("allow: post"));
    }
}
