//! Typed trigger pipeline tests: trigger object in, built response out.

#[cfg(test)]
mod tests {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use faasgate_azure::{TriggerBody, TriggerRequest, TriggerResponse};

    use crate::test_dispatcher;

    async fn run(trigger: &TriggerRequest) -> TriggerResponse {
        let (dispatcher, _) = test_dispatcher();
        let req = faasgate_azure::decode(trigger).unwrap();
        let resp = dispatcher.dispatch(req).await;
        faasgate_azure::encode(&resp).unwrap()
    }

    #[tokio::test]
    async fn test_should_serve_greeting_from_full_url() {
        let trigger: TriggerRequest = serde_json::from_str(
            r#"{"method": "GET", "url": "https://funcs.example.net/api/HttpExample?name=trigger"}"#,
        )
        .unwrap();

        let out = run(&trigger).await;
        assert_eq!(out.status, 200);
        assert_eq!(out.body, TriggerBody::Text("Hello, trigger!".to_owned()));
        assert_eq!(
            out.headers.get("content-type").unwrap(),
            &vec!["text/plain".to_owned()],
        );
    }

    #[tokio::test]
    async fn test_should_serve_greeting_from_bare_path() {
        let trigger: TriggerRequest =
            serde_json::from_str(r#"{"method": "get", "url": "/api/HttpExample"}"#).unwrap();

        let out = run(&trigger).await;
        assert_eq!(out.status, 200);
        assert_eq!(out.body, TriggerBody::Text("Hello, world!".to_owned()));
    }

    #[tokio::test]
    async fn test_should_carry_base64_trigger_body_into_handler() {
        let trigger = TriggerRequest {
            method: "POST".to_owned(),
            url: "/api/upload".to_owned(),
            headers: std::collections::BTreeMap::new(),
            body: TriggerBody::Base64(BASE64.encode([9u8, 8, 7])),
        };

        let out = run(&trigger).await;
        assert_eq!(
            out.headers.get("x-received-bytes").unwrap(),
            &vec!["3".to_owned()],
        );
    }

    #[tokio::test]
    async fn test_should_encode_binary_response_as_base64_body() {
        let trigger = TriggerRequest {
            method: "POST".to_owned(),
            url: "/api/upload".to_owned(),
            headers: std::collections::BTreeMap::new(),
            body: TriggerBody::Absent,
        };

        let out = run(&trigger).await;
        let TriggerBody::Base64(encoded) = out.body else {
            panic!("binary payload must travel base64");
        };
        assert_eq!(
            BASE64.decode(encoded).unwrap(),
            vec![0xde, 0xad, 0xbe, 0xef],
        );
    }

    #[tokio::test]
    async fn test_should_report_405_through_trigger_response() {
        let trigger: TriggerRequest =
            serde_json::from_str(r#"{"method": "DELETE", "url": "/api/HttpExample"}"#).unwrap();

        let out = run(&trigger).await;
        assert_eq!(out.status, 405);
        assert_eq!(out.headers.get("allow").unwrap(), &vec!["GET".to_owned()]);
    }

    #[tokio::test]
    async fn test_should_mask_handler_failure_in_trigger_shape() {
        let trigger: TriggerRequest =
            serde_json::from_str(r#"{"method": "GET", "url": "/boom"}"#).unwrap();

        let out = run(&trigger).await;
        assert_eq!(out.status, 500);
        let TriggerBody::Text(body) = out.body else {
            panic!("500 carries a text body");
        };
        assert!(!body.contains("backing store"), "detail must stay server-side");
    }
}
