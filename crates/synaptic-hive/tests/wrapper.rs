use std::sync::Arc;

use serde_json::{json, Value};
use synaptic_hive::{
    FakeBackend, GenerationParams, HiveConfig, HiveError, HiveMessage, HiveQuery, HiveResponse,
    HiveSearchApiWrapper,
};

fn fake_wrapper() -> (HiveSearchApiWrapper, FakeBackend) {
    let fake = FakeBackend::new();
    let wrapper = HiveSearchApiWrapper::with_backends(
        HiveConfig::new("test_api_key").with_base_url("https://hive.test/v1/search"),
        Arc::new(fake.clone()),
        Arc::new(fake.clone()),
    )
    .unwrap();
    (wrapper, fake)
}

fn all_params() -> GenerationParams {
    GenerationParams::new()
        .with_temperature(0.5)
        .with_top_k(10)
        .with_top_p(0.9)
        .with_include_data_sources(false)
        .with_wallet("0x123456789")
}

#[test]
fn process_query_formats_request() {
    let (wrapper, fake) = fake_wrapper();
    fake.push_response(HiveResponse::json(200, &json!({"response": "ok"})));

    wrapper
        .process_query(&HiveQuery::prompt("test prompt"), &all_params())
        .unwrap();

    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url, "https://hive.test/v1/search");
    assert_eq!(request.header("api-key"), Some("test_api_key"));
    assert_eq!(request.header("Content-Type"), Some("application/json"));

    let body: Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(
        body,
        json!({
            "prompt": "test prompt",
            "temperature": 0.5,
            "top_p": 0.9,
            "top_k": 10,
            "include_data_sources": false,
            "wallet": "0x123456789"
        })
    );
}

#[tokio::test]
async fn sync_and_async_send_identical_requests() {
    let (wrapper, fake) = fake_wrapper();
    fake.push_response(HiveResponse::json(200, &json!({})));
    fake.push_response(HiveResponse::json(200, &json!({})));

    let query = HiveQuery::messages([
        HiveMessage::system("be brief"),
        HiveMessage::user("What is Aave?"),
    ]);
    let params = all_params();

    wrapper.aprocess_query(&query, &params).await.unwrap();
    wrapper.process_query(&query, &params).unwrap();

    let requests = fake.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);
}

#[test]
fn prompt_only_payload_omits_unset_fields() {
    let (wrapper, _) = fake_wrapper();
    let request = wrapper
        .prepare(&HiveQuery::prompt("hello"), &GenerationParams::new())
        .unwrap();
    assert_eq!(request.body, br#"{"prompt":"hello"}"#.to_vec());
}

#[test]
fn messages_payload_preserves_order_and_content() {
    let (wrapper, _) = fake_wrapper();
    let messages = vec![
        HiveMessage::user("Tell me about Uniswap"),
        HiveMessage::assistant("Uniswap is a decentralized exchange protocol..."),
        HiveMessage::user("What's its trading volume today?"),
    ];
    let request = wrapper
        .prepare(&HiveQuery::messages(messages.clone()), &GenerationParams::new())
        .unwrap();

    let body: Value = serde_json::from_slice(&request.body).unwrap();
    let sent: Vec<HiveMessage> = serde_json::from_value(body["messages"].clone()).unwrap();
    assert_eq!(sent, messages);
    assert_eq!(body.as_object().unwrap().len(), 1);
}

#[test]
fn bitcoin_prompt_exact_body() {
    let (wrapper, fake) = fake_wrapper();
    let reply = json!({
        "response": "Bitcoin is trading at ...",
        "data_sources": [{"name": "CoinGecko"}]
    });
    fake.push_response(HiveResponse::json(200, &reply));

    let params = GenerationParams::new()
        .with_temperature(0.7)
        .with_include_data_sources(true);
    let query = HiveQuery::prompt("What's the current price of Bitcoin?");
    let result = wrapper.process_query(&query, &params).unwrap();

    assert_eq!(result, reply);
    let body = String::from_utf8(fake.requests()[0].body.clone()).unwrap();
    assert_eq!(
        body,
        r#"{"prompt":"What's the current price of Bitcoin?","temperature":0.7,"include_data_sources":true}"#
    );
}

#[tokio::test]
async fn empty_inputs_rejected_before_sending() {
    let (wrapper, fake) = fake_wrapper();
    let params = GenerationParams::new();

    let err = wrapper
        .aprocess_query(&HiveQuery::prompt(""), &params)
        .await
        .unwrap_err();
    assert!(matches!(err, HiveError::InvalidInput(_)));

    let err = wrapper
        .process_query(&HiveQuery::Messages(Vec::new()), &params)
        .unwrap_err();
    assert!(matches!(err, HiveError::InvalidInput(_)));

    assert!(fake.requests().is_empty());
}

#[test]
fn query_from_parts() {
    assert_eq!(
        HiveQuery::from_parts(Some("p".into()), None).unwrap(),
        HiveQuery::prompt("p")
    );
    assert!(matches!(
        HiveQuery::from_parts(None, None),
        Err(HiveError::InvalidInput(_))
    ));
    assert!(matches!(
        HiveQuery::from_parts(Some("p".into()), Some(vec![HiveMessage::user("m")])),
        Err(HiveError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn status_error_is_single_attempt() {
    let (wrapper, fake) = fake_wrapper();
    fake.push_response(HiveResponse::new(401, "Unauthorized"));

    let err = wrapper
        .aprocess_query(&HiveQuery::prompt("p"), &GenerationParams::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(fake.requests().len(), 1);
}

#[test]
fn transport_error_passes_through() {
    let (wrapper, fake) = fake_wrapper();
    fake.push_error(HiveError::Transport("connection refused".into()));

    let err = wrapper
        .process_query(&HiveQuery::prompt("p"), &GenerationParams::new())
        .unwrap_err();
    assert!(matches!(err, HiveError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[test]
fn malformed_body_reported() {
    let (wrapper, fake) = fake_wrapper();
    fake.push_response(HiveResponse::new(200, "not json"));

    let err = wrapper
        .process_query(&HiveQuery::prompt("p"), &GenerationParams::new())
        .unwrap_err();
    assert!(matches!(err, HiveError::MalformedResponse(_)));
}

#[test]
fn non_finite_floats_are_left_out() {
    let (wrapper, _) = fake_wrapper();
    let params = GenerationParams::new()
        .with_temperature(f64::NAN)
        .with_top_p(f64::INFINITY)
        .with_top_k(5);
    let request = wrapper.prepare(&HiveQuery::prompt("p"), &params).unwrap();
    assert_eq!(request.body, br#"{"prompt":"p","top_k":5}"#.to_vec());
}

#[test]
fn top_k_passes_through_unchecked() {
    let (wrapper, _) = fake_wrapper();
    for top_k in [-1_i64, 5_000_000_000] {
        let params = GenerationParams::new().with_top_k(top_k);
        let request = wrapper.prepare(&HiveQuery::prompt("p"), &params).unwrap();
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["top_k"], top_k);
    }
}
