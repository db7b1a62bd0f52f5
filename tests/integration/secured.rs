//! Mutating calls: token fetch, `qs.key`, relay and short-circuit.

use super::support::{client, mount_token, operation_result, start, wsapi_path};
use rally_wsapi::{Callback, RequestOptions};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_create_fetches_token_then_posts() {
    let server = start().await;
    mount_token(&server, "T").await;

    Mock::given(method("POST"))
        .and(path(wsapi_path("/defect/create")))
        .and(query_param("key", "T"))
        .and(query_param("fetch", "true"))
        .and(body_json(json!({"Defect": {"Name": "Crash on save"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation_result(json!({
            "Object": {"_ref": "/defect/555", "Name": "Crash on save"}
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let payload = client(&server)
        .post(
            RequestOptions::new("/defect/create")
                .query("fetch", "true")
                .json_value(json!({"Defect": {"Name": "Crash on save"}})),
            None,
        )
        .await
        .expect("create should succeed");

    assert_eq!(payload.object().unwrap()["_ref"], "/defect/555");
}

#[tokio::test]
async fn test_update_and_delete_use_put_and_delete() {
    let server = start().await;
    mount_token(&server, "T").await;

    Mock::given(method("PUT"))
        .and(path(wsapi_path("/defect/555")))
        .and(query_param("key", "T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation_result(json!({
            "Object": {"State": "Fixed"}
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(wsapi_path("/defect/555")))
        .and(query_param("key", "T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation_result(json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);

    let updated = client
        .put(
            RequestOptions::new("/defect/555").json_value(json!({"Defect": {"State": "Fixed"}})),
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated.object().unwrap()["State"], "Fixed");

    let deleted = client
        .delete(RequestOptions::new("/defect/555"), None)
        .await
        .unwrap();
    assert!(deleted.errors.is_empty());

    let authorize_calls = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path().ends_with("/security/authorize"))
        .count();
    assert_eq!(authorize_calls, 2, "each secured call fetches its own token");
}

#[tokio::test]
async fn test_token_failure_short_circuits() {
    let server = start().await;

    Mock::given(method("GET"))
        .and(path(wsapi_path("/security/authorize")))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation_result(json!({
            "Errors": ["K"]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(wsapi_path("/defect/create")))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation_result(json!({}))))
        .expect(0)
        .mount(&server)
        .await;

    let (tx, rx) = tokio::sync::oneshot::channel();
    let err = client(&server)
        .post(
            RequestOptions::new("/defect/create").json_value(json!({"Defect": {}})),
            Some(Callback::new(move |outcome| {
                let _ = tx.send(outcome.map(|_| ()).map_err(|e| e.errors()));
            })),
        )
        .await
        .unwrap_err();

    assert_eq!(err.errors(), vec!["K"]);
    assert_eq!(rx.await.unwrap(), Err(vec!["K".to_string()]));
}

#[tokio::test]
async fn test_mutating_call_errors_are_relayed() {
    let server = start().await;
    mount_token(&server, "T").await;

    Mock::given(method("POST"))
        .and(path(wsapi_path("/defect/create")))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation_result(json!({
            "Errors": ["Validation error: Defect.Name should not be null"],
            "Warnings": ["Ignored JSON element defect.Foo during processing of this request."]
        }))))
        .mount(&server)
        .await;

    let err = client(&server)
        .post(RequestOptions::new("/defect/create"), None)
        .await
        .unwrap_err();

    assert_eq!(
        err.errors(),
        vec!["Validation error: Defect.Name should not be null"]
    );
}

#[tokio::test]
async fn test_session_cookie_is_carried_to_mutating_call() {
    let server = start().await;

    Mock::given(method("GET"))
        .and(path(wsapi_path("/security/authorize")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "JSESSIONID=abc123; Path=/")
                .set_body_json(operation_result(json!({"SecurityToken": "T"}))),
        )
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(wsapi_path("/defect/1")))
        .and(header("cookie", "JSESSIONID=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation_result(json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .delete(RequestOptions::new("/defect/1"), None)
        .await
        .expect("delete should carry the session cookie");
}

#[tokio::test]
async fn test_callback_only_caller() {
    let server = start().await;
    mount_token(&server, "T").await;

    Mock::given(method("PUT"))
        .and(path(wsapi_path("/task/3")))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation_result(json!({
            "Object": {"Name": "Write docs"}
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let (tx, rx) = tokio::sync::oneshot::channel();
    drop(client(&server).put(
        RequestOptions::new("/task/3"),
        Some(Callback::new(move |outcome| {
            let name = outcome
                .ok()
                .and_then(|p| p.object())
                .and_then(|o| o["Name"].as_str())
                .map(str::to_string);
            let _ = tx.send(name);
        })),
    ));

    assert_eq!(rx.await.unwrap().as_deref(), Some("Write docs"));
}

#[tokio::test]
async fn test_concurrent_secured_calls() {
    let server = start().await;
    mount_token(&server, "T").await;

    Mock::given(method("DELETE"))
        .and(query_param("key", "T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation_result(json!({}))))
        .expect(3)
        .mount(&server)
        .await;

    let client = client(&server);
    let outcomes = futures::future::join_all(
        ["/defect/1", "/defect/2", "/defect/3"]
            .into_iter()
            .map(|resource| client.delete(RequestOptions::new(resource), None)),
    )
    .await;

    assert!(outcomes.iter().all(|outcome| outcome.is_ok()));
}
