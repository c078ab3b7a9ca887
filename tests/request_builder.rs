//
//  moysklad-cli
//  tests/request_builder.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Request builder behaviour observed through a recording transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use moysklad::api::model::{Currency, Entity, Product};
use moysklad::api::{
    ApiError, FilterOp, HttpRequest, MoySkladClient, Params, RawResponse, SortDir, Transport,
    TransportError,
};
use moysklad::auth::AuthCredential;

const BASE: &str = "https://api.moysklad.ru/api/remap/1.2";

/// Records every request and answers from a queue (200 `{}` when empty).
#[derive(Default)]
struct Recorder {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<RawResponse>>,
}

impl Recorder {
    fn reply(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(RawResponse::new(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            body,
        ));
    }

    fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.to_string())
            .collect()
    }

    fn last<R>(&self, f: impl FnOnce(&HttpRequest) -> R) -> R {
        f(self.requests.lock().unwrap().last().unwrap())
    }
}

#[async_trait]
impl Transport for Recorder {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| RawResponse::new(StatusCode::OK, HeaderMap::new(), "{}")))
    }
}

fn client(recorder: &Arc<Recorder>) -> MoySkladClient {
    MoySkladClient::with_base_url(BASE)
        .unwrap()
        .with_transport(recorder.clone())
        .with_auth(AuthCredential::bearer("secret-token"))
}

#[tokio::test]
async fn test_get_encodes_params_in_insertion_order() {
    let recorder = Arc::new(Recorder::default());
    let client = client(&recorder);

    client
        .request::<Value>("entity/product")
        .with_params(
            Params::new()
                .limit(10)
                .filter("archived", FilterOp::Eq, "false")
                .filter("name", FilterOp::Like, "pen")
                .order("name", SortDir::Desc)
                .expand("supplier"),
        )
        .get()
        .await
        .unwrap();

    assert_eq!(
        recorder.urls(),
        vec![format!(
            "{BASE}/entity/product?limit=10&filter=archived%3Dfalse%3Bname%7Epen&order=name%2Cdesc&expand=supplier"
        )]
    );
}

#[tokio::test]
async fn test_headers_and_body_handling() {
    let recorder = Arc::new(Recorder::default());
    let client = client(&recorder);

    client
        .request::<Value>("entity/product")
        .with_body(&json!({"name": "ignored on GET"}))
        .get()
        .await
        .unwrap();
    recorder.last(|request| {
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.headers[ACCEPT], "application/json;charset=utf-8");
        assert_eq!(request.headers[AUTHORIZATION], "Bearer secret-token");
        assert!(request.body.is_none());
        assert!(request.headers.get(CONTENT_TYPE).is_none());
    });

    let body = json!({"name": "Pencil", "vat": 20});
    client
        .request::<Value>("entity/product")
        .with_body(&body)
        .post()
        .await
        .unwrap();
    recorder.last(|request| {
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        let sent: Value = serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, body);
    });
}

#[tokio::test]
async fn test_service_paths() {
    let recorder = Arc::new(Recorder::default());
    let client = client(&recorder);
    recorder.reply(200, r#"{"name": "руб"}"#);

    let currency = client
        .entity::<Currency>()
        .get("c1", Params::new())
        .await
        .unwrap();
    assert_eq!(currency.data.name.value().map(String::as_str), Some("руб"));

    let deleted = client.entity::<Product>().delete("p1").await.unwrap();
    assert!(deleted.data);

    let mut patch = Product::default();
    patch.clear_article();
    client.entity::<Product>().update("p2", &patch).await.unwrap();
    recorder.last(|request| {
        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.body.as_deref(), Some(&br#"{"article":null}"#[..]));
    });

    client.store_zones("s1").list(Params::new().limit(1)).await.ok();

    assert_eq!(
        recorder.urls(),
        vec![
            format!("{BASE}/entity/currency/c1"),
            format!("{BASE}/entity/product/p1"),
            format!("{BASE}/entity/product/p2"),
            format!("{BASE}/entity/store/s1/zones?limit=1"),
        ]
    );
    assert_eq!(Product::path(), "entity/product");
}

#[tokio::test]
async fn test_error_status_carries_server_diagnostics() {
    let recorder = Arc::new(Recorder::default());
    let client = client(&recorder);
    recorder.reply(
        412,
        r#"{"errors":[{"error":"Ошибка сохранения объекта","code":3004}]}"#,
    );

    let error = client
        .request::<Value>("entity/product")
        .with_body(&json!({}))
        .post()
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(StatusCode::PRECONDITION_FAILED));
    assert_eq!(error.details()[0].code, Some(3004));
    assert!(matches!(error, ApiError::Status { .. }));
}

#[tokio::test]
async fn test_decode_failure_keeps_response() {
    let recorder = Arc::new(Recorder::default());
    let client = client(&recorder);
    recorder.reply(200, "not json");

    let error = client
        .request::<Value>("entity/product")
        .get()
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::Decode { .. }));
    assert_eq!(error.response().map(|r| r.text()).as_deref(), Some("not json"));
}

#[tokio::test]
async fn test_delete_error_is_not_success() {
    let recorder = Arc::new(Recorder::default());
    let client = client(&recorder);
    recorder.reply(404, r#"{"errors":[{"error":"not found"}]}"#);

    let error = client.entity::<Product>().delete("gone").await.unwrap_err();
    assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
}
