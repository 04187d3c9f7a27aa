//! The development proxy switch lives in the process environment next to
//! reqwest's own proxy variables; flipping it must not reroute traffic.
//!
//! Kept in its own test binary because it mutates the process environment.

use axum::routing::get;
use axum::{Json, Router};
use request_kit::config::SERVICE_HTTP_PROXY;
use request_kit::prelude::*;
use serde_json::{json, Value};

#[tokio::test]
async fn proxy_switch_does_not_change_transport_routing() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = Router::new().route(
        "/ok",
        get(|| async { Json(json!({"code": "0000", "msg": "ok", "data": 1})) }),
    );
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    for value in ["N", "Y"] {
        // SAFETY: the only test in this binary, set before any client is built
        unsafe { std::env::set_var(SERVICE_HTTP_PROXY, value) };

        let env = ServiceEnv::from_env()
            .with_base_url(format!("http://{addr}"))
            .with_proxy(Environment::Production, value == "Y");
        assert!(!env.is_http_proxy());

        let request = create_service_request(&env).unwrap();
        let result = request.request::<Value>(RequestConfig::get("/ok")).await;

        assert!(result.error.is_none(), "{value}: {:?}", result.error.map(|e| e.to_string()));
        assert_eq!(result.data, Some(json!(1)));
    }
}
