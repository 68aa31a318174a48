mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};

#[tokio::test]
async fn public_routes_need_no_token() -> Result<()> {
    let app = common::test_app().await?;

    let root = common::send(&app, Method::GET, "/", None, None).await?;
    root.assert_success();
    assert_eq!(root.data()["name"], "Admin API (Rust)");

    let health = common::send(&app, Method::GET, "/health", None, None).await?;
    health.assert_success();
    assert_eq!(health.data()["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_missing_token() -> Result<()> {
    let app = common::test_app().await?;

    let res = common::send(&app, Method::GET, "/api/route/constant", None, None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], true);
    assert_eq!(res.body["code"], "UNAUTHORIZED");
    assert_eq!(res.body["message"], "Missing Authorization header");
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_bad_tokens() -> Result<()> {
    let app = common::test_app().await?;

    let res = common::send(&app, Method::GET, "/api/manage/pages", Some("not.a.token"), None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(res.body["message"].as_str().unwrap_or_default().starts_with("Invalid JWT token"));
    Ok(())
}

#[tokio::test]
async fn valid_token_reaches_handler() -> Result<()> {
    let app = common::test_app().await?;

    let res = common::get_as(&app, 1, "/api/route/constant").await?;
    res.assert_success();
    Ok(())
}
