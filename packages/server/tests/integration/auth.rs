use crate::common::{OPERATOR_USERNAME, TestApp, routes};

#[tokio::test]
async fn login_returns_token_for_seeded_operator() {
    let app = TestApp::spawn().await;

    let token = app.login().await;

    assert!(!token.is_empty());
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::LOGIN,
            &serde_json::json!({
                "username": OPERATOR_USERNAME,
                "password": "wrong-password",
            }),
        )
        .await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"].as_str().unwrap(), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn login_rejects_unknown_username() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::LOGIN,
            &serde_json::json!({
                "username": "nobody",
                "password": "irrelevant",
            }),
        )
        .await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"].as_str().unwrap(), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn login_validates_payload() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::LOGIN,
            &serde_json::json!({
                "username": "   ",
                "password": "",
            }),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"].as_str().unwrap(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn me_returns_the_operator() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let res = app.get_with_token(routes::ME, &token).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["username"].as_str().unwrap(), OPERATOR_USERNAME);
    assert!(res.body["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn me_requires_a_token() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::ME).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"].as_str().unwrap(), "TOKEN_MISSING");
}

#[tokio::test]
async fn me_rejects_an_invalid_token() {
    let app = TestApp::spawn().await;

    let res = app.get_with_token(routes::ME, "not-a-real-token").await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"].as_str().unwrap(), "TOKEN_INVALID");
}
