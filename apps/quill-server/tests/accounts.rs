mod common;

use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test};

use quill_core::ports::UserRepository;
use quill_server::configure_app;
use quill_server::middleware::auth::SESSION_COOKIE;

use common::{TestContext, body_text, location};

fn session_set<B>(resp: &ServiceResponse<B>) -> Option<String> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
}

#[actix_rt::test]
async fn test_login_sets_session_and_follows_next() {
    let ctx = TestContext::new();
    ctx.user_with_password("testuser", "testpass123").await;

    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/accounts/login/")
        .set_form([
            ("username", "testuser"),
            ("password", "testpass123"),
            ("next", "/blog/test-post/"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/blog/test-post/");
    let token = session_set(&resp).unwrap();
    assert_eq!(
        ctx.state.tokens.validate_token(&token).unwrap().username,
        "testuser"
    );
}

#[actix_rt::test]
async fn test_login_ignores_foreign_next() {
    let ctx = TestContext::new();
    ctx.user_with_password("testuser", "testpass123").await;

    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/accounts/login/")
        .set_form([
            ("username", "testuser"),
            ("password", "testpass123"),
            ("next", "https://elsewhere.example/"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/blog/");
}

#[actix_rt::test]
async fn test_wrong_password_redisplays_login() {
    let ctx = TestContext::new();
    ctx.user_with_password("testuser", "testpass123").await;

    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/accounts/login/")
        .set_form([("username", "testuser"), ("password", "wrong-password")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_set(&resp).is_none());
    assert!(body_text(resp).await.contains("Please enter a correct username and password."));
}

#[actix_rt::test]
async fn test_register_creates_user_and_logs_in() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/accounts/register/")
        .set_form([
            ("username", "newuser"),
            ("email", "New@Example.com"),
            ("password", "longenough"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/blog/");
    assert!(session_set(&resp).is_some());

    let user = ctx
        .store
        .users()
        .find_by_username("newuser")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.email, "new@example.com");
    assert_ne!(user.password_hash, "longenough");
}

#[actix_rt::test]
async fn test_register_rejects_taken_username() {
    let ctx = TestContext::new();
    ctx.user("testuser").await;

    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/accounts/register/")
        .set_form([
            ("username", "testuser"),
            ("email", "fresh@example.com"),
            ("password", "longenough"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("A user with that username already exists."));
}

#[actix_rt::test]
async fn test_logout_clears_session() {
    let ctx = TestContext::new();
    let user = ctx.user("testuser").await;

    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/accounts/logout/")
        .cookie(ctx.session(&user))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/blog/");
    assert_eq!(session_set(&resp).as_deref(), Some(""));
    assert!(resp.headers().contains_key(header::SET_COOKIE));
}

#[actix_rt::test]
async fn test_invalid_session_is_anonymous() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::get()
        .uri("/blog/new/")
        .cookie(actix_web::cookie::Cookie::new(SESSION_COOKIE, "garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(location(&resp).starts_with("/accounts/login/"));
}

#[actix_rt::test]
async fn test_account_without_password_cannot_log_in() {
    let ctx = TestContext::new();
    ctx.user("testuser").await;

    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/accounts/login/")
        .set_form([("username", "testuser"), ("password", "!")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_set(&resp).is_none());
}
