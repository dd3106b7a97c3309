mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test};

use quill_core::ports::{CommentRepository, PostRepository};
use quill_server::configure_app;

use common::{TestContext, body_text, location};

#[actix_rt::test]
async fn test_post_list_and_search() {
    let ctx = TestContext::new();
    let author = ctx.user("testuser").await;
    ctx.post(&author, "Test Post", "test-post").await;

    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::get().uri("/blog/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Test Post"));
    assert!(body.contains("testuser"));

    let req = test::TestRequest::get().uri("/blog/?search=Nonexistent").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!body_text(resp).await.contains("Test Post"));

    let req = test::TestRequest::get().uri("/blog/?search=tEsT").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(body_text(resp).await.contains("Test Post"));
}

#[actix_rt::test]
async fn test_out_of_range_page_is_empty() {
    let ctx = TestContext::new();
    let author = ctx.user("testuser").await;
    ctx.post(&author, "Test Post", "test-post").await;

    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::get().uri("/blog/?page=7").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(!body.contains("Test Post"));
    assert!(body.contains("No posts found."));
}

#[actix_rt::test]
async fn test_largest_page_number_is_empty() {
    let ctx = TestContext::new();
    let author = ctx.user("testuser").await;
    ctx.post(&author, "Test Post", "test-post").await;

    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::get()
        .uri("/blog/?page=18446744073709551615")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(!body.contains("Test Post"));
    assert!(body.contains("No posts found."));
}

#[actix_rt::test]
async fn test_root_redirects_to_blog() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/blog/");
}

#[actix_rt::test]
async fn test_unknown_slug_is_404() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::get().uri("/blog/invalid-slug/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_detail_lists_only_approved_comments() {
    let ctx = TestContext::new();
    let author = ctx.user("testuser").await;
    let reader = ctx.user("reader").await;
    let post = ctx.post(&author, "Test Post", "test-post").await;
    ctx.comment(&post, &reader, "This one was approved", true).await;
    ctx.comment(&post, &reader, "This one is still pending", false).await;

    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::get().uri("/blog/test-post/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_text(resp).await;
    assert!(body.contains("Test content"));
    assert!(body.contains("This one was approved"));
    assert!(!body.contains("This one is still pending"));
}

#[actix_rt::test]
async fn test_authenticated_comment_is_stored_unapproved() {
    let ctx = TestContext::new();
    let user = ctx.user("testuser").await;
    let post = ctx.post(&user, "Test Post", "test-post").await;

    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/blog/test-post/")
        .cookie(ctx.session(&user))
        .set_form([("content", "This is a test comment that is long enough.")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/blog/test-post/");

    let comments = ctx.store.comments().find_by_post(post.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].user_id, user.id);
    assert_eq!(comments[0].content, "This is a test comment that is long enough.");
    assert!(!comments[0].approved);
}

#[actix_rt::test]
async fn test_short_comment_redisplays_form() {
    let ctx = TestContext::new();
    let user = ctx.user("testuser").await;
    let post = ctx.post(&user, "Test Post", "test-post").await;

    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/blog/test-post/")
        .cookie(ctx.session(&user))
        .set_form([("content", "   short   ")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("at least 10 characters"));
    assert!(ctx.store.comments().find_by_post(post.id).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_anonymous_comment_redirects_to_login() {
    let ctx = TestContext::new();
    let user = ctx.user("testuser").await;
    let post = ctx.post(&user, "Test Post", "test-post").await;

    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/blog/test-post/")
        .set_form([("content", "This is a test comment that is long enough.")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/accounts/login/?next=/blog/test-post/");
    assert!(ctx.store.comments().find_by_post(post.id).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_create_post_with_unique_slug() {
    let ctx = TestContext::new();
    let user = ctx.user("testuser").await;
    ctx.post(&user, "Hello World", "hello-world").await;

    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/blog/new/")
        .cookie(ctx.session(&user))
        .set_form([
            ("title", "Hello World"),
            ("content", "Second post with the same title"),
            ("excerpt", ""),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/blog/hello-world-2/");

    let post = ctx
        .store
        .posts()
        .find_by_slug("hello-world-2")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(post.author_id, user.id);
    assert!(post.excerpt.is_none());
}

#[actix_rt::test]
async fn test_new_post_requires_login() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::get().uri("/blog/new/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/accounts/login/?next=/blog/new/");
}

#[actix_rt::test]
async fn test_missing_title_redisplays_post_form() {
    let ctx = TestContext::new();
    let user = ctx.user("testuser").await;
    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/blog/new/")
        .cookie(ctx.session(&user))
        .set_form([("title", "   "), ("content", "Some content")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Some content"));
}

#[actix_rt::test]
async fn test_about_page() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::get().uri("/about/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("<h1>About</h1>"));

    ctx.about("About Us", "We write things").await;

    let req = test::TestRequest::get().uri("/about/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("About Us"));
    assert!(body.contains("We write things"));
}

#[actix_rt::test]
async fn test_health() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(configure_app(ctx.state.clone()))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}
