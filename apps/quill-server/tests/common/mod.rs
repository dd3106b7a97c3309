#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;

use quill_core::domain::{About, Comment, Post, UNUSABLE_PASSWORD, User};
use quill_core::ports::BaseRepository;
use quill_infra::MemoryStore;
use quill_server::config::AppConfig;
use quill_server::middleware::auth::SESSION_COOKIE;
use quill_server::state::AppState;

pub struct TestContext {
    pub store: MemoryStore,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let state = AppState::in_memory(&store, &AppConfig::default()).unwrap();
        Self { store, state }
    }

    /// A user that cannot log in with a password; tests use [`Self::session`].
    pub async fn user(&self, username: &str) -> User {
        self.store
            .users()
            .save(User::new(
                username.to_string(),
                format!("{}@example.com", username),
                UNUSABLE_PASSWORD.to_string(),
            ))
            .await
            .unwrap()
    }

    /// A user whose password actually verifies.
    pub async fn user_with_password(&self, username: &str, password: &str) -> User {
        let hash = self.state.passwords.hash(password).unwrap();
        self.store
            .users()
            .save(User::new(
                username.to_string(),
                format!("{}@example.com", username),
                hash,
            ))
            .await
            .unwrap()
    }

    pub async fn post(&self, author: &User, title: &str, slug: &str) -> Post {
        self.store
            .posts()
            .save(Post::new(
                author.id,
                title.to_string(),
                slug.to_string(),
                "Test content".to_string(),
                None,
            ))
            .await
            .unwrap()
    }

    pub async fn comment(
        &self,
        post: &Post,
        user: &User,
        content: &str,
        approved: bool,
    ) -> Comment {
        let mut comment = Comment::new(post.id, user.id, content.to_string());
        comment.approved = approved;
        self.store.comments().save(comment).await.unwrap()
    }

    pub async fn about(&self, title: &str, content: &str) -> About {
        self.store
            .abouts()
            .save(About::new(title.to_string(), content.to_string()))
            .await
            .unwrap()
    }

    pub async fn find_comment(&self, id: uuid::Uuid) -> Option<Comment> {
        self.store.comments().find_by_id(id).await.unwrap()
    }

    /// Session cookie as the login handler would set it.
    pub fn session(&self, user: &User) -> Cookie<'static> {
        let token = self
            .state
            .tokens
            .generate_token(user.id, &user.username)
            .unwrap();
        Cookie::new(SESSION_COOKIE, token)
    }
}

pub async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = actix_web::test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
