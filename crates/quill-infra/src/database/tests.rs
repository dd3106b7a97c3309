use chrono::Utc;
use quill_core::domain::{Comment, Post};
use quill_core::error::RepoError;
use quill_core::ports::{AboutRepository, BaseRepository, CommentRepository, PostRepository};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use crate::database::entity::{about, comment, post};
use crate::database::postgres_repo::{
    PostgresAboutRepository, PostgresCommentRepository, PostgresPostRepository,
};

fn post_model(id: Uuid, slug: &str) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id: Uuid::new_v4(),
        title: "Test Post".to_owned(),
        slug: slug.to_owned(),
        content: "Test content".to_owned(),
        excerpt: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_slug() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, "test-post")]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post = repo.find_by_slug("test-post").await.unwrap().unwrap();

    assert_eq!(post.id, post_id);
    assert_eq!(post.title, "Test Post");
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, "test-post")]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    assert_eq!(result.map(|p| p.slug), Some("test-post".to_string()));
}

#[tokio::test]
async fn test_save_inserts_when_update_touches_nothing() {
    let post_id = Uuid::new_v4();
    let model = post_model(post_id, "fresh");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new(), vec![model.clone()]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let saved = BaseRepository::<Post, Uuid>::save(&repo, Post::from(model))
        .await
        .unwrap();

    assert_eq!(saved.id, post_id);
    assert_eq!(saved.slug, "fresh");
}

#[tokio::test]
async fn test_delete_missing_comment_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);

    let result = BaseRepository::<Comment, Uuid>::delete(&repo, Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_find_approved_comments() {
    let post_id = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![comment::Model {
            id: Uuid::new_v4(),
            post_id,
            user_id: Uuid::new_v4(),
            content: "An approved comment".to_owned(),
            approved: true,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);

    let comments = repo.find_approved_by_post(post_id).await.unwrap();

    assert_eq!(comments.len(), 1);
    assert!(comments[0].approved);
    assert_eq!(comments[0].post_id, post_id);
}

#[tokio::test]
async fn test_about_current_when_empty() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<about::Model>::new()])
        .into_connection();

    let repo = PostgresAboutRepository::new(db);

    assert!(repo.current().await.unwrap().is_none());
}

#[test]
fn test_repo_error_classification() {
    use super::postgres_base::repo_error;
    use sea_orm::{DbErr, RuntimeErr};

    let err = repo_error(DbErr::Conn(RuntimeErr::Internal("refused".to_owned())));
    assert!(matches!(err, RepoError::Connection(_)));

    let err = repo_error(DbErr::RecordNotFound("posts".to_owned()));
    assert!(matches!(err, RepoError::NotFound));

    let err = repo_error(DbErr::Custom("bad column".to_owned()));
    assert!(matches!(err, RepoError::Query(_)));
}
