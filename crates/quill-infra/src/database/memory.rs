//! In-memory repositories - used when no database is configured and in tests.
//!
//! All repositories handed out by one [`MemoryStore`] share the same tables,
//! so unique constraints and cascades behave like the relational schema:
//! deleting a post removes its comments, deleting a user removes their posts
//! and comments.
//! Note: Data is lost on process restart.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{About, Comment, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    AboutRepository, BaseRepository, CommentRepository, Page, PostQuery, PostRepository,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    abouts: Vec<About>,
}

/// Shared tables behind an async RwLock.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            store: self.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            store: self.clone(),
        }
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository {
            store: self.clone(),
        }
    }

    pub fn abouts(&self) -> InMemoryAboutRepository {
        InMemoryAboutRepository {
            store: self.clone(),
        }
    }
}

/// Replace the row with the same id in place, or append it.
fn upsert<T: Clone>(rows: &mut Vec<T>, entity: T, same_row: impl Fn(&T) -> bool) -> T {
    match rows.iter_mut().find(|row| same_row(row)) {
        Some(row) => *row = entity.clone(),
        None => rows.push(entity.clone()),
    }
    entity
}

/// Remove matching rows, failing when nothing matched.
fn remove<T>(rows: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> Result<(), RepoError> {
    let before = rows.len();
    rows.retain(|row| !matches(row));
    if rows.len() == before {
        return Err(RepoError::NotFound);
    }
    Ok(())
}

fn sorted_by_creation(mut comments: Vec<Comment>) -> Vec<Comment> {
    comments.sort_by_key(|c| c.created_at);
    comments
}

pub struct InMemoryUserRepository {
    store: MemoryStore,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;

        let clash = tables.users.iter().any(|u| {
            u.id != user.id && (u.username == user.username || u.email == user.email)
        });
        if clash {
            return Err(RepoError::Constraint(
                "username or email already taken".to_string(),
            ));
        }

        Ok(upsert(&mut tables.users, user.clone(), |u| u.id == user.id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        remove(&mut tables.users, |u| u.id == id)?;

        let owned: Vec<Uuid> = tables
            .posts
            .iter()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        tables.posts.retain(|p| p.author_id != id);
        tables
            .comments
            .retain(|c| c.user_id != id && !owned.contains(&c.post_id));
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

pub struct InMemoryPostRepository {
    store: MemoryStore,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;

        if tables
            .posts
            .iter()
            .any(|p| p.id != post.id && p.slug == post.slug)
        {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already exists",
                post.slug
            )));
        }
        if !tables.users.iter().any(|u| u.id == post.author_id) {
            return Err(RepoError::Constraint("unknown author".to_string()));
        }

        Ok(upsert(&mut tables.posts, post.clone(), |p| p.id == post.id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        remove(&mut tables.posts, |p| p.id == id)?;
        tables.comments.retain(|c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.iter().any(|p| p.slug == slug))
    }

    async fn search(&self, query: &PostQuery) -> Result<Page<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        let needle = query.search_term().map(str::to_lowercase);

        let mut matches: Vec<&Post> = tables
            .posts
            .iter()
            .filter(|p| match &needle {
                Some(needle) => {
                    p.title.to_lowercase().contains(needle)
                        || p.content.to_lowercase().contains(needle)
                }
                None => true,
            })
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let per_page = query.page_size();
        let total_items = matches.len() as u64;
        let items = match query.offset().and_then(|offset| usize::try_from(offset).ok()) {
            Some(offset) => matches
                .into_iter()
                .skip(offset)
                .take(usize::try_from(per_page).unwrap_or(usize::MAX))
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        Ok(Page {
            items,
            number: query.page_index() + 1,
            per_page,
            total_items,
        })
    }
}

pub struct InMemoryCommentRepository {
    store: MemoryStore,
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.store.tables.write().await;

        if !tables.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(RepoError::Constraint("unknown post".to_string()));
        }
        if !tables.users.iter().any(|u| u.id == comment.user_id) {
            return Err(RepoError::Constraint("unknown user".to_string()));
        }

        Ok(upsert(&mut tables.comments, comment.clone(), |c| {
            c.id == comment.id
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        remove(&mut tables.comments, |c| c.id == id)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(sorted_by_creation(
            tables
                .comments
                .iter()
                .filter(|c| c.post_id == post_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_approved_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(sorted_by_creation(
            tables
                .comments
                .iter()
                .filter(|c| c.post_id == post_id && c.approved)
                .cloned()
                .collect(),
        ))
    }
}

pub struct InMemoryAboutRepository {
    store: MemoryStore,
}

#[async_trait]
impl BaseRepository<About, Uuid> for InMemoryAboutRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<About>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.abouts.iter().find(|a| a.id == id).cloned())
    }

    async fn save(&self, about: About) -> Result<About, RepoError> {
        let mut tables = self.store.tables.write().await;
        Ok(upsert(&mut tables.abouts, about.clone(), |a| a.id == about.id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        remove(&mut tables.abouts, |a| a.id == id)
    }
}

#[async_trait]
impl AboutRepository for InMemoryAboutRepository {
    async fn current(&self) -> Result<Option<About>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.abouts.iter().min_by_key(|a| a.created_at).cloned())
    }
}
