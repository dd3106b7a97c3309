use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{About, Comment, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// One page of a listing plus the total number of matches.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total_items.div_ceil(self.per_page)
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages()
    }
}

/// Listing request: optional search text and a 1-based page.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub search: Option<String>,
    pub page: u64,
    pub per_page: u64,
}

impl PostQuery {
    /// Non-blank search text, trimmed.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Zero-based page index.
    pub fn page_index(&self) -> u64 {
        self.page.max(1) - 1
    }

    pub fn page_size(&self) -> u64 {
        self.per_page.max(1)
    }

    /// Rows to skip for the requested page. `None` when the page lies past
    /// anything a store can address (the offset must fit a signed 64-bit
    /// SQL parameter); such a page is simply empty.
    pub fn offset(&self) -> Option<u64> {
        self.page_index()
            .checked_mul(self.page_size())
            .filter(|offset| i64::try_from(*offset).is_ok())
    }
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Load several users at once; unknown ids are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;

    /// Newest first, filtered case-insensitively on title or content.
    async fn search(&self, query: &PostQuery) -> Result<Page<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// All comments of a post, oldest first.
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// Approved comments of a post, oldest first.
    async fn find_approved_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

/// About repository - the page shows a single record.
#[async_trait]
pub trait AboutRepository: BaseRepository<About, Uuid> {
    /// The earliest-created record, if any.
    async fn current(&self) -> Result<Option<About>, RepoError>;
}
