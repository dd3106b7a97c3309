//! HTML rendering with minijinja.
//!
//! Templates are compiled into the binary and autoescaped (`.html`).
//! Handlers hand the templates small view structs rather than domain types,
//! so derived values (excerpts, URLs, formatted dates) are computed here.

use chrono::{DateTime, Utc};
use minijinja::Environment;
use serde::Serialize;
use uuid::Uuid;

use quill_core::domain::{Comment, Post};
use quill_core::services::{CommentEntry, PostDetail, PostListing};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("post_list.html", include_str!("../templates/post_list.html")),
    ("post_detail.html", include_str!("../templates/post_detail.html")),
    ("post_form.html", include_str!("../templates/post_form.html")),
    ("comment_edit.html", include_str!("../templates/comment_edit.html")),
    ("comment_delete.html", include_str!("../templates/comment_delete.html")),
    ("about.html", include_str!("../templates/about.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("register.html", include_str!("../templates/register.html")),
];

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}

fn display_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

/// A post as shown in the list.
#[derive(Debug, Serialize)]
pub struct PostCard {
    pub title: String,
    pub url: String,
    pub author: String,
    pub published: String,
    pub excerpt: String,
}

impl PostCard {
    pub fn from_listing(listing: &PostListing) -> Vec<Self> {
        listing
            .page
            .items
            .iter()
            .map(|post| Self {
                title: post.title.clone(),
                url: post.absolute_url(),
                author: listing.author_of(post).to_string(),
                published: display_date(post.created_at),
                excerpt: post.get_excerpt(),
            })
            .collect()
    }
}

/// Pagination links for the list page.
#[derive(Debug, Serialize)]
pub struct Pager {
    pub number: u64,
    pub total_pages: u64,
    pub previous: Option<u64>,
    pub next: Option<u64>,
}

impl Pager {
    pub fn from_listing(listing: &PostListing) -> Self {
        let page = &listing.page;
        Self {
            number: page.number,
            total_pages: page.total_pages(),
            previous: page.has_previous().then(|| page.number - 1),
            next: page.has_next().then(|| page.number + 1),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostView {
    pub title: String,
    pub url: String,
    pub author: String,
    pub published: String,
    pub content: String,
}

impl PostView {
    pub fn new(post: &Post, author: &str) -> Self {
        Self {
            title: post.title.clone(),
            url: post.absolute_url(),
            author: author.to_string(),
            published: display_date(post.created_at),
            content: post.content.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub author: String,
    pub content: String,
    pub posted: String,
    /// The viewer wrote this comment and may edit or delete it.
    pub mine: bool,
}

impl CommentView {
    fn new(entry: &CommentEntry, viewer: Option<Uuid>) -> Self {
        Self {
            id: entry.comment.id,
            author: entry.author.clone(),
            content: entry.comment.content.clone(),
            posted: display_date(entry.comment.created_at),
            mine: viewer == Some(entry.comment.user_id),
        }
    }
}

/// Post plus approved comments, as the detail page needs them.
pub fn detail_context(detail: &PostDetail, viewer: Option<Uuid>) -> (PostView, Vec<CommentView>) {
    let comments = detail
        .comments
        .iter()
        .map(|entry| CommentView::new(entry, viewer))
        .collect();
    (PostView::new(&detail.post, &detail.author), comments)
}

/// The comment being edited or deleted, with its post for navigation.
#[derive(Debug, Serialize)]
pub struct CommentTarget {
    pub id: Uuid,
    pub content: String,
    pub post_title: String,
    pub post_url: String,
}

impl CommentTarget {
    pub fn new(comment: &Comment, post: &Post) -> Self {
        Self {
            id: comment.id,
            content: comment.content.clone(),
            post_title: post.title.clone(),
            post_url: comment.absolute_url(post),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_templates_compile_and_escape() {
        let views = Views::new().unwrap();
        let html = views
            .render(
                "about.html",
                context! {
                    title => "About Us",
                    content => "<b>hi",
                    username => None::<String>,
                },
            )
            .unwrap();

        assert!(html.contains("About Us"));
        assert!(html.contains("&lt;b&gt;hi"));
        assert!(!html.contains("<b>hi"));
    }

    #[test]
    fn test_display_date() {
        let at = DateTime::parse_from_rfc3339("2026-03-05T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(display_date(at), "March 5, 2026");
    }
}
