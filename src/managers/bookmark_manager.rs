//! Bookmark Manager for Prism.
//!
//! Implements `BookmarkManagerTrait` over the `bookmarks` store document.
//! The whole list is rewritten on every change.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::storage::{Storage, StoreKey};
use crate::types::bookmark::{default_bookmarks, Bookmark, DEFAULT_FOLDER};
use crate::types::errors::BookmarkError;

/// Trait defining bookmark management operations.
pub trait BookmarkManagerTrait {
    fn load(&mut self) -> &[Bookmark];
    fn list_bookmarks(&self) -> &[Bookmark];
    fn replace_all(&mut self, bookmarks: Vec<Bookmark>);
    fn add_bookmark(&mut self, bookmark: Bookmark) -> Result<String, BookmarkError>;
    fn remove_bookmark(&mut self, id: &str) -> bool;
    fn find_by_url(&self, url: &str) -> Option<&Bookmark>;
    fn is_bookmarked(&self, url: &str) -> bool;
}

/// Bookmark manager backed by the JSON store.
pub struct BookmarkManager {
    storage: Arc<Storage>,
    bookmarks: Vec<Bookmark>,
}

impl BookmarkManager {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self {
            storage,
            bookmarks: Vec::new(),
        }
    }

    fn persist(&self) {
        self.storage.save(StoreKey::Bookmarks, &self.bookmarks);
    }
}

impl BookmarkManagerTrait for BookmarkManager {
    fn load(&mut self) -> &[Bookmark] {
        self.bookmarks = self.storage.get(StoreKey::Bookmarks, default_bookmarks());
        &self.bookmarks
    }

    fn list_bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Overwrites the whole list, as the `bookmarks.save` bridge call does.
    fn replace_all(&mut self, bookmarks: Vec<Bookmark>) {
        self.bookmarks = bookmarks;
        self.persist();
    }

    /// Appends a bookmark. A missing id is generated and an empty folder
    /// becomes the default folder. Returns the bookmark ID.
    fn add_bookmark(&mut self, mut bookmark: Bookmark) -> Result<String, BookmarkError> {
        let url = bookmark.url.trim();
        if url.is_empty() || !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BookmarkError::InvalidUrl(bookmark.url));
        }
        if self.is_bookmarked(url) {
            return Err(BookmarkError::DuplicateUrl(bookmark.url));
        }

        bookmark.url = url.to_string();
        if bookmark.id.is_empty() {
            bookmark.id = Uuid::new_v4().to_string();
        }
        if bookmark.folder.is_empty() {
            bookmark.folder = DEFAULT_FOLDER.to_string();
        }

        let id = bookmark.id.clone();
        self.bookmarks.push(bookmark);
        debug!(bookmark_id = %id, "bookmark added");
        self.persist();
        Ok(id)
    }

    /// Removes the bookmark with `id`. Unknown ids are a no-op.
    fn remove_bookmark(&mut self, id: &str) -> bool {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| b.id != id);
        if self.bookmarks.len() == before {
            return false;
        }
        self.persist();
        true
    }

    fn find_by_url(&self, url: &str) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.url == url)
    }

    fn is_bookmarked(&self, url: &str) -> bool {
        self.find_by_url(url).is_some()
    }
}
