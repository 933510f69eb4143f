//! Content facade.
//!
//! The only consumer of the storage abstraction. Page reads apply
//! background inheritance from the home document; media operations store
//! and remove the underlying objects through whichever backend the factory
//! resolved.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::storage::{StorageFactory, placeholder_url};

use super::error::ContentError;
use super::repository::ContentRepository;
use super::types::{
    AboutContent, ContactContent, ContactSubmission, DEFAULT_BACKGROUND, DEFAULT_PHOTO_URL,
    DEFAULT_VIDEO_URL, GalleryContent, HomeContent, MediaItem, MediaType, NewMedia,
    ServicesContent,
};

/// Gallery category used when the admin picks none.
const DEFAULT_CATEGORY: &str = "performances";

/// Resolves a page background against the home background.
///
/// A page keeps its own background only once an admin set one; the launch
/// default inherits whatever home currently shows.
fn resolve_background(own: &str, home: &str) -> (String, bool) {
    if !own.is_empty() && own != DEFAULT_BACKGROUND {
        (own.to_string(), own == home)
    } else {
        (home.to_string(), true)
    }
}

/// Extracts the storage path referenced by a media URL.
///
/// Local handle URLs drop the file-route prefix and their volatile version
/// query; bucket URLs keep everything after `.com/`; placeholders reference
/// no stored object at all. Anything else is used verbatim.
fn storage_path_from_url(url: &str) -> Option<String> {
    if url.contains("placeholder.svg") {
        return None;
    }
    let base = url.split_once('?').map_or(url, |(base, _)| base);
    if let Some(path) = base.strip_prefix("/api/storage/file/") {
        return Some(path.to_string());
    }
    if base.contains("amazonaws.com") {
        return base.split_once(".com/").map(|(_, path)| path.to_string());
    }
    Some(base.to_string())
}

/// Facade over the content repository and the storage abstraction.
#[derive(Debug)]
pub struct ContentService {
    repo: Arc<ContentRepository>,
    storage: Arc<StorageFactory>,
}

impl ContentService {
    /// Creates the facade over a repository and a storage factory.
    #[must_use]
    pub fn new(repo: Arc<ContentRepository>, storage: Arc<StorageFactory>) -> Self {
        Self { repo, storage }
    }

    /// Home page document.
    pub async fn home(&self) -> HomeContent {
        self.repo.home().await
    }

    /// About page document with background inheritance applied.
    pub async fn about(&self) -> AboutContent {
        let mut about = self.repo.about().await;
        let home = self.repo.home().await;
        (about.background_image, about.use_default_background) =
            resolve_background(&about.background_image, &home.background_image);
        about
    }

    /// Services page document with background inheritance applied.
    pub async fn services(&self) -> ServicesContent {
        let mut services = self.repo.services().await;
        let home = self.repo.home().await;
        (services.background_image, services.use_default_background) =
            resolve_background(&services.background_image, &home.background_image);
        services
    }

    /// Gallery page document with background inheritance applied.
    pub async fn gallery(&self) -> GalleryContent {
        let mut gallery = self.repo.gallery().await;
        let home = self.repo.home().await;
        (gallery.background_image, gallery.use_default_background) =
            resolve_background(&gallery.background_image, &home.background_image);
        gallery
    }

    /// Contact page document with background inheritance applied.
    pub async fn contact(&self) -> ContactContent {
        let mut contact = self.repo.contact().await;
        let home = self.repo.home().await;
        (contact.background_image, contact.use_default_background) =
            resolve_background(&contact.background_image, &home.background_image);
        contact
    }

    /// Replaces the home document.
    pub async fn update_home(&self, home: HomeContent) {
        self.repo.set_home(home).await;
    }

    /// Replaces the about document.
    pub async fn update_about(&self, about: AboutContent) {
        self.repo.set_about(about).await;
    }

    /// Replaces the services document.
    pub async fn update_services(&self, services: ServicesContent) {
        self.repo.set_services(services).await;
    }

    /// Replaces the gallery document.
    pub async fn update_gallery(&self, gallery: GalleryContent) {
        self.repo.set_gallery(gallery).await;
    }

    /// Replaces the contact document.
    pub async fn update_contact(&self, contact: ContactContent) {
        self.repo.set_contact(contact).await;
    }

    /// Stores a new gallery entry and prepends it to the gallery.
    ///
    /// The id is the current millisecond timestamp; photos land under
    /// `images/gallery/{category}/{id}`, videos under
    /// `videos/{category}/{id}`. A storage failure degrades the entry URL
    /// to the placeholder instead of failing the whole operation.
    pub async fn upload_media(&self, media: NewMedia) -> MediaItem {
        let id = Utc::now().timestamp_millis().to_string();
        let category = media
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);
        let path = match media.media_type {
            MediaType::Photo => format!("images/gallery/{category}/{id}"),
            MediaType::Video => format!("videos/{category}/{id}"),
        };

        let url = if let Some(file) = media.file {
            let backend = self.storage.backend().await;
            match backend.upload(file.content, &file.mime_type, &path).await {
                Ok(url) => url,
                Err(e) => {
                    warn!(path = %path, error = %e, "Media upload failed, storing placeholder");
                    placeholder_url(&path)
                }
            }
        } else {
            media.url.unwrap_or_else(|| match media.media_type {
                MediaType::Photo => DEFAULT_PHOTO_URL.to_string(),
                MediaType::Video => DEFAULT_VIDEO_URL.to_string(),
            })
        };

        let item = MediaItem {
            id,
            media_type: media.media_type,
            url,
            thumbnail: match media.media_type {
                MediaType::Video => Some(DEFAULT_PHOTO_URL.to_string()),
                MediaType::Photo => None,
            },
            year: media.year,
            description: media.description,
            location: media.location,
        };

        self.repo.prepend_media(item.clone()).await;
        item
    }

    /// Removes the gallery entry with `id` and best-effort deletes its
    /// stored object. A file-delete failure never aborts the gallery
    /// removal.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::MediaNotFound` when no entry has `id`.
    pub async fn delete_media(&self, id: &str) -> Result<(), ContentError> {
        let item = self
            .repo
            .remove_media(id)
            .await
            .ok_or_else(|| ContentError::MediaNotFound(id.to_string()))?;

        if let Some(path) = storage_path_from_url(&item.url) {
            let backend = self.storage.backend().await;
            if let Err(e) = backend.delete(&path).await {
                warn!(path = %path, error = %e, "Stored object delete failed, entry removed anyway");
            }
        }

        Ok(())
    }

    /// Stores an ad-hoc upload under `uploads/{millis}_{filename}` and
    /// returns its reference URL. Storage failure degrades to the
    /// placeholder.
    pub async fn upload_file(&self, filename: &str, mime_type: &str, content: bytes::Bytes) -> String {
        let path = format!("uploads/{}_{filename}", Utc::now().timestamp_millis());
        let backend = self.storage.backend().await;
        match backend.upload(content, mime_type, &path).await {
            Ok(url) => url,
            Err(e) => {
                warn!(path = %path, error = %e, "File upload failed, returning placeholder");
                placeholder_url(&path)
            }
        }
    }

    /// Acknowledges a contact form submission.
    ///
    /// No mail delivery; the submission is logged for the operator.
    pub fn submit_contact_form(&self, submission: &ContactSubmission) {
        info!(
            name = %submission.name,
            email = %submission.email,
            service = submission.service.as_deref().unwrap_or("-"),
            "Contact form submitted"
        );
    }
}
