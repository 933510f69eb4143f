//! Page content documents and gallery media types.
//!
//! JSON field names follow the site's existing camelCase payloads so the
//! frontend keeps reading the same shapes.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use encore_shared::Localized;

/// Background value pages carry until an admin sets their own. A page whose
/// background equals this inherits the home background on read.
pub const DEFAULT_BACKGROUND: &str = "/placeholder.svg?height=1080&width=1920";

/// Default reference for a photo saved without a file.
pub const DEFAULT_PHOTO_URL: &str = "/placeholder.svg?height=600&width=600";

/// Default reference for a video saved without a file.
pub const DEFAULT_VIDEO_URL: &str = "https://example.com/sample-video.mp4";

/// Home page document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeContent {
    /// Background image URL. Also the inherited default for other pages.
    pub background_image: String,
    /// Artist profile image URL.
    pub profile_image: String,
    /// Display name of the artist.
    pub artist_name: String,
    /// Bilingual navbar title.
    pub navbar_title: Localized,
    /// Bilingual introduction line.
    pub intro_text: Localized,
}

/// About page document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
    /// Background image URL.
    pub background_image: String,
    /// Bilingual markdown body.
    pub content: Localized,
    /// Whether the background shown is the inherited home background.
    /// Computed on read, ignored on update.
    #[serde(default)]
    pub use_default_background: bool,
}

/// Services page document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesContent {
    /// Background image URL.
    pub background_image: String,
    /// Offered services.
    pub services: Vec<ServiceItem>,
    /// Whether the background shown is the inherited home background.
    #[serde(default)]
    pub use_default_background: bool,
}

/// One offered service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    /// Stable identifier (`singing`, `dj`, ...).
    pub id: String,
    /// Frontend icon name.
    pub icon: String,
    /// Bilingual description.
    pub description: Localized,
}

/// Gallery page document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryContent {
    /// Background image URL.
    pub background_image: String,
    /// Gallery entries, newest first.
    pub media: Vec<MediaItem>,
    /// Whether the background shown is the inherited home background.
    #[serde(default)]
    pub use_default_background: bool,
}

/// Contact page document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactContent {
    /// Background image URL.
    pub background_image: String,
    /// Bilingual markdown body.
    pub contact_info: Localized,
    /// Whether the background shown is the inherited home background.
    #[serde(default)]
    pub use_default_background: bool,
}

/// Kind of gallery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Still image.
    Photo,
    /// Video clip.
    Video,
}

impl MediaType {
    /// Parses the wire tag (`"photo"` / `"video"`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "photo" => Some(Self::Photo),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// Gallery entry referencing a stored object by URL. Never mutated in
/// place: created by admin upload, removed by admin delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// Millisecond-timestamp identifier.
    pub id: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Reference URL of the stored object.
    pub url: String,
    /// Thumbnail URL; videos only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Year label shown in the gallery.
    pub year: String,
    /// Bilingual caption.
    pub description: Localized,
    /// Venue or city label.
    pub location: String,
}

/// Admin input for a new gallery entry.
#[derive(Debug, Clone)]
pub struct NewMedia {
    /// Entry kind.
    pub media_type: MediaType,
    /// Gallery category segment; `performances` when unset.
    pub category: Option<String>,
    /// Year label.
    pub year: String,
    /// Bilingual caption.
    pub description: Localized,
    /// Venue or city label.
    pub location: String,
    /// File to store, if the admin attached one.
    pub file: Option<MediaFile>,
    /// Pre-existing URL used when no file is attached.
    pub url: Option<String>,
}

/// Uploaded file payload.
#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Declared MIME type.
    pub mime_type: String,
    /// File bytes.
    pub content: Bytes,
}

/// Contact form submission.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactSubmission {
    /// Sender name.
    pub name: String,
    /// Reply address.
    pub email: String,
    /// Requested service, if chosen.
    #[serde(default)]
    pub service: Option<String>,
    /// Message body.
    pub message: String,
}
