//! Site content: page documents, gallery media, and the facade that wires
//! them to file storage.

mod error;
mod repository;
mod service;
mod types;

pub use error::ContentError;
pub use repository::{ContentRepository, ContentStore};
pub use service::ContentService;
pub use types::{
    AboutContent, ContactContent, ContactSubmission, DEFAULT_BACKGROUND, GalleryContent,
    HomeContent, MediaFile, MediaItem, MediaType, NewMedia, ServiceItem, ServicesContent,
};
