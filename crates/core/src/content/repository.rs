//! Process-lifetime content store.
//!
//! Content documents live in memory for the life of the process, seeded
//! with the launch copy. The store is explicit and injected; handlers get
//! it through shared state, never through ambient globals. Durable content
//! storage is out of scope.

use tokio::sync::RwLock;

use encore_shared::Localized;

use super::types::{
    AboutContent, ContactContent, DEFAULT_BACKGROUND, DEFAULT_PHOTO_URL, DEFAULT_VIDEO_URL,
    GalleryContent, HomeContent, MediaItem, MediaType, ServiceItem, ServicesContent,
};

/// All five page documents.
#[derive(Debug, Clone)]
pub struct ContentStore {
    /// Home page document.
    pub home: HomeContent,
    /// About page document.
    pub about: AboutContent,
    /// Services page document.
    pub services: ServicesContent,
    /// Gallery page document.
    pub gallery: GalleryContent,
    /// Contact page document.
    pub contact: ContactContent,
}

impl Default for ContentStore {
    fn default() -> Self {
        Self {
            home: HomeContent {
                background_image: DEFAULT_BACKGROUND.to_string(),
                profile_image: "/placeholder.svg?height=400&width=400".to_string(),
                artist_name: "Musician Portfolio".to_string(),
                navbar_title: Localized::new("Musician", "Músico"),
                intro_text: Localized::new(
                    "Welcome to my musical world",
                    "Bienvenido a mi mundo musical",
                ),
            },
            about: AboutContent {
                background_image: DEFAULT_BACKGROUND.to_string(),
                content: Localized::new(
                    "# About Me\n\nI am a passionate musician with years of experience in the industry. My journey began when I was just a child, and music has been my constant companion ever since.\n\n## My Journey\n\nI've performed at numerous venues across the country, bringing joy and entertainment to thousands of people. My versatile style allows me to adapt to different genres and settings.\n\n## Philosophy\n\nI believe music is a universal language that connects people across cultures and backgrounds. Through my performances, I aim to create memorable experiences that resonate with audiences long after the event is over.",
                    "# Bio\n\nSoy un músico apasionado con años de experiencia en la industria. Mi viaje comenzó cuando era solo un niño, y la música ha sido mi compañera constante desde entonces.\n\n## Mi Trayectoria\n\nHe actuado en numerosos lugares en todo el país, llevando alegría y entretenimiento a miles de personas. Mi estilo versátil me permite adaptarme a diferentes géneros y entornos.\n\n## Filosofía\n\nCreo que la música es un lenguaje universal que conecta a las personas a través de culturas y orígenes. A través de mis actuaciones, pretendo crear experiencias memorables que resuenen con el público mucho después de que el evento haya terminado.",
                ),
                use_default_background: false,
            },
            services: ServicesContent {
                background_image: DEFAULT_BACKGROUND.to_string(),
                services: vec![
                    ServiceItem {
                        id: "singing".to_string(),
                        icon: "music".to_string(),
                        description: Localized::new(
                            "Professional singing performances for any occasion. From intimate serenades to large events.",
                            "Actuaciones de canto profesionales para cualquier ocasión. Desde serenatas íntimas hasta grandes eventos.",
                        ),
                    },
                    ServiceItem {
                        id: "dj".to_string(),
                        icon: "disc".to_string(),
                        description: Localized::new(
                            "DJ services with the latest equipment and extensive music library for all types of events.",
                            "Servicios de DJ con el último equipo y una extensa biblioteca musical para todo tipo de eventos.",
                        ),
                    },
                    ServiceItem {
                        id: "sound".to_string(),
                        icon: "speaker".to_string(),
                        description: Localized::new(
                            "High-quality sound system rental for events of all sizes. Professional setup included.",
                            "Alquiler de equipos de sonido de alta calidad para eventos de todos los tamaños. Incluye configuración profesional.",
                        ),
                    },
                    ServiceItem {
                        id: "animation".to_string(),
                        icon: "party-popper".to_string(),
                        description: Localized::new(
                            "Professional event animation services to keep your guests entertained and engaged.",
                            "Servicios profesionales de animación de eventos para mantener a sus invitados entretenidos y comprometidos.",
                        ),
                    },
                    ServiceItem {
                        id: "karaoke".to_string(),
                        icon: "mic".to_string(),
                        description: Localized::new(
                            "Karaoke services with professional equipment and an extensive song library in multiple languages.",
                            "Servicios de karaoke con equipo profesional y una extensa biblioteca de canciones en varios idiomas.",
                        ),
                    },
                ],
                use_default_background: false,
            },
            gallery: GalleryContent {
                background_image: DEFAULT_BACKGROUND.to_string(),
                media: vec![
                    MediaItem {
                        id: "1".to_string(),
                        media_type: MediaType::Photo,
                        url: DEFAULT_PHOTO_URL.to_string(),
                        thumbnail: None,
                        year: "2023".to_string(),
                        description: Localized::new(
                            "Live performance at Summer Festival",
                            "Actuación en vivo en el Festival de Verano",
                        ),
                        location: "Miami, FL".to_string(),
                    },
                    MediaItem {
                        id: "2".to_string(),
                        media_type: MediaType::Video,
                        url: DEFAULT_VIDEO_URL.to_string(),
                        thumbnail: Some(DEFAULT_PHOTO_URL.to_string()),
                        year: "2022".to_string(),
                        description: Localized::new(
                            "DJ set at Club Atmosphere",
                            "Set de DJ en Club Atmosphere",
                        ),
                        location: "New York, NY".to_string(),
                    },
                ],
                use_default_background: false,
            },
            contact: ContactContent {
                background_image: DEFAULT_BACKGROUND.to_string(),
                contact_info: Localized::new(
                    "# Get in Touch\n\nFeel free to reach out for bookings, questions, or collaborations. I'm always open to new opportunities and would love to be a part of your next event.\n\n## Availability\n\nI'm currently available for bookings throughout the year. Early reservation is recommended for weekend events and holiday seasons.",
                    "# Contáctame\n\nNo dudes en contactarme para reservas, preguntas o colaboraciones. Siempre estoy abierto a nuevas oportunidades y me encantaría ser parte de tu próximo evento.\n\n## Disponibilidad\n\nActualmente estoy disponible para reservas durante todo el año. Se recomienda reservar con anticipación para eventos de fin de semana y temporadas festivas.",
                ),
                use_default_background: false,
            },
        }
    }
}

/// Shared, lock-guarded content store.
#[derive(Debug, Default)]
pub struct ContentRepository {
    store: RwLock<ContentStore>,
}

impl ContentRepository {
    /// Creates a repository seeded with the launch copy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every document.
    pub async fn snapshot(&self) -> ContentStore {
        self.store.read().await.clone()
    }

    /// Current home document.
    pub async fn home(&self) -> HomeContent {
        self.store.read().await.home.clone()
    }

    /// Current about document.
    pub async fn about(&self) -> AboutContent {
        self.store.read().await.about.clone()
    }

    /// Current services document.
    pub async fn services(&self) -> ServicesContent {
        self.store.read().await.services.clone()
    }

    /// Current gallery document.
    pub async fn gallery(&self) -> GalleryContent {
        self.store.read().await.gallery.clone()
    }

    /// Current contact document.
    pub async fn contact(&self) -> ContactContent {
        self.store.read().await.contact.clone()
    }

    /// Replaces the home document wholesale.
    pub async fn set_home(&self, home: HomeContent) {
        self.store.write().await.home = home;
    }

    /// Replaces the about document wholesale.
    pub async fn set_about(&self, about: AboutContent) {
        self.store.write().await.about = about;
    }

    /// Replaces the services document wholesale.
    pub async fn set_services(&self, services: ServicesContent) {
        self.store.write().await.services = services;
    }

    /// Replaces the gallery document wholesale.
    pub async fn set_gallery(&self, gallery: GalleryContent) {
        self.store.write().await.gallery = gallery;
    }

    /// Replaces the contact document wholesale.
    pub async fn set_contact(&self, contact: ContactContent) {
        self.store.write().await.contact = contact;
    }

    /// Prepends `item` to the gallery.
    pub async fn prepend_media(&self, item: MediaItem) {
        self.store.write().await.gallery.media.insert(0, item);
    }

    /// Removes the gallery entry with `id`, returning it if present.
    pub async fn remove_media(&self, id: &str) -> Option<MediaItem> {
        let mut store = self.store.write().await;
        let index = store.gallery.media.iter().position(|m| m.id == id)?;
        Some(store.gallery.media.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_defaults() {
        let repo = ContentRepository::new();

        let home = repo.home().await;
        assert_eq!(home.artist_name, "Musician Portfolio");
        assert_eq!(home.navbar_title.es, "Músico");

        let services = repo.services().await;
        let ids: Vec<&str> = services.services.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["singing", "dj", "sound", "animation", "karaoke"]);

        let gallery = repo.gallery().await;
        assert_eq!(gallery.media.len(), 2);
        assert_eq!(gallery.media[0].media_type, MediaType::Photo);
    }

    #[tokio::test]
    async fn test_update_replaces_wholesale() {
        let repo = ContentRepository::new();
        let mut home = repo.home().await;
        home.artist_name = "New Name".to_string();
        home.background_image = "/api/storage/file/images/bg?v=1".to_string();
        repo.set_home(home).await;

        let reread = repo.home().await;
        assert_eq!(reread.artist_name, "New Name");
        assert_eq!(reread.background_image, "/api/storage/file/images/bg?v=1");
    }

    #[tokio::test]
    async fn test_prepend_and_remove_media() {
        let repo = ContentRepository::new();
        let item = MediaItem {
            id: "1700000000000".to_string(),
            media_type: MediaType::Photo,
            url: "/api/storage/file/images/gallery/performances/1700000000000?v=1".to_string(),
            thumbnail: None,
            year: "2024".to_string(),
            description: Localized::new("New", "Nuevo"),
            location: "Austin, TX".to_string(),
        };

        repo.prepend_media(item.clone()).await;
        assert_eq!(repo.gallery().await.media[0].id, item.id);

        let removed = repo.remove_media(&item.id).await;
        assert_eq!(removed.map(|m| m.id), Some(item.id));
        assert!(repo.remove_media("missing").await.is_none());
    }
}
