// src/gallery.rs
//! Photo gallery catalogue: bundled album data with Drive-hosted
//! thumbnails. The catalogue itself is immutable; the shuffle endpoint
//! hands out a freshly permuted copy each time.

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct GalleryPhoto {
    pub id: String,
    pub src: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
    pub album_name: String,
    pub album_link: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GalleryAlbum {
    pub name: String,
    pub link: String,
    pub photos: Vec<GalleryPhoto>,
}

/// Lower-resolution thumbnail URL for a Drive-hosted photo.
pub fn drive_thumbnail_url(file_id: &str, width: u32) -> String {
    format!("https://drive.google.com/thumbnail?id={file_id}&sz=w{width}")
}

const THUMB_WIDTH: u32 = 600;

struct PhotoSeed {
    id: &'static str,
    file_id: &'static str,
    alt: &'static str,
    width: u32,
    height: u32,
}

struct AlbumSeed {
    name: &'static str,
    link: &'static str,
    photos: &'static [PhotoSeed],
}

static ALBUM_SEEDS: &[AlbumSeed] = &[
    AlbumSeed {
        name: "D4 Moments",
        link: "https://photos.app.goo.gl/Wib85ubpFdJbZvJj8",
        photos: &[
            PhotoSeed {
                id: "hackathon-1",
                file_id: "1QepStOk3MxZ7iNLQ8VRvwNgAbZKCxFxs",
                alt: "Every frame tells a story of our D4 family",
                width: 600,
                height: 450,
            },
            PhotoSeed {
                id: "hackathon-2",
                file_id: "1vQZdLxUXWXzUwWjn4fWTlRbWGWd4rub5",
                alt: "Small moments that quietly build something bigger",
                width: 600,
                height: 450,
            },
            PhotoSeed {
                id: "hackathon-3",
                file_id: "13-3y_84no-tGxP2XAn3noeLf09bWoA4S",
                alt: "Where Discite leads to Develop, Debug, and Deploy",
                width: 600,
                height: 338,
            },
            PhotoSeed {
                id: "hackathon-4",
                file_id: "1iH5lWFI_u5MaHz0Op2QHtqKwA7UQFskT",
                alt: "Moments that matter",
                width: 600,
                height: 450,
            },
            PhotoSeed {
                id: "hackathon-5",
                file_id: "1Z6JYJx-aD5p1lqSMlzF3fbUcyw3jByD7",
                alt: "A canvas of people and passion",
                width: 600,
                height: 750,
            },
            PhotoSeed {
                id: "hackathon-6",
                file_id: "1plapE6m0LeGFM4i3C2T6T_XVBgrfKP_F",
                alt: "Every frame holds a story",
                width: 600,
                height: 338,
            },
        ],
    },
    AlbumSeed {
        name: "Through the D4 Lens",
        link: "https://photos.app.goo.gl/RrAQXnrZ8FuYsbZZA",
        photos: &[
            PhotoSeed {
                id: "workshop-1",
                file_id: "14tbHWOW6cHWtLqAH3NZB1VPxmmuks8zf",
                alt: "Celebrating the people and passion that make up our D4 community",
                width: 600,
                height: 525,
            },
            PhotoSeed {
                id: "workshop-2",
                file_id: "1hvWSqq9HvorawF_1Ge6R8XiuRg4DzQMH",
                alt: "Every frame tells a story of our D4 family",
                width: 600,
                height: 375,
            },
            PhotoSeed {
                id: "workshop-3",
                file_id: "1m9M0iEyjVjNLW38mfsaPR1oV2jn0zQgl",
                alt: "Where Discite leads to Develop, Debug, and Deploy",
                width: 600,
                height: 675,
            },
            PhotoSeed {
                id: "workshop-4",
                file_id: "1TeG28iv-g0E6no9YhFt5IIQagxf2bW7Z",
                alt: "Moments that matter",
                width: 600,
                height: 375,
            },
        ],
    },
];

static ALBUMS: Lazy<Vec<GalleryAlbum>> = Lazy::new(|| {
    ALBUM_SEEDS
        .iter()
        .map(|album| GalleryAlbum {
            name: album.name.to_string(),
            link: album.link.to_string(),
            photos: album
                .photos
                .iter()
                .map(|p| GalleryPhoto {
                    id: p.id.to_string(),
                    src: drive_thumbnail_url(p.file_id, THUMB_WIDTH),
                    alt: p.alt.to_string(),
                    width: p.width,
                    height: p.height,
                    album_name: album.name.to_string(),
                    album_link: album.link.to_string(),
                })
                .collect(),
        })
        .collect()
});

pub fn albums() -> &'static [GalleryAlbum] {
    &ALBUMS
}

/// Flat photo list across every album, catalogue order.
pub fn all_photos() -> Vec<GalleryPhoto> {
    albums().iter().flat_map(|a| a.photos.clone()).collect()
}

/// A shuffled *derived* list; the catalogue itself is never reordered.
pub fn shuffled_photos<R: Rng + ?Sized>(rng: &mut R) -> Vec<GalleryPhoto> {
    let mut photos = all_photos();
    photos.shuffle(rng);
    photos
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn thumbnail_url_embeds_id_and_width() {
        assert_eq!(
            drive_thumbnail_url("abc123", 600),
            "https://drive.google.com/thumbnail?id=abc123&sz=w600"
        );
    }

    #[test]
    fn catalogue_has_unique_photo_ids() {
        let photos = all_photos();
        let ids: HashSet<&str> = photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), photos.len());
    }

    #[test]
    fn shuffle_is_a_permutation_and_leaves_the_catalogue_alone() {
        let before: Vec<String> = all_photos().iter().map(|p| p.id.clone()).collect();
        let shuffled = shuffled_photos(&mut rand::rng());
        let mut shuffled_ids: Vec<String> = shuffled.iter().map(|p| p.id.clone()).collect();
        let mut sorted_before = before.clone();
        sorted_before.sort();
        shuffled_ids.sort();
        assert_eq!(shuffled_ids, sorted_before);

        // Catalogue order untouched.
        let after: Vec<String> = all_photos().iter().map(|p| p.id.clone()).collect();
        assert_eq!(before, after);
    }
}
