use crate::models::{ImageCandidate, ImageType};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub front: Option<String>,
    pub back: Option<String>,
}

/// Picks the front and best-guess back image.
///
/// Front is the first primary image, else the first image. Back is the first
/// other image whose URL looks like a back cover, else the first other
/// secondary image. The front candidate is never reused as the back.
pub fn select(images: &[ImageCandidate]) -> Selection {
    let Some(front_index) = images
        .iter()
        .position(|image| image.kind == ImageType::Primary)
        .or((!images.is_empty()).then_some(0))
    else {
        return Selection::default();
    };

    let others = || {
        images
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != front_index)
            .map(|(_, image)| image)
    };

    let back = others()
        .find(|image| looks_like_back(&image.url))
        .or_else(|| others().find(|image| image.kind == ImageType::Secondary))
        .map(|image| image.url.clone());

    Selection {
        front: Some(images[front_index].url.clone()),
        back,
    }
}

/// Heuristic: the URL mentions "back" or "rear", case-insensitively. Upstream
/// has no reliable back-cover tag, so a false positive here only means a
/// different secondary image gets shown as the back.
pub fn looks_like_back(url: &str) -> bool {
    let url = url.to_ascii_lowercase();
    url.contains("back") || url.contains("rear")
}
