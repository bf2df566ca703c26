//! Canned outputs for offline demo runs.

/// Sample staged images keyed by room-type id.
const DEMO_IMAGES: &[(&str, &str)] = &[
    (
        "living-room",
        "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=1024&q=90",
    ),
    (
        "bedroom",
        "https://images.unsplash.com/photo-1616594039964-ae9021a400a0?w=1024&q=90",
    ),
    (
        "kitchen",
        "https://images.unsplash.com/photo-1556909114-f6e7ad7d3136?w=1024&q=90",
    ),
    (
        "bathroom",
        "https://images.unsplash.com/photo-1552321554-5fefe8c9ef14?w=1024&q=90",
    ),
    (
        "office",
        "https://images.unsplash.com/photo-1524758631624-e2822e304c36?w=1024&q=90",
    ),
    (
        "dining",
        "https://images.unsplash.com/photo-1617806118233-18e1de247200?w=1024&q=90",
    ),
];

const FALLBACK_ROOM: &str = "living-room";

fn lookup(room_type_id: &str) -> Option<&'static str> {
    DEMO_IMAGES
        .iter()
        .find(|(id, _)| *id == room_type_id)
        .map(|(_, url)| *url)
}

/// Returns the canned sample for a room type, falling back to the
/// living-room sample when the room has no dedicated one.
#[must_use]
pub fn sample_image(room_type_id: &str) -> &'static str {
    lookup(room_type_id)
        .or_else(|| lookup(FALLBACK_ROOM))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedicated_samples() {
        assert!(sample_image("bedroom").contains("1616594039964"));
        assert!(sample_image("kitchen").contains("1556909114"));
    }

    #[test]
    fn test_fallback_to_living_room() {
        assert_eq!(sample_image("living-kitchen"), sample_image("living-room"));
        assert_eq!(sample_image("not-a-room"), sample_image("living-room"));
    }

    #[test]
    fn test_samples_are_hosted_urls() {
        for (_, url) in DEMO_IMAGES {
            assert!(url.starts_with("https://"));
        }
    }
}
