//! Room type catalog.

use serde::Serialize;

/// A selectable room category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomType {
    /// Stable identifier used by callers.
    pub id: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Free-text hint woven into surface-finish prompts.
    pub prompt_hint: &'static str,
    /// Value in the furniture-placement capability's room vocabulary.
    pub staging_room: &'static str,
}

/// Every room category a request may select.
pub const ROOM_TYPES: &[RoomType] = &[
    RoomType {
        id: "living-room",
        label: "Living Room",
        prompt_hint: "living room with sofa, coffee table, TV stand, rug, curtains",
        staging_room: "Living Room",
    },
    RoomType {
        id: "living-kitchen",
        label: "Open-Plan Living Room",
        prompt_hint: "open-plan living room with kitchenette, sofa, coffee table, kitchen island or counter with stools, dining area",
        staging_room: "Living Room",
    },
    RoomType {
        id: "bedroom",
        label: "Bedroom",
        prompt_hint: "bedroom with bed, nightstands, wardrobe, soft lighting, bedding",
        staging_room: "Bedroom",
    },
    RoomType {
        id: "kitchen",
        label: "Kitchen",
        prompt_hint: "kitchen with dining table, chairs, modern appliances, organized countertops",
        staging_room: "Kitchen",
    },
    RoomType {
        id: "bathroom",
        label: "Bathroom",
        prompt_hint: "bathroom with towels, bath mat, accessories, plants, organized vanity",
        staging_room: "Bathroom",
    },
    RoomType {
        id: "office",
        label: "Home Office",
        prompt_hint: "home office with desk, ergonomic chair, bookshelf, desk lamp, organized workspace",
        staging_room: "Office",
    },
    RoomType {
        id: "dining",
        label: "Dining Room",
        prompt_hint: "dining room with dining table, chairs, centerpiece, pendant lighting, sideboard",
        staging_room: "Dining Room",
    },
];

/// Looks up a room category by id.
#[must_use]
pub fn find_room(id: &str) -> Option<&'static RoomType> {
    ROOM_TYPES.iter().find(|room| room.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_room_known_ids() {
        for room in ROOM_TYPES {
            assert_eq!(find_room(room.id), Some(room));
        }
    }

    #[test]
    fn test_find_room_unknown_id() {
        assert_eq!(find_room("attic"), None);
        assert_eq!(find_room(""), None);
    }

    #[test]
    fn test_bedroom_maps_to_staging_vocabulary() {
        let room = find_room("bedroom").expect("bedroom is in the catalog");
        assert_eq!(room.staging_room, "Bedroom");
    }

    #[test]
    fn test_open_plan_shares_living_room_vocabulary() {
        let room = find_room("living-kitchen").expect("living-kitchen is in the catalog");
        assert_eq!(room.staging_room, "Living Room");
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<_> = ROOM_TYPES.iter().map(|room| room.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ROOM_TYPES.len());
    }
}
