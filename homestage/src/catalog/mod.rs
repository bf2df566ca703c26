//! Enumerated room and style catalogs.
//!
//! Every staging request must resolve its selectors against these tables
//! before any external call is made. The `staging_*` fields carry the
//! vocabulary the furniture-placement capability expects.

mod rooms;
mod styles;

pub use rooms::{find_room, RoomType, ROOM_TYPES};
pub use styles::{find_style, InteriorStyle, INTERIOR_STYLES};
