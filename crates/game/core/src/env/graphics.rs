//! Graphics collaborator: sprite classes and mirroring.
//!
//! Walking animation is expressed as class changes on the thing's sprite,
//! never as state the core depends on. All calls are presentation-soft.

use crate::state::ThingId;

/// Sprite-facing surface supplied by the runtime.
pub trait Graphics {
    /// Adds a display class to a thing's sprite.
    fn add_class(&self, thing: &ThingId, class: &str);

    /// Removes a display class from a thing's sprite.
    fn remove_class(&self, thing: &ThingId, class: &str);

    /// Mirrors the sprite horizontally.
    fn flip_horiz(&self, thing: &ThingId);

    /// Restores normal orientation.
    fn unflip_horiz(&self, thing: &ThingId);
}
