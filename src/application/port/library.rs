// SPDX-License-Identifier: MPL-2.0
//! Image library port: the database collaborator.
//!
//! The methods here correspond one-to-one with the prepared statements
//! the core reuses across calls (clear-bindings/reset rather than
//! re-preparation): selection membership, selection insert/delete,
//! group-sibling lookup, color labels and history presence. Adapters are
//! expected to keep those statements prepared for the process lifetime.

use crate::domain::ImageId;

/// Port for the image/collection database.
///
/// Reads happen on every thumbnail render with no caching at this layer,
/// so implementations should keep the underlying queries cheap.
pub trait ImageLibrary {
    /// Whether the image is part of the current selection.
    fn is_selected(&self, id: ImageId) -> bool;

    /// Add the image to the selection (insert-or-ignore semantics).
    fn add_to_selection(&mut self, id: ImageId);

    /// Remove the image from the selection if present.
    fn remove_from_selection(&mut self, id: ImageId);

    /// Empty the selection.
    fn clear_selection(&mut self);

    /// Ids of the other members of the image's group, excluding the
    /// image itself. Empty for ungrouped images.
    fn group_siblings(&self, id: ImageId) -> Vec<ImageId>;

    /// Color labels attached to the image, as label indices 0–5.
    fn color_labels(&self, id: ImageId) -> Vec<u8>;

    /// Whether the image has any edit-history rows.
    fn has_history(&self, id: ImageId) -> bool;

    /// Whether the image differs from its original development. Defaults
    /// to history presence.
    fn is_altered(&self, id: ImageId) -> bool {
        self.has_history(id)
    }
}
