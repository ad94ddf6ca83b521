//! The currently selected body, independent of tour mode.

use crate::catalog::BodyId;

/// At most one selected body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection(Option<BodyId>);

impl Selection {
    pub fn current(&self) -> Option<BodyId> {
        self.0
    }

    pub fn is_selected(&self, id: BodyId) -> bool {
        self.0 == Some(id)
    }

    /// Replace the selection unconditionally. Returns the new value.
    pub fn select(&mut self, body: Option<BodyId>) -> Option<BodyId> {
        self.0 = body;
        self.0
    }

    /// Same as `select(None)`.
    pub fn clear(&mut self) {
        self.select(None);
    }
}
