//! Column drag-and-drop state.

/// Payload carried by a drag gesture from source to drop target.
///
/// Mirrors what a pointer toolkit hands to both ends of a drag: the source
/// writes it, the target reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    payload: Option<String>,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transfer already carrying `field`.
    pub fn with_field(field: impl Into<String>) -> Self {
        Self {
            payload: Some(field.into()),
        }
    }

    /// Dragged column field, if any.
    pub fn field(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    pub fn set_field(&mut self, field: impl Into<String>) {
        self.payload = Some(field.into());
    }

    pub fn clear(&mut self) {
        self.payload = None;
    }
}

/// Transient drag state of one header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragState {
    /// Column being dragged.
    pub(crate) dragging: Option<String>,
    /// Column currently highlighted as drop target.
    pub(crate) highlighted: Option<String>,
}

impl DragState {
    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    /// Returns `true` while a drag is in progress.
    pub fn is_active(&self) -> bool {
        self.dragging.is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.dragging = None;
        self.highlighted = None;
    }
}
