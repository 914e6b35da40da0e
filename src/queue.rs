use std::collections::VecDeque;
use std::fmt;

/// Opaque image identifier, usually a URL. Never parsed by the slideshow itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ImageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// FIFO rotation of pending images.
///
/// The slideshow pushes whatever it puts on screen back onto the tail, so once
/// the initial list is exhausted the queue cycles forever in the same order.
#[derive(Debug, Default, Clone)]
pub struct SlideQueue {
    items: VecDeque<ImageId>,
}

impl SlideQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: ImageId) {
        self.items.push_back(id);
    }

    pub fn pop(&mut self) -> Option<ImageId> {
        self.items.pop_front()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageId> {
        self.items.iter()
    }
}
