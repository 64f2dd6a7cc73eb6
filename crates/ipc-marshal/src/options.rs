//! Walker configuration.

/// What to do with a descriptor whose `representations` list is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyDescriptorPolicy {
    /// Rebuild it as an image with no representations.
    #[default]
    EmptyImage,
    /// Fail with [`crate::DescriptorError::Empty`].
    Reject,
}

/// Options shared by [`crate::Serializer`] and [`crate::Deserializer`].
///
/// The defaults impose no depth limit and rebuild empty descriptors as empty
/// images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarshalOptions {
    /// Maximum nesting depth; the root is depth 0. `None` means unbounded.
    pub max_depth: Option<usize>,
    pub empty_descriptor: EmptyDescriptorPolicy,
}

impl MarshalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    pub fn empty_descriptor(mut self, policy: EmptyDescriptorPolicy) -> Self {
        self.empty_descriptor = policy;
        self
    }
}
