//! Fixed-capacity registry of file descriptors.

use super::SourceFileDescriptor;
use crate::config::DEFAULT_REGISTRY_CAPACITY;

/// Outcome of [`Registry::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Added,
    /// The same descriptor was registered before; nothing changed
    AlreadyRegistered,
    /// The registry was full; the descriptor will not be reported
    Dropped,
}

/// Non-owning table of registered descriptors, in registration order
#[derive(Debug)]
pub struct Registry<'a> {
    entries: Vec<&'a SourceFileDescriptor>,
    capacity: usize,
    dropped: usize,
}

impl Default for Registry<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_CAPACITY)
    }
}

impl<'a> Registry<'a> {
    /// Create a registry; a capacity of 0 means the default
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_REGISTRY_CAPACITY
        } else {
            capacity
        };
        Self {
            entries: Vec::with_capacity(capacity.min(64)),
            capacity,
            dropped: 0,
        }
    }

    /// Add a descriptor. Identity, not path, decides duplicates.
    pub fn register(&mut self, descriptor: &'a SourceFileDescriptor) -> Registration {
        if self.entries.iter().any(|d| std::ptr::eq(*d, descriptor)) {
            return Registration::AlreadyRegistered;
        }
        if self.entries.len() >= self.capacity {
            self.dropped += 1;
            tracing::warn!(
                path = descriptor.path(),
                capacity = self.capacity,
                "registry full, dropping registration"
            );
            return Registration::Dropped;
        }
        self.entries.push(descriptor);
        Registration::Added
    }

    /// Registered descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &'a SourceFileDescriptor> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Registrations refused because the table was full
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::classify::CountableMask;

    fn descriptor(path: &str) -> SourceFileDescriptor {
        SourceFileDescriptor::new(path, CountableMask::new(1))
    }

    #[test]
    fn test_duplicate_registration_is_noop() {
        let a = descriptor("/a.c");
        let mut registry = Registry::new(4);
        assert_eq!(registry.register(&a), Registration::Added);
        assert_eq!(registry.register(&a), Registration::AlreadyRegistered);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_same_path_different_descriptor_is_distinct() {
        let a = descriptor("/a.c");
        let b = descriptor("/a.c");
        let mut registry = Registry::new(4);
        registry.register(&a);
        assert_eq!(registry.register(&b), Registration::Added);
    }

    #[test]
    fn test_overflow_drops() {
        let files: Vec<_> = (0..3).map(|i| descriptor(&format!("/{i}.c"))).collect();
        let mut registry = Registry::new(2);
        let outcomes: Vec<_> = files.iter().map(|f| registry.register(f)).collect();
        assert_eq!(
            outcomes,
            vec![Registration::Added, Registration::Added, Registration::Dropped]
        );
        assert_eq!(registry.dropped(), 1);
        let paths: Vec<_> = registry.iter().map(SourceFileDescriptor::path).collect();
        assert_eq!(paths, vec!["/0.c", "/1.c"]);
    }

    #[test]
    fn test_zero_capacity_means_default() {
        assert_eq!(Registry::new(0).capacity(), DEFAULT_REGISTRY_CAPACITY);
        assert!(Registry::default().is_empty());
    }
}
