/// Construction settings for a [`World`](crate::ecs::World).
///
/// Both values are pre-allocation hints; neither is a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    entity_capacity: usize,
    event_capacity: usize,
}

impl Config {
    /// Default number of entity slots reserved up front.
    pub const DEFAULT_ENTITY_CAPACITY: usize = 1024;

    /// Default number of event types the bus reserves partitions for.
    pub const DEFAULT_EVENT_CAPACITY: usize = 64;

    /// Set the number of entity slots to reserve.
    pub fn with_entity_capacity(mut self, capacity: usize) -> Self {
        self.entity_capacity = capacity;
        self
    }

    /// Set the number of event type partitions to reserve.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    #[inline]
    pub fn entity_capacity(&self) -> usize {
        self.entity_capacity
    }

    #[inline]
    pub fn event_capacity(&self) -> usize {
        self.event_capacity
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entity_capacity: Self::DEFAULT_ENTITY_CAPACITY,
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        // Given
        let config = Config::default()
            .with_entity_capacity(16)
            .with_event_capacity(4);

        // Then
        assert_eq!(config.entity_capacity(), 16);
        assert_eq!(config.event_capacity(), 4);
        assert_eq!(
            Config::default().entity_capacity(),
            Config::DEFAULT_ENTITY_CAPACITY
        );
    }
}
