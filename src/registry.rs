use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::strategy::{Command, CommandRegistry};

/// Concurrent name → command table.
///
/// Registering a command under a name that is already taken replaces the old one.
#[derive(Default, Clone)]
pub struct InMemoryRegistry {
    commands: Arc<DashMap<String, Arc<dyn Command>>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, command: Arc<dyn Command>) -> Option<Arc<dyn Command>> {
        let name = command.name().to_string();
        debug!("registering command {}", name);
        self.commands.insert(name, command)
    }

    pub fn unregister(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.remove(name).map(|(_, command)| command)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl CommandRegistry for InMemoryRegistry {
    fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).map(|e| Arc::clone(e.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::strategy::ChatContext;
    use crate::PlatformResult;

    struct Named(&'static str);

    #[async_trait]
    impl Command for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn invoke(&self, _context: Arc<dyn ChatContext>, _args: Vec<String>) -> PlatformResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = InMemoryRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register(Arc::new(Named("ping"))).is_none());
        registry.register(Arc::new(Named("ban")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["ban", "ping"]);
        assert_eq!(registry.get("ping").map(|c| c.name().to_string()), Some("ping".into()));
        assert!(registry.get("kick").is_none());
    }

    #[test]
    fn test_replace_and_unregister() {
        let registry = InMemoryRegistry::new();
        registry.register(Arc::new(Named("ping")));
        assert!(registry.register(Arc::new(Named("ping"))).is_some());
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister("ping").is_some());
        assert!(registry.unregister("ping").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clones_share_commands() {
        let registry = InMemoryRegistry::new();
        let shared = registry.clone();
        registry.register(Arc::new(Named("ping")));
        assert!(shared.get("ping").is_some());
    }
}
