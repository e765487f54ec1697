//! Explicit registration of the bots and boards taking part in a run.

use std::{path::Path, sync::Arc};

use tracing::debug;

use crate::{
    agent::{Agent, BotFactory},
    board::BoardConfig,
    bots,
    error::ConfigurationError,
};

mod board_loader;

/// Bot identities, in registration order.
#[derive(Debug, Default, Clone)]
pub struct BotRegistry {
    agents: Vec<Arc<Agent>>,
}

impl BotRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in bot.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (name, factory) in bots::builtin() {
            // built-in names are distinct
            let _ = registry.register(name, factory);
        }
        registry
    }

    /// Add an identity. Ids start at 1, in registration order.
    ///
    /// # Errors
    /// [`ConfigurationError::DuplicateBot`] when `name` is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: BotFactory,
    ) -> Result<&mut Self, ConfigurationError> {
        let name = name.into();
        if self.agents.iter().any(|a| a.name == name) {
            return Err(ConfigurationError::DuplicateBot(name));
        }
        let id = self.agents.len() as u32 + 1;
        debug!(bot = %name, id, "registered");
        self.agents.push(Arc::new(Agent::new(name, id, factory)));
        Ok(self)
    }

    /// Keep only the named identities. Registry order is kept, whatever the order of `names`.
    ///
    /// # Errors
    /// [`ConfigurationError::UnknownBot`] for the first name that is not registered.
    pub fn select<S: AsRef<str>>(self, names: &[S]) -> Result<Self, ConfigurationError> {
        if let Some(unknown) = names
            .iter()
            .map(AsRef::as_ref)
            .find(|n| !self.agents.iter().any(|a| a.name == *n))
        {
            return Err(ConfigurationError::UnknownBot(unknown.to_owned()));
        }
        let agents = self
            .agents
            .into_iter()
            .filter(|a| names.iter().any(|n| n.as_ref() == a.name))
            .collect();
        Ok(BotRegistry { agents })
    }

    /// Registered identities.
    pub fn agents(&self) -> &[Arc<Agent>] {
        &self.agents
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Board variants, in the order they are played.
#[derive(Debug, Default, Clone)]
pub struct BoardRegistry {
    boards: Vec<Arc<BoardConfig>>,
}

impl BoardRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.toml` file of `dir`, sorted by file name.
    ///
    /// See [`BoardRegistry::push`] and [`BoardConfig::new`] for what makes a board invalid.
    pub fn from_dir(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let mut registry = Self::new();
        for config in board_loader::load_boards(dir.as_ref())? {
            registry.push(config)?;
        }
        Ok(registry)
    }

    /// Append a board.
    ///
    /// # Errors
    /// [`ConfigurationError::DuplicateBoard`] when a board of the same name is registered.
    pub fn push(&mut self, config: BoardConfig) -> Result<&mut Self, ConfigurationError> {
        if self.boards.iter().any(|b| b.name() == config.name()) {
            return Err(ConfigurationError::DuplicateBoard(config.name().to_owned()));
        }
        self.boards.push(Arc::new(config));
        Ok(self)
    }

    /// Registered boards, in play order.
    pub fn boards(&self) -> &[Arc<BoardConfig>] {
        &self.boards
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.boards.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::bot_factory;
    use crate::bots::ScanBot;

    fn names(registry: &BotRegistry) -> Vec<&str> {
        registry.agents().iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_register_assigns_ids_and_rejects_duplicates() {
        let mut registry = BotRegistry::new();
        registry
            .register("a", bot_factory(|_| ScanBot::new()))
            .unwrap()
            .register("b", bot_factory(|_| ScanBot::new()))
            .unwrap();
        assert_eq!(registry.agents()[1].id, 2);
        assert_eq!(
            registry
                .register("a", bot_factory(|_| ScanBot::new()))
                .err(),
            Some(ConfigurationError::DuplicateBot("a".to_owned()))
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_select_keeps_registry_order() {
        let registry = BotRegistry::builtin();
        assert_eq!(names(&registry), ["RandomBot", "SmartRandomBot", "ScanBot"]);

        let selected = registry.clone().select(&["ScanBot", "RandomBot"]).unwrap();
        assert_eq!(names(&selected), ["RandomBot", "ScanBot"]);

        let err = registry.select(&["Nobody"]).unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownBot("Nobody".to_owned()));
    }

    #[test]
    fn test_board_names_are_unique() {
        let mut boards = BoardRegistry::new();
        boards
            .push(BoardConfig::new("b", 3, 3, 3, 2, vec![], 10).unwrap())
            .unwrap();
        let err = boards
            .push(BoardConfig::new("b", 4, 4, 3, 2, vec![], 10).unwrap())
            .unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateBoard("b".to_owned()));
        assert_eq!(boards.len(), 1);
    }
}
