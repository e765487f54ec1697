//! Bot identities, as stored in a [`BotRegistry`](crate::registry::BotRegistry).

use std::{fmt::Debug, hash::Hash, sync::Arc};

use crate::game_interface::Bot;

/// Builds a fresh bot for the given seat (player index) of a match.
pub type BotFactory = Arc<dyn Fn(usize) -> Box<dyn Bot> + Send + Sync>;

/// Wraps a constructor of a concrete bot type into a [`BotFactory`].
pub fn bot_factory<B, F>(make: F) -> BotFactory
where
    B: Bot + 'static,
    F: Fn(usize) -> B + Send + Sync + 'static,
{
    Arc::new(move |seat: usize| -> Box<dyn Bot> { Box::new(make(seat)) })
}

/// A registered bot identity. Scores are kept per identity, never per instance.
pub struct Agent {
    /// Identity name, unique within a registry.
    pub name: String,
    /// Registration order, starting at 1.
    pub id: u32,
    factory: BotFactory,
}

impl PartialEq for Agent {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Agent {}

impl Hash for Agent {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// An identity building its bots with `factory`.
    pub fn new(name: String, id: u32, factory: BotFactory) -> Agent {
        Agent { name, id, factory }
    }

    /// A new, independent instance of this bot, seated at `player_index`.
    pub fn spawn(&self, player_index: usize) -> Box<dyn Bot> {
        (self.factory)(player_index)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::board::Coord;
    use crate::game_interface::BoardSetup;

    struct SeatBot(usize);

    impl Bot for SeatBot {
        fn init_board(&mut self, _setup: &BoardSetup<'_>) -> anyhow::Result<()> {
            Ok(())
        }

        fn choose_move(&mut self, _time_remaining_ms: i64) -> anyhow::Result<Coord> {
            Ok(Coord::new(self.0 as i64, 0))
        }

        fn on_move_made(&mut self, _player_index: usize, _coord: Coord) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn seat_agent(name: &str, id: u32) -> Agent {
        Agent::new(name.to_owned(), id, bot_factory(SeatBot))
    }

    #[test]
    fn test_spawn_uses_seat() {
        let agent = seat_agent("seat", 1);
        assert_eq!(agent.spawn(2).choose_move(0).unwrap(), Coord::new(2, 0));
        assert_eq!(agent.spawn(0).choose_move(0).unwrap(), Coord::new(0, 0));
    }

    #[test]
    fn test_identity_is_the_name() {
        let mut set = HashSet::new();
        set.insert(Arc::new(seat_agent("a", 1)));
        assert!(set.contains(&Arc::new(seat_agent("a", 7))));
        assert!(!set.contains(&Arc::new(seat_agent("b", 1))));
    }
}
