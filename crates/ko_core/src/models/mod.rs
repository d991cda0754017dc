//! Shared domain types: team sides, per-side containers, squads, events.

pub mod events;
pub mod squad;

use serde::{Deserialize, Serialize};

/// One of the two teams in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    pub const BOTH: [TeamSide; 2] = [TeamSide::Home, TeamSide::Away];
}

/// A value held once per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SidePair<T> {
    pub home: T,
    pub away: T,
}

impl<T> SidePair<T> {
    pub fn new(home: T, away: T) -> Self {
        Self { home, away }
    }

    pub fn get(&self, side: TeamSide) -> &T {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn get_mut(&mut self, side: TeamSide) -> &mut T {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }
}

impl<T: Copy> SidePair<T> {
    pub fn uniform(value: T) -> Self {
        Self { home: value, away: value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involutive() {
        for side in TeamSide::BOTH {
            assert_eq!(side.opponent().opponent(), side);
        }
    }

    #[test]
    fn test_side_pair_access() {
        let mut pair = SidePair::new(1u32, 2u32);
        assert_eq!(*pair.get(TeamSide::Home), 1);
        *pair.get_mut(TeamSide::Away) += 1;
        assert_eq!(pair.away, 3);
    }
}
