//! Squads and weighted actor selection.
//!
//! Every generated event names an actor. Scoring-type events (goals, shots,
//! penalties) draw the actor with each player's scoring weight as an
//! unnormalized probability mass; everything else draws uniformly.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SidePair;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Unnormalized mass for weighted scorer selection. Zero is allowed
    /// (goalkeepers); the player is then only ever a uniform pick.
    pub scoring_weight: f32,
}

impl Player {
    pub fn new(name: impl Into<String>, scoring_weight: f32) -> Self {
        Self { name: name.into(), scoring_weight: scoring_weight.max(0.0) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    pub name: String,
    pub players: Vec<Player>,
}

impl Squad {
    pub fn new(name: impl Into<String>, players: Vec<Player>) -> Self {
        Self { name: name.into(), players }
    }

    /// Cumulative-sum weighted draw over scoring weights.
    pub fn weighted_scorer<R: Rng>(&self, rng: &mut R) -> &Player {
        let total: f32 = self.players.iter().map(|p| p.scoring_weight).sum();
        if total <= 0.0 {
            return self.any_player(rng);
        }
        let mut target = rng.gen::<f32>() * total;
        for player in &self.players {
            target -= player.scoring_weight;
            if target <= 0.0 {
                return player;
            }
        }
        // Floating-point slack on the last subtraction.
        self.players.last().expect("squad is never empty")
    }

    /// Uniform draw, used for fouls, cards and corners.
    pub fn any_player<R: Rng>(&self, rng: &mut R) -> &Player {
        let idx = rng.gen_range(0..self.players.len());
        &self.players[idx]
    }
}

/// Built-in squads used when the caller does not supply its own.
pub fn default_squads() -> SidePair<Squad> {
    let home = Squad::new(
        "Crimson United",
        vec![
            Player::new("Okafor", 30.0),
            Player::new("Silva", 22.0),
            Player::new("Beranek", 15.0),
            Player::new("Traore", 10.0),
            Player::new("Lindqvist", 8.0),
            Player::new("Marchetti", 4.0),
            Player::new("Dubois", 0.0),
        ],
    );
    let away = Squad::new(
        "Azure City",
        vec![
            Player::new("Kovacs", 27.0),
            Player::new("Nakamura", 20.0),
            Player::new("Aliyev", 16.0),
            Player::new("O'Donnell", 11.0),
            Player::new("Petit", 7.0),
            Player::new("Johansson", 5.0),
            Player::new("Castro", 0.0),
        ],
    );
    SidePair::new(home, away)
}
