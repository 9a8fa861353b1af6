use serde::{Deserialize, Serialize};

use super::role::Role;
use crate::errors::VoteError;
use crate::interfaces::PlayerRoster;

pub type PlayerId = u32;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub is_dead: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            role: Role::Villager,
            is_dead: false,
        }
    }

    pub fn with_role(id: PlayerId, name: String, role: Role) -> Self {
        Self {
            id,
            name,
            role,
            is_dead: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DeathCause {
    Execution, // 処刑
    Attack,    // 襲撃
}

// プレイヤー名簿のインメモリ実装。ホスト側が独自の管理層を持つ場合は
// PlayerRoster を直接実装する。
#[derive(Clone, Debug, Default)]
pub struct Roster {
    pub players: Vec<Player>,
}

impl Roster {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    pub fn add(&mut self, player: Player) {
        self.players.push(player);
    }
}

impl PlayerRoster for Roster {
    fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn alive_players(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| !p.is_dead)
            .map(|p| p.id)
            .collect()
    }

    fn has_double_vote(&self, id: PlayerId) -> bool {
        self.get_player(id)
            .map(|p| p.role == Role::Mayor)
            .unwrap_or(false)
    }

    fn kill(&mut self, id: PlayerId, _cause: DeathCause) -> Result<(), VoteError> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(VoteError::InvalidTarget(id))?;
        if player.is_dead {
            return Err(VoteError::AlreadyDead(id));
        }
        player.is_dead = true;
        Ok(())
    }
}
