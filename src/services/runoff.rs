use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::errors::VoteError;
use crate::interfaces::PlayerRoster;
use crate::models::ballot::VoteType;
use crate::models::player::PlayerId;
use crate::models::policy::{ExecutionRule, VotingPolicy};
use crate::services::ballot_box::BallotBox;
use crate::services::execution::ExecutionTarget;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunoffState {
    Idle,
    Open,     // 決選投票の受付中
    Tallied,  // 集計済み
    Resolved, // 決着
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunoffSetup {
    pub voters: usize,
    pub candidates: usize,
}

pub struct RunoffCoordinator {
    state: RunoffState,
    attempts: u32,
    max_attempts: u32,
}

impl RunoffCoordinator {
    pub fn new() -> Self {
        Self {
            state: RunoffState::Idle,
            attempts: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn state(&self) -> RunoffState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    // 決選投票ラウンドを開く。投票者は生存者全員、対象は生存している候補のみ。
    pub fn start_runoff(
        &mut self,
        roster: &dyn PlayerRoster,
        ballot_box: &mut BallotBox,
        candidates: &[PlayerId],
        turn: u32,
        policy: VotingPolicy,
    ) -> Result<RunoffSetup, VoteError> {
        let alive_candidates: Vec<PlayerId> = candidates
            .iter()
            .copied()
            .filter(|id| roster.get_player(*id).map(|p| !p.is_dead).unwrap_or(false))
            .collect();
        if alive_candidates.is_empty() {
            return Err(VoteError::NoCandidates);
        }
        let voters = roster.alive_players();
        if voters.is_empty() {
            return Err(VoteError::NoVoters);
        }

        self.attempts += 1;
        self.state = RunoffState::Open;
        info!(
            "runoff attempt {} opened: {} voters, {} candidates",
            self.attempts,
            voters.len(),
            alive_candidates.len()
        );

        let setup = RunoffSetup {
            voters: voters.len(),
            candidates: alive_candidates.len(),
        };
        ballot_box.start_round(voters, alive_candidates, VoteType::Runoff, turn, policy);
        Ok(setup)
    }

    pub fn mark_tallied(&mut self) {
        if self.state == RunoffState::Open {
            self.state = RunoffState::Tallied;
        }
    }

    pub fn mark_resolved(&mut self) {
        self.state = RunoffState::Resolved;
    }

    pub fn needs_runoff(&self, is_tie: bool, rule: ExecutionRule) -> bool {
        if !is_tie {
            return false;
        }
        // 同数が続いても必ず終わるよう、試行回数に上限を設ける
        if self.attempts >= self.max_attempts {
            return false;
        }
        rule == ExecutionRule::Runoff
    }

    // 決選投票を行わない場合の決着。Random のほか、試行上限に達した
    // Runoff もランダムで決める。
    pub fn resolve_tie<R: Rng>(
        &self,
        tied_players: &[PlayerId],
        rule: ExecutionRule,
        rng: &mut R,
    ) -> ExecutionTarget {
        match rule {
            ExecutionRule::NoExecution => ExecutionTarget::NoOne,
            ExecutionRule::AllExecution => ExecutionTarget::All(tied_players.to_vec()),
            ExecutionRule::Random | ExecutionRule::Runoff => match tied_players.choose(rng) {
                Some(id) => ExecutionTarget::Player(*id),
                None => ExecutionTarget::NoOne,
            },
        }
    }

    pub fn reset_attempts(&mut self) {
        self.attempts = 0;
        self.state = RunoffState::Idle;
    }

    pub fn set_max_attempts(&mut self, n: u32) {
        if n == 0 {
            return; // 0 は無視
        }
        self.max_attempts = n;
    }
}

impl Default for RunoffCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
