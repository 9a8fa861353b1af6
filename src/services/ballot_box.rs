use log::info;

use crate::errors::VoteError;
use crate::interfaces::{PlayerRoster, VoteConstraintChecker};
use crate::models::ballot::{Ballot, VoteType, VoteWeight};
use crate::models::player::PlayerId;
use crate::models::policy::VotingPolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterOutcome {
    pub is_change: bool,
    pub previous_target: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOutcome {
    // 同じ対象への変更。状態は変化しない。
    Unchanged,
    Changed {
        old_target_id: PlayerId,
        new_target_id: PlayerId,
    },
}

struct Round {
    vote_type: VoteType,
    turn: u32,
    voters: Vec<PlayerId>,
    targets: Vec<PlayerId>,
    // 初回登録順。再登録は同じ位置で置き換える。
    ballots: Vec<Ballot>,
    policy: VotingPolicy,
    // 対象リスト外への投票を許可する（特殊投票向け）
    allow_custom_targets: bool,
}

pub struct BallotBox {
    round: Option<Round>,
    constraint_checker: Option<Box<dyn VoteConstraintChecker>>,
}

impl BallotBox {
    pub fn new() -> Self {
        Self {
            round: None,
            constraint_checker: None,
        }
    }

    pub fn with_constraint_checker(checker: Box<dyn VoteConstraintChecker>) -> Self {
        Self {
            round: None,
            constraint_checker: Some(checker),
        }
    }

    // 新しいラウンドを開始する。前のラウンドの投票は破棄される。
    pub fn start_round(
        &mut self,
        voters: Vec<PlayerId>,
        targets: Vec<PlayerId>,
        vote_type: VoteType,
        turn: u32,
        policy: VotingPolicy,
    ) {
        info!(
            "vote round opened: type={:?} turn={} voters={} targets={}",
            vote_type,
            turn,
            voters.len(),
            targets.len()
        );
        self.round = Some(Round {
            vote_type,
            turn,
            voters,
            targets,
            ballots: Vec::new(),
            policy,
            allow_custom_targets: false,
        });
    }

    // 対象リストによる制限を行わないラウンド
    pub fn start_custom_round(
        &mut self,
        voters: Vec<PlayerId>,
        targets: Vec<PlayerId>,
        vote_type: VoteType,
        turn: u32,
        policy: VotingPolicy,
    ) {
        self.start_round(voters, targets, vote_type, turn, policy);
        if let Some(round) = self.round.as_mut() {
            round.allow_custom_targets = true;
        }
    }

    fn validate(
        &self,
        roster: &dyn PlayerRoster,
        voter_id: PlayerId,
        target_id: PlayerId,
    ) -> Result<(), VoteError> {
        let round = self.round.as_ref().ok_or(VoteError::NoActiveRound)?;

        if !round.voters.contains(&voter_id) {
            return Err(VoteError::InvalidVoter(voter_id));
        }
        let voter = roster
            .get_player(voter_id)
            .ok_or(VoteError::InvalidVoter(voter_id))?;
        if voter.is_dead {
            return Err(VoteError::DeadVoter(voter_id));
        }
        if roster.get_player(target_id).is_none() {
            return Err(VoteError::InvalidTarget(target_id));
        }
        if !round.allow_custom_targets && !round.targets.contains(&target_id) {
            return Err(VoteError::IneligibleTarget(target_id));
        }
        if voter_id == target_id && !round.policy.allow_self_vote {
            return Err(VoteError::SelfVoteForbidden(voter_id));
        }
        if let Some(checker) = &self.constraint_checker {
            if let Some(verdict) = checker.check(voter, target_id) {
                if !verdict.valid {
                    return Err(VoteError::RoleConstraintViolation {
                        voter_id,
                        reason: verdict
                            .reason
                            .or(verdict.message)
                            .unwrap_or_else(|| "役職制約".to_string()),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn register(
        &mut self,
        roster: &dyn PlayerRoster,
        voter_id: PlayerId,
        target_id: PlayerId,
        weight: VoteWeight,
    ) -> Result<RegisterOutcome, VoteError> {
        self.validate(roster, voter_id, target_id)?;

        let round = self.round.as_mut().ok_or(VoteError::NoActiveRound)?;
        let ballot = Ballot::new(voter_id, target_id, round.vote_type, weight, round.turn);

        match round.ballots.iter().position(|b| b.voter_id() == voter_id) {
            Some(pos) => {
                let previous = round.ballots[pos].target_id();
                round.ballots[pos] = ballot;
                Ok(RegisterOutcome {
                    is_change: true,
                    previous_target: Some(previous),
                })
            }
            None => {
                round.ballots.push(ballot);
                Ok(RegisterOutcome {
                    is_change: false,
                    previous_target: None,
                })
            }
        }
    }

    pub fn change_vote(
        &mut self,
        roster: &dyn PlayerRoster,
        voter_id: PlayerId,
        new_target_id: PlayerId,
    ) -> Result<ChangeOutcome, VoteError> {
        if self.round.is_none() {
            return Err(VoteError::NoActiveRound);
        }
        let current = self
            .get_vote(voter_id)
            .map(|b| b.target_id())
            .ok_or(VoteError::NoPreviousVote(voter_id))?;

        self.validate(roster, voter_id, new_target_id)?;

        if current == new_target_id {
            return Ok(ChangeOutcome::Unchanged);
        }

        let round = self.round.as_mut().ok_or(VoteError::NoActiveRound)?;
        if let Some(ballot) = round
            .ballots
            .iter_mut()
            .find(|b| b.voter_id() == voter_id)
        {
            ballot.change_target(new_target_id);
        }
        Ok(ChangeOutcome::Changed {
            old_target_id: current,
            new_target_id,
        })
    }

    pub fn has_voted(&self, voter_id: PlayerId) -> bool {
        self.get_vote(voter_id).is_some()
    }

    pub fn get_vote(&self, voter_id: PlayerId) -> Option<&Ballot> {
        self.round
            .as_ref()
            .and_then(|r| r.ballots.iter().find(|b| b.voter_id() == voter_id))
    }

    pub fn is_valid_target(&self, target_id: PlayerId) -> bool {
        self.round
            .as_ref()
            .map(|r| r.allow_custom_targets || r.targets.contains(&target_id))
            .unwrap_or(false)
    }

    // 全投票者が投票を済ませたか
    pub fn is_round_complete(&self) -> bool {
        self.round
            .as_ref()
            .map(|r| r.voters.iter().all(|v| r.ballots.iter().any(|b| b.voter_id() == *v)))
            .unwrap_or(false)
    }

    pub fn remaining_voters(&self) -> Vec<PlayerId> {
        self.round
            .as_ref()
            .map(|r| {
                r.voters
                    .iter()
                    .copied()
                    .filter(|v| !r.ballots.iter().any(|b| b.voter_id() == *v))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn total_voters(&self) -> usize {
        self.round.as_ref().map(|r| r.voters.len()).unwrap_or(0)
    }

    pub fn submitted_count(&self) -> usize {
        self.round.as_ref().map(|r| r.ballots.len()).unwrap_or(0)
    }

    pub fn ballots(&self) -> &[Ballot] {
        self.round.as_ref().map(|r| r.ballots.as_slice()).unwrap_or(&[])
    }

    pub fn vote_type(&self) -> Option<VoteType> {
        self.round.as_ref().map(|r| r.vote_type)
    }

    pub fn turn(&self) -> Option<u32> {
        self.round.as_ref().map(|r| r.turn)
    }

    pub fn voters(&self) -> &[PlayerId] {
        self.round.as_ref().map(|r| r.voters.as_slice()).unwrap_or(&[])
    }

    pub fn targets(&self) -> &[PlayerId] {
        self.round.as_ref().map(|r| r.targets.as_slice()).unwrap_or(&[])
    }

    pub fn has_active_round(&self) -> bool {
        self.round.is_some()
    }
}

impl Default for BallotBox {
    fn default() -> Self {
        Self::new()
    }
}
