use std::sync::mpsc::Receiver;

use log::info;

use crate::errors::VoteError;
use crate::events::{NotificationHub, VoteEvent};
use crate::interfaces::{PhaseSource, PlayerRoster, VoteConstraintChecker};
use crate::models::ballot::{BallotRecord, VoteType, VoteWeight};
use crate::models::phase::GamePhase;
use crate::models::player::PlayerId;
use crate::models::policy::VotingPolicy;
use crate::services::audit::{AuditLog, TurnSummary};
use crate::services::ballot_box::{BallotBox, ChangeOutcome, RegisterOutcome};
use crate::services::execution::{self, ExecutionDecision, ExecutionReport, ExecutionTarget};
use crate::services::runoff::RunoffCoordinator;
use crate::services::tally;

#[derive(Debug, Clone, PartialEq)]
pub struct RoundInfo {
    pub vote_type: VoteType,
    pub turn: u32,
    pub voters: Vec<PlayerId>,
    pub targets: Vec<PlayerId>,
}

#[derive(Debug, Clone)]
pub enum VoteOutcome {
    // 同数のため決選投票を開始した。フェーズ側が終了を決めたら
    // もう一度 conclude_voting を呼ぶ。
    RunoffStarted {
        turn: u32,
        candidates: Vec<PlayerId>,
        voters: usize,
    },
    Resolved {
        turn: u32,
        target: ExecutionTarget,
        report: ExecutionReport,
        tally: tally::TallyResult,
    },
}

// 投票サブシステムの唯一の入口。ラウンドの開始と集計、決選投票への
// 移行、処刑の適用、履歴の記録をまとめて調停する。
pub struct VoteFacade {
    ballot_box: BallotBox,
    runoff: RunoffCoordinator,
    audit: AuditLog,
    hub: NotificationHub,
    policy: VotingPolicy,
}

impl VoteFacade {
    pub fn new(policy: VotingPolicy) -> Self {
        Self {
            ballot_box: BallotBox::new(),
            runoff: RunoffCoordinator::new(),
            audit: AuditLog::new(),
            hub: NotificationHub::new(),
            policy,
        }
    }

    pub fn with_constraint_checker(
        policy: VotingPolicy,
        checker: Box<dyn VoteConstraintChecker>,
    ) -> Self {
        Self {
            ballot_box: BallotBox::with_constraint_checker(checker),
            runoff: RunoffCoordinator::new(),
            audit: AuditLog::new(),
            hub: NotificationHub::new(),
            policy,
        }
    }

    pub fn subscribe(&mut self) -> Receiver<VoteEvent> {
        self.hub.subscribe()
    }

    pub fn policy(&self) -> &VotingPolicy {
        &self.policy
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    pub fn set_max_runoff_attempts(&mut self, n: u32) {
        self.runoff.set_max_attempts(n);
    }

    pub fn runoff_attempts(&self) -> u32 {
        self.runoff.attempts()
    }

    // 投票フェーズの開始。生存者全員が投票者かつ対象になる。
    pub fn start_voting(
        &mut self,
        roster: &dyn PlayerRoster,
        phases: &dyn PhaseSource,
    ) -> Result<RoundInfo, VoteError> {
        if phases.current_phase() != GamePhase::Voting {
            return Err(VoteError::InvalidPhase(phases.current_phase()));
        }
        let alive = roster.alive_players();
        self.open_round(
            alive.clone(),
            alive,
            VoteType::Execution,
            phases.current_turn(),
        )
    }

    // 投票者・対象を明示して開くラウンド
    pub fn open_round(
        &mut self,
        voters: Vec<PlayerId>,
        targets: Vec<PlayerId>,
        vote_type: VoteType,
        turn: u32,
    ) -> Result<RoundInfo, VoteError> {
        if voters.is_empty() {
            return Err(VoteError::NoVoters);
        }
        if targets.is_empty() {
            return Err(VoteError::NoTargets);
        }

        self.ballot_box
            .start_round(voters.clone(), targets.clone(), vote_type, turn, self.policy);
        if vote_type == VoteType::Execution {
            self.runoff.reset_attempts();
        }

        self.hub.emit(VoteEvent::VoteStart {
            vote_type,
            turn,
            voters: voters.clone(),
            targets: targets.clone(),
        });

        Ok(RoundInfo {
            vote_type,
            turn,
            voters,
            targets,
        })
    }

    pub fn register_vote(
        &mut self,
        roster: &dyn PlayerRoster,
        voter_id: PlayerId,
        target_id: PlayerId,
    ) -> Result<RegisterOutcome, VoteError> {
        // 重みは登録時に一度だけ決める
        let weight = if roster.has_double_vote(voter_id) {
            VoteWeight::new(2)?
        } else {
            VoteWeight::default()
        };

        let is_change = self.ballot_box.has_voted(voter_id);
        let previous_target = self.ballot_box.get_vote(voter_id).map(|b| b.target_id());
        self.hub.emit(VoteEvent::RegisterBefore {
            voter_id,
            target_id,
            is_change,
            previous_target,
        });

        let outcome = self
            .ballot_box
            .register(roster, voter_id, target_id, weight)?;

        if let Some(ballot) = self.ballot_box.get_vote(voter_id) {
            self.audit.record(ballot);
            self.hub.emit(VoteEvent::RegisterAfter {
                ballot: ballot.to_record(),
                is_change: outcome.is_change,
                previous_target: outcome.previous_target,
            });
        }
        Ok(outcome)
    }

    pub fn change_vote(
        &mut self,
        roster: &dyn PlayerRoster,
        voter_id: PlayerId,
        new_target_id: PlayerId,
    ) -> Result<ChangeOutcome, VoteError> {
        if !self.ballot_box.has_active_round() {
            return Err(VoteError::NoActiveRound);
        }
        let old_target_id = match self.ballot_box.get_vote(voter_id) {
            Some(ballot) => ballot.target_id(),
            None => return Err(VoteError::NoPreviousVote(voter_id)),
        };

        // 同一対象への変更では change 系の通知を出さない
        if old_target_id != new_target_id {
            self.hub.emit(VoteEvent::ChangeBefore {
                voter_id,
                old_target_id,
                new_target_id,
            });
        }

        let outcome = self
            .ballot_box
            .change_vote(roster, voter_id, new_target_id)?;

        if let ChangeOutcome::Changed { .. } = outcome {
            if let Some(ballot) = self.ballot_box.get_vote(voter_id) {
                self.audit.record(ballot);
                self.hub.emit(VoteEvent::ChangeAfter {
                    ballot: ballot.to_record(),
                });
            }
        }
        Ok(outcome)
    }

    // 受付中のラウンドを締め切り、集計・判定・適用まで行う。
    // 同数で決選投票が必要な場合はラウンドを開き直して戻る。
    pub fn conclude_voting(
        &mut self,
        roster: &mut dyn PlayerRoster,
    ) -> Result<VoteOutcome, VoteError> {
        let (vote_type, turn) = match (self.ballot_box.vote_type(), self.ballot_box.turn()) {
            (Some(vote_type), Some(turn)) => (vote_type, turn),
            _ => return Err(VoteError::NoActiveRound),
        };

        let records: Vec<BallotRecord> =
            self.ballot_box.ballots().iter().map(|b| b.to_record()).collect();
        self.hub.emit(VoteEvent::CountBefore {
            vote_type,
            turn,
            ballots: records,
        });

        let result = tally::count(self.ballot_box.ballots());
        let tie = tally::check_for_tie(&result);
        let rule = match vote_type {
            VoteType::Runoff => self.policy.runoff_tie_rule,
            _ => self.policy.execution_rule,
        };
        let needs_runoff = self.runoff.needs_runoff(tie.is_tie, rule);

        info!(
            "tally concluded: type={:?} turn={} total_weight={} is_tie={} needs_runoff={}",
            vote_type, turn, result.total_weight, tie.is_tie, needs_runoff
        );
        self.hub.emit(VoteEvent::CountAfter {
            vote_type,
            turn,
            counts: result.counts.clone(),
            max_voted: result.max_voted.clone(),
            is_tie: tie.is_tie,
            needs_runoff,
        });

        if vote_type == VoteType::Runoff {
            self.runoff.mark_tallied();
        }

        if needs_runoff {
            let candidates = result.max_voted.clone();
            let setup = self.runoff.start_runoff(
                roster,
                &mut self.ballot_box,
                &candidates,
                turn,
                self.policy,
            )?;
            self.hub.emit(VoteEvent::RunoffStart {
                turn,
                voters: roster.alive_players(),
                candidates: candidates.clone(),
            });
            return Ok(VoteOutcome::RunoffStarted {
                turn,
                candidates,
                voters: setup.voters,
            });
        }

        let mut rng = rand::thread_rng();
        let target = match execution::decide(&result, rule, &mut rng) {
            ExecutionDecision::Decided(target) => target,
            // needs_runoff が偽のまま Runoff 判定になるのは試行上限に
            // 達した場合。決選投票規則で直接決着させる。
            ExecutionDecision::NeedsRunoff { candidates } => {
                self.runoff
                    .resolve_tie(&candidates, self.policy.runoff_tie_rule, &mut rng)
            }
        };

        if vote_type == VoteType::Runoff {
            let execution_target = match &target {
                ExecutionTarget::Player(id) => Some(*id),
                _ => None,
            };
            self.hub.emit(VoteEvent::RunoffResult {
                turn,
                counts: result.counts.clone(),
                max_voted: result.max_voted.clone(),
                is_tie: tie.is_tie,
                execution_target,
            });
            self.runoff.mark_resolved();
        }

        let report = execution::apply(roster, &self.hub, &self.policy, turn, target.clone())?;
        Ok(VoteOutcome::Resolved {
            turn,
            target,
            report,
            tally: result,
        })
    }

    // モデレーターによる直接の処刑指定
    pub fn execute_target(
        &mut self,
        roster: &mut dyn PlayerRoster,
        phases: &dyn PhaseSource,
        target_id: PlayerId,
    ) -> Result<ExecutionReport, VoteError> {
        execution::apply(
            roster,
            &self.hub,
            &self.policy,
            phases.current_turn(),
            ExecutionTarget::Player(target_id),
        )
    }

    // フェーズ遷移の通知を受けてラウンドを進める。フェーズ源は遷移後の
    // 状態を返すようになっていること。
    pub fn on_phase_change(
        &mut self,
        roster: &mut dyn PlayerRoster,
        phases: &dyn PhaseSource,
        from: GamePhase,
        to: GamePhase,
    ) -> Result<Option<VoteOutcome>, VoteError> {
        if to == GamePhase::Voting {
            self.start_voting(roster, phases)?;
            return Ok(None);
        }
        if from == GamePhase::Voting || from == GamePhase::RunoffVoting {
            return self.conclude_voting(roster).map(Some);
        }
        Ok(None)
    }

    pub fn has_voted(&self, voter_id: PlayerId) -> bool {
        self.ballot_box.has_voted(voter_id)
    }

    pub fn remaining_voters(&self) -> Vec<PlayerId> {
        self.ballot_box.remaining_voters()
    }

    pub fn submitted_count(&self) -> usize {
        self.ballot_box.submitted_count()
    }

    pub fn total_voters(&self) -> usize {
        self.ballot_box.total_voters()
    }

    pub fn is_round_complete(&self) -> bool {
        self.ballot_box.is_round_complete()
    }

    pub fn current_round_type(&self) -> Option<VoteType> {
        self.ballot_box.vote_type()
    }

    pub fn summarize_turn(&self, turn: u32) -> TurnSummary {
        self.audit.summarize(turn)
    }
}
