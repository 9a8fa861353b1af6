use thiserror::Error;

use crate::models::phase::GamePhase;
use crate::models::player::PlayerId;

// エラーの大分類。Validation は投票一件の失敗、Precondition は
// ラウンド操作や処刑適用の前提違反、Consistency は呼び出し順の誤り。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Precondition,
    Consistency,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoteError {
    #[error("投票者がこのラウンドに登録されていません: {0}")]
    InvalidVoter(PlayerId),
    #[error("対象のプレイヤーが見つかりません: {0}")]
    InvalidTarget(PlayerId),
    #[error("死亡したプレイヤーは投票できません: {0}")]
    DeadVoter(PlayerId),
    #[error("このラウンドの投票対象ではありません: {0}")]
    IneligibleTarget(PlayerId),
    #[error("自分自身への投票は許可されていません: {0}")]
    SelfVoteForbidden(PlayerId),
    #[error("役職の制約により投票できません: {reason}")]
    RoleConstraintViolation { voter_id: PlayerId, reason: String },
    #[error("変更できる投票がありません: {0}")]
    NoPreviousVote(PlayerId),
    #[error("不正な投票です: {0}")]
    InvalidBallot(String),
    #[error("このフェーズでは実行できません: {0:?}")]
    InvalidPhase(GamePhase),
    #[error("投票できるプレイヤーがいません")]
    NoVoters,
    #[error("投票対象のプレイヤーがいません")]
    NoTargets,
    #[error("既に死亡しています: {0}")]
    AlreadyDead(PlayerId),
    #[error("処刑候補がいません")]
    NoCandidates,
    #[error("進行中の投票ラウンドがありません")]
    NoActiveRound,
}

impl VoteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            VoteError::InvalidVoter(_)
            | VoteError::InvalidTarget(_)
            | VoteError::DeadVoter(_)
            | VoteError::IneligibleTarget(_)
            | VoteError::SelfVoteForbidden(_)
            | VoteError::RoleConstraintViolation { .. }
            | VoteError::NoPreviousVote(_)
            | VoteError::InvalidBallot(_) => ErrorCategory::Validation,
            VoteError::InvalidPhase(_)
            | VoteError::NoVoters
            | VoteError::NoTargets
            | VoteError::AlreadyDead(_)
            | VoteError::NoCandidates => ErrorCategory::Precondition,
            VoteError::NoActiveRound => ErrorCategory::Consistency,
        }
    }

    // ログや通知ペイロードに載せる機械可読コード
    pub fn code(&self) -> &'static str {
        match self {
            VoteError::InvalidVoter(_) => "invalid_voter",
            VoteError::InvalidTarget(_) => "invalid_target",
            VoteError::DeadVoter(_) => "dead_voter",
            VoteError::IneligibleTarget(_) => "ineligible_target",
            VoteError::SelfVoteForbidden(_) => "self_vote_forbidden",
            VoteError::RoleConstraintViolation { .. } => "role_constraint_violation",
            VoteError::NoPreviousVote(_) => "no_previous_vote",
            VoteError::InvalidBallot(_) => "invalid_ballot",
            VoteError::InvalidPhase(_) => "invalid_phase",
            VoteError::NoVoters => "no_voters",
            VoteError::NoTargets => "no_targets",
            VoteError::AlreadyDead(_) => "already_dead",
            VoteError::NoCandidates => "no_candidates",
            VoteError::NoActiveRound => "no_active_round",
        }
    }
}
