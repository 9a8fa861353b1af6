use crate::errors::VoteError;
use crate::models::phase::GamePhase;
use crate::models::player::{DeathCause, Player, PlayerId};

// 外部のプレイヤー管理への窓口。生死の書き換えは kill だけが行う。
pub trait PlayerRoster {
    fn get_player(&self, id: PlayerId) -> Option<&Player>;
    fn alive_players(&self) -> Vec<PlayerId>;
    // 投票が2票分として数えられる状態かどうか
    fn has_double_vote(&self, id: PlayerId) -> bool;
    fn kill(&mut self, id: PlayerId, cause: DeathCause) -> Result<(), VoteError>;
}

// ターンとフェーズの進行は外部のスケジューラが管理する
pub trait PhaseSource {
    fn current_turn(&self) -> u32;
    fn current_phase(&self) -> GamePhase;
}

#[derive(Debug, Clone)]
pub struct ConstraintVerdict {
    pub valid: bool,
    pub reason: Option<String>,
    pub message: Option<String>,
}

// 役職固有の投票制約。None を返した場合は制約なし。
pub trait VoteConstraintChecker {
    fn check(&self, voter: &Player, target_id: PlayerId) -> Option<ConstraintVerdict>;
}
