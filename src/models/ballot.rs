use serde::{Deserialize, Serialize};

use crate::errors::VoteError;
use crate::models::player::PlayerId;
use crate::utils::clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    Execution, // 処刑投票
    Runoff,    // 決選投票
    Special,   // 特殊投票（役職固有の投票など）
}

// 一票の重み。登録時に一度だけ決まり、以後変化しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteWeight(u32);

impl VoteWeight {
    pub fn new(value: u32) -> Result<Self, VoteError> {
        if value == 0 {
            return Err(VoteError::InvalidBallot(
                "投票の重みは1以上でなければなりません".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for VoteWeight {
    fn default() -> Self {
        Self(1)
    }
}

// 投票者は作成時に固定。対象は change_target でのみ書き換わる。
#[derive(Debug, Clone, PartialEq)]
pub struct Ballot {
    voter_id: PlayerId,
    target_id: PlayerId,
    vote_type: VoteType,
    weight: VoteWeight,
    turn: u32,
    timestamp: i64,
}

impl Ballot {
    pub fn new(
        voter_id: PlayerId,
        target_id: PlayerId,
        vote_type: VoteType,
        weight: VoteWeight,
        turn: u32,
    ) -> Self {
        Self {
            voter_id,
            target_id,
            vote_type,
            weight,
            turn,
            timestamp: clock::now_micros(),
        }
    }

    pub fn voter_id(&self) -> PlayerId {
        self.voter_id
    }

    pub fn target_id(&self) -> PlayerId {
        self.target_id
    }

    pub fn vote_type(&self) -> VoteType {
        self.vote_type
    }

    pub fn weight(&self) -> VoteWeight {
        self.weight
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    // 対象の変更。投票者・種別・重みは保持し、時刻だけ更新する。
    pub fn change_target(&mut self, new_target_id: PlayerId) {
        self.target_id = new_target_id;
        self.timestamp = clock::now_micros();
    }

    pub fn to_record(&self) -> BallotRecord {
        BallotRecord {
            voter_id: self.voter_id,
            target_id: self.target_id,
            vote_type: self.vote_type,
            weight: self.weight.value(),
            turn: self.turn,
            timestamp: self.timestamp,
        }
    }
}

// 履歴・通知用のスナップショット
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallotRecord {
    pub voter_id: PlayerId,
    pub target_id: PlayerId,
    pub vote_type: VoteType,
    pub weight: u32,
    pub turn: u32,
    pub timestamp: i64,
}
