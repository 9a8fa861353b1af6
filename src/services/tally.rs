use std::collections::HashMap;

use serde::Serialize;

use crate::models::ballot::{Ballot, BallotRecord};
use crate::models::player::PlayerId;

// 集計対象となる一票。ライブな Ballot でも履歴から再生した
// BallotRecord でも同じように数えられる。
pub trait WeightedVote {
    fn cast_by(&self) -> PlayerId;
    fn cast_for(&self) -> PlayerId;
    fn vote_weight(&self) -> u32;
}

impl WeightedVote for Ballot {
    fn cast_by(&self) -> PlayerId {
        self.voter_id()
    }

    fn cast_for(&self) -> PlayerId {
        self.target_id()
    }

    fn vote_weight(&self) -> u32 {
        self.weight().value()
    }
}

impl WeightedVote for BallotRecord {
    fn cast_by(&self) -> PlayerId {
        self.voter_id
    }

    fn cast_for(&self) -> PlayerId {
        self.target_id
    }

    fn vote_weight(&self) -> u32 {
        self.weight
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallyResult {
    pub counts: HashMap<PlayerId, u32>,
    // 最多得票の対象。票が最初に現れた順で、同数はそのまま並ぶ。
    pub max_voted: Vec<PlayerId>,
    pub total_weight: u32,
}

impl TallyResult {
    pub fn is_tie(&self) -> bool {
        self.max_voted.len() > 1
    }

    pub fn max_count(&self) -> u32 {
        self.max_voted
            .first()
            .and_then(|id| self.counts.get(id))
            .copied()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TieCheck {
    pub is_tie: bool,
    pub tied_players: Vec<PlayerId>,
}

pub fn count<B: WeightedVote>(ballots: &[B]) -> TallyResult {
    let mut counts: HashMap<PlayerId, u32> = HashMap::new();
    let mut seen_order: Vec<PlayerId> = Vec::new();
    let mut total_weight = 0u32;

    for ballot in ballots {
        let target_id = ballot.cast_for();
        if !seen_order.contains(&target_id) {
            seen_order.push(target_id);
        }
        *counts.entry(target_id).or_insert(0) += ballot.vote_weight();
        total_weight += ballot.vote_weight();
    }

    let max = counts.values().copied().max().unwrap_or(0);
    let max_voted = if max == 0 {
        Vec::new()
    } else {
        seen_order
            .into_iter()
            .filter(|id| counts.get(id) == Some(&max))
            .collect()
    };

    TallyResult {
        counts,
        max_voted,
        total_weight,
    }
}

pub fn check_for_tie(result: &TallyResult) -> TieCheck {
    let is_tie = result.max_voted.len() > 1;
    TieCheck {
        is_tie,
        tied_players: if is_tie {
            result.max_voted.clone()
        } else {
            Vec::new()
        },
    }
}

// 表示・履歴用の単一対象ヘルパー。判定経路では使わない。
pub fn count_for<B: WeightedVote>(ballots: &[B], target_id: PlayerId) -> u32 {
    ballots
        .iter()
        .filter(|b| b.cast_for() == target_id)
        .map(|b| b.vote_weight())
        .sum()
}

pub fn voters_of<B: WeightedVote>(ballots: &[B], target_id: PlayerId) -> Vec<PlayerId> {
    ballots
        .iter()
        .filter(|b| b.cast_for() == target_id)
        .map(|b| b.cast_by())
        .collect()
}
