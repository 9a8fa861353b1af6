use std::collections::HashMap;

use serde::Serialize;

use crate::models::ballot::{Ballot, BallotRecord, VoteType};
use crate::models::player::PlayerId;
use crate::services::tally;

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    // 記録順の通し番号。時刻が同じでも呼び出し順が保たれる。
    pub seq: usize,
    pub record: BallotRecord,
}

// 追記専用の投票履歴。投票の変更は上書きではなく新しいエントリになる。
#[derive(Default)]
pub struct AuditLog {
    entries: Vec<HistoryEntry>,
    by_turn: HashMap<u32, HashMap<VoteType, Vec<usize>>>,
    by_voter: HashMap<PlayerId, Vec<usize>>,
    by_target: HashMap<PlayerId, Vec<usize>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeSummary {
    // 投票者ごとに最新の一票へ絞ったもの
    pub votes: Vec<BallotRecord>,
    pub counts: HashMap<PlayerId, u32>,
    pub max_count: u32,
    pub max_voted: Vec<PlayerId>,
    pub is_tie: bool,
}

impl TypeSummary {
    pub fn winner(&self) -> Option<PlayerId> {
        if self.is_tie {
            None
        } else {
            self.max_voted.first().copied()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnSummary {
    pub turn: u32,
    pub by_type: HashMap<VoteType, TypeSummary>,
    pub execution_target: Option<PlayerId>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, ballot: &Ballot) {
        let record = ballot.to_record();
        let seq = self.entries.len();
        self.by_turn
            .entry(record.turn)
            .or_default()
            .entry(record.vote_type)
            .or_default()
            .push(seq);
        self.by_voter.entry(record.voter_id).or_default().push(seq);
        self.by_target.entry(record.target_id).or_default().push(seq);
        self.entries.push(HistoryEntry { seq, record });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn query_by_turn(&self, turn: u32, vote_type: Option<VoteType>) -> Vec<&BallotRecord> {
        match self.by_turn.get(&turn) {
            Some(buckets) => {
                let mut seqs: Vec<usize> = buckets
                    .iter()
                    .filter(|(t, _)| vote_type.map(|want| **t == want).unwrap_or(true))
                    .flat_map(|(_, seqs)| seqs.iter().copied())
                    .collect();
                seqs.sort_unstable();
                seqs.into_iter().map(|s| &self.entries[s].record).collect()
            }
            None => Vec::new(),
        }
    }

    pub fn query_by_voter(&self, voter_id: PlayerId) -> Vec<&BallotRecord> {
        self.by_voter
            .get(&voter_id)
            .map(|seqs| seqs.iter().map(|s| &self.entries[*s].record).collect())
            .unwrap_or_default()
    }

    pub fn query_by_target(&self, target_id: PlayerId) -> Vec<&BallotRecord> {
        self.by_target
            .get(&target_id)
            .map(|seqs| seqs.iter().map(|s| &self.entries[*s].record).collect())
            .unwrap_or_default()
    }

    // そのターンに現れた投票種別ごとの集計。投票者ごとに最新の一票だけを
    // 数える。決選投票の結果があれば処刑投票より優先する。
    pub fn summarize(&self, turn: u32) -> TurnSummary {
        let mut by_type = HashMap::new();

        if let Some(buckets) = self.by_turn.get(&turn) {
            for (vote_type, seqs) in buckets {
                // 投票者ごとの最新。初出順は保つ。
                let mut latest: Vec<BallotRecord> = Vec::new();
                for seq in seqs {
                    let record = &self.entries[*seq].record;
                    match latest.iter_mut().find(|r| r.voter_id == record.voter_id) {
                        Some(existing) => {
                            if record.timestamp >= existing.timestamp {
                                *existing = record.clone();
                            }
                        }
                        None => latest.push(record.clone()),
                    }
                }

                let result = tally::count(&latest);
                by_type.insert(
                    *vote_type,
                    TypeSummary {
                        max_count: result.max_count(),
                        is_tie: result.is_tie(),
                        counts: result.counts,
                        max_voted: result.max_voted,
                        votes: latest,
                    },
                );
            }
        }

        let execution_target = by_type
            .get(&VoteType::Runoff)
            .or_else(|| by_type.get(&VoteType::Execution))
            .and_then(|summary| summary.winner());

        TurnSummary {
            turn,
            by_type,
            execution_target,
        }
    }
}
