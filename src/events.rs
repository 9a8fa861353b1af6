use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};

use chrono::Utc;
use log::debug;
use serde::Serialize;
use serde_json::json;

use crate::models::ballot::{BallotRecord, VoteType};
use crate::models::player::PlayerId;
use crate::models::role::Role;

#[derive(Debug, Clone, Serialize)]
pub struct ExecutedPlayer {
    pub id: PlayerId,
    pub name: String,
    // 役職公開が有効な場合のみ入る
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize)]
pub enum VoteEvent {
    VoteStart {
        vote_type: VoteType,
        turn: u32,
        voters: Vec<PlayerId>,
        targets: Vec<PlayerId>,
    },
    RegisterBefore {
        voter_id: PlayerId,
        target_id: PlayerId,
        is_change: bool,
        previous_target: Option<PlayerId>,
    },
    RegisterAfter {
        ballot: BallotRecord,
        is_change: bool,
        previous_target: Option<PlayerId>,
    },
    ChangeBefore {
        voter_id: PlayerId,
        old_target_id: PlayerId,
        new_target_id: PlayerId,
    },
    ChangeAfter {
        ballot: BallotRecord,
    },
    CountBefore {
        vote_type: VoteType,
        turn: u32,
        ballots: Vec<BallotRecord>,
    },
    CountAfter {
        vote_type: VoteType,
        turn: u32,
        counts: HashMap<PlayerId, u32>,
        max_voted: Vec<PlayerId>,
        is_tie: bool,
        needs_runoff: bool,
    },
    RunoffStart {
        turn: u32,
        voters: Vec<PlayerId>,
        candidates: Vec<PlayerId>,
    },
    RunoffResult {
        turn: u32,
        counts: HashMap<PlayerId, u32>,
        max_voted: Vec<PlayerId>,
        is_tie: bool,
        execution_target: Option<PlayerId>,
    },
    ExecutionBefore {
        target_id: PlayerId,
        player_name: String,
        turn: u32,
    },
    ExecutionAfter {
        target_id: PlayerId,
        player_name: String,
        turn: u32,
        role: Option<Role>,
    },
    ExecutionNone {
        turn: u32,
        reason: String,
    },
    ExecutionAllBefore {
        target_ids: Vec<PlayerId>,
        turn: u32,
    },
    ExecutionAllAfter {
        targets: Vec<ExecutedPlayer>,
        turn: u32,
    },
}

impl VoteEvent {
    pub fn name(&self) -> &'static str {
        match self {
            VoteEvent::VoteStart { .. } => "vote.start",
            VoteEvent::RegisterBefore { .. } => "vote.register.before",
            VoteEvent::RegisterAfter { .. } => "vote.register.after",
            VoteEvent::ChangeBefore { .. } => "vote.change.before",
            VoteEvent::ChangeAfter { .. } => "vote.change.after",
            VoteEvent::CountBefore { .. } => "vote.count.before",
            VoteEvent::CountAfter { .. } => "vote.count.after",
            VoteEvent::RunoffStart { .. } => "vote.runoff.start",
            VoteEvent::RunoffResult { .. } => "vote.runoff.result",
            VoteEvent::ExecutionBefore { .. } => "execution.before",
            VoteEvent::ExecutionAfter { .. } => "execution.after",
            VoteEvent::ExecutionNone { .. } => "execution.none",
            VoteEvent::ExecutionAllBefore { .. } => "execution.all.before",
            VoteEvent::ExecutionAllAfter { .. } => "execution.all.after",
        }
    }
}

// ラウンド進行の通知先。購読者ごとにチャンネルを持ち、
// 閉じられた購読者への送信失敗は無視する。
#[derive(Default)]
pub struct NotificationHub {
    subscribers: Vec<Sender<VoteEvent>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<VoteEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&self, event: VoteEvent) {
        let payload = json!({
            "event": event.name(),
            "payload": &event,
            "timestamp": Utc::now().to_rfc3339(),
        });
        debug!("notify {}: {}", event.name(), payload);
        for tx in &self.subscribers {
            let _ = tx.send(event.clone());
        }
    }
}
