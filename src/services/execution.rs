use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::errors::VoteError;
use crate::events::{ExecutedPlayer, NotificationHub, VoteEvent};
use crate::interfaces::PlayerRoster;
use crate::models::player::{DeathCause, PlayerId};
use crate::models::policy::{ExecutionRule, VotingPolicy};
use crate::services::tally::TallyResult;

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionTarget {
    Player(PlayerId),
    // 同数だった候補全員
    All(Vec<PlayerId>),
    NoOne,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionDecision {
    NeedsRunoff { candidates: Vec<PlayerId> },
    Decided(ExecutionTarget),
}

pub fn decide<R: Rng>(
    tally: &TallyResult,
    rule: ExecutionRule,
    rng: &mut R,
) -> ExecutionDecision {
    if tally.max_voted.is_empty() {
        // 票がなければ処刑もない
        return ExecutionDecision::Decided(ExecutionTarget::NoOne);
    }
    if !tally.is_tie() {
        return ExecutionDecision::Decided(ExecutionTarget::Player(tally.max_voted[0]));
    }
    match rule {
        ExecutionRule::Runoff => ExecutionDecision::NeedsRunoff {
            candidates: tally.max_voted.clone(),
        },
        ExecutionRule::Random => match tally.max_voted.choose(rng) {
            Some(id) => ExecutionDecision::Decided(ExecutionTarget::Player(*id)),
            None => ExecutionDecision::Decided(ExecutionTarget::NoOne),
        },
        ExecutionRule::NoExecution => ExecutionDecision::Decided(ExecutionTarget::NoOne),
        ExecutionRule::AllExecution => {
            ExecutionDecision::Decided(ExecutionTarget::All(tally.max_voted.clone()))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    pub executed: Vec<ExecutedPlayer>,
}

impl ExecutionReport {
    pub fn count(&self) -> usize {
        self.executed.len()
    }
}

// 処刑の適用。名簿への書き込みはここからの kill だけが行う。
pub fn apply(
    roster: &mut dyn PlayerRoster,
    hub: &NotificationHub,
    policy: &VotingPolicy,
    turn: u32,
    target: ExecutionTarget,
) -> Result<ExecutionReport, VoteError> {
    match target {
        ExecutionTarget::NoOne => {
            hub.emit(VoteEvent::ExecutionNone {
                turn,
                reason: "処刑は行われませんでした".to_string(),
            });
            info!("no execution on turn {}", turn);
            Ok(ExecutionReport::default())
        }
        ExecutionTarget::Player(target_id) => {
            let player = roster
                .get_player(target_id)
                .ok_or(VoteError::InvalidTarget(target_id))?;
            if player.is_dead {
                return Err(VoteError::AlreadyDead(target_id));
            }
            let name = player.name.clone();
            let role = if policy.reveal_role_on_death {
                Some(player.role.clone())
            } else {
                None
            };

            hub.emit(VoteEvent::ExecutionBefore {
                target_id,
                player_name: name.clone(),
                turn,
            });
            roster.kill(target_id, DeathCause::Execution)?;
            info!("player {} executed on turn {}", target_id, turn);
            hub.emit(VoteEvent::ExecutionAfter {
                target_id,
                player_name: name.clone(),
                turn,
                role: role.clone(),
            });

            Ok(ExecutionReport {
                executed: vec![ExecutedPlayer {
                    id: target_id,
                    name,
                    role,
                }],
            })
        }
        ExecutionTarget::All(candidates) => {
            if candidates.is_empty() {
                return Err(VoteError::NoCandidates);
            }
            // 生存している候補だけを処刑する
            let alive: Vec<PlayerId> = candidates
                .iter()
                .copied()
                .filter(|id| roster.get_player(*id).map(|p| !p.is_dead).unwrap_or(false))
                .collect();

            hub.emit(VoteEvent::ExecutionAllBefore {
                target_ids: alive.clone(),
                turn,
            });

            let mut executed = Vec::new();
            for target_id in alive {
                let (name, role) = match roster.get_player(target_id) {
                    Some(p) => (
                        p.name.clone(),
                        if policy.reveal_role_on_death {
                            Some(p.role.clone())
                        } else {
                            None
                        },
                    ),
                    None => continue,
                };
                if let Err(e) = roster.kill(target_id, DeathCause::Execution) {
                    // 途中で死亡した候補は読み飛ばす
                    warn!("skipping candidate {}: {}", target_id, e);
                    continue;
                }
                executed.push(ExecutedPlayer {
                    id: target_id,
                    name,
                    role,
                });
            }
            info!("{} players executed on turn {}", executed.len(), turn);
            hub.emit(VoteEvent::ExecutionAllAfter {
                targets: executed.clone(),
                turn,
            });

            Ok(ExecutionReport { executed })
        }
    }
}
