pub mod errors;
pub mod events;
pub mod interfaces;
pub mod models;
pub mod services;
pub mod utils;

pub use errors::{ErrorCategory, VoteError};
pub use events::{NotificationHub, VoteEvent};
pub use models::ballot::{Ballot, BallotRecord, VoteType, VoteWeight};
pub use models::phase::GamePhase;
pub use models::player::{DeathCause, Player, PlayerId, Roster};
pub use models::policy::{ExecutionRule, VotingPolicy};
pub use models::role::Role;
pub use services::execution::{ExecutionDecision, ExecutionReport, ExecutionTarget};
pub use services::vote_facade::{RoundInfo, VoteFacade, VoteOutcome};
