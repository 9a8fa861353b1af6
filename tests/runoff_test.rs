use rand::rngs::StdRng;
use rand::SeedableRng;

use vote_engine::interfaces::PlayerRoster;
use vote_engine::services::ballot_box::BallotBox;
use vote_engine::services::runoff::{RunoffCoordinator, RunoffState, DEFAULT_MAX_ATTEMPTS};
use vote_engine::utils::test_setup::setup_test_env;
use vote_engine::{
    DeathCause, ExecutionRule, ExecutionTarget, Player, Roster, VoteError, VoteType, VotingPolicy,
};

fn setup_roster(count: u32) -> Roster {
    let players = (1..=count)
        .map(|id| Player::new(id, format!("Player{}", id)))
        .collect();
    Roster::new(players)
}

#[test]
fn test_needs_runoff_dispatch() {
    println!("Testing needs_runoff dispatch");
    setup_test_env();

    let coordinator = RunoffCoordinator::new();

    // 同数でなければ決選投票は不要
    assert!(!coordinator.needs_runoff(false, ExecutionRule::Runoff));
    // 同数かつ runoff 規則のときだけ必要
    assert!(coordinator.needs_runoff(true, ExecutionRule::Runoff));
    assert!(!coordinator.needs_runoff(true, ExecutionRule::Random));
    assert!(!coordinator.needs_runoff(true, ExecutionRule::NoExecution));
    assert!(!coordinator.needs_runoff(true, ExecutionRule::AllExecution));
}

#[test]
fn test_max_attempts_bounds_runoff() {
    println!("Testing runoff attempt limit");
    setup_test_env();

    let roster = setup_roster(4);
    let mut ballot_box = BallotBox::new();
    let mut coordinator = RunoffCoordinator::new();
    assert_eq!(coordinator.max_attempts(), DEFAULT_MAX_ATTEMPTS);

    // 上限まで開いたあとは needs_runoff が必ず偽になる
    for _ in 0..DEFAULT_MAX_ATTEMPTS {
        assert!(coordinator.needs_runoff(true, ExecutionRule::Runoff));
        coordinator
            .start_runoff(&roster, &mut ballot_box, &[1, 2], 1, VotingPolicy::default())
            .unwrap();
    }
    assert_eq!(coordinator.attempts(), DEFAULT_MAX_ATTEMPTS);
    assert!(!coordinator.needs_runoff(true, ExecutionRule::Runoff));

    coordinator.reset_attempts();
    assert_eq!(coordinator.attempts(), 0);
    assert!(coordinator.needs_runoff(true, ExecutionRule::Runoff));
}

#[test]
fn test_set_max_attempts_ignores_zero() {
    println!("Testing max attempts configuration");
    setup_test_env();

    let mut coordinator = RunoffCoordinator::new();
    coordinator.set_max_attempts(0);
    assert_eq!(coordinator.max_attempts(), DEFAULT_MAX_ATTEMPTS);

    coordinator.set_max_attempts(5);
    assert_eq!(coordinator.max_attempts(), 5);
}

#[test]
fn test_resolve_tie_rules() {
    println!("Testing tie resolution rules");
    setup_test_env();

    let coordinator = RunoffCoordinator::new();
    let tied = vec![3, 5];
    let mut rng = StdRng::seed_from_u64(42);

    assert_eq!(
        coordinator.resolve_tie(&tied, ExecutionRule::NoExecution, &mut rng),
        ExecutionTarget::NoOne
    );
    assert_eq!(
        coordinator.resolve_tie(&tied, ExecutionRule::AllExecution, &mut rng),
        ExecutionTarget::All(vec![3, 5])
    );

    // Random と（上限に達した）Runoff はどちらもランダムに一人を選ぶ
    for rule in [ExecutionRule::Random, ExecutionRule::Runoff] {
        match coordinator.resolve_tie(&tied, rule, &mut rng) {
            ExecutionTarget::Player(id) => assert!(tied.contains(&id)),
            other => panic!("unexpected target: {:?}", other),
        }
    }
}

#[test]
fn test_start_runoff_filters_dead_candidates() {
    println!("Testing dead candidate filtering");
    setup_test_env();

    let mut roster = setup_roster(4);
    roster.kill(2, DeathCause::Attack).unwrap();

    let mut ballot_box = BallotBox::new();
    let mut coordinator = RunoffCoordinator::new();
    let setup = coordinator
        .start_runoff(&roster, &mut ballot_box, &[1, 2], 1, VotingPolicy::default())
        .unwrap();

    // 死亡した2番は候補から外れ、投票者も生存者のみ
    assert_eq!(setup.candidates, 1);
    assert_eq!(setup.voters, 3);
    assert_eq!(ballot_box.voters(), &[1, 3, 4]);
    assert_eq!(ballot_box.targets(), &[1]);
    assert_eq!(ballot_box.vote_type(), Some(VoteType::Runoff));
}

#[test]
fn test_start_runoff_without_candidates() {
    println!("Testing runoff without candidates");
    setup_test_env();

    let mut roster = setup_roster(2);
    roster.kill(1, DeathCause::Attack).unwrap();

    let mut ballot_box = BallotBox::new();
    let mut coordinator = RunoffCoordinator::new();
    let result =
        coordinator.start_runoff(&roster, &mut ballot_box, &[1], 1, VotingPolicy::default());
    assert_eq!(result, Err(VoteError::NoCandidates));
    // 失敗した場合は試行回数を消費しない
    assert_eq!(coordinator.attempts(), 0);
}

#[test]
fn test_state_transitions() {
    println!("Testing runoff state machine");
    setup_test_env();

    let roster = setup_roster(4);
    let mut ballot_box = BallotBox::new();
    let mut coordinator = RunoffCoordinator::new();
    assert_eq!(coordinator.state(), RunoffState::Idle);

    coordinator
        .start_runoff(&roster, &mut ballot_box, &[1, 2], 1, VotingPolicy::default())
        .unwrap();
    assert_eq!(coordinator.state(), RunoffState::Open);

    coordinator.mark_tallied();
    assert_eq!(coordinator.state(), RunoffState::Tallied);

    coordinator.mark_resolved();
    assert_eq!(coordinator.state(), RunoffState::Resolved);

    coordinator.reset_attempts();
    assert_eq!(coordinator.state(), RunoffState::Idle);
}
