use gridiron_game::{
    ChaosOutcome, DiceContext, DiceError, DiceRoll, GameSession, GameState, PlayCall, PlayKind,
    PossessionChange, ResolveError, SessionConfig, Side, choose_play_call, should_trigger,
    validate_dice,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn session_at(state: GameState) -> GameSession {
    GameSession::from_state(SessionConfig::default(), state)
}

#[test]
fn run_with_six_scores_and_kicks_off() {
    let mut session = GameSession::default();
    session.select_play_call(PlayCall::Run).unwrap();
    let outcome = session.resolve(&DiceRoll::d6(6)).unwrap();

    let state = session.state();
    assert_eq!(state.score.home, 7);
    assert_eq!(state.score.away, 0);
    assert_eq!(state.possession, Side::Away);
    assert_eq!(state.ball_on, 75);
    assert_eq!((state.down, state.to_go), (1, 10));
    assert_eq!(state.clock, 290);
    assert_eq!(outcome.summary.kind, PlayKind::Touchdown);
    assert_eq!(outcome.scoreboard.field_label, "DEN 25");
}

#[test]
fn midfield_sack_does_not_trigger_chaos() {
    let start = GameState {
        ball_on: 50,
        ..GameState::default()
    };
    assert!(!should_trigger(&start, PlayCall::Pass));

    let mut session = session_at(start);
    session.select_play_call(PlayCall::Pass).unwrap();
    let outcome = session.resolve(&DiceRoll::d6(1)).unwrap();

    let state = session.state();
    assert!(!outcome.summary.chaos_pending);
    assert!(!state.expecting_chaos);
    assert_eq!(state.ball_on, 44);
    assert_eq!(state.to_go, 16);
    assert_eq!(state.down, 2);
    assert_eq!(state.clock, 272);
}

#[test]
fn own_territory_sack_awaits_chaos_then_turns_over() {
    let mut session = session_at(GameState {
        ball_on: 20,
        ..GameState::default()
    });
    session.select_play_call(PlayCall::Run).unwrap();
    let first = session.resolve(&DiceRoll::d6(1)).unwrap();
    assert!(first.summary.chaos_pending);
    assert!(session.state().expecting_chaos);
    assert!(first.scoreboard.expecting_chaos);

    // The chaos step insists on the d20 and nothing else.
    let before = session.state().clone();
    let err = session.resolve(&DiceRoll::d6(6)).unwrap_err();
    assert_eq!(err, ResolveError::Dice(DiceError::MissingChaosD20));
    assert_eq!(session.state(), &before);

    let second = session.resolve(&DiceRoll::chaos(1)).unwrap();
    assert_eq!(second.summary.kind, PlayKind::Chaos(ChaosOutcome::Turnover));
    assert_eq!(
        second.summary.possession_change,
        Some(PossessionChange::Turnover)
    );
    let state = session.state();
    assert_eq!(state.possession, Side::Away);
    assert_eq!(state.ball_on, 75);
    assert!(state.last_was_turnover);
    assert!(!state.expecting_chaos);
    assert!(state.pending_play_call.is_none());
}

#[test]
fn thirty_yard_field_goal_attempt() {
    let mut session = session_at(GameState {
        ball_on: 70,
        ..GameState::default()
    });
    assert_eq!(gridiron_game::kick_distance(session.state()), 47);
    assert_eq!(gridiron_game::needed_roll(47), 11);

    session.select_play_call(PlayCall::FieldGoal).unwrap();
    let err = session.resolve(&DiceRoll::d6(3).with_d10(2)).unwrap_err();
    assert_eq!(err, ResolveError::Dice(DiceError::MissingFieldGoalD20));

    let outcome = session
        .resolve(&DiceRoll::d6(3).with_d10(2).with_d20(15))
        .unwrap();
    assert_eq!(outcome.summary.kind, PlayKind::FieldGoal { made: true });
    let state = session.state();
    assert_eq!(state.score.home, 3);
    assert_eq!(state.possession, Side::Away);
    assert_eq!(state.ball_on, 75);
}

#[test]
fn cpu_goes_for_it_on_fourth_and_three() {
    let state = GameState {
        possession: Side::Away,
        ball_on: 40,
        down: 4,
        to_go: 3,
        ..GameState::default()
    };
    assert_eq!(state.distance_to_score(), 40);
    let mut rng = SmallRng::seed_from_u64(5);
    assert_eq!(choose_play_call(&state, 0.48, &mut rng), PlayCall::Pass);

    let mut session = session_at(state);
    assert_eq!(session.cpu_hint(), Some(PlayCall::Pass));
}

#[test]
fn new_game_always_restores_kickoff() {
    let mut session = session_at(GameState {
        ball_on: 63,
        possession: Side::Away,
        quarter: 3,
        clock: 41,
        expecting_chaos: true,
        pending_play_call: Some(PlayCall::Pass),
        ..GameState::default()
    });
    session.new_game();
    let state = session.state();
    assert_eq!(state.ball_on, 25);
    assert_eq!((state.down, state.to_go), (1, 10));
    assert_eq!(state.possession, Side::Home);
    assert_eq!((state.score.home, state.score.away), (0, 0));
    assert_eq!(state.quarter, 1);
    assert_eq!(state.clock, 300);
    assert!(!state.expecting_chaos);
    assert!(state.pending_play_call.is_none());
}

#[test]
fn validator_is_idempotent() {
    let contexts = [
        DiceContext {
            expecting_chaos: false,
            play_call: Some(PlayCall::Run),
        },
        DiceContext {
            expecting_chaos: false,
            play_call: Some(PlayCall::FieldGoal),
        },
        DiceContext {
            expecting_chaos: true,
            play_call: Some(PlayCall::Pass),
        },
    ];
    let rolls = [
        DiceRoll::parse("", "", ""),
        DiceRoll::parse("4", "", ""),
        DiceRoll::parse("5", "9", ""),
        DiceRoll::parse("2", "", "17"),
    ];
    for ctx in contexts {
        for roll in &rolls {
            assert_eq!(validate_dice(roll, ctx), validate_dice(roll, ctx));
        }
    }
}
