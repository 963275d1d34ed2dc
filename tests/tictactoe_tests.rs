//! Tic-tac-toe played end to end through the propnet machine.

use propnet_machine::games::tictactoe::{self, cell, control, mark, noop};
use propnet_machine::machine::{PropNetMachine, StateMachine};
use propnet_machine::{Configuration, Move, NetConfig, RoleId};

const X: RoleId = RoleId::new(0);
const O: RoleId = RoleId::new(1);

fn machine() -> PropNetMachine {
    PropNetMachine::new(tictactoe::build().unwrap())
}

/// Play `marks` alternately starting with X; the idle role plays `noop`.
fn play(machine: &mut PropNetMachine, marks: &[(u8, u8)]) -> Configuration {
    let mut state = machine.initial_state();
    for (turn, &(row, col)) in marks.iter().enumerate() {
        assert!(!machine.is_terminal(&state), "game ended before move {}", turn);
        let joint: Vec<Move> = if turn % 2 == 0 {
            vec![mark(row, col), noop()]
        } else {
            vec![noop(), mark(row, col)]
        };
        state = machine.next_state(&state, &joint).unwrap();
    }
    state
}

fn holds(machine: &PropNetMachine, state: &Configuration, name: &propnet_machine::Sentence) -> bool {
    machine.net().describe(state).contains(&name)
}

#[test]
fn test_initial_state() {
    let mut m = machine();
    let start = m.initial_state();

    assert!(!m.is_terminal(&start));
    for row in 1..=3 {
        for col in 1..=3 {
            assert!(holds(&m, &start, &cell(row, col, "b")));
        }
    }
    assert!(holds(&m, &start, &control("xplayer")));
    assert!(!holds(&m, &start, &control("oplayer")));
    assert_eq!(start.true_slots().count(), 10);
}

#[test]
fn test_initial_legal_moves() {
    let mut m = machine();
    let start = m.initial_state();

    let x_moves = m.legal_moves(&start, X).unwrap();
    assert_eq!(x_moves.len(), 9);
    assert!(x_moves.contains(&mark(2, 2)));
    assert!(!x_moves.contains(&noop()));

    assert_eq!(m.legal_moves(&start, O).unwrap(), vec![noop()]);
    assert_eq!(m.goals(&start).unwrap(), vec![50, 50]);
}

#[test]
fn test_turns_alternate() {
    let mut m = machine();
    let state = play(&mut m, &[(2, 2)]);

    assert!(holds(&m, &state, &cell(2, 2, "x")));
    assert!(!holds(&m, &state, &cell(2, 2, "b")));
    assert!(holds(&m, &state, &control("oplayer")));

    assert_eq!(m.legal_moves(&state, X).unwrap(), vec![noop()]);
    let o_moves = m.legal_moves(&state, O).unwrap();
    assert_eq!(o_moves.len(), 8);
    assert!(!o_moves.contains(&mark(2, 2)));
}

#[test]
fn test_x_wins_top_row() {
    let mut m = machine();
    let state = play(&mut m, &[(1, 1), (2, 1), (1, 2), (2, 2), (1, 3)]);

    assert!(m.is_terminal(&state));
    assert_eq!(m.goal(&state, X).unwrap(), 100);
    assert_eq!(m.goal(&state, O).unwrap(), 0);
}

#[test]
fn test_x_wins_diagonal_on_last_move() {
    let mut m = machine();
    let state = play(
        &mut m,
        &[(1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 3), (3, 2), (3, 1), (3, 3)],
    );

    assert!(m.is_terminal(&state));
    assert_eq!(m.goals(&state).unwrap(), vec![100, 0]);
}

#[test]
fn test_draw_on_full_board() {
    let mut m = machine();
    let state = play(
        &mut m,
        &[(1, 1), (2, 2), (3, 3), (1, 3), (3, 1), (2, 1), (2, 3), (3, 2), (1, 2)],
    );

    assert!(m.is_terminal(&state));
    assert_eq!(m.goals(&state).unwrap(), vec![50, 50]);
}

#[test]
fn test_next_states_from_start() {
    let mut m = machine();
    let start = m.initial_state();

    let successors = m.next_states(&start).unwrap();
    assert_eq!(successors.len(), 9);
    for (joint, next) in &successors {
        assert_eq!(joint[1], noop());
        assert!(holds(&m, next, &control("oplayer")));
        assert_eq!(next.true_slots().count(), 10);
    }
}

#[test]
fn test_pruned_and_unpruned_agree() {
    let mut pruned = machine();
    let mut full = PropNetMachine::new(tictactoe::build_with(&NetConfig::unoptimized()).unwrap());
    let moves = [(2, 2), (1, 1), (3, 3), (1, 3), (1, 2)];

    let a = play(&mut pruned, &moves);
    let b = play(&mut full, &moves);
    assert_eq!(a, b, "both nets keep every base in creation order");
    assert_eq!(pruned.is_terminal(&a), full.is_terminal(&b));
    assert_eq!(pruned.goals(&a).unwrap(), full.goals(&b).unwrap());
}
