//! Single-role counter: terminal exactly at the final step, goal rising
//! with every move.

use propnet_machine::games::counter::{self, count, step, CounterBuilder};
use propnet_machine::machine::{Deadline, PropNetMachine, StateMachine};
use propnet_machine::{GameRng, MachineConfig, MachineError, NetConfig, RoleId};

const PLAYER: RoleId = RoleId::new(0);

#[test]
fn test_terminal_exactly_at_last_step() {
    for steps in [1, 3, 7] {
        let mut m = PropNetMachine::new(counter::build(steps).unwrap());
        let mut state = m.initial_state();

        for k in 0..steps {
            assert!(!m.is_terminal(&state), "terminal early at step {} of {}", k, steps);
            assert_eq!(m.legal_moves(&state, PLAYER).unwrap(), vec![count()]);
            state = m.next_state(&state, &[count()]).unwrap();
        }
        assert!(m.is_terminal(&state));
        assert_eq!(m.goal(&state, PLAYER).unwrap(), 100);
    }
}

#[test]
fn test_goal_monotonic() {
    let mut m = PropNetMachine::new(counter::build(6).unwrap());
    let mut state = m.initial_state();
    let mut last = m.goal(&state, PLAYER).unwrap();
    assert_eq!(last, 0);

    while !m.is_terminal(&state) {
        state = m.next_state(&state, &[count()]).unwrap();
        let goal = m.goal(&state, PLAYER).unwrap();
        assert!(goal > last, "goal went from {} to {}", last, goal);
        last = goal;
    }
}

#[test]
fn test_exactly_one_step_holds() {
    let mut m = PropNetMachine::new(counter::build(4).unwrap());
    let mut state = m.initial_state();

    for k in 0..=4 {
        assert_eq!(state.true_slots().count(), 1);
        assert!(m.net().describe(&state).contains(&&step(k)));
        if k < 4 {
            state = m.next_state(&state, &[count()]).unwrap();
        }
    }
}

#[test]
fn test_no_moves_at_terminal() {
    let mut m = PropNetMachine::new(counter::build(1).unwrap());
    let start = m.initial_state();
    let end = m.next_state(&start, &[count()]).unwrap();

    assert!(matches!(
        m.legal_moves(&end, PLAYER),
        Err(MachineError::NoLegalMoves { role: PLAYER, .. })
    ));
}

#[test]
fn test_depth_charge() {
    let net = counter::build(5).unwrap();
    let mut m = PropNetMachine::new(net);
    let start = m.initial_state();
    let mut rng = GameRng::new(42);

    let playout = m.playout(&start, &mut rng, &Deadline::none()).unwrap();
    assert!(playout.terminal);
    assert_eq!(playout.depth, 5);
    assert_eq!(m.goal(&playout.state, PLAYER).unwrap(), 100);
}

#[test]
fn test_playout_depth_limit() {
    let net = counter::build(5).unwrap();
    let config = MachineConfig::default().with_max_playout_depth(2);
    let mut m = PropNetMachine::with_config(net, config);
    let start = m.initial_state();
    let mut rng = GameRng::new(42);

    let playout = m.playout(&start, &mut rng, &Deadline::none()).unwrap();
    assert!(!playout.terminal);
    assert_eq!(playout.depth, 2);
    assert_eq!(m.goal(&playout.state, PLAYER).unwrap(), 40);
}

#[test]
fn test_island_does_not_change_answers() {
    let with_island = CounterBuilder::new().steps(3).island(true);
    let mut pruned = PropNetMachine::new(with_island.build_with(&NetConfig::default()).unwrap());
    let mut full = PropNetMachine::new(with_island.build_with(&NetConfig::unoptimized()).unwrap());

    let mut a = pruned.initial_state();
    let mut b = full.initial_state();
    loop {
        assert_eq!(pruned.is_terminal(&a), full.is_terminal(&b));
        assert_eq!(pruned.goal(&a, PLAYER).unwrap(), full.goal(&b, PLAYER).unwrap());

        let names_a = pruned.net().describe(&a);
        let names_b: Vec<_> = full
            .net()
            .describe(&b)
            .into_iter()
            .filter(|name| pruned.net().base(name).is_some())
            .collect();
        assert_eq!(names_a, names_b);

        if pruned.is_terminal(&a) {
            break;
        }
        a = pruned.next_state(&a, &[count()]).unwrap();
        b = full.next_state(&b, &[count()]).unwrap();
    }
}
