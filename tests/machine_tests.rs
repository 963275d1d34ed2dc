//! Machine-level properties: determinism, idempotent forcing, error
//! reporting, topology, elision transparency and the interchange format.

use propnet_machine::games::tictactoe::{self, mark, noop};
use propnet_machine::machine::{PropNetMachine, StateMachine};
use propnet_machine::{
    BuildError, ComponentId, GameRng, MachineConfig, MachineError, NetBuilder, NetConfig,
    NetDescription, PropNet, Role, RoleId, Sentence,
};

fn sentence(s: &str) -> Sentence {
    s.parse().unwrap()
}

/// One role, one base `p` switched on by `go`. `terminal` reads `p`
/// through the view `seen`, so elision has something to remove.
fn switch(goals: &[(u32, bool)]) -> NetBuilder {
    let mut b = NetBuilder::new(vec![Role::new("robot")]);
    let p = b.proposition(sentence("(true p)"));
    let go = b.proposition(sentence("(does robot go)"));
    b.proposition(sentence("INIT"));

    let next = b.or(&[p, go]).unwrap();
    b.transition_into(next, p).unwrap();

    let seen = b.proposition(sentence("seen"));
    b.connect(p, seen).unwrap();
    let terminal = b.proposition(sentence("terminal"));
    b.connect(seen, terminal).unwrap();
    let still = b.not(p).unwrap();

    let legal = b.proposition(sentence("(legal robot go)"));
    b.connect(still, legal).unwrap();

    for &(value, when_on) in goals {
        let goal = b.proposition(Sentence::goal(&Role::new("robot"), value));
        b.connect(if when_on { p } else { still }, goal).unwrap();
    }
    b
}

fn go() -> propnet_machine::Move {
    "go".parse().unwrap()
}

#[test]
fn test_queries_are_history_independent() {
    let mut m = PropNetMachine::new(tictactoe::build().unwrap());
    let start = m.initial_state();
    let after = m.next_state(&start, &[mark(1, 1), noop()]).unwrap();

    let fresh = m.legal_moves(&after, RoleId::new(1)).unwrap();
    m.legal_moves(&start, RoleId::new(0)).unwrap();
    m.next_state(&after, &[noop(), mark(3, 3)]).unwrap();
    assert_eq!(m.legal_moves(&after, RoleId::new(1)).unwrap(), fresh);
    assert_eq!(m.next_state(&start, &[mark(1, 1), noop()]).unwrap(), after);
}

#[test]
fn test_identical_machines_agree() {
    let mut a = PropNetMachine::new(tictactoe::build().unwrap());
    let mut b = PropNetMachine::new(tictactoe::build().unwrap());
    let mut rng_a = GameRng::new(99);
    let mut rng_b = GameRng::new(99);

    let mut sa = a.initial_state();
    let mut sb = b.initial_state();
    assert_eq!(sa, sb);
    while !a.is_terminal(&sa) {
        let ja = a.random_joint_move(&sa, &mut rng_a).unwrap();
        let jb = b.random_joint_move(&sb, &mut rng_b).unwrap();
        assert_eq!(ja, jb);
        sa = a.next_state(&sa, &ja).unwrap();
        sb = b.next_state(&sb, &jb).unwrap();
        assert_eq!(sa, sb);
    }
    assert!(b.is_terminal(&sb));
    assert_eq!(a.goals(&sa).unwrap(), b.goals(&sb).unwrap());
}

#[test]
fn test_reforcing_evaluates_nothing() {
    let mut m = PropNetMachine::new(tictactoe::build().unwrap());
    let start = m.initial_state();
    let state = m.next_state(&start, &[mark(2, 2), noop()]).unwrap();

    m.is_terminal(&state);
    let before = m.propagation_stats();
    m.is_terminal(&state);
    m.legal_moves(&state, RoleId::new(1)).unwrap();
    m.goal(&state, RoleId::new(0)).unwrap();
    let after = m.propagation_stats();

    assert_eq!(after.rounds, before.rounds + 3);
    assert_eq!(after.evaluated, before.evaluated);
    assert_eq!(after.changed, before.changed);
}

#[test]
fn test_goal_must_be_unique() {
    let net = switch(&[(0, false), (50, false), (100, true)]).build().unwrap();
    let mut m = PropNetMachine::new(net);
    let start = m.initial_state();

    match m.goal(&start, RoleId::new(0)) {
        Err(MachineError::GoalDefinition {
            role,
            configuration,
            true_goals,
        }) => {
            assert_eq!(role, RoleId::new(0));
            assert_eq!(configuration, start);
            assert_eq!(true_goals, 2);
        }
        other => panic!("expected a goal definition error, got {:?}", other),
    }

    let on = m.next_state(&start, &[go()]).unwrap();
    assert_eq!(m.goal(&on, RoleId::new(0)).unwrap(), 100);
}

#[test]
fn test_missing_goal_reported() {
    let net = switch(&[(100, true)]).build().unwrap();
    let mut m = PropNetMachine::new(net);
    let start = m.initial_state();

    assert!(matches!(
        m.goal(&start, RoleId::new(0)),
        Err(MachineError::GoalDefinition { true_goals: 0, .. })
    ));
}

#[test]
fn test_joint_move_shape() {
    let mut m = PropNetMachine::new(tictactoe::build().unwrap());
    let start = m.initial_state();

    assert_eq!(
        m.next_state(&start, &[mark(1, 1)]),
        Err(MachineError::JointMoveShape {
            expected: 2,
            got: 1
        })
    );
    assert_eq!(
        m.next_state(&start, &[mark(1, 1), noop(), noop()]),
        Err(MachineError::JointMoveShape {
            expected: 2,
            got: 3
        })
    );
}

#[test]
fn test_unknown_role() {
    let mut m = PropNetMachine::new(tictactoe::build().unwrap());
    let start = m.initial_state();
    assert_eq!(
        m.legal_moves(&start, RoleId::new(2)),
        Err(MachineError::UnknownRole(RoleId::new(2)))
    );
    assert_eq!(m.role_id(&Role::new("oplayer")), Some(RoleId::new(1)));
}

#[test]
fn test_topology_sound() {
    for config in [NetConfig::default(), NetConfig::unoptimized()] {
        let net = tictactoe::build_with(&config).unwrap();
        net.check_topology().unwrap();

        for (slot, component) in net.components().iter().enumerate() {
            if component.is_transition() {
                continue;
            }
            let id = ComponentId::new(slot as u32);
            for out in &component.outputs {
                assert!(net.rank(id) < net.rank(*out));
            }
        }
    }
}

#[test]
fn test_elision_is_transparent() {
    let elided = switch(&[(100, true)])
        .build_with(&NetConfig::default().with_prune_disconnected(false))
        .unwrap();
    let kept = switch(&[(100, true)]).build_with(&NetConfig::unoptimized()).unwrap();
    assert_eq!(elided.stats().views_elided, 1);
    assert_eq!(elided.len() + 1, kept.len());

    let run = |net: PropNet| {
        let mut m = PropNetMachine::new(net);
        let start = m.initial_state();
        let on = m.next_state(&start, &[go()]).unwrap();
        (
            m.is_terminal(&start),
            m.is_terminal(&on),
            m.legal_moves(&start, RoleId::new(0)).unwrap(),
            m.goal(&on, RoleId::new(0)).unwrap(),
            on,
        )
    };
    assert_eq!(run(elided), run(kept));
}

#[test]
fn test_description_json_round_trip() {
    let description = tictactoe::builder().unwrap().to_description();
    let json = serde_json::to_string(&description).unwrap();
    let decoded: NetDescription = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, description);

    let mut m = PropNetMachine::new(decoded.build_with(&NetConfig::default()).unwrap());
    let mut state = m.initial_state();
    for (i, &(row, col)) in [(1, 1), (2, 1), (1, 2), (2, 2), (1, 3)].iter().enumerate() {
        let joint = if i % 2 == 0 {
            vec![mark(row, col), noop()]
        } else {
            vec![noop(), mark(row, col)]
        };
        state = m.next_state(&state, &joint).unwrap();
    }
    assert!(m.is_terminal(&state));
    assert_eq!(m.goals(&state).unwrap(), vec![100, 0]);
}

#[test]
fn test_description_rejects_dangling_edge() {
    let mut description = tictactoe::builder().unwrap().to_description();
    let n = description.components.len() as u32;
    description.edges.push((0, n));
    assert_eq!(
        description.into_builder().unwrap_err(),
        BuildError::UnknownComponent(n)
    );
}

#[test]
fn test_verified_rounds_match() {
    let config = MachineConfig::default().with_verify_rounds(true);
    let mut m = PropNetMachine::with_config(tictactoe::build().unwrap(), config);
    let mut rng = GameRng::new(5);

    for _ in 0..20 {
        let mut state = m.initial_state();
        while !m.is_terminal(&state) {
            let joint = m.random_joint_move(&state, &mut rng).unwrap();
            state = m.next_state(&state, &joint).unwrap();
        }
        m.goals(&state).unwrap();
    }
    assert_eq!(m.round_mismatches(), 0);
    assert!(m.verified_rounds() > 0);
}

#[test]
fn test_remove_component_before_build() {
    let mut b = switch(&[(100, true)]);
    let init = b
        .graph()
        .ids()
        .find(|&id| b.graph().get(id).and_then(|c| c.name()) == Some(&sentence("INIT")))
        .unwrap();
    assert_eq!(
        b.remove_component(init),
        Err(BuildError::Irremovable(sentence("INIT")))
    );

    let seen = b
        .graph()
        .ids()
        .find(|&id| b.graph().get(id).and_then(|c| c.name()) == Some(&sentence("seen")))
        .unwrap();
    b.remove_component(seen).unwrap();
    assert!(matches!(b.build(), Err(BuildError::NoLegalPropositions(_))));
}

#[test]
fn test_configs_round_trip() {
    let config = MachineConfig::default()
        .with_verify_rounds(true)
        .with_max_playout_depth(64);
    let json = serde_json::to_string(&config).unwrap();
    let decoded: MachineConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, config);

    let net_config = NetConfig::default().with_elide_views(false);
    let json = serde_json::to_string(&net_config).unwrap();
    assert_eq!(serde_json::from_str::<NetConfig>(&json).unwrap(), net_config);
}
