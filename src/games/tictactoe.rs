//! Tic-tac-toe as a hand-wired propnet.
//!
//! Mirrors the net a game compiler produces for the classic two-role
//! description: 27 cell bases plus two control bases, a `mark` input per
//! cell and role, `noop` inputs, `(next ...)` views in front of every
//! transition, and `(line x)` / `(line o)` / `open` views feeding the
//! terminal and goal propositions.
//!
//! The `noop` inputs drive nothing, so dead-component removal deletes them
//! and a pruned machine ignores `noop` moves.

use crate::core::{Move, NetConfig, Role, Sentence, Term};
use crate::error::BuildError;
use crate::propnet::{ComponentId, NetBuilder, PropNet};

const MARKS: [&str; 3] = ["b", "x", "o"];

/// Rows, columns and diagonals as zero-based `(row, col)` triples.
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// `xplayer`, then `oplayer`.
pub fn roles() -> Vec<Role> {
    vec![Role::new("xplayer"), Role::new("oplayer")]
}

/// `(mark row col)`, one-based.
pub fn mark(row: u8, col: u8) -> Move {
    Move::new(Term::function(
        "mark",
        vec![Term::constant(row.to_string()), Term::constant(col.to_string())],
    ))
}

/// `noop`
pub fn noop() -> Move {
    Move::new(Term::constant("noop"))
}

/// `(true (cell row col mark))`, one-based, `mark` one of `b`, `x`, `o`.
pub fn cell(row: u8, col: u8, mark: &str) -> Sentence {
    Sentence::base(cell_fact(row as usize, col as usize, mark))
}

/// `(true (control role))`
pub fn control(role: &str) -> Sentence {
    Sentence::base(control_fact(role))
}

fn cell_fact(row: usize, col: usize, mark: &str) -> Term {
    Term::function(
        "cell",
        vec![
            Term::constant(row.to_string()),
            Term::constant(col.to_string()),
            Term::constant(mark),
        ],
    )
}

fn control_fact(role: &str) -> Term {
    Term::function("control", vec![Term::constant(role)])
}

/// Build with every optimisation pass.
pub fn build() -> Result<PropNet, BuildError> {
    build_with(&NetConfig::default())
}

/// Build with the given passes.
pub fn build_with(config: &NetConfig) -> Result<PropNet, BuildError> {
    builder()?.build_with(config)
}

/// The unoptimised graph, ready to build.
pub fn builder() -> Result<NetBuilder, BuildError> {
    let roles = roles();
    let mut b = NetBuilder::new(roles.clone());

    // Bases
    let mut cells = [[[ComponentId::new(0); 3]; 3]; 3];
    for (m, mark_name) in MARKS.iter().enumerate() {
        for r in 0..3 {
            for c in 0..3 {
                cells[m][r][c] = b.proposition(Sentence::base(cell_fact(r + 1, c + 1, mark_name)));
            }
        }
    }
    let control_x = b.proposition(control("xplayer"));
    let control_o = b.proposition(control("oplayer"));
    let init = b.proposition(Sentence::proposition("INIT"));

    // Inputs
    let mut does = [[[ComponentId::new(0); 3]; 3]; 2];
    for (p, role) in roles.iter().enumerate() {
        for r in 0..3 {
            for c in 0..3 {
                does[p][r][c] = b.proposition(Sentence::does(role, &mark(r as u8 + 1, c as u8 + 1)));
            }
        }
    }
    for role in &roles {
        b.proposition(Sentence::does(role, &noop()));
    }

    // Legal moves
    let controls = [control_x, control_o];
    for r in 0..3 {
        for c in 0..3 {
            for (role, &turn) in roles.iter().zip(&controls) {
                let playable = b.and(&[cells[0][r][c], turn])?;
                let legal = b.proposition(Sentence::legal(role, &mark(r as u8 + 1, c as u8 + 1)));
                b.connect(playable, legal)?;
            }
        }
    }
    for (role, &waiting_on) in roles.iter().zip(controls.iter().rev()) {
        let legal = b.proposition(Sentence::legal(role, &noop()));
        b.connect(waiting_on, legal)?;
    }

    // Next configuration
    for r in 0..3 {
        for c in 0..3 {
            let (by_x, by_o) = (does[0][r][c], does[1][r][c]);
            let not_x = b.not(by_x)?;
            let not_o = b.not(by_o)?;
            let stays_blank = b.and(&[cells[0][r][c], not_x, not_o])?;
            next_into(&mut b, stays_blank, Some(init), cells[0][r][c], cell_fact(r + 1, c + 1, "b"))?;

            let x = b.or(&[by_x, cells[1][r][c]])?;
            next_into(&mut b, x, None, cells[1][r][c], cell_fact(r + 1, c + 1, "x"))?;

            let o = b.or(&[by_o, cells[2][r][c]])?;
            next_into(&mut b, o, None, cells[2][r][c], cell_fact(r + 1, c + 1, "o"))?;
        }
    }
    next_into(&mut b, control_o, Some(init), control_x, control_fact("xplayer"))?;
    next_into(&mut b, control_x, None, control_o, control_fact("oplayer"))?;

    // Lines and terminal
    let mut line_props = [ComponentId::new(0); 2];
    for (i, m) in [1, 2].into_iter().enumerate() {
        let mut complete = Vec::with_capacity(LINES.len());
        for line in LINES {
            complete.push(b.and(&line.map(|(r, c)| cells[m][r][c]))?);
        }
        let any = b.or(&complete)?;
        let line = b.proposition(Sentence::relation("line", vec![Term::constant(MARKS[m])]));
        b.connect(any, line)?;
        line_props[i] = line;
    }
    let [line_x, line_o] = line_props;

    let blanks: Vec<ComponentId> = cells[0].iter().flatten().copied().collect();
    let any_blank = b.or(&blanks)?;
    let open = b.proposition(Sentence::proposition("open"));
    b.connect(any_blank, open)?;
    let full = b.not(open)?;

    let over = b.or(&[line_x, line_o, full])?;
    let terminal = b.proposition(Sentence::proposition("terminal"));
    b.connect(over, terminal)?;

    // Goals
    let not_x = b.not(line_x)?;
    let not_o = b.not(line_o)?;
    let neither = b.and(&[not_x, not_o])?;
    let outcomes = [(line_x, line_o), (line_o, line_x)];
    for (role, (win, loss)) in roles.iter().zip(outcomes) {
        for (value, source) in [(100, win), (50, neither), (0, loss)] {
            let goal = b.proposition(Sentence::goal(role, value));
            b.connect(source, goal)?;
        }
    }

    Ok(b)
}

/// Wire `source` through a `(next fact)` view, or'ed with `init` if given,
/// into a transition feeding `base`.
fn next_into(
    b: &mut NetBuilder,
    source: ComponentId,
    init: Option<ComponentId>,
    base: ComponentId,
    fact: Term,
) -> Result<(), BuildError> {
    let next = b.proposition(Sentence::next(fact));
    b.connect(source, next)?;
    let feed = match init {
        Some(init) => b.or(&[next, init])?,
        None => next,
    };
    b.transition_into(feed, base)?;
    Ok(())
}
