//! Proposition names: terms, sentences and moves.
//!
//! Names use the prefix form produced by the game compiler:
//!
//! - `terminal`, `INIT` are bare propositions
//! - `(legal xplayer (mark 1 1))` is a relation whose body is a list of terms
//! - a term is either a constant (`xplayer`, `1`) or a function (`(mark 1 1)`)
//!
//! The reader in this module only understands that prefix form. It is used
//! for proposition names in descriptions and tests, never for rule text.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use super::role::Role;

/// Errors reading a sentence or term from its textual form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input ended before the expression was complete.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// A `)` appeared where an expression was expected.
    #[error("unexpected ')' at offset {0}")]
    UnexpectedClose(usize),

    /// A list started with something other than a constant.
    #[error("list at offset {0} must start with a constant name")]
    BadHead(usize),

    /// Extra characters after a complete expression.
    #[error("trailing input at offset {0}")]
    Trailing(usize),
}

/// A ground term: constant or function application.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Term {
    /// A bare constant such as `xplayer` or `100`.
    Constant(String),
    /// A function term such as `(mark 1 1)`.
    Function { name: String, body: Vec<Term> },
}

impl Term {
    /// Create a constant term.
    pub fn constant(name: impl Into<String>) -> Self {
        Term::Constant(name.into())
    }

    /// Create a function term.
    pub fn function(name: impl Into<String>, body: Vec<Term>) -> Self {
        Term::Function {
            name: name.into(),
            body,
        }
    }

    /// The constant's text, if this is a constant.
    #[must_use]
    pub fn as_constant(&self) -> Option<&str> {
        match self {
            Term::Constant(c) => Some(c),
            Term::Function { .. } => None,
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Constant(c) => f.write_str(c),
            Term::Function { name, body } => write_list(f, name, body),
        }
    }
}

/// A proposition name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sentence {
    /// A zero-arity proposition (`terminal`, `INIT`, `open`).
    Proposition(String),
    /// A relation with a body (`(goal xplayer 100)`).
    Relation { name: String, body: Vec<Term> },
}

impl Sentence {
    /// Create a zero-arity proposition name.
    pub fn proposition(name: impl Into<String>) -> Self {
        Sentence::Proposition(name.into())
    }

    /// Create a relation name.
    pub fn relation(name: impl Into<String>, body: Vec<Term>) -> Self {
        Sentence::Relation {
            name: name.into(),
            body,
        }
    }

    /// `(does <role> <move>)`
    pub fn does(role: &Role, mv: &Move) -> Self {
        Sentence::relation("does", vec![Term::constant(role.name()), mv.term().clone()])
    }

    /// `(legal <role> <move>)`
    pub fn legal(role: &Role, mv: &Move) -> Self {
        Sentence::relation("legal", vec![Term::constant(role.name()), mv.term().clone()])
    }

    /// `(goal <role> <value>)`
    pub fn goal(role: &Role, value: u32) -> Self {
        Sentence::relation(
            "goal",
            vec![Term::constant(role.name()), Term::constant(value.to_string())],
        )
    }

    /// `(true <fact>)`
    pub fn base(fact: Term) -> Self {
        Sentence::relation("true", vec![fact])
    }

    /// `(next <fact>)`
    pub fn next(fact: Term) -> Self {
        Sentence::relation("next", vec![fact])
    }

    /// The relation or proposition name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Sentence::Proposition(name) | Sentence::Relation { name, .. } => name,
        }
    }

    /// The argument list (empty for propositions).
    #[must_use]
    pub fn body(&self) -> &[Term] {
        match self {
            Sentence::Proposition(_) => &[],
            Sentence::Relation { body, .. } => body,
        }
    }

    /// Argument `i`, if present.
    #[must_use]
    pub fn arg(&self, i: usize) -> Option<&Term> {
        self.body().get(i)
    }

    /// True for a relation called `name` with exactly `arity` arguments.
    #[must_use]
    pub fn is_relation(&self, name: &str, arity: usize) -> bool {
        matches!(self, Sentence::Relation { name: n, body } if n == name && body.len() == arity)
    }

    /// True for the zero-arity proposition `name`.
    #[must_use]
    pub fn is_proposition(&self, name: &str) -> bool {
        matches!(self, Sentence::Proposition(n) if n == name)
    }
}

impl std::fmt::Display for Sentence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentence::Proposition(name) => f.write_str(name),
            Sentence::Relation { name, body } => write_list(f, name, body),
        }
    }
}

/// An action a role may take: the body of its `legal` / `does` propositions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Move(Term);

impl Move {
    /// Wrap a term as a move.
    pub fn new(term: Term) -> Self {
        Self(term)
    }

    /// The move's term.
    #[must_use]
    pub fn term(&self) -> &Term {
        &self.0
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Move)
    }
}

fn write_list(f: &mut std::fmt::Formatter<'_>, name: &str, body: &[Term]) -> std::fmt::Result {
    write!(f, "({}", name)?;
    for term in body {
        write!(f, " {}", term)?;
    }
    f.write_str(")")
}

// === Reader ===

#[derive(Debug)]
enum Expr {
    Atom(String),
    List(Vec<Expr>, usize),
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn skip_ws(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        self.skip_ws();
        let start = self.pos;
        match self.src[self.pos..].chars().next() {
            None => Err(ParseError::UnexpectedEnd),
            Some(')') => Err(ParseError::UnexpectedClose(start)),
            Some('(') => {
                self.pos += 1;
                let mut items = Vec::new();
                loop {
                    self.skip_ws();
                    match self.src[self.pos..].chars().next() {
                        None => return Err(ParseError::UnexpectedEnd),
                        Some(')') => {
                            self.pos += 1;
                            return Ok(Expr::List(items, start));
                        }
                        Some(_) => items.push(self.expr()?),
                    }
                }
            }
            Some(_) => {
                let rest = &self.src[self.pos..];
                let len = rest
                    .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
                    .unwrap_or(rest.len());
                self.pos += len;
                Ok(Expr::Atom(rest[..len].to_string()))
            }
        }
    }

    fn finish(mut self) -> Result<(), ParseError> {
        self.skip_ws();
        if self.pos < self.src.len() {
            Err(ParseError::Trailing(self.pos))
        } else {
            Ok(())
        }
    }
}

fn split_head(items: Vec<Expr>, offset: usize) -> Result<(String, Vec<Expr>), ParseError> {
    let mut items = items.into_iter();
    match items.next() {
        Some(Expr::Atom(name)) => Ok((name, items.collect())),
        _ => Err(ParseError::BadHead(offset)),
    }
}

fn term_from_expr(expr: Expr) -> Result<Term, ParseError> {
    match expr {
        Expr::Atom(name) => Ok(Term::Constant(name)),
        Expr::List(items, offset) => {
            let (name, rest) = split_head(items, offset)?;
            let body = rest
                .into_iter()
                .map(term_from_expr)
                .collect::<Result<_, _>>()?;
            Ok(Term::Function { name, body })
        }
    }
}

impl FromStr for Term {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut reader = Reader::new(s);
        let expr = reader.expr()?;
        reader.finish()?;
        term_from_expr(expr)
    }
}

impl FromStr for Sentence {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut reader = Reader::new(s);
        let expr = reader.expr()?;
        reader.finish()?;
        match expr {
            Expr::Atom(name) => Ok(Sentence::Proposition(name)),
            Expr::List(items, offset) => {
                let (name, rest) = split_head(items, offset)?;
                let body = rest
                    .into_iter()
                    .map(term_from_expr)
                    .collect::<Result<_, _>>()?;
                Ok(Sentence::Relation { name, body })
            }
        }
    }
}

impl TryFrom<String> for Term {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Term> for String {
    fn from(value: Term) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Sentence {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Sentence> for String {
    fn from(value: Sentence) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_proposition() {
        let s: Sentence = "terminal".parse().unwrap();
        assert!(s.is_proposition("terminal"));
        assert!(s.body().is_empty());
    }

    #[test]
    fn test_parse_relation() {
        let s: Sentence = "(legal xplayer (mark 1 2))".parse().unwrap();
        assert!(s.is_relation("legal", 2));
        assert_eq!(s.arg(0), Some(&Term::constant("xplayer")));
        assert_eq!(
            s.arg(1),
            Some(&Term::function(
                "mark",
                vec![Term::constant("1"), Term::constant("2")]
            ))
        );
        assert_eq!(s.to_string(), "(legal xplayer (mark 1 2))");
    }

    #[test]
    fn test_parse_whitespace_tolerant() {
        let s: Sentence = "  ( goal   oplayer\n 50 ) ".parse().unwrap();
        assert_eq!(s, Sentence::goal(&Role::new("oplayer"), 50));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Sentence>(), Err(ParseError::UnexpectedEnd));
        assert_eq!("(legal x".parse::<Sentence>(), Err(ParseError::UnexpectedEnd));
        assert_eq!(")".parse::<Sentence>(), Err(ParseError::UnexpectedClose(0)));
        assert_eq!("((a) b)".parse::<Sentence>(), Err(ParseError::BadHead(0)));
        assert_eq!("a b".parse::<Sentence>(), Err(ParseError::Trailing(2)));
    }

    #[test]
    fn test_constructors_match_text() {
        let role = Role::new("robot");
        let mv: Move = "(push 3)".parse().unwrap();
        assert_eq!(Sentence::does(&role, &mv).to_string(), "(does robot (push 3))");
        assert_eq!(Sentence::legal(&role, &mv).to_string(), "(legal robot (push 3))");
        assert_eq!(
            Sentence::base(Term::function("step", vec![Term::constant("2")])).to_string(),
            "(true (step 2))"
        );
    }

    #[test]
    fn test_serde_uses_text_form() {
        let s: Sentence = "(does xplayer noop)".parse().unwrap();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "\"(does xplayer noop)\"");
        let back: Sentence = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);

        let mv: Move = serde_json::from_str("\"(mark 1 1)\"").unwrap();
        assert_eq!(mv.to_string(), "(mark 1 1)");
    }
}
