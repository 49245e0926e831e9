use std::fmt;
use std::str::FromStr;

use chordsweep_core::{Coord, Coord2, Move, MoveKind};

use crate::*;

/// Text message sent over the session socket, e.g. `o 3 4`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Command(pub Move);

impl Command {
    pub const fn new(kind: MoveKind, coords: Coord2) -> Self {
        Self(Move { kind, coords })
    }

    pub const fn kind(&self) -> MoveKind {
        self.0.kind
    }

    pub const fn coords(&self) -> Coord2 {
        self.0.coords
    }

    const fn verb(kind: MoveKind) -> char {
        match kind {
            MoveKind::Open => 'o',
            MoveKind::Chord => 'c',
            MoveKind::Flag => 'f',
        }
    }
}

impl From<Move> for Command {
    fn from(value: Move) -> Self {
        Self(value)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.coords();
        write!(f, "{} {} {}", Self::verb(self.kind()), x, y)
    }
}

fn parse_coord(token: &str) -> Result<Coord> {
    token
        .parse()
        .map_err(|_| ProtocolError::InvalidCoordinate(token.to_string()))
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || ProtocolError::MalformedCommand(s.to_string());

        let mut tokens = s.split_whitespace();
        let (Some(verb), Some(x), Some(y), None) =
            (tokens.next(), tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(malformed());
        };

        let kind = match verb {
            "o" => MoveKind::Open,
            "c" => MoveKind::Chord,
            "f" => MoveKind::Flag,
            _ => return Err(malformed()),
        };

        Ok(Self::new(kind, (parse_coord(x)?, parse_coord(y)?)))
    }
}
