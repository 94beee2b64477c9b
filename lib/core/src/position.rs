use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// On-field role of a player. Scopes the reference population for
/// position-relative percentiles and similarity search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    C,
    Cb,
    Db,
    De,
    Dt,
    Edge,
    Fb,
    Fs,
    G,
    Ilb,
    K,
    Lb,
    Ls,
    Nt,
    Og,
    Ol,
    Olb,
    Ot,
    P,
    Qb,
    Rb,
    S,
    Ss,
    Te,
    Wr,
}

impl Position {
    /// Every position, in abbreviation order.
    pub const ALL: [Position; 25] = [
        Position::C,
        Position::Cb,
        Position::Db,
        Position::De,
        Position::Dt,
        Position::Edge,
        Position::Fb,
        Position::Fs,
        Position::G,
        Position::Ilb,
        Position::K,
        Position::Lb,
        Position::Ls,
        Position::Nt,
        Position::Og,
        Position::Ol,
        Position::Olb,
        Position::Ot,
        Position::P,
        Position::Qb,
        Position::Rb,
        Position::S,
        Position::Ss,
        Position::Te,
        Position::Wr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::C => "C",
            Position::Cb => "CB",
            Position::Db => "DB",
            Position::De => "DE",
            Position::Dt => "DT",
            Position::Edge => "EDGE",
            Position::Fb => "FB",
            Position::Fs => "FS",
            Position::G => "G",
            Position::Ilb => "ILB",
            Position::K => "K",
            Position::Lb => "LB",
            Position::Ls => "LS",
            Position::Nt => "NT",
            Position::Og => "OG",
            Position::Ol => "OL",
            Position::Olb => "OLB",
            Position::Ot => "OT",
            Position::P => "P",
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::S => "S",
            Position::Ss => "SS",
            Position::Te => "TE",
            Position::Wr => "WR",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Position::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::UnknownPosition(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for pos in Position::ALL {
            assert_eq!(pos.as_str().parse::<Position>().unwrap(), pos);
            assert_eq!(pos.to_string(), pos.as_str());
        }
        assert_eq!("wr".parse::<Position>().unwrap(), Position::Wr);
        assert!(matches!("XX".parse::<Position>(), Err(Error::UnknownPosition(_))));
    }

    #[test]
    fn test_serde_uses_abbreviation() {
        let json = serde_json::to_string(&Position::Edge).unwrap();
        assert_eq!(json, "\"EDGE\"");
        let parsed: Position = serde_json::from_str("\"OLB\"").unwrap();
        assert_eq!(parsed, Position::Olb);
    }
}
