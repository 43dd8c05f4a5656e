use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Playing positions (8 codes).
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    ST,
    CAM,
    CM,
    CDM,
    CB,
    LB,
    RB,
    GK,
}

impl Position {
    pub const ALL: [Position; 8] = [
        Position::ST,
        Position::CAM,
        Position::CM,
        Position::CDM,
        Position::CB,
        Position::LB,
        Position::RB,
        Position::GK,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Position::ST => "ST",
            Position::CAM => "CAM",
            Position::CM => "CM",
            Position::CDM => "CDM",
            Position::CB => "CB",
            Position::LB => "LB",
            Position::RB => "RB",
            Position::GK => "GK",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Position::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| format!("Unknown position: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!("st".parse::<Position>(), Ok(Position::ST));
        assert_eq!(" CDM ".parse::<Position>(), Ok(Position::CDM));
        assert!("LW".parse::<Position>().is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Position::CAM).unwrap();
        assert_eq!(json, "\"CAM\"");
    }
}
