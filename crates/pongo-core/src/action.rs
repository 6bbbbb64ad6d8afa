//! The two directions a schema can process data in

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A schema action
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// External data to internal value
    Parse,
    /// Internal value to external data
    Serialize,
}

impl Action {
    /// Every action, in wire order
    pub const ALL: [Action; 2] = [Action::Parse, Action::Serialize];

    /// Wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Parse => "PARSE",
            Action::Serialize => "SERIALIZE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "parse" => Ok(Action::Parse),
            "serialize" => Ok(Action::Serialize),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_names() {
        assert_eq!(
            serde_json::to_string(&Action::Parse).unwrap(),
            "\"PARSE\""
        );
        assert_eq!(
            serde_json::from_str::<Action>("\"SERIALIZE\"").unwrap(),
            Action::Serialize
        );
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("Parse".parse::<Action>().unwrap(), Action::Parse);
        assert_eq!("SERIALIZE".parse::<Action>().unwrap(), Action::Serialize);
        assert!("validate".parse::<Action>().is_err());
    }
}
