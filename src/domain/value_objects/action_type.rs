//! Two-valued action selector used by the social endpoints.
//!
//! Clients send `action_type=1` to create an edge (follow, favorite,
//! comment, message) and `action_type=2` to remove it.

use std::fmt;
use std::str::FromStr;

use crate::shared::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    /// `1`: create
    Do,
    /// `2`: remove
    Undo,
}

impl ActionType {
    pub fn as_i32(self) -> i32 {
        match self {
            ActionType::Do => 1,
            ActionType::Undo => 2,
        }
    }
}

impl FromStr for ActionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(ActionType::Do),
            "2" => Ok(ActionType::Undo),
            "" => Err(AppError::missing("action_type")),
            other => Err(AppError::BadRequest(format!(
                "unsupported action_type {other}"
            ))),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}
