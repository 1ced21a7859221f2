//! The 0/1 discriminant choosing between the Red and Black pools.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolSelector {
    Red,
    Black,
}

impl PoolSelector {
    pub const ALL: [PoolSelector; 2] = [PoolSelector::Red, PoolSelector::Black];

    pub fn index(&self) -> usize {
        match self {
            Self::Red => 0,
            Self::Black => 1,
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Black => "black",
        }
    }
}

impl TryFrom<i64> for PoolSelector {
    type Error = TypesError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Red),
            1 => Ok(Self::Black),
            other => Err(TypesError::InvalidPoolSelector(other)),
        }
    }
}

impl fmt::Display for PoolSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_zero_and_one_parse() {
        assert_eq!(PoolSelector::try_from(0), Ok(PoolSelector::Red));
        assert_eq!(PoolSelector::try_from(1), Ok(PoolSelector::Black));
        assert_eq!(
            PoolSelector::try_from(-1),
            Err(TypesError::InvalidPoolSelector(-1))
        );
        assert_eq!(
            PoolSelector::try_from(3),
            Err(TypesError::InvalidPoolSelector(3))
        );
    }

    #[test]
    fn other_flips() {
        assert_eq!(PoolSelector::Red.other(), PoolSelector::Black);
        assert_eq!(PoolSelector::Black.other().index(), 0);
    }
}
