use thiserror::Error;

use crate::content::GroupType;

pub type AuthoringResult<T> = std::result::Result<T, AuthoringError>;

#[derive(Debug, Error, PartialEq)]
pub enum AuthoringError {
    #[error("index {index} out of bounds for {what} of length {len}")]
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        len: usize,
    },
    #[error("cannot apply a `{patch}` patch to a {group} group")]
    PatchMismatch { group: GroupType, patch: &'static str },
    #[error("{0} groups have no shared choices")]
    NoSharedChoices(GroupType),
}

impl AuthoringError {
    pub fn question_index(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            what: "questions",
            index,
            len,
        }
    }

    pub fn choice_index(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            what: "choices",
            index,
            len,
        }
    }

    pub fn group_index(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            what: "groups",
            index,
            len,
        }
    }
}
