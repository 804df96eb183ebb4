//! The row-ownership identity used to partition shared tables.

use serde::Serialize;

/// The identity pair stamped on every row.
///
/// This is a partition key, not a credential: the passcode is stored in plain
/// text and compared with string equality, exactly as wide as the isolation it
/// provides. Each operation receives the caller's `Owner` explicitly; there is
/// no ambient session state.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, Serialize)]
pub struct Owner {
    nickname: String,
    #[serde(skip)]
    passcode: String,
}

impl Owner {
    pub fn new(nickname: impl Into<String>, passcode: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            passcode: passcode.into(),
        }
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn passcode(&self) -> &str {
        &self.passcode
    }

    /// True if a stored (nickname, passcode) pair belongs to this owner.
    pub fn matches(&self, nickname: &str, passcode: &str) -> bool {
        self.nickname == nickname && self.passcode == passcode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        let owner = Owner::new("kim", "1234");
        assert!(owner.matches("kim", "1234"));
        assert!(!owner.matches("kim", "9999"));
        assert!(!owner.matches("lee", "1234"));
    }

    #[test]
    fn test_passcode_not_serialized() {
        let owner = Owner::new("kim", "1234");
        let json = serde_json::to_string(&owner).unwrap();
        assert!(json.contains("kim"));
        assert!(!json.contains("1234"));
    }
}
