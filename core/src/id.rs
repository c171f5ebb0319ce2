//! Identifier allocation.
//!
//! # Design
//! `IdStrategy` is the configuration value; `IdStrategy::allocator` turns it
//! into a boxed `IdAllocator` that the store owns for its whole lifetime.
//! Sequence counters are per instance, never process-wide, so ids from one
//! store say nothing about another.
//!
//! Short tokens are the first 8 characters of a v4 UUID and are not checked
//! against existing keys. A collision replaces the earlier todo.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::StoreError;

/// Length of a short random token.
pub const SHORT_TOKEN_LEN: usize = 8;

/// Key of a stored todo. Serializes as a bare JSON number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(u64),
    Token(String),
}

impl Identifier {
    /// Interpret a raw path segment as an id of the shape `strategy` produces.
    pub fn parse(strategy: IdStrategy, raw: &str) -> Result<Self, StoreError> {
        if strategy.is_numeric() {
            raw.parse::<u64>().map(Identifier::Number).map_err(|_| {
                StoreError::invalid_argument(format!("todo.id={raw} is not a {strategy} id"))
            })
        } else {
            Ok(Identifier::Token(raw.to_string()))
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{n}"),
            Identifier::Token(t) => f.write_str(t),
        }
    }
}

impl From<u64> for Identifier {
    fn from(n: u64) -> Self {
        Identifier::Number(n)
    }
}

impl From<&str> for Identifier {
    fn from(t: &str) -> Self {
        Identifier::Token(t.to_string())
    }
}

/// Which allocator a store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdStrategy {
    /// 32-bit counter starting at 1.
    #[default]
    Int,
    /// 64-bit counter starting at 1.
    Long,
    /// Canonical 36-character v4 UUID.
    Uuid,
    /// First 8 characters of a v4 UUID.
    ShortUuid,
}

impl IdStrategy {
    pub fn allocator(self) -> Box<dyn IdAllocator> {
        match self {
            IdStrategy::Int => Box::new(IntSequence::new()),
            IdStrategy::Long => Box::new(LongSequence::new()),
            IdStrategy::Uuid => Box::new(RandomUuid),
            IdStrategy::ShortUuid => Box::new(ShortUuid),
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, IdStrategy::Int | IdStrategy::Long)
    }

    /// Apply the legacy "tiny id" switch, which shortens random tokens.
    pub fn with_tiny_ids(self, tiny: bool) -> Self {
        match self {
            IdStrategy::Uuid if tiny => IdStrategy::ShortUuid,
            other => other,
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdStrategy::Int => "int",
            IdStrategy::Long => "long",
            IdStrategy::Uuid => "uuid",
            IdStrategy::ShortUuid => "short-uuid",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown id strategy `{0}` (expected int, long, uuid or short-uuid)")]
pub struct ParseStrategyError(String);

impl FromStr for IdStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(IdStrategy::Int),
            "long" => Ok(IdStrategy::Long),
            "uuid" => Ok(IdStrategy::Uuid),
            "short-uuid" | "short" | "tiny" => Ok(IdStrategy::ShortUuid),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

/// Produces the id for the next inserted todo.
///
/// Called exactly once per successful insert, while the store lock is held.
pub trait IdAllocator: Send + Sync + fmt::Debug {
    fn allocate(&self) -> Identifier;

    fn strategy(&self) -> IdStrategy;
}

/// Wraps to 0 after `u32::MAX` allocations.
#[derive(Debug)]
pub struct IntSequence {
    next: AtomicU32,
}

impl IntSequence {
    pub fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
        }
    }
}

impl Default for IntSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator for IntSequence {
    fn allocate(&self) -> Identifier {
        Identifier::Number(u64::from(self.next.fetch_add(1, Ordering::SeqCst)))
    }

    fn strategy(&self) -> IdStrategy {
        IdStrategy::Int
    }
}

#[derive(Debug)]
pub struct LongSequence {
    next: AtomicU64,
}

impl LongSequence {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }
}

impl Default for LongSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator for LongSequence {
    fn allocate(&self) -> Identifier {
        Identifier::Number(self.next.fetch_add(1, Ordering::SeqCst))
    }

    fn strategy(&self) -> IdStrategy {
        IdStrategy::Long
    }
}

#[derive(Debug, Default)]
pub struct RandomUuid;

impl IdAllocator for RandomUuid {
    fn allocate(&self) -> Identifier {
        Identifier::Token(Uuid::new_v4().to_string())
    }

    fn strategy(&self) -> IdStrategy {
        IdStrategy::Uuid
    }
}

#[derive(Debug, Default)]
pub struct ShortUuid;

impl IdAllocator for ShortUuid {
    fn allocate(&self) -> Identifier {
        let mut token = Uuid::new_v4().to_string();
        token.truncate(SHORT_TOKEN_LEN);
        Identifier::Token(token)
    }

    fn strategy(&self) -> IdStrategy {
        IdStrategy::ShortUuid
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(IdStrategy::Int)]
    #[case(IdStrategy::Long)]
    fn sequences_start_at_one_and_increment(#[case] strategy: IdStrategy) {
        let alloc = strategy.allocator();
        assert_eq!(alloc.allocate(), Identifier::Number(1));
        assert_eq!(alloc.allocate(), Identifier::Number(2));
        assert_eq!(alloc.allocate(), Identifier::Number(3));
        assert_eq!(alloc.strategy(), strategy);
    }

    #[test]
    fn separate_allocators_do_not_share_state() {
        let a = IdStrategy::Int.allocator();
        let b = IdStrategy::Int.allocator();
        a.allocate();
        a.allocate();
        assert_eq!(b.allocate(), Identifier::Number(1));
    }

    #[test]
    fn uuid_tokens_are_canonical() {
        let Identifier::Token(token) = RandomUuid.allocate() else {
            panic!("expected a token");
        };
        assert_eq!(token.len(), 36);
        assert!(Uuid::parse_str(&token).is_ok());
    }

    #[test]
    fn short_tokens_are_eight_chars() {
        let Identifier::Token(token) = ShortUuid.allocate() else {
            panic!("expected a token");
        };
        assert_eq!(token.len(), SHORT_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn concurrent_allocation_has_no_duplicates() {
        let alloc: Arc<dyn IdAllocator> = Arc::new(LongSequence::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let alloc = Arc::clone(&alloc);
                thread::spawn(move || (0..500).map(|_| alloc.allocate()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id");
            }
        }
        assert_eq!(seen.len(), 4000);
        assert!(seen.contains(&Identifier::Number(1)));
        assert!(seen.contains(&Identifier::Number(4000)));
    }

    #[rstest]
    #[case("int", IdStrategy::Int)]
    #[case("LONG", IdStrategy::Long)]
    #[case("uuid", IdStrategy::Uuid)]
    #[case("short-uuid", IdStrategy::ShortUuid)]
    #[case("tiny", IdStrategy::ShortUuid)]
    fn strategy_parses(#[case] raw: &str, #[case] expected: IdStrategy) {
        assert_eq!(raw.parse::<IdStrategy>().unwrap(), expected);
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        assert!("snowflake".parse::<IdStrategy>().is_err());
    }

    #[test]
    fn tiny_switch_only_shortens_uuids() {
        assert_eq!(IdStrategy::Uuid.with_tiny_ids(true), IdStrategy::ShortUuid);
        assert_eq!(IdStrategy::Uuid.with_tiny_ids(false), IdStrategy::Uuid);
        assert_eq!(IdStrategy::Int.with_tiny_ids(true), IdStrategy::Int);
    }

    #[test]
    fn parse_numeric_id() {
        assert_eq!(
            Identifier::parse(IdStrategy::Int, "42").unwrap(),
            Identifier::Number(42)
        );
        assert!(matches!(
            Identifier::parse(IdStrategy::Long, "abc"),
            Err(StoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn parse_token_id_accepts_anything() {
        assert_eq!(
            Identifier::parse(IdStrategy::ShortUuid, "1a2b3c4d").unwrap(),
            Identifier::Token("1a2b3c4d".to_string())
        );
    }

    #[test]
    fn identifier_serializes_untagged() {
        assert_eq!(serde_json::to_string(&Identifier::Number(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&Identifier::from("ab")).unwrap(),
            r#""ab""#
        );
        let back: Identifier = serde_json::from_str("7").unwrap();
        assert_eq!(back, Identifier::Number(7));
    }
}
