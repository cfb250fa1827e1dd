//! QUORUM Core - Entity Types
//!
//! Pure data structures shared by every other crate: tasks, agent memory,
//! audit entries, filters, configuration, and the error taxonomy.
//! This crate contains no I/O.

use chrono::{DateTime, Utc};
use uuid::Uuid;

mod config;
mod entities;
mod enums;
mod error;
mod filter;

pub use config::*;
pub use entities::*;
pub use enums::*;
pub use error::*;
pub use filter::*;

/// Entity identifier using UUIDv7 for timestamp-sortable IDs.
pub type EntityId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 EntityId (timestamp-sortable).
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7()
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_status() -> impl Strategy<Value = TaskStatus> {
        prop::sample::select(TaskStatus::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_status_db_str_roundtrip(status in arb_status()) {
            prop_assert_eq!(TaskStatus::from_db_str(status.as_db_str()), Ok(status));
        }

        #[test]
        fn prop_unknown_status_strings_rejected(s in "[a-z]{1,12}") {
            prop_assume!(!TaskStatus::ALL.iter().any(|st| st.as_db_str() == s));
            prop_assert!(TaskStatus::from_db_str(&s).is_err());
        }

        #[test]
        fn prop_snapshot_never_exceeds_limit(n in 0usize..40) {
            let mut memory = MemorySeed {
                agent_id: "prop".to_string(),
                project: Project::ConsorcioOpt,
                personality: Personality {
                    name: "prop".to_string(),
                    role: String::new(),
                    tone: String::new(),
                    focus: String::new(),
                    specialties: Vec::new(),
                    communication_style: String::new(),
                },
            }
            .into_memory();
            for i in 0..n {
                memory.conversation_history.push(ConversationEntry::Chat {
                    timestamp: Utc::now(),
                    user_message: i.to_string(),
                    agent_response: String::new(),
                });
            }
            let snap = memory.snapshot();
            prop_assert_eq!(snap.conversation_history.len(), n.min(MEMORY_VIEW_LIMIT));
            prop_assert_eq!(snap.total_conversations, n);
        }
    }
}
