use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ReactionGroup;
use crate::models::User;

/// One user's emoji reaction to one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReaction {
    pub id: String,
    pub message_id: String,
    pub user_id: String,
    pub emoji: String,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Collapse reactions into per-emoji groups, in order of each emoji's first
/// appearance. A user is counted once per emoji however many rows they have.
pub fn group_reactions(reactions: &[MessageReaction]) -> Vec<ReactionGroup> {
    let mut groups: Vec<ReactionGroup> = Vec::new();

    for r in reactions {
        let idx = match groups.iter().position(|g| g.emoji == r.emoji) {
            Some(idx) => idx,
            None => {
                groups.push(ReactionGroup {
                    emoji: r.emoji.clone(),
                    count: 0,
                    user_ids: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let group = &mut groups[idx];
        if !group.user_ids.contains(&r.user_id) {
            group.user_ids.push(r.user_id.clone());
            group.count = group.user_ids.len();
        }
    }

    groups
}
