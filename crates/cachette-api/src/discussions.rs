use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;

use cachette_types::models::{Discussion, Message, User};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::session::SessionUser;

#[derive(Debug, Deserialize)]
pub struct DiscussionQuery {
    /// Case-insensitive substring match on the participant's username.
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub tab: DiscussionTab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscussionTab {
    #[default]
    All,
    Unread,
    Favorites,
    /// No group entities exist in this schema, so this tab is always empty.
    Groups,
}

/// Derive the conversation list from the raw records. One entry per
/// participant with at least one message: their latest message (highest id,
/// since messages arrive in id order), an unread tally, and the recency
/// timestamp used for sorting. Ties on the timestamp order by ascending
/// participant id.
pub fn build_discussions(
    participants: &[User],
    messages: &[Message],
    query: &str,
    tab: DiscussionTab,
) -> Vec<Discussion> {
    let query = query.to_lowercase();

    let mut discussions: Vec<Discussion> = participants
        .iter()
        .filter_map(|user| {
            let theirs: Vec<&Message> =
                messages.iter().filter(|m| m.user_id == user.id).collect();
            let last = *theirs.last()?;
            let unread_count = theirs.iter().filter(|m| !m.is_read).count();

            Some(Discussion {
                id: user.id,
                participant: user.clone(),
                last_message: last.clone(),
                unread_count,
                timestamp: last.timestamp,
                is_pinned: false,
                is_archived: false,
            })
        })
        .collect();

    discussions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(a.id.cmp(&b.id)));

    discussions.retain(|d| {
        if !d.participant.username.to_lowercase().contains(&query) {
            return false;
        }
        match tab {
            DiscussionTab::All => true,
            DiscussionTab::Unread => d.unread_count > 0,
            DiscussionTab::Favorites => d.is_pinned,
            DiscussionTab::Groups => false,
        }
    });

    discussions
}

pub async fn get_discussions(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Query(query): Query<DiscussionQuery>,
) -> Result<Json<Vec<Discussion>>, ApiError> {
    let participants: Vec<User> = state
        .store
        .users()?
        .into_iter()
        .filter(|u| u.id != session.id && u.is_active)
        .collect();
    let messages = state.store.messages()?;

    Ok(Json(build_discussions(
        &participants,
        &messages,
        &query.q,
        query.tab,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cachette_types::models::MessageKind;
    use chrono::{DateTime, TimeZone, Utc};

    fn user(id: i64, username: &str) -> User {
        User {
            id,
            username: username.to_string(),
            access_code: format!("{id:04}"),
            is_active: true,
            avatar: None,
            phone: None,
            status: Some("En ligne".to_string()),
        }
    }

    fn message(id: i64, user_id: i64, minute: u32, is_read: bool) -> Message {
        Message {
            id,
            user_id,
            content: format!("message {id}"),
            kind: MessageKind::Text,
            timestamp: at(minute),
            is_read,
        }
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, 0).unwrap()
    }

    #[test]
    fn orders_by_recency_and_counts_unread() {
        let a = user(1, "Augustin Rashidi");
        let b = user(2, "Mariam Sow");
        // A: three messages, one unread. B: a single read message, more recent.
        let messages = vec![
            message(1, 1, 0, true),
            message(2, 1, 1, true),
            message(3, 1, 2, false),
            message(4, 2, 5, true),
        ];

        let discussions =
            build_discussions(&[a, b], &messages, "", DiscussionTab::All);

        assert_eq!(discussions.len(), 2);
        assert_eq!(discussions[0].id, 2);
        assert_eq!(discussions[0].unread_count, 0);
        assert_eq!(discussions[1].id, 1);
        assert_eq!(discussions[1].unread_count, 1);
        assert_eq!(discussions[1].last_message.id, 3);
    }

    #[test]
    fn users_without_messages_produce_no_entry() {
        let users = [user(1, "Mohamed"), user(2, "Khalifa Bally")];
        let messages = vec![message(1, 1, 0, false)];

        let discussions = build_discussions(&users, &messages, "", DiscussionTab::All);
        assert_eq!(discussions.len(), 1);
        assert_eq!(discussions[0].id, 1);
    }

    #[test]
    fn equal_timestamps_break_ties_by_ascending_user_id() {
        let users = [user(3, "Messi Léo"), user(1, "Mohamed"), user(2, "Mariam Sow")];
        let messages = vec![
            message(1, 3, 7, true),
            message(2, 1, 7, true),
            message(3, 2, 7, true),
        ];

        let discussions = build_discussions(&users, &messages, "", DiscussionTab::All);
        let order: Vec<i64> = discussions.iter().map(|d| d.id).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let users = [user(1, "Augustin Rashidi"), user(2, "Mariam Sow")];
        let messages = vec![message(1, 1, 0, false), message(2, 2, 1, false)];

        let hits = build_discussions(&users, &messages, "RASHidi", DiscussionTab::All);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].participant.username, "Augustin Rashidi");

        assert!(build_discussions(&users, &messages, "zz", DiscussionTab::All).is_empty());
    }

    #[test]
    fn unread_tab_keeps_only_discussions_with_unread() {
        let users = [user(1, "Augustin Rashidi"), user(2, "Mariam Sow")];
        let messages = vec![message(1, 1, 0, false), message(2, 2, 1, true)];

        let unread = build_discussions(&users, &messages, "", DiscussionTab::Unread);
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].id, 1);
    }

    #[test]
    fn groups_and_favorites_tabs_are_empty() {
        let users = [user(1, "Augustin Rashidi")];
        let messages = vec![message(1, 1, 0, false)];

        assert!(build_discussions(&users, &messages, "", DiscussionTab::Groups).is_empty());
        // Derived discussions are never pinned, so the favorites tab is
        // empty too.
        assert!(build_discussions(&users, &messages, "", DiscussionTab::Favorites).is_empty());
    }
}
