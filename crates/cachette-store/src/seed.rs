use anyhow::Result;
use cachette_types::models::{CallKind, CallStatus, MessageKind, NewCall, NewMessage, NewUser};
use tracing::info;

use crate::Store;

/// Load the demo data set into an empty store. A store that already holds
/// users is left untouched, so restarts against a sqlite file are safe.
pub fn run(store: &dyn Store) -> Result<()> {
    if !store.users()?.is_empty() {
        return Ok(());
    }

    let demo_users = [
        ("Augustin Rashidi", "1234", "👨‍💼", "+33 6 12 34 56 78", "En ligne"),
        ("Issa Hôtel Baobab", "5678", "🏨", "+33 6 23 45 67 89", "Dernière fois hier"),
        ("Khalifa Bally", "9999", "👩‍💻", "+33 6 34 56 78 90", "En ligne"),
        ("Mariam Sow", "0000", "👩‍🎨", "+33 6 45 67 89 01", "Dernière fois à 17:49"),
        ("Messi Léo", "1111", "⚽", "+33 6 56 78 90 12", "En ligne"),
        ("Mohamed", "2222", "🧑‍🔬", "+33 6 67 89 01 23", "En ligne"),
    ];

    let mut user_ids = Vec::with_capacity(demo_users.len());
    for (username, access_code, avatar, phone, status) in demo_users {
        let user = store.create_user(NewUser {
            username: username.to_string(),
            access_code: access_code.to_string(),
            avatar: Some(avatar.to_string()),
            phone: Some(phone.to_string()),
            status: Some(status.to_string()),
        })?;
        user_ids.push(user.id);
    }

    let demo_messages = [
        (user_ids[0], "Salut, comment ça va?"),
        (user_ids[1], "Ça va bien, merci! Et toi?"),
        (user_ids[4], "On te voit plus j'espère que tout va bien"),
    ];
    for (user_id, content) in demo_messages {
        store.create_message(NewMessage {
            user_id,
            content: content.to_string(),
            kind: MessageKind::Text,
        })?;
    }

    let demo_calls = [
        (user_ids[0], user_ids[1], CallKind::Voice, CallStatus::Outgoing, 125),
        (user_ids[1], user_ids[0], CallKind::Voice, CallStatus::Incoming, 89),
        (user_ids[2], user_ids[0], CallKind::Video, CallStatus::Missed, 0),
        (user_ids[3], user_ids[0], CallKind::Voice, CallStatus::Outgoing, 234),
    ];
    for (caller_id, receiver_id, kind, status, duration) in demo_calls {
        store.create_call(NewCall {
            caller_id,
            receiver_id,
            kind,
            status,
            duration,
        })?;
    }

    info!(
        "Seeded demo data: {} users, {} messages, {} calls",
        demo_users.len(),
        demo_messages.len(),
        demo_calls.len()
    );
    Ok(())
}
