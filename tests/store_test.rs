use fleetchat::modules::session::model::{
    derive_title, ChatSession, Message, MessageType, Role, DEFAULT_TITLE,
};
use fleetchat::modules::session::store::{SendRejection, SessionSnapshot, SessionStore};

fn assert_active_valid(store: &SessionStore) {
    if let Some(id) = store.active_session_id() {
        assert!(
            store.sessions().iter().any(|s| s.id == id),
            "active session {} is not in the store",
            id
        );
    }
}

#[test]
fn test_create_prepends_and_activates() {
    let mut store = SessionStore::new();

    let first = store.create().id.clone();
    let second = store.create().id.clone();

    assert_eq!(store.sessions().len(), 2);
    assert_eq!(store.sessions()[0].id, second);
    assert_eq!(store.sessions()[1].id, first);
    assert_eq!(store.active_session_id(), Some(second.as_str()));

    let session = &store.sessions()[0];
    assert_eq!(session.title, DEFAULT_TITLE);
    assert!(session.messages.is_empty());
}

#[test]
fn test_ids_are_unique() {
    let mut store = SessionStore::new();
    for _ in 0..50 {
        store.create();
    }

    let mut ids: Vec<&str> = store.sessions().iter().map(|s| s.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

#[test]
fn test_delete_active_reassigns_to_first_remaining() {
    let mut store = SessionStore::new();
    let oldest = store.create().id.clone();
    let middle = store.create().id.clone();
    let newest = store.create().id.clone();

    assert!(store.delete(&newest));
    assert_eq!(store.active_session_id(), Some(middle.as_str()));

    let order: Vec<&str> = store.sessions().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(order, vec![middle.as_str(), oldest.as_str()]);
}

#[test]
fn test_delete_inactive_keeps_active_and_order() {
    let mut store = SessionStore::new();
    let a = store.create().id.clone();
    let b = store.create().id.clone();
    let c = store.create().id.clone();

    assert!(store.delete(&b));
    assert_eq!(store.active_session_id(), Some(c.as_str()));

    let order: Vec<&str> = store.sessions().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(order, vec![c.as_str(), a.as_str()]);
}

#[test]
fn test_delete_last_session_clears_active() {
    let mut store = SessionStore::new();
    let id = store.create().id.clone();

    assert!(store.delete(&id));
    assert!(store.sessions().is_empty());
    assert_eq!(store.active_session_id(), None);
}

#[test]
fn test_delete_unknown_is_noop() {
    let mut store = SessionStore::new();
    let id = store.create().id.clone();

    assert!(!store.delete("missing"));
    assert_eq!(store.sessions().len(), 1);
    assert_eq!(store.active_session_id(), Some(id.as_str()));
}

#[test]
fn test_active_reference_survives_create_delete_sequences() {
    // Small LCG so the sequence is varied but reproducible.
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (seed >> 33) as usize
    };

    let mut store = SessionStore::new();
    for _ in 0..500 {
        let roll = next();
        if roll % 3 == 0 || store.sessions().is_empty() {
            store.create();
        } else {
            let index = next() % store.sessions().len();
            let id = if roll % 5 == 0 {
                store.active_session_id().map(str::to_string).unwrap_or_default()
            } else {
                store.sessions()[index].id.clone()
            };
            store.delete(&id);
        }
        assert_active_valid(&store);
        if !store.sessions().is_empty() {
            assert!(store.active_session_id().is_some());
        }
    }
}

#[test]
fn test_rename_and_select() {
    let mut store = SessionStore::new();
    let older = store.create().id.clone();
    store.create();

    assert!(store.rename(&older, "Fleet audit".to_string()));
    assert_eq!(store.session(&older).unwrap().title, "Fleet audit");
    assert!(!store.rename("missing", "Nope".to_string()));

    assert!(store.select(&older));
    assert_eq!(store.active_session_id(), Some(older.as_str()));
    assert!(!store.select("missing"));
    assert_eq!(store.active_session_id(), Some(older.as_str()));
}

#[test]
fn test_clear_drops_everything() {
    let mut store = SessionStore::new();
    store.create();
    store.create();

    store.clear();
    assert!(store.sessions().is_empty());
    assert_eq!(store.active_session_id(), None);
}

#[test]
fn test_title_is_set_on_first_message_only() {
    let mut store = SessionStore::new();
    let id = store.create().id.clone();

    assert!(store.append_message(&id, Message::user("Where is VEH-00012?".to_string())));
    assert!(store.append_message(&id, Message::assistant("In the depot".to_string())));
    assert!(store.append_message(&id, Message::user("And VEH-00013?".to_string())));

    let session = store.session(&id).unwrap();
    assert_eq!(session.title, "Where is VEH-00012?");
    assert_eq!(session.messages.len(), 3);
    assert_eq!(session.messages[1].content, "In the depot");
    assert_eq!(session.messages[2].content, "And VEH-00013?");
}

#[test]
fn test_append_to_missing_session_is_noop() {
    let mut store = SessionStore::new();
    store.create();

    assert!(!store.append_message("missing", Message::user("hello".to_string())));
    assert!(store.sessions()[0].messages.is_empty());
}

#[test]
fn test_derive_title_truncates_at_fifty_chars() {
    let long = "a".repeat(60);
    assert_eq!(derive_title(&long), format!("{}...", "a".repeat(50)));

    let exact = "b".repeat(50);
    assert_eq!(derive_title(&exact), exact);

    // Counted in characters, not bytes.
    let accented = "é".repeat(51);
    assert_eq!(derive_title(&accented), format!("{}...", "é".repeat(50)));
}

#[test]
fn test_begin_send_rejections() {
    let mut store = SessionStore::new();
    assert_eq!(
        store.begin_send("hello").unwrap_err(),
        SendRejection::NoActiveSession
    );

    store.create();
    assert_eq!(
        store.begin_send("   \n").unwrap_err(),
        SendRejection::EmptyMessage
    );
    assert!(!store.is_processing());

    store.begin_send("first").unwrap();
    assert!(store.is_processing());
    assert_eq!(store.begin_send("second").unwrap_err(), SendRejection::Busy);
    assert_eq!(store.active_session().unwrap().messages.len(), 1);
}

#[test]
fn test_begin_send_trims_and_excludes_new_message_from_history() {
    let mut store = SessionStore::new();
    let id = store.create().id.clone();
    store.append_message(&id, Message::user("earlier".to_string()));
    store.append_message(&id, Message::assistant("reply".to_string()));

    let pending = store.begin_send("  next question  ").unwrap();
    assert_eq!(pending.session_id, id);
    assert_eq!(pending.user_message.content, "next question");
    assert_eq!(pending.user_message.kind, MessageType::Default);
    assert_eq!(pending.history.len(), 2);
    assert_eq!(pending.history[0].role, Role::User);
    assert_eq!(pending.history[1].content, "reply");

    assert!(store.finish_send(&pending, Message::assistant("answer".to_string())));
    assert!(!store.is_processing());
    assert_eq!(store.session(&id).unwrap().messages.len(), 4);
}

#[test]
fn test_finish_send_after_delete_drops_reply() {
    let mut store = SessionStore::new();
    let keep = store.create().id.clone();
    let doomed = store.create().id.clone();

    let pending = store.begin_send("question").unwrap();
    assert!(store.delete(&doomed));

    assert!(!store.finish_send(&pending, Message::assistant("late".to_string())));
    assert!(!store.is_processing());
    assert!(store.session(&keep).unwrap().messages.is_empty());
}

#[test]
fn test_from_snapshot_repairs_dangling_active() {
    let session = ChatSession::new();
    let id = session.id.clone();

    let store = SessionStore::from_snapshot(SessionSnapshot {
        sessions: vec![session],
        active_session_id: Some("gone".to_string()),
    });
    assert_eq!(store.active_session_id(), Some(id.as_str()));
    assert!(!store.is_processing());

    let empty = SessionStore::from_snapshot(SessionSnapshot {
        sessions: Vec::new(),
        active_session_id: Some("gone".to_string()),
    });
    assert_eq!(empty.active_session_id(), None);
}

#[test]
fn test_snapshot_matches_state() {
    let mut store = SessionStore::new();
    let id = store.create().id.clone();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.sessions.len(), 1);
    assert_eq!(snapshot.active_session_id, Some(id));
}

#[test]
fn test_time_label_uses_local_time() {
    use chrono::{Local, TimeZone, Utc};

    let mut message = Message::user("When?".to_string());
    message.created_at = Utc.with_ymd_and_hms(2025, 1, 10, 21, 5, 0).unwrap();

    let expected = message
        .created_at
        .with_timezone(&Local)
        .format("%I:%M %p")
        .to_string();
    assert_eq!(message.time_label(), expected);
    assert!(expected.ends_with("AM") || expected.ends_with("PM"));
    assert_eq!(expected.len(), "09:05 PM".len());
}
