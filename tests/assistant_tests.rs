/// Assistant tests: the suggested prompts, keyword priority and the
/// conversation history as seen through the public API.
use brand_insights::assistant::{self, Conversation, ResponseKind, Role, SUGGESTIONS};
use chrono::{TimeZone, Utc};

#[test]
fn every_suggestion_hits_a_keyword_group() {
    let kinds: Vec<ResponseKind> = SUGGESTIONS
        .iter()
        .map(|s| assistant::respond(s).unwrap().kind)
        .collect();
    assert_eq!(
        kinds,
        [
            ResponseKind::Insight,
            ResponseKind::Alert,
            ResponseKind::Prediction,
            ResponseKind::Optimization,
        ]
    );
}

#[test]
fn matching_is_substring_and_case_insensitive() {
    // "topic" contains "top"
    assert_eq!(
        assistant::respond("Off TOPIC question").unwrap().kind,
        ResponseKind::Insight
    );
    assert_eq!(
        assistant::respond("FORECAST please").unwrap().kind,
        ResponseKind::Prediction
    );
}

#[test]
fn reply_payloads_render_by_key() {
    let reply = assistant::respond("why did conversions decline").unwrap();
    let rendered: Vec<String> = reply.data.iter().map(|d| d.display()).collect();
    assert_eq!(rendered, ["6,250", "-8%"]);

    let reply = assistant::respond("top campaigns").unwrap();
    assert_eq!(reply.data[0].display(), "$485,000");
}

#[test]
fn fallback_reply_is_general() {
    let reply = assistant::respond("hello").unwrap();
    assert_eq!(reply.kind, ResponseKind::General);
    assert!(reply.data.is_empty());
}

#[test]
fn conversation_ids_keep_increasing() {
    let at = Utc.with_ymd_and_hms(2024, 12, 1, 9, 0, 0).unwrap();
    let mut chat = Conversation::new(at);

    chat.ask("top campaigns", at).unwrap();
    chat.ask("optimize spend", at).unwrap();
    assert!(chat.ask("", at).is_none());

    let ids: Vec<u64> = chat.messages().iter().map(|m| m.id).collect();
    assert_eq!(ids, [1, 2, 3, 4, 5]);
    let roles: Vec<Role> = chat.messages().iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        [Role::Assistant, Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
    assert!(chat.messages().iter().all(|m| m.sent_at == at));
}
