use crate::modules::session::model::MessageType;

const ALERT_MARKERS: &[&str] = &[
    "alert", "warning", "attention", "urgent", "issue", "error", "❌",
];

const SUCCESS_MARKERS: &[&str] = &[
    "success", "confirmed", "completed", "done", "approved", "✅",
];

/// Picks the display style of an assistant reply.
///
/// Alert markers are checked before success markers, so a reply mentioning
/// both is an alert.
pub fn classify(content: &str) -> MessageType {
    let lower = content.to_lowercase();

    if ALERT_MARKERS.iter().any(|m| lower.contains(m)) {
        return MessageType::Alert;
    }

    if SUCCESS_MARKERS.iter().any(|m| lower.contains(m)) {
        return MessageType::Success;
    }

    MessageType::Default
}
