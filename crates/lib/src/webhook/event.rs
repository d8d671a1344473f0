//! Chat event payload POSTed to the webhook receiver.

use serde::{Deserialize, Serialize};

/// A single chat message event. Quoted fields are empty when the message is not a reply;
/// empty quoted fields are left out of the JSON body entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub sender: String,
    pub content: String,
    #[serde(rename = "chatJID")]
    pub chat_jid: String,
    #[serde(rename = "isFromMe")]
    pub is_from_me: bool,
    #[serde(
        rename = "quotedMessageId",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub quoted_message_id: String,
    #[serde(
        rename = "quotedSender",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub quoted_sender: String,
    #[serde(
        rename = "quotedContent",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub quoted_content: String,
}

impl WebhookEvent {
    pub fn new(
        sender: impl Into<String>,
        content: impl Into<String>,
        chat_jid: impl Into<String>,
        is_from_me: bool,
    ) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            chat_jid: chat_jid.into(),
            is_from_me,
            ..Self::default()
        }
    }

    /// Attach the message this event replies to.
    pub fn with_quote(
        mut self,
        message_id: impl Into<String>,
        sender: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.quoted_message_id = message_id.into();
        self.quoted_sender = sender.into();
        self.quoted_content = content.into();
        self
    }

    /// JSON request body.
    pub fn to_body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_str(event: &WebhookEvent) -> String {
        String::from_utf8(event.to_body().unwrap()).unwrap()
    }

    #[test]
    fn minimal_event_omits_quoted_keys() {
        let event = WebhookEvent::new("A", "hello", "C", false);
        assert_eq!(
            body_str(&event),
            r#"{"sender":"A","content":"hello","chatJID":"C","isFromMe":false}"#
        );
    }

    #[test]
    fn quoted_event_has_all_seven_keys() {
        let event = WebhookEvent::new("12025550001", "hi", "12025550001@s.whatsapp.net", false)
            .with_quote("ABC", "12025550002", "prev");
        assert_eq!(
            body_str(&event),
            r#"{"sender":"12025550001","content":"hi","chatJID":"12025550001@s.whatsapp.net","isFromMe":false,"quotedMessageId":"ABC","quotedSender":"12025550002","quotedContent":"prev"}"#
        );
    }

    #[test]
    fn empty_required_fields_are_kept() {
        let event = WebhookEvent::new("", "", "", true);
        assert_eq!(
            body_str(&event),
            r#"{"sender":"","content":"","chatJID":"","isFromMe":true}"#
        );
    }

    #[test]
    fn partial_quote_only_emits_populated_keys() {
        let mut event = WebhookEvent::new("A", "re:", "C", false);
        event.quoted_sender = "B".to_string();
        let v: serde_json::Value = serde_json::from_slice(&event.to_body().unwrap()).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 5);
        assert_eq!(obj.get("quotedSender").and_then(|v| v.as_str()), Some("B"));
        assert!(!obj.contains_key("quotedMessageId"));
        assert!(!obj.contains_key("quotedContent"));
    }

    #[test]
    fn body_is_stable_across_calls() {
        let event = WebhookEvent::new("A", "x", "C", true).with_quote("M1", "B", "orig");
        assert_eq!(event.to_body().unwrap(), event.clone().to_body().unwrap());
    }

    #[test]
    fn deserializes_wire_names_with_missing_quotes() {
        let event: WebhookEvent =
            serde_json::from_str(r#"{"sender":"A","content":"hi","chatJID":"C","isFromMe":true}"#)
                .unwrap();
        assert_eq!(event, WebhookEvent::new("A", "hi", "C", true));
    }
}
