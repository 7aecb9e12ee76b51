//! Contact form draft and the payload sent to the mail relay.

use crate::site::{RELAY_PUBLIC_KEY, RELAY_SERVICE_ID, RELAY_TEMPLATE_ID};
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MessageDraft {
    pub email: String,
    pub name: String,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftField {
    Email,
    Name,
    Message,
}

impl MessageDraft {
    pub fn with_field(&self, field: DraftField, value: String) -> Self {
        let mut next = self.clone();
        match field {
            DraftField::Email => next.email = value,
            DraftField::Name => next.name = value,
            DraftField::Message => next.message = value,
        }
        next
    }

    pub fn is_complete(&self) -> bool {
        let email = self.email.trim();
        let has_address = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));

        has_address && !self.name.trim().is_empty() && !self.message.trim().is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct RelayPayload<'a> {
    pub service_id: &'static str,
    pub template_id: &'static str,
    pub user_id: &'static str,
    pub template_params: &'a MessageDraft,
}

impl<'a> RelayPayload<'a> {
    pub fn new(draft: &'a MessageDraft) -> Self {
        Self {
            service_id: RELAY_SERVICE_ID,
            template_id: RELAY_TEMPLATE_ID,
            user_id: RELAY_PUBLIC_KEY,
            template_params: draft,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayError {
    Network,
    Rejected(u16),
}

impl RelayError {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Rejected(_) => "rejected",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RelayStatus {
    #[default]
    Idle,
    Sending,
    Sent,
    Failed,
}

impl RelayStatus {
    pub fn from_result(result: Result<(), RelayError>) -> Self {
        match result {
            Ok(()) => Self::Sent,
            Err(_) => Self::Failed,
        }
    }

    pub fn status_line(self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Sending => Some("Sending…"),
            Self::Sent => Some("Message sent!"),
            Self::Failed => Some("Failed to send."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> MessageDraft {
        MessageDraft {
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            message: "Hello there".to_string(),
        }
    }

    #[test]
    fn payload_nests_draft_under_template_params() {
        let draft = draft();
        let value = serde_json::to_value(RelayPayload::new(&draft)).expect("serializable");

        assert_eq!(value["service_id"], RELAY_SERVICE_ID);
        assert_eq!(
            value["template_params"],
            json!({ "email": "ada@example.com", "name": "Ada", "message": "Hello there" })
        );
    }

    #[test]
    fn incomplete_drafts_are_rejected() {
        assert!(draft().is_complete());
        assert!(!draft().with_field(DraftField::Email, "ada".to_string()).is_complete());
        assert!(!draft().with_field(DraftField::Name, "  ".to_string()).is_complete());
        assert!(!MessageDraft::default().is_complete());
    }

    #[test]
    fn status_line_reflects_relay_outcome() {
        assert_eq!(RelayStatus::from_result(Ok(())).status_line(), Some("Message sent!"));
        assert_eq!(
            RelayStatus::from_result(Err(RelayError::Rejected(400))).status_line(),
            Some("Failed to send.")
        );
        assert_eq!(RelayStatus::Idle.status_line(), None);
    }
}
