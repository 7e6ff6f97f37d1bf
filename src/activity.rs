//! Just enough of the Bot Framework activity schema to read a Teams message and
//! answer it. Everything is camelCase on the wire.
use serde::{Deserialize, Serialize};

/// Activity type for ordinary chat messages.
pub const MESSAGE: &str = "message";
/// Content type Teams uses to recognize an Adaptive Card attachment.
pub const ADAPTIVE_CARD: &str = "application/vnd.microsoft.card.adaptive";
/// Conversation type for a group chat outside of any team.
pub const GROUP_CHAT: &str = "groupChat";
/// Conversation type for a conversation inside a team.
pub const TEAM: &str = "team";

/// A conversation member. Bot Framework calls this a `ChannelAccount`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Not used for picking; carried so a member list round-trips intact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aad_object_id: Option<String>,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            aad_object_id: None,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_type: Option<String>,
    /// Not used for picking; carried so the conversation round-trips intact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TeamInfo {
    pub id: String,
}

/// The Teams-specific part of an activity. We only care which team it came from.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ChannelData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamInfo>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub content_type: String,
    pub content: serde_json::Value,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Participant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Participant>,
    #[serde(default)]
    pub conversation: ConversationAccount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_data: Option<ChannelData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Activity {
    pub fn is_message(&self) -> bool {
        self.activity_type == MESSAGE
    }

    pub fn conversation_type(&self) -> Option<&str> {
        self.conversation.conversation_type.as_deref()
    }

    pub fn team_id(&self) -> Option<&str> {
        self.channel_data
            .as_ref()
            .and_then(|data| data.team.as_ref())
            .map(|team| team.id.as_str())
    }

    /// Start a message addressed back to the conversation this activity came from.
    fn reply(&self) -> Activity {
        Activity {
            activity_type: MESSAGE.to_string(),
            service_url: self.service_url.clone(),
            channel_id: self.channel_id.clone(),
            from: self.recipient.clone(),
            recipient: self.from.clone(),
            conversation: ConversationAccount {
                id: self.conversation.id.clone(),
                ..ConversationAccount::default()
            },
            reply_to_id: self.id.clone(),
            ..Activity::default()
        }
    }

    pub fn reply_with_text(&self, text: &str) -> Activity {
        Activity {
            text: Some(text.to_string()),
            ..self.reply()
        }
    }

    pub fn reply_with_card(&self, card: serde_json::Value) -> Activity {
        Activity {
            attachments: vec![Attachment {
                content_type: ADAPTIVE_CARD.to_string(),
                content: card,
            }],
            ..self.reply()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEAM_MESSAGE: &str = r#"{
        "type": "message",
        "id": "1571234567890",
        "serviceUrl": "https://smba.trafficmanager.net/amer/",
        "channelId": "msteams",
        "from": { "id": "29:alice", "name": "Alice", "aadObjectId": "aad-alice" },
        "recipient": { "id": "28:randomly", "name": "Randomly" },
        "conversation": {
            "id": "19:general@thread.skype;messageid=1571234567890",
            "conversationType": "team",
            "tenantId": "tenant"
        },
        "channelData": { "team": { "id": "19:team@thread.skype" }, "tenant": { "id": "tenant" } },
        "text": "<at>Randomly</at> who's on dishes?",
        "entities": []
    }"#;

    #[test]
    fn reads_a_teams_message() {
        let activity: Activity = serde_json::from_str(TEAM_MESSAGE).expect("activity should parse");
        assert!(activity.is_message());
        assert_eq!(activity.conversation_type(), Some(TEAM));
        assert_eq!(activity.team_id(), Some("19:team@thread.skype"));
        assert_eq!(
            activity.from.as_ref().and_then(|p| p.aad_object_id.as_deref()),
            Some("aad-alice")
        );
    }

    #[test]
    fn unpicked_fields_survive_a_round_trip() {
        let activity: Activity = serde_json::from_str(TEAM_MESSAGE).unwrap();
        let wire = serde_json::to_value(&activity).unwrap();
        assert_eq!(wire["conversation"]["tenantId"], "tenant");
        assert_eq!(wire["from"]["aadObjectId"], "aad-alice");
        assert!(wire["recipient"].get("aadObjectId").is_none());
    }

    #[test]
    fn sparse_activities_parse() {
        let activity: Activity =
            serde_json::from_str(r#"{ "type": "conversationUpdate" }"#).expect("activity should parse");
        assert!(!activity.is_message());
        assert_eq!(activity.conversation_type(), None);
        assert_eq!(activity.team_id(), None);
    }

    #[test]
    fn replies_go_back_where_they_came_from() {
        let activity: Activity = serde_json::from_str(TEAM_MESSAGE).unwrap();
        let reply = activity.reply_with_text("hello");

        assert!(reply.is_message());
        assert_eq!(reply.conversation.id, activity.conversation.id);
        assert_eq!(reply.reply_to_id.as_deref(), Some("1571234567890"));
        assert_eq!(reply.from.as_ref().map(|p| p.id.as_str()), Some("28:randomly"));
        assert_eq!(reply.recipient.as_ref().map(|p| p.id.as_str()), Some("29:alice"));

        let wire = serde_json::to_value(&reply).unwrap();
        assert_eq!(wire["type"], "message");
        assert_eq!(wire["replyToId"], "1571234567890");
        assert_eq!(wire["text"], "hello");
        assert!(wire.get("attachments").is_none());
        assert!(wire.get("channelData").is_none());
    }

    #[test]
    fn card_replies_carry_one_adaptive_card() {
        let activity: Activity = serde_json::from_str(TEAM_MESSAGE).unwrap();
        let reply = activity.reply_with_card(serde_json::json!({ "type": "AdaptiveCard" }));

        let wire = serde_json::to_value(&reply).unwrap();
        assert_eq!(wire["attachments"][0]["contentType"], ADAPTIVE_CARD);
        assert_eq!(wire["attachments"][0]["content"]["type"], "AdaptiveCard");
        assert!(wire.get("text").is_none());
    }
}
