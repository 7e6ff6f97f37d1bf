//! THE PICKER. This module glues the connector (who's here, post this) to the
//! logic that chooses a winner and dresses them up in a card. It is expected
//! to be consumed by a front end that receives activities; see `faces`.
use anyhow::{Context, Result};

use std::sync::Arc;

use crate::activity::{GROUP_CHAT, TEAM};
use crate::{render_announcement, select_random, Activity, CardTemplate, Config, Connector, Participant, RandomlyError};

/// What we say when asked somewhere we can't help.
pub const FALLBACK: &str = "Sorry my little 🤖 🧠 doesn't handle that yet. I can help you choose a person at random from a group-chat or team to carry some task out. Just add me to a team or group chat and summon me by @ mentioning!";

/// What a turn decided to do with an incoming activity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    /// Not a message; nothing to say.
    Ignore,
    /// Pick somebody from this conversation (or team).
    Pick(String),
    /// Somewhere we don't work, like a one-on-one chat.
    Fallback,
}

/// The bot's app state: anything we want to live through the whole process.
/// Nothing in here changes once built, so it's shared freely between turns.
#[derive(Clone)]
pub struct Randomly {
    connector: Arc<dyn Connector>,
    template: CardTemplate,
    winner_images: Vec<String>,
}

impl Randomly {
    pub fn new(connector: Arc<dyn Connector>, config: &Config) -> Self {
        Randomly {
            connector,
            template: CardTemplate::announcement(&config.content_root),
            winner_images: config.winner_images.clone(),
        }
    }

    /// Decide what kind of turn this is from the activity's envelope.
    pub fn classify(&self, activity: &Activity) -> Result<Turn, RandomlyError> {
        if !activity.is_message() {
            return Ok(Turn::Ignore);
        }

        match activity.conversation_type() {
            Some(GROUP_CHAT) => Ok(Turn::Pick(activity.conversation.id.clone())),
            Some(TEAM) => match activity.team_id() {
                Some(team) => Ok(Turn::Pick(team.to_string())),
                None => Err(RandomlyError::InvalidInput(
                    "team conversation arrived without a team id".to_string(),
                )),
            },
            _ => Ok(Turn::Fallback),
        }
    }

    /// Choose a winner from the members and build the card reply announcing them.
    /// Synchronous on purpose: the thread-local dice must never cross an await.
    pub fn announce(&self, activity: &Activity, members: &[Participant]) -> Result<Activity, RandomlyError> {
        let mut rng = rand::thread_rng();
        let winner = select_random(members, &mut rng)?.clone();
        log::info!("picked {} ({}) from {} members", winner.name, winner.id, members.len());

        let card = render_announcement(&[winner], &self.template, &self.winner_images, &mut rng)?;
        let content: serde_json::Value = serde_json::from_str(&card)?;
        Ok(activity.reply_with_card(content))
    }

    /// Process one incoming activity and reply if it calls for it. Answers
    /// whether we sent anything.
    pub async fn handle_activity(&self, activity: &Activity) -> Result<bool> {
        let turn = self.classify(activity)?;
        if turn == Turn::Ignore {
            log::debug!("skipping {} activity", activity.activity_type);
            return Ok(false);
        }

        let service_url = activity
            .service_url
            .as_deref()
            .context("Activity has no serviceUrl to reply to")?;

        let reply = match turn {
            Turn::Pick(ref conversation) => {
                let members = self
                    .connector
                    .list_members(service_url, conversation)
                    .await
                    .with_context(|| format!("Unable to list members of {}", conversation))?;
                self.announce(activity, &members)?
            }
            Turn::Fallback => {
                log::warn!(
                    "conversation type {:?} is not one we handle; sending help",
                    activity.conversation_type()
                );
                activity.reply_with_text(FALLBACK)
            }
            Turn::Ignore => return Ok(false),
        };

        self.connector.send_activity(service_url, &reply).await?;
        Ok(true)
    }
}
