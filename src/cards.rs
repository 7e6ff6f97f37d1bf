//! Announcement cards. The card itself is a handlebars template on disk that
//! renders to Adaptive Card json; this module fills it in.
use handlebars::{Handlebars, Template};
use rand::Rng;
use serde_json::{json, Value};

use std::path::{Path, PathBuf};

use crate::{select_random, Participant, RandomlyError};

/// Where card templates live, relative to the content root.
pub const CARDS_DIR: &str = "Cards";
/// The winner announcement card.
pub const ANNOUNCEMENT_CARD: &str = "AnnouncementCard.hbs";

/// Celebrations to choose from when nobody configured their own.
pub const WINNER_IMAGES: [&str; 5] = [
    "https://media.giphy.com/media/44gu1V41ejJni/giphy.gif",
    "https://media.giphy.com/media/xUOwGmG2pRfFZUmdVe/giphy.gif",
    "https://media.giphy.com/media/3o7bu57lYhUEFiYDSM/giphy.gif",
    "https://media.giphy.com/media/xTiTnz33weTH3K8Uvu/giphy.gif",
    "https://media.giphy.com/media/ZcUGu59vhBGgbBhh0n/giphy.gif",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnouncementCardWinner {
    pub id: String,
    pub name: String,
}

impl From<&Participant> for AnnouncementCardWinner {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id.clone(),
            name: participant.name.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnouncementCardModel {
    pub winners: Vec<AnnouncementCardWinner>,
    pub image_url: String,
}

impl AnnouncementCardModel {
    /// The names the card template gets to see. Anything not listed here is
    /// invisible to the template.
    pub fn to_template_data(&self) -> Value {
        let winners: Vec<Value> = self
            .winners
            .iter()
            .map(|w| json!({ "id": w.id, "name": w.name }))
            .collect();

        json!({
            "model": {
                "imageUrl": self.image_url,
                "winners": winners,
            }
        })
    }
}

/// Escape substituted values as the inside of a json string, so a name with a
/// quote in it can't break the card.
fn json_escape(text: &str) -> String {
    let quoted = Value::from(text).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

/// A card template on disk. It is read and compiled fresh on every render.
#[derive(Clone, Debug)]
pub struct CardTemplate {
    path: PathBuf,
}

impl CardTemplate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The winner announcement card under the given content root.
    pub fn announcement(content_root: impl AsRef<Path>) -> Self {
        Self::new(content_root.as_ref().join(CARDS_DIR).join(ANNOUNCEMENT_CARD))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<String, RandomlyError> {
        std::fs::read_to_string(&self.path).map_err(|source| RandomlyError::TemplateLoad {
            path: self.path.clone(),
            source,
        })
    }

    pub fn render(&self, model: &AnnouncementCardModel) -> Result<String, RandomlyError> {
        let body = self.load()?;
        let template = Template::compile(&body)?;

        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(json_escape);
        handlebars.register_template("card", template);

        let card = handlebars.render("card", &model.to_template_data())?;
        Ok(card)
    }
}

/// Announce the winners: pick a celebration from the image pool and render the
/// card for them.
pub fn render_announcement<R>(
    winners: &[Participant],
    template: &CardTemplate,
    image_pool: &[String],
    rng: &mut R,
) -> Result<String, RandomlyError>
where
    R: Rng + ?Sized,
{
    let image_url = select_random(image_pool, rng)?.clone();
    let model = AnnouncementCardModel {
        winners: winners.iter().map(AnnouncementCardWinner::from).collect(),
        image_url,
    };
    log::debug!("rendering {:?} with {:?}", template.path(), model);
    template.render(&model)
}
