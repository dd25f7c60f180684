//! UI bridge: fire-and-forget refresh and status notifications.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// Coarse invalidation tag telling views what kind of data changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateTag {
    PlayerMovement,
    TeamFinances,
    NewPhase,
    GameSim,
    GameAttributes,
    Draft,
    Negotiation,
    Playoffs,
}

impl UpdateTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateTag::PlayerMovement => "playerMovement",
            UpdateTag::TeamFinances => "teamFinances",
            UpdateTag::NewPhase => "newPhase",
            UpdateTag::GameSim => "gameSim",
            UpdateTag::GameAttributes => "gameAttributes",
            UpdateTag::Draft => "draft",
            UpdateTag::Negotiation => "negotiation",
            UpdateTag::Playoffs => "playoffs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiMessage {
    Refresh { tags: BTreeSet<UpdateTag>, url: Option<String> },
    Status(String),
}

/// Message sink towards the UI. Nothing is awaited from it.
pub trait UiBridge {
    fn refresh(&mut self, tags: &BTreeSet<UpdateTag>, url: Option<&str>);
    fn status(&mut self, text: &str);
}

/// Collects every message in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingBridge {
    pub messages: Vec<UiMessage>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirects(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                UiMessage::Refresh { url: Some(url), .. } => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                UiMessage::Status(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl UiBridge for RecordingBridge {
    fn refresh(&mut self, tags: &BTreeSet<UpdateTag>, url: Option<&str>) {
        self.messages.push(UiMessage::Refresh { tags: tags.clone(), url: url.map(str::to_string) });
    }

    fn status(&mut self, text: &str) {
        self.messages.push(UiMessage::Status(text.to_string()));
    }
}

/// Forwards messages to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogBridge;

impl UiBridge for LogBridge {
    fn refresh(&mut self, tags: &BTreeSet<UpdateTag>, url: Option<&str>) {
        let tags: Vec<&str> = tags.iter().map(UpdateTag::as_str).collect();
        info!(?tags, url = url.unwrap_or("-"), "ui refresh");
    }

    fn status(&mut self, text: &str) {
        info!(status = text, "ui status");
    }
}

/// Drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBridge;

impl UiBridge for NullBridge {
    fn refresh(&mut self, _tags: &BTreeSet<UpdateTag>, _url: Option<&str>) {}
    fn status(&mut self, _text: &str) {}
}
