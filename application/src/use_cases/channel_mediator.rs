//! Channel mediator
//!
//! Sole owner of [`ChannelVisibility`]. Opening one chat surface forces the
//! other closed first; the mediator only toggles flags and tells the
//! controller which channels to tear down.

use duochat_domain::{Channel, ChannelVisibility};

/// What the controller must do after a visibility change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelIntent {
    /// Tear down this channel's socket or reader and clear its transcript
    Close(Channel),
    /// Show this channel's pre-connection view
    Open(Channel),
}

#[derive(Debug, Default)]
pub struct ChannelMediator {
    visibility: ChannelVisibility,
}

impl ChannelMediator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> ChannelVisibility {
        self.visibility
    }

    pub fn open_human(&mut self) -> Vec<ChannelIntent> {
        self.open(Channel::Human)
    }

    pub fn open_assistant(&mut self) -> Vec<ChannelIntent> {
        self.open(Channel::Assistant)
    }

    pub fn close_all(&mut self) -> Vec<ChannelIntent> {
        let intents = self
            .visibility
            .open_channel()
            .map(ChannelIntent::Close)
            .into_iter()
            .collect();
        self.visibility.hide_all();
        intents
    }

    fn open(&mut self, channel: Channel) -> Vec<ChannelIntent> {
        if self.visibility.is_open(channel) {
            return Vec::new();
        }
        let mut intents = Vec::with_capacity(2);
        if self.visibility.is_open(channel.other()) {
            intents.push(ChannelIntent::Close(channel.other()));
        }
        self.visibility.show(channel);
        intents.push(ChannelIntent::Open(channel));
        intents
    }
}
