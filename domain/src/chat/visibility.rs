//! Which chat surface is on screen.

use super::entities::Channel;

/// Visibility of the two chat surfaces.
///
/// At most one flag is true at any instant. The only mutators are
/// [`show`](Self::show) and [`hide_all`](Self::hide_all), both of which keep
/// that invariant by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelVisibility {
    human_open: bool,
    assistant_open: bool,
}

impl ChannelVisibility {
    pub fn human_open(&self) -> bool {
        self.human_open
    }

    pub fn assistant_open(&self) -> bool {
        self.assistant_open
    }

    pub fn is_open(&self, channel: Channel) -> bool {
        match channel {
            Channel::Human => self.human_open,
            Channel::Assistant => self.assistant_open,
        }
    }

    /// The open channel, if any
    pub fn open_channel(&self) -> Option<Channel> {
        if self.human_open {
            Some(Channel::Human)
        } else if self.assistant_open {
            Some(Channel::Assistant)
        } else {
            None
        }
    }

    /// Show `channel`, hiding the other one first.
    pub fn show(&mut self, channel: Channel) {
        self.hide_all();
        match channel {
            Channel::Human => self.human_open = true,
            Channel::Assistant => self.assistant_open = true,
        }
    }

    pub fn hide_all(&mut self) {
        self.human_open = false;
        self.assistant_open = false;
    }
}
