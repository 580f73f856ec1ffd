//! Per-channel transcripts.

use super::entities::{Channel, Message};

/// Ordered transcript for each chat channel.
///
/// Entries are only ever replaced wholesale (history load) or appended;
/// an existing entry is never edited or reordered.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    human: Vec<Message>,
    assistant: Vec<Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn transcript_mut(&mut self, channel: Channel) -> &mut Vec<Message> {
        match channel {
            Channel::Human => &mut self.human,
            Channel::Assistant => &mut self.assistant,
        }
    }

    /// Replace a channel's transcript (history load). Last call wins.
    pub fn replace_all(&mut self, channel: Channel, messages: Vec<Message>) {
        *self.transcript_mut(channel) = messages;
    }

    pub fn append(&mut self, message: Message) {
        self.transcript_mut(message.channel()).push(message);
    }

    pub fn clear(&mut self, channel: Channel) {
        self.transcript_mut(channel).clear();
    }

    pub fn messages(&self, channel: Channel) -> &[Message] {
        match channel {
            Channel::Human => &self.human,
            Channel::Assistant => &self.assistant,
        }
    }

    pub fn len(&self, channel: Channel) -> usize {
        self.messages(channel).len()
    }

    pub fn is_empty(&self, channel: Channel) -> bool {
        self.messages(channel).is_empty()
    }

    pub fn last(&self, channel: Channel) -> Option<&Message> {
        self.messages(channel).last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, minute, 0).unwrap()
    }

    fn human(author: &str, text: &str, minute: u32) -> Message {
        Message::new(author, text, at(minute), Channel::Human)
    }

    #[test]
    fn replace_then_append_keeps_order() {
        let mut store = MessageStore::new();
        let history = vec![human("Ana", "hi", 0), human("Op", "hello", 1)];
        store.replace_all(Channel::Human, history.clone());
        store.append(human("Ana", "thanks", 2));
        store.append(human("Op", "bye", 3));

        let texts: Vec<&str> = store
            .messages(Channel::Human)
            .iter()
            .map(|m| m.text())
            .collect();
        assert_eq!(texts, vec!["hi", "hello", "thanks", "bye"]);
        assert_eq!(&store.messages(Channel::Human)[..2], history.as_slice());
    }

    #[test]
    fn last_replace_wins() {
        let mut store = MessageStore::new();
        store.replace_all(Channel::Human, vec![human("Ana", "old", 0)]);
        store.append(human("Ana", "live", 1));
        store.replace_all(Channel::Human, vec![human("Ana", "new", 2)]);

        assert_eq!(store.len(Channel::Human), 1);
        assert_eq!(store.last(Channel::Human).unwrap().text(), "new");
    }

    #[test]
    fn channels_are_independent() {
        let mut store = MessageStore::new();
        store.append(human("Ana", "hi", 0));
        store.append(Message::assistant("ABC", at(1)));

        store.clear(Channel::Human);
        assert!(store.is_empty(Channel::Human));
        assert_eq!(store.len(Channel::Assistant), 1);
    }
}
