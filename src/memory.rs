use crate::message::Message;

/// In-memory transcript storage.
///
/// The first entry is always the system message; `reset` drops everything
/// that came after it.
#[derive(Clone, Debug)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop every message after the leading system message.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    pub fn system_prompt(&self) -> &str {
        &self.messages[0].content
    }
}
