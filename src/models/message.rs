use serde::{ Serialize, Deserialize };

/// Separator placed between sender and receiver in a conversation key.
pub const KEY_SEPARATOR: &str = "_";

/// A message exchanged between two parties.
///
/// `content` travels as `message` on the wire, so the JSON form is
/// `{"sender": .., "receiver": .., "message": ..}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub receiver: String,
    #[serde(rename = "message")]
    pub content: String,
}

impl Message {
    pub fn new(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        content: impl Into<String>
    ) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            content: content.into(),
        }
    }

    /// Key of the list this message is stored under.
    pub fn conversation_key(&self) -> String {
        conversation_key(&self.sender, &self.receiver)
    }
}

/// Builds the store key for the directed pair `(sender, receiver)`.
///
/// Direction matters: `("alice", "bob")` and `("bob", "alice")` are
/// different conversations.
pub fn conversation_key(sender: &str, receiver: &str) -> String {
    format!("{}{}{}", sender, KEY_SEPARATOR, receiver)
}
