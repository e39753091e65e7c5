use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    Local,
    Remote,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub text: String,
    pub origin: Origin,
}

/// Append-only chat history. Game resets never touch it; only a full page
/// reload starts a fresh transcript.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<ChatEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a locally-typed message after trimming. Empty and
    /// whitespace-only input is rejected, in which case nothing is appended
    /// and nothing should go on the wire.
    pub fn push_local(&mut self, raw: &str) -> Option<String> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        self.entries.push(ChatEntry {
            text: text.to_string(),
            origin: Origin::Local,
        });
        Some(text.to_string())
    }

    pub fn push_remote(&mut self, text: String) {
        self.entries.push(ChatEntry {
            text,
            origin: Origin::Remote,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_messages_are_trimmed_and_appended() {
        let mut transcript = Transcript::new();

        let sent = transcript.push_local("  hi  ");

        assert_eq!(sent.as_deref(), Some("hi"));
        assert_eq!(
            transcript.entries(),
            [ChatEntry {
                text: "hi".to_string(),
                origin: Origin::Local,
            }]
        );
    }

    #[test]
    fn whitespace_only_input_is_rejected() {
        let mut transcript = Transcript::new();

        assert_eq!(transcript.push_local(""), None);
        assert_eq!(transcript.push_local("   \n\t"), None);
        assert!(transcript.is_empty());
    }

    #[test]
    fn remote_replies_append_in_order() {
        let mut transcript = Transcript::new();
        transcript.push_local("hi");
        transcript.push_remote("hello there".to_string());

        let origins: alloc::vec::Vec<Origin> =
            transcript.entries().iter().map(|e| e.origin).collect();

        assert_eq!(origins, [Origin::Local, Origin::Remote]);
    }
}
