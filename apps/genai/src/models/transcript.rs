use std::fmt;

use serde::{Deserialize, Serialize};

/// Who spoke a turn of an interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sender {
    Ai,
    Candidate,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::Ai => "AI",
            Sender::Candidate => "CANDIDATE",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn of an interview transcript, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub sender: Sender,
    pub content: String,
}

/// Renders a transcript as one `[SENDER] content` line per turn, order preserved.
pub fn flatten_transcript(turns: &[TranscriptTurn]) -> String {
    turns
        .iter()
        .map(|turn| format!("[{}] {}", turn.sender, turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_wire_names() {
        assert_eq!(serde_json::to_string(&Sender::Ai).unwrap(), "\"AI\"");
        assert_eq!(
            serde_json::from_str::<Sender>("\"CANDIDATE\"").unwrap(),
            Sender::Candidate
        );
    }

    #[test]
    fn test_flatten_keeps_order() {
        let turns = vec![
            TranscriptTurn {
                sender: Sender::Ai,
                content: "Hello, tell me about Kubernetes.".to_string(),
            },
            TranscriptTurn {
                sender: Sender::Candidate,
                content: "I ran clusters for 3 years.".to_string(),
            },
        ];
        assert_eq!(
            flatten_transcript(&turns),
            "[AI] Hello, tell me about Kubernetes.\n[CANDIDATE] I ran clusters for 3 years."
        );
    }

    #[test]
    fn test_flatten_empty() {
        assert_eq!(flatten_transcript(&[]), "");
    }
}
