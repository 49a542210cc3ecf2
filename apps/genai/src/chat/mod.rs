//! Streaming chat: a conversation in, lazily produced text fragments out.
//!
//! Nothing is read from the network until the caller polls the returned
//! stream. Dropping it closes the upstream connection.

use tracing::debug;

use crate::llm_client::{ChatMessage, FragmentStream, GatewayError, ModelGateway};
use crate::models::job::JobPosting;
use crate::models::transcript::{Sender, TranscriptTurn};

pub mod handlers;
pub mod prompts;

use prompts::{INTERVIEWER_SYSTEM_TEMPLATE, OPENING_INSTRUCTION};

pub async fn stream_chat(
    gateway: &dyn ModelGateway,
    messages: Vec<ChatMessage>,
) -> Result<FragmentStream, GatewayError> {
    debug!("Streaming chat over {} messages", messages.len());
    gateway.generate_stream(messages).await
}

/// Conversation for the AI interviewer: a system prompt built from the job and
/// resume, then the history with AI turns as assistant and candidate turns as user.
/// An empty history gets an opening instruction instead.
pub fn interview_messages(
    job: &JobPosting,
    resume_text: &str,
    history: &[TranscriptTurn],
) -> Vec<ChatMessage> {
    let system = job.render(INTERVIEWER_SYSTEM_TEMPLATE, &[("resume_text", resume_text)]);

    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(system));

    if history.is_empty() {
        messages.push(ChatMessage::user(OPENING_INSTRUCTION));
        return messages;
    }

    messages.extend(history.iter().map(|turn| match turn.sender {
        Sender::Ai => ChatMessage::assistant(turn.content.clone()),
        Sender::Candidate => ChatMessage::user(turn.content.clone()),
    }));
    messages
}

/// Streams the interviewer's next turn.
pub async fn stream_interview_reply(
    gateway: &dyn ModelGateway,
    job: &JobPosting,
    resume_text: &str,
    history: &[TranscriptTurn],
) -> Result<FragmentStream, GatewayError> {
    if history.is_empty() {
        debug!("Empty chat history, generating opening question");
    }
    stream_chat(gateway, interview_messages(job, resume_text, history)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::FakeGateway;
    use crate::llm_client::Role;
    use futures::{StreamExt, TryStreamExt};

    fn job() -> JobPosting {
        JobPosting {
            job_title: "SRE".to_string(),
            job_description: "Keep production healthy.".to_string(),
            job_requirements: "On-call experience".to_string(),
        }
    }

    fn turn(sender: Sender, content: &str) -> TranscriptTurn {
        TranscriptTurn {
            sender,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_system_prompt_embeds_job_and_resume() {
        let messages = interview_messages(&job(), "Ran Kafka at scale", &[]);
        assert_eq!(messages[0].role, Role::System);
        let system = &messages[0].content;
        assert!(system.contains("SRE position"));
        assert!(system.contains("Keep production healthy."));
        assert!(system.contains("On-call experience"));
        assert!(system.contains("Ran Kafka at scale"));
    }

    #[test]
    fn test_empty_history_gets_opening_instruction() {
        let messages = interview_messages(&job(), "cv", &[]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], ChatMessage::user(OPENING_INSTRUCTION));
    }

    #[test]
    fn test_history_maps_senders_to_roles_in_order() {
        let history = vec![
            turn(Sender::Ai, "Hello! What is an SLO?"),
            turn(Sender::Candidate, "A target for a service level indicator."),
            turn(Sender::Ai, "How do you pick one?"),
        ];
        let messages = interview_messages(&job(), "cv", &history);
        assert_eq!(
            messages[1..],
            [
                ChatMessage::assistant("Hello! What is an SLO?"),
                ChatMessage::user("A target for a service level indicator."),
                ChatMessage::assistant("How do you pick one?"),
            ]
        );
        assert!(!messages.iter().any(|m| m.content == OPENING_INSTRUCTION));
    }

    #[tokio::test]
    async fn test_stream_preserves_fragment_order() {
        let gateway = FakeGateway::with_fragments(&["Hel", "lo", ", ", "world"]);
        let out: Vec<String> = stream_chat(&gateway, vec![ChatMessage::user("hi")])
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(out, vec!["Hel", "lo", ", ", "world"]);
    }

    #[tokio::test]
    async fn test_partial_consumption() {
        let gateway = FakeGateway::with_fragments(&["a", "b", "c"]);
        let mut stream = stream_interview_reply(&gateway, &job(), "cv", &[])
            .await
            .unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap(), "a");
        drop(stream);

        let sent = gateway.last_prompt().unwrap();
        assert_eq!(sent.last().unwrap().content, OPENING_INSTRUCTION);
    }
}
