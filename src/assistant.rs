use crate::model::Message;
use rand::seq::SliceRandom;

/// Canned responses standing in for a real model backend.
const REPLIES: &[&str] = &[
    "That's an interesting point. Could you tell me more about it?",
    "I see what you mean. Here's one way to think about it.",
    "Good question! Let me break that down for you.",
    "Thanks for sharing that. What would you like to explore next?",
    "Here's a thought: have you considered looking at it from another angle?",
    "I can help with that. Where would you like to start?",
    "Interesting! There are a few ways to approach this.",
    "Let me summarize what I understood so far.",
];

const IMAGE_REPLY: &str = "Nice image! Is there anything you'd like to know about it?";

/// Pick a simulated reply to a user message.
pub fn reply_to(message: &Message) -> String {
    if message.is_image() {
        return IMAGE_REPLY.to_string();
    }
    let mut rng = rand::thread_rng();
    REPLIES
        .choose(&mut rng)
        .copied()
        .unwrap_or(REPLIES[0])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sender;

    #[test]
    fn text_gets_a_canned_reply() {
        let reply = reply_to(&Message::text(Sender::User, "hello"));
        assert!(REPLIES.contains(&reply.as_str()));
    }

    #[test]
    fn images_get_the_image_acknowledgement() {
        let reply = reply_to(&Message::image(Sender::User, "data:image/png;base64,AA=="));
        assert_eq!(reply, IMAGE_REPLY);
    }
}
