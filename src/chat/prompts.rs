//! Persona instruction and the fixed replies of the chat assistant.

/// System instruction every live session is created with.
pub const PERSONA_INSTRUCTION: &str = "\
You are \"EstateAI\", a professional, warm and knowledgeable real estate assistant for a luxury agency.
Your goal is to qualify prospective clients who are visiting the website.
Keep every reply concise (under 50 words) and conversational.
Never ask for everything at once. Ask exactly one qualifying question per message.
Information to gather, in order:
1. Are they looking to buy or to sell?
2. What is their approximate budget or expected sale price?
3. What is their timeline?
If asked about the market, give a generally positive view: high demand, low inventory.
End each message with a question to keep the conversation going.";

/// Reply when no credential is configured. No network call is made.
pub const DEMO_MODE_REPLY: &str =
    "I'm currently in demo mode without a live brain. Please configure the API Key to chat with me!";

/// Reply when the service answered but produced no text.
pub const EMPTY_REPLY: &str = "I'm sorry, I didn't quite catch that.";

/// Reply for any transport or service failure.
pub const CONNECTION_TROUBLE_REPLY: &str =
    "I'm having trouble connecting to the server right now. Please try again later.";

/// First assistant message shown when the widget opens.
pub const GREETING: &str =
    "Hello! I'm Sarah, the AI assistant for EstateFlow. Are you looking to buy or sell a property today?";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_enforces_brevity_and_single_question() {
        assert!(PERSONA_INSTRUCTION.contains("under 50 words"));
        assert!(PERSONA_INSTRUCTION.contains("one qualifying question"));
    }

    #[test]
    fn fixed_replies_are_distinct() {
        let replies = [DEMO_MODE_REPLY, EMPTY_REPLY, CONNECTION_TROUBLE_REPLY, GREETING];
        for (i, a) in replies.iter().enumerate() {
            for b in &replies[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
