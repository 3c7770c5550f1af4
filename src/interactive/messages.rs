//! Status messages shown in the message bar

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub message_type: MessageType,
    pub text: String,
    pub timestamp: Instant,
}

impl Message {
    pub fn new(message_type: MessageType, text: impl Into<String>) -> Self {
        Self {
            message_type,
            text: text.into(),
            timestamp: Instant::now(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(MessageType::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(MessageType::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(MessageType::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageType::Error, text)
    }

    /// Info and success messages fade after 10 seconds; warnings and errors stay
    pub fn is_expired(&self) -> bool {
        matches!(self.message_type, MessageType::Info | MessageType::Success)
            && self.timestamp.elapsed() > Duration::from_secs(10)
    }

    pub fn icon(&self) -> &str {
        match self.message_type {
            MessageType::Info => "ℹ",
            MessageType::Success => "✓",
            MessageType::Warning => "⚠",
            MessageType::Error => "✗",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icons() {
        assert_eq!(Message::success("ok").icon(), "✓");
        assert_eq!(Message::error("bad").icon(), "✗");
    }

    #[test]
    fn test_fresh_messages_do_not_expire() {
        assert!(!Message::info("hello").is_expired());
        assert!(!Message::error("bad").is_expired());
    }

    #[test]
    fn test_errors_never_expire() {
        let Some(a_minute_ago) = Instant::now().checked_sub(Duration::from_secs(60)) else {
            return;
        };
        let mut message = Message::error("bad");
        message.timestamp = a_minute_ago;
        assert!(!message.is_expired());

        let mut message = Message::success("ok");
        message.timestamp = a_minute_ago;
        assert!(message.is_expired());
    }
}
