//! # Session state
//!
//! Everything one interactive session knows. Created empty, replaced by the handlers in
//! [crate::assistant] and [crate::chat], dropped with the session.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Chat history for display. Entries are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message { role, content: content.into() });
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Role::User, content)
    }

    pub fn push_agent(&mut self, content: impl Into<String>) {
        self.push(Role::Agent, content)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// State of a form assistant session. Model outputs are stored as returned, never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// What the user needs to file, in their words.
    pub requirement: String,
    /// Schema of the fields to collect, as generated by the model.
    pub json_form: String,
    /// HTML form skeleton.
    pub form: String,
    /// Merged answers so far, as JSON text.
    pub answer: String,
    /// `form` with `answer` written into it.
    pub filled_form: String,
    pub transcript: Transcript,
}

#[cfg(test)]
mod test_session {
    use super::*;

    #[test]
    fn test_transcript_keeps_order() {
        let mut transcript = Transcript::default();
        transcript.push_agent("請問您的姓名？");
        transcript.push_user("王小明");
        transcript.push_agent("謝謝");
        let roles: Vec<Role> = transcript.messages().iter().map(|m| m.role).collect();
        assert_eq!(vec![Role::Agent, Role::User, Role::Agent], roles);
        assert_eq!(Some("謝謝"), transcript.last().map(|m| m.content.as_str()));
        assert_eq!(3, transcript.len());
    }

    #[test]
    fn test_role_names() {
        assert_eq!("user", Role::User.as_str());
        assert_eq!("agent", Role::Agent.as_str());
    }

    #[test]
    fn test_new_session_is_empty() {
        let state = SessionState::default();
        assert!(state.transcript.is_empty());
        assert!(state.answer.is_empty());
    }
}
