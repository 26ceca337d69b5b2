//! # Tax form assistant
//!
//! The form workflow as a state machine. [FormAssistant::handle] takes the current [SessionState] and one
//! [FormEvent] and returns the next state. The prior state is only read, so a failed model call leaves the
//! caller holding the state it had before the event.

use log::info;

use crate::session::SessionState;
use crate::templates::{build_answer, build_form, build_json, build_questions, fill_form};
use crate::utils::llm::{Generate, InferenceError};

/// Things a user can do in a form session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// Replace the requirement text. No model call.
    SetRequirement(String),
    /// Generate the schema and the HTML form from the requirement.
    BuildForm,
    /// Ask the model for guiding questions about the fields still missing.
    BuildQuestions,
    /// Merge a user utterance into the answer and refill the form.
    UserReply(String),
    /// Start over with an empty session.
    Reset,
}

/// Switches for two orderings whose intent is unclear.
///
/// With both `false`, the form is built from the schema held *before* the current BuildForm, and the
/// question prompt receives the answer in the requirement slot and vice versa.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Build the HTML form from the schema generated in the same BuildForm.
    pub fresh_schema_for_form: bool,
    /// Bind requirement and answer to their own slots of the question prompt.
    pub ordered_question_args: bool,
}

pub struct FormAssistant<M> {
    model: M,
    options: WorkflowOptions,
}

impl<M: Generate> FormAssistant<M> {
    pub fn new(model: M) -> Self {
        Self::with_options(model, WorkflowOptions::default())
    }

    pub fn with_options(model: M, options: WorkflowOptions) -> Self {
        Self { model, options }
    }

    /// Applies `event` to `state` and returns the resulting state.
    pub async fn handle(&self, state: &SessionState, event: FormEvent) -> Result<SessionState, InferenceError> {
        let mut next = state.clone();
        match event {
            FormEvent::SetRequirement(requirement) => next.requirement = requirement,
            FormEvent::BuildForm => self.build_form(&mut next).await?,
            FormEvent::BuildQuestions => {
                let questions = self.questions(&next).await?;
                next.transcript.push_agent(questions);
            }
            FormEvent::UserReply(utterance) => self.user_reply(&mut next, utterance).await?,
            FormEvent::Reset => {
                info!("session reset");
                next = SessionState::default();
            }
        }
        Ok(next)
    }

    async fn build_form(&self, state: &mut SessionState) -> Result<(), InferenceError> {
        info!("building form for requirement of {} chars", state.requirement.chars().count());
        let json_form = self.model.generate(&build_json(&state.requirement)).await?;
        let schema = if self.options.fresh_schema_for_form {
            &json_form
        } else {
            &state.json_form
        };
        let form = self.model.generate(&build_form(&state.requirement, schema)).await?;
        state.json_form = json_form;
        state.filled_form = form.clone();
        state.form = form;
        Ok(())
    }

    async fn questions(&self, state: &SessionState) -> Result<String, InferenceError> {
        info!("generating guiding questions");
        let prompt = if self.options.ordered_question_args {
            build_questions(&state.requirement, &state.answer)
        } else {
            build_questions(&state.answer, &state.requirement)
        };
        self.model.generate(&prompt).await
    }

    async fn user_reply(&self, state: &mut SessionState, utterance: String) -> Result<(), InferenceError> {
        info!("merging reply of {} chars", utterance.chars().count());
        let answer = self.model.generate(&build_answer(&utterance, &state.answer, &state.json_form)).await?;
        state.transcript.push_user(utterance);
        state.answer = answer;
        state.filled_form = self.model.generate(&fill_form(&state.answer, &state.form)).await?;
        let questions = self.questions(state).await?;
        state.transcript.push_agent(questions);
        Ok(())
    }
}
