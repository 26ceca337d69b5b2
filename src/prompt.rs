//! # Prompt
//! A prompt is simply a string.
//!
//! ## PromptTemplate
//! A prompt template is a string with placeholders, for example the instruction templates in
//! [crate::templates]. It is parsed once and shared cheaply.
//!
//! ## Placeholder
//! A placeholder is written `{[name]}`. The name can be anything without a line break.
//!
//! ## PartialPrompt
//! A partial prompt is a template with some placeholders bound. It can only be constructed from a template via
//! [PromptTemplate::construct_prompt]. Bind values with [PartialPrompt::fill], [PartialPrompt::try_fill] or a
//! [Fill](crate::filler::Fill) implementation through [PartialPrompt::fill_with].
//! Once every placeholder is bound, [PartialPrompt::complete] renders the final prompt.


use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use log::warn;
use crate::filler::Fill;
use crate::prompt::errors::{PlaceholderNotExist, UnfilledPlaceholders};
use crate::utils::prompt_processing::{get_placeholders, replace_all_placeholders};


/// A prompt template with some placeholders filled.
#[derive(Debug, Clone)]
#[readonly::make]
pub struct PartialPrompt {
    /// The template of the partial prompt, readonly
    #[readonly]
    pub template: PromptTemplate,

    /// Mapping from placeholder name to its bound value
    pub(crate) placeholder_to_vals: HashMap<String, String>,
}

impl PartialPrompt {
    /// Fill a placeholder with the given value.
    /// Panics if the placeholder does not exist.
    pub fn fill(&mut self, placeholder: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.try_fill(placeholder, value).unwrap()
    }

    /// Fill a placeholder with the given value. Filling it again replaces the previous value.
    /// Returns an error if the placeholder does not exist.
    pub fn try_fill(&mut self, placeholder: impl Into<String>, value: impl Into<String>) -> Result<&mut Self, PlaceholderNotExist> {
        let placeholder = placeholder.into();
        if self.template.placeholders.contains(&placeholder) {
            self.placeholder_to_vals.insert(placeholder, value.into());
            Ok(self)
        } else {
            Err(PlaceholderNotExist::new(placeholder, value, &self.template.placeholders))
        }
    }

    /// Let a filler bind the placeholders it is responsible for.
    pub fn fill_with(&mut self, filler: &impl Fill) -> anyhow::Result<&mut Self> {
        filler.fill(self)?;
        Ok(self)
    }

    /// Placeholders that have no value yet.
    pub fn unfilled_placeholders(&self) -> Vec<&str> {
        let mut unfilled: Vec<&str> = self.template.placeholders.iter()
            .filter(|p| !self.placeholder_to_vals.contains_key(p.as_str()))
            .map(String::as_str)
            .collect();
        unfilled.sort_unstable();
        unfilled
    }

    /// Complete the partial prompt and return the rendered prompt.
    /// Returns an error if there are still unfilled placeholders.
    pub fn complete(&self) -> Result<String, UnfilledPlaceholders> {
        let unfilled = self.unfilled_placeholders();
        if unfilled.is_empty() {
            Ok(replace_all_placeholders(self.template.str(), &self.placeholder_to_vals))
        } else {
            let mut all_placeholders: Vec<String> = self.template.placeholders.iter().cloned().collect();
            all_placeholders.sort_unstable();
            Err(UnfilledPlaceholders {
                all_placeholders,
                unfilled_placeholders: unfilled.into_iter().map(str::to_string).collect(),
            })
        }
    }
}

/// A prompt template with placeholders.
#[derive(Debug, Clone)]
#[readonly::make]
pub struct PromptTemplate {
    template: Arc<String>,

    /// The placeholders in the template, readonly
    #[readonly]
    pub placeholders: HashSet<String>,
}

impl PromptTemplate {
    /// Create a prompt template from a string. Warns if the template does not have any placeholder.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let placeholders = get_placeholders(&template);
        if placeholders.is_empty() {
            warn!("Prompt template has no placeholder, check whether placeholders are written as {{[name]}}. \
            Got prompt template:\n{}", template);
        }
        Self {
            template: Arc::new(template),
            placeholders,
        }
    }

    /// Get the prompt template as a string.
    #[inline]
    pub fn str(&self) -> &str {
        &self.template
    }

    /// Construct a partial prompt with nothing bound yet.
    pub fn construct_prompt(&self) -> PartialPrompt {
        PartialPrompt {
            template: self.clone(),
            placeholder_to_vals: HashMap::with_capacity(self.placeholders.len()),
        }
    }
}

pub mod errors {
    use std::collections::HashSet;
    use thiserror::Error;

    /// Error when trying to complete a partial prompt but there are still unfilled placeholders.
    #[derive(Debug, Error)]
    #[error("UnfilledPlaceholders: to complete the prompt template,\n  Requires Placeholders:{all_placeholders:?}\n  Unfilled Placeholders:{unfilled_placeholders:?}")]
    pub struct UnfilledPlaceholders {
        pub unfilled_placeholders: Vec<String>,
        pub all_placeholders: Vec<String>,
    }

    /// Error when trying to fill a placeholder that does not exist in the template of the partial prompt.
    #[derive(Debug, Error)]
    #[error("PlaceholderNotExist: try to fill placeholder = {try_fill_placeholder} with value = {value}, but available placeholders are {available_placeholders:?}")]
    pub struct PlaceholderNotExist {
        pub try_fill_placeholder: String,
        pub value: String,
        pub available_placeholders: Vec<String>,
    }

    impl PlaceholderNotExist {
        pub(crate) fn new(try_fill_placeholder: impl Into<String>,
                          value: impl Into<String>,
                          available_placeholders: &HashSet<String>) -> Self {
            let mut available_placeholders: Vec<String> = available_placeholders.iter().cloned().collect();
            available_placeholders.sort_unstable();
            PlaceholderNotExist {
                try_fill_placeholder: try_fill_placeholder.into(),
                value: value.into(),
                available_placeholders,
            }
        }
    }
}
