//! # Filler
//! Anything that binds one or more placeholders of a [PartialPrompt].

use crate::prompt::PartialPrompt;
use anyhow::Result;

pub trait FillPlaceholders {
    /// Names of the placeholders this filler binds.
    fn placeholders_to_fill(&self) -> Vec<&str>;
}

pub trait Fill: FillPlaceholders {
    fn fill(&self, partial_prompt: &mut PartialPrompt) -> Result<()>;
}

pub trait FillWith<CTX>: FillPlaceholders {
    fn fill_with(&self, partial_prompt: &mut PartialPrompt, context: CTX) -> Result<CTX>;
}

impl<T: FillWith<()>> Fill for T {
    fn fill(&self, partial_prompt: &mut PartialPrompt) -> Result<()> {
        self.fill_with(partial_prompt, ())
    }
}

/// A fixed list of `(placeholder, value)` bindings.
#[derive(Debug, Clone, Default)]
pub struct Bindings<'a> {
    slots: Vec<(&'a str, &'a str)>,
}

impl<'a> Bindings<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, placeholder: &'a str, value: &'a str) -> Self {
        self.slots.push((placeholder, value));
        self
    }
}

impl FillPlaceholders for Bindings<'_> {
    fn placeholders_to_fill(&self) -> Vec<&str> {
        self.slots.iter().map(|(p, _)| *p).collect()
    }
}

impl FillWith<()> for Bindings<'_> {
    fn fill_with(&self, partial_prompt: &mut PartialPrompt, context: ()) -> Result<()> {
        for (placeholder, value) in &self.slots {
            partial_prompt.try_fill(*placeholder, *value)?;
        }
        Ok(context)
    }
}

#[cfg(test)]
mod test_filler {
    use super::{Bindings, Fill, FillPlaceholders};
    use crate::prompt::PromptTemplate;

    #[test]
    fn test_bindings_fill_all() {
        let template = PromptTemplate::new("{[answer]} -> {[form]}");
        let bindings = Bindings::new().bind("answer", "{\"姓名\":\"王\"}").bind("form", "<form/>");
        assert_eq!(vec!["answer", "form"], bindings.placeholders_to_fill());
        let mut partial = template.construct_prompt();
        bindings.fill(&mut partial).unwrap();
        assert_eq!("{\"姓名\":\"王\"} -> <form/>", partial.complete().unwrap());
    }

    #[test]
    fn test_bindings_unknown_placeholder() {
        let template = PromptTemplate::new("{[answer]}");
        let mut partial = template.construct_prompt();
        let err = partial.fill_with(&Bindings::new().bind("requirement", "x")).expect_err("unknown placeholder");
        assert!(err.to_string().contains("PlaceholderNotExist"));
    }
}
