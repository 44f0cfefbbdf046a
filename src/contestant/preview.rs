use crate::{
    contestant::form::FormId,
    prelude::*,
};

/// Names at least this long are cut to this many characters.
const LABEL_LIMIT: usize = 15;
const ELLIPSIS: &str = "...";

pub(crate) fn truncate_label(name: &str) -> String {
    if name.chars().count() >= LABEL_LIMIT {
        let mut label = name.chars().take(LABEL_LIMIT).collect::<String>();
        label.push_str(ELLIPSIS);
        label
    } else {
        name.to_owned()
    }
}

/// A clickable summary of a contestant form that has passed validation at least once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PreviewChip {
    pub(crate) form: FormId,
    pub(crate) label: String,
}

impl PreviewChip {
    fn render(&self) -> RawHtml<String> {
        html! {
            div(class = "chip", data_form = self.form.to_string()) : &*self.label;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PreviewList {
    chips: Vec<PreviewChip>,
}

impl PreviewList {
    pub(crate) fn get(&self, form: FormId) -> Option<&PreviewChip> {
        self.chips.iter().find(|chip| chip.form == form)
    }

    pub(crate) fn contains(&self, form: FormId) -> bool {
        self.get(form).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.chips.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &PreviewChip> {
        self.chips.iter()
    }

    /// Adds a chip for the form, or relabels the existing one.
    pub(crate) fn upsert(&mut self, form: FormId, name: &str) {
        if !self.refresh(form, name) {
            self.chips.push(PreviewChip { form, label: truncate_label(name) });
        }
    }

    /// Updates the label of an existing chip. Returns `false` if the form has none.
    pub(crate) fn refresh(&mut self, form: FormId, name: &str) -> bool {
        if let Some(chip) = self.chips.iter_mut().find(|chip| chip.form == form) {
            chip.label = truncate_label(name);
            true
        } else {
            false
        }
    }

    pub(crate) fn render(&self) -> RawHtml<String> {
        html! {
            div(id = "contestant-previews") {
                @for chip in &self.chips {
                    : chip.render();
                }
            }
        }
    }
}
