use crate::{
    lang::Message,
    prelude::*,
};

/// Validation status of a single input, mirrored into its `class` and `data-error` attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum FieldState {
    #[default]
    Unvalidated,
    Valid,
    Invalid(Message),
}

impl FieldState {
    pub(crate) fn from_check(result: Result<(), Message>) -> Self {
        match result {
            Ok(()) => Self::Valid,
            Err(message) => Self::Invalid(message),
        }
    }

    pub(crate) fn class(&self) -> Option<&'static str> {
        match self {
            Self::Unvalidated => None,
            Self::Valid => Some("validate valid"),
            Self::Invalid(_) => Some("validate invalid"),
        }
    }

    pub(crate) fn error(&self) -> Option<Message> {
        match self {
            Self::Invalid(message) => Some(*message),
            Self::Unvalidated | Self::Valid => None,
        }
    }
}

pub(crate) fn render_field_error(error: Message) -> RawHtml<String> {
    html! {
        span(class = "helper-text", data_error = error.to_string()) : error.to_string();
    }
}

/// A Materialize `input-field` block with its label and, if invalid, the error annotation.
pub(crate) fn form_field(html_id: &str, name: &str, label: &str, value: &str, state: FieldState) -> RawHtml<String> {
    html! {
        div(class = "input-field") {
            input(id = html_id, type = "text", name = name, value = value, class? = state.class());
            label(for = html_id, class? = (!value.is_empty()).then_some("active")) : label;
            @if let Some(error) = state.error() {
                : render_field_error(error);
            }
        }
    }
}

/// A checkbox bound to a dependent input, as used for the club code on the registration page.
pub(crate) fn checkbox_field(html_id: &str, name: &str, label: &str, checked: bool) -> RawHtml<String> {
    html! {
        p {
            label(for = html_id) {
                input(id = html_id, type = "checkbox", name = name, checked? = checked);
                span : label;
            }
        }
    }
}
