//! The public account request form.

use {
    enum_iterator::{
        Sequence,
        all,
    },
    lazy_regex::regex_is_match,
    crate::{
        api::Backend,
        lang::{
            Message,
            Toast,
        },
        prelude::*,
        util::{
            FieldState,
            checkbox_field,
            form_field,
        },
    },
};

/// Length limit of the name and organization columns.
const MAX_LENGTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
pub(crate) enum RegistrationField {
    Email,
    FirstName,
    LastName,
    OrganizationName,
    OrganizationAddress,
    ClubCode,
}

impl RegistrationField {
    fn name(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::OrganizationName => "organization_name",
            Self::OrganizationAddress => "organization_address",
            Self::ClubCode => "club_code",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Email => "Adres email",
            Self::FirstName => "Imię",
            Self::LastName => "Nazwisko",
            Self::OrganizationName => "Nazwa organizacji",
            Self::OrganizationAddress => "Adres organizacji",
            Self::ClubCode => "Kod klubu",
        }
    }
}

#[derive(Debug, Clone, Default, clap::Args)]
pub(crate) struct RegistrationForm {
    #[clap(long)]
    pub(crate) email: String,
    #[clap(long)]
    pub(crate) first_name: String,
    #[clap(long)]
    pub(crate) last_name: String,
    #[clap(long)]
    pub(crate) organization_name: String,
    #[clap(long)]
    pub(crate) organization_address: String,
    /// Registering on behalf of a swimming club.
    #[clap(long = "club")]
    pub(crate) club_member: bool,
    #[clap(long, default_value = "")]
    pub(crate) club_code: String,
}

impl RegistrationForm {
    pub(crate) fn value(&self, field: RegistrationField) -> &str {
        match field {
            RegistrationField::Email => &self.email,
            RegistrationField::FirstName => &self.first_name,
            RegistrationField::LastName => &self.last_name,
            RegistrationField::OrganizationName => &self.organization_name,
            RegistrationField::OrganizationAddress => &self.organization_address,
            RegistrationField::ClubCode => &self.club_code,
        }
    }

    /// The club code input is shown, and required, only while the club checkbox is checked.
    pub(crate) fn club_code_visible(&self) -> bool {
        self.club_member
    }

    fn check(&self, field: RegistrationField) -> Result<(), Message> {
        let value = self.value(field);
        match field {
            RegistrationField::Email => {
                check_required(value)?;
                if regex_is_match!("^[^@\\s]+@[^@\\s]+$", value) { Ok(()) } else { Err(Message::Email) }
            }
            RegistrationField::FirstName | RegistrationField::LastName => {
                check_required(value)?;
                check_length(value)?;
                check_letters(value)
            }
            RegistrationField::OrganizationName | RegistrationField::OrganizationAddress => {
                check_required(value)?;
                check_length(value)
            }
            RegistrationField::ClubCode => if self.club_code_visible() {
                check_required(value)?;
                if regex_is_match!("^[0-9]{5}$", value) { Ok(()) } else { Err(Message::ClubCode) }
            } else {
                Ok(())
            },
        }
    }

    /// The annotation of every input. The form may be sent iff none of them is invalid.
    pub(crate) fn validate(&self) -> Vec<(RegistrationField, FieldState)> {
        all::<RegistrationField>().map(|field| (field, FieldState::from_check(self.check(field)))).collect()
    }

    pub(crate) fn wire_data(&self) -> Vec<(String, String)> {
        all::<RegistrationField>()
            .filter(|&field| field != RegistrationField::ClubCode || self.club_code_visible())
            .map(|field| (field.name().to_owned(), self.value(field).to_owned()))
            .chain(self.club_member.then(|| (format!("club_checkbox"), format!("on"))))
            .collect()
    }

    pub(crate) fn render(&self, states: &[(RegistrationField, FieldState)]) -> RawHtml<String> {
        let state = |field| states.iter().find(|(iter_field, _)| *iter_field == field).map_or_else(FieldState::default, |(_, state)| *state);
        html! {
            div(id = "register-form") {
                @for field in all::<RegistrationField>().filter(|&field| field != RegistrationField::ClubCode) {
                    : form_field(&format!("id_{}", field.name()), field.name(), field.label(), self.value(field), state(field));
                }
                : checkbox_field("id_club_checkbox", "club_checkbox", "Należę do klubu", self.club_member);
                div(hidden? = !self.club_code_visible()) {
                    : form_field("id_club_code", "club_code", RegistrationField::ClubCode.label(), &self.club_code, state(RegistrationField::ClubCode));
                }
            }
        }
    }
}

fn check_required(value: &str) -> Result<(), Message> {
    if value.is_empty() { Err(Message::Required) } else { Ok(()) }
}

fn check_length(value: &str) -> Result<(), Message> {
    if value.chars().count() > MAX_LENGTH { Err(Message::TooLong { max: MAX_LENGTH }) } else { Ok(()) }
}

/// Unlike contestant names, the whole value must be letters.
fn check_letters(value: &str) -> Result<(), Message> {
    if regex_is_match!("^[A-Za-zżźćńółęąśŻŹĆĄŚĘŁÓŃ ]+$", value) { Ok(()) } else { Err(Message::LettersOnly) }
}

/// Sends the account request if the form is valid. Returns the annotations to display otherwise.
pub(crate) async fn register(backend: &dyn Backend, form: &RegistrationForm) -> Result<Result<(), Toast>, Vec<(RegistrationField, FieldState)>> {
    let states = form.validate();
    if states.iter().any(|(_, state)| state.error().is_some()) { return Err(states) }
    Ok(match backend.register(form.wire_data()).await {
        Ok(()) => {
            log::info!("sent account request for {}", form.email);
            Ok(())
        }
        Err(e) => {
            log::warn!("failed to send account request: {e}");
            Err(Toast::request_failed())
        }
    })
}
