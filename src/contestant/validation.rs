use {
    lazy_regex::regex_is_match,
    crate::{
        config::{
            AgeBounds,
            PageConfig,
        },
        contestant::form::{
            ContestantForm,
            Field,
        },
        lang::Message,
        prelude::*,
    },
};

/// Checks one contestant form at a time and annotates each of its inputs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ContestantValidation {
    age_bounds: AgeBounds,
    individual: bool,
}

impl ContestantValidation {
    pub(crate) fn new(config: &PageConfig) -> Self {
        Self {
            age_bounds: config.age_bounds,
            individual: config.individual,
        }
    }

    /// Runs every field rule, marks each input valid or invalid, and returns whether all of them passed.
    pub(crate) fn validate(&self, form: &mut ContestantForm) -> bool {
        let mut valid = true;
        for field in form.fields().collect_vec() {
            let result = self.check(field, form.value(field));
            valid &= result.is_ok();
            form.annotate(field, result);
        }
        valid
    }

    fn check(&self, field: Field, value: &str) -> Result<(), Message> {
        match field {
            Field::FirstName | Field::LastName => check_name(value),
            Field::Gender => check_gender(value),
            Field::Age | Field::YearOfBirth => check_age(value, self.age_bounds),
            Field::School | Field::StylesDistances => if self.individual { Ok(()) } else { check_required(value) },
        }
    }
}

fn check_required(value: &str) -> Result<(), Message> {
    if value.is_empty() { Err(Message::Required) } else { Ok(()) }
}

/// Passes if the name *contains* a run of at least 3 Latin letters, diacritics included, wherever it occurs.
pub(crate) fn check_name(value: &str) -> Result<(), Message> {
    check_required(value)?;
    if regex_is_match!("[A-Za-zÀ-ÖØ-öø-ž]{3,}", value) { Ok(()) } else { Err(Message::NameLetters) }
}

pub(crate) fn check_gender(value: &str) -> Result<(), Message> {
    match value {
        "F" | "M" => Ok(()),
        _ => Err(Message::Gender),
    }
}

pub(crate) fn check_age(value: &str, bounds: AgeBounds) -> Result<(), Message> {
    check_required(value)?;
    let value = value.trim().parse::<i32>().map_err(|_| Message::NotANumber)?;
    if bounds.contains(value) { Ok(()) } else { Err(Message::AgeOutOfRange) }
}
