use {
    enum_iterator::{
        Sequence,
        all,
    },
    crate::{
        lang::Message,
        prelude::*,
        util::{
            FieldState,
            form_field,
        },
    },
};

/// The formset prefix the backend binds contestant forms with.
const PREFIX: &str = "form";
const MAX_NUM_FORMS: usize = 1000;

/// Position of a contestant form within its [`FormSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display, derive_more::From, derive_more::FromStr)]
pub(crate) struct FormId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence)]
pub(crate) enum Field {
    FirstName,
    LastName,
    Gender,
    Age,
    YearOfBirth,
    School,
    StylesDistances,
}

impl Field {
    /// The backend's name for this field.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Gender => "gender",
            Self::Age => "age",
            Self::YearOfBirth => "year_of_birth",
            Self::School => "school",
            Self::StylesDistances => "styles_distances",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        all::<Self>().find(|field| field.name() == name)
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "Imię",
            Self::LastName => "Nazwisko",
            Self::Gender => "Płeć (F/M)",
            Self::Age => "Wiek",
            Self::YearOfBirth => "Rok urodzenia",
            Self::School => "Szkoła",
            Self::StylesDistances => "Style i dystanse",
        }
    }

    pub(crate) fn input_name(&self, form: FormId) -> String {
        format!("{PREFIX}-{form}-{}", self.name())
    }

    pub(crate) fn html_id(&self, form: FormId) -> String {
        format!("id_{}", self.input_name(form))
    }
}

#[derive(Debug, Clone, Default)]
struct Input {
    value: String,
    state: FieldState,
}

/// One contestant's sub-form.
#[derive(Debug, Clone)]
pub(crate) struct ContestantForm {
    id: FormId,
    inputs: Vec<(Field, Input)>,
}

impl ContestantForm {
    fn blank(id: FormId, layout: &[Field]) -> Self {
        Self {
            inputs: layout.iter().map(|&field| (field, Input::default())).collect(),
            id,
        }
    }

    pub(crate) fn id(&self) -> FormId { self.id }

    pub(crate) fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.inputs.iter().map(|(field, _)| *field)
    }

    fn input(&self, field: Field) -> Option<&Input> {
        self.inputs.iter().find(|(iter_field, _)| *iter_field == field).map(|(_, input)| input)
    }

    fn input_mut(&mut self, field: Field) -> Option<&mut Input> {
        self.inputs.iter_mut().find(|(iter_field, _)| *iter_field == field).map(|(_, input)| input)
    }

    /// The current value of the input, or the empty string if this form doesn't have it.
    pub(crate) fn value(&self, field: Field) -> &str {
        self.input(field).map_or("", |input| input.value.as_str())
    }

    /// Returns `false` if this form has no such input.
    pub(crate) fn set_value(&mut self, field: Field, value: impl Into<String>) -> bool {
        if let Some(input) = self.input_mut(field) {
            input.value = value.into();
            true
        } else {
            false
        }
    }

    pub(crate) fn state(&self, field: Field) -> FieldState {
        self.input(field).map_or_else(FieldState::default, |input| input.state)
    }

    pub(crate) fn annotate(&mut self, field: Field, result: Result<(), Message>) {
        if let Some(input) = self.input_mut(field) {
            input.state = FieldState::from_check(result);
        }
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.inputs.iter().all(|(_, input)| input.value.is_empty())
    }

    pub(crate) fn display_name(&self) -> String {
        format!("{} {}", self.value(Field::FirstName), self.value(Field::LastName))
    }

    fn wire_data(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.inputs.iter().map(|(field, input)| (field.input_name(self.id), input.value.clone()))
    }

    pub(crate) fn render(&self, visible: bool) -> RawHtml<String> {
        html! {
            div(id = format!("contestant-form-{}", self.id), class = "contestant-form", hidden? = !visible) {
                @for (field, input) in &self.inputs {
                    : form_field(&field.html_id(self.id), &field.input_name(self.id), field.label(), &input.value, input.state);
                }
            }
        }
    }
}

/// The ordered contestant forms of one entry page, following the Django formset convention.
///
/// The `TOTAL_FORMS` counter is derived from the number of forms, so adding or removing a form and updating the counter can't drift apart.
#[derive(Debug, Clone)]
pub(crate) struct FormSet {
    layout: Vec<Field>,
    forms: Vec<ContestantForm>,
}

impl FormSet {
    /// A formset with the single empty form every entry page starts with.
    pub(crate) fn new(layout: Vec<Field>) -> Self {
        let mut formset = Self { layout, forms: Vec::default() };
        formset.push_blank();
        formset
    }

    pub(crate) fn total_forms(&self) -> usize {
        self.forms.len()
    }

    pub(crate) fn get(&self, id: FormId) -> Option<&ContestantForm> {
        self.forms.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: FormId) -> Option<&mut ContestantForm> {
        self.forms.get_mut(id.0)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ContestantForm> {
        self.forms.iter()
    }

    /// Appends an empty form at index `TOTAL_FORMS` and returns its index.
    pub(crate) fn push_blank(&mut self) -> FormId {
        let id = FormId(self.forms.len());
        self.forms.push(ContestantForm::blank(id, &self.layout));
        id
    }

    /// Removes the given form if and only if it is the trailing one.
    pub(crate) fn remove_trailing(&mut self, id: FormId) -> Option<ContestantForm> {
        if self.forms.len().checked_sub(1) == Some(id.0) {
            self.forms.pop()
        } else {
            None
        }
    }

    /// The hidden management fields, e.g. `form-TOTAL_FORMS`.
    pub(crate) fn management_form(&self) -> Vec<(String, String)> {
        vec![
            (format!("{PREFIX}-TOTAL_FORMS"), self.total_forms().to_string()),
            (format!("{PREFIX}-INITIAL_FORMS"), format!("0")),
            (format!("{PREFIX}-MIN_NUM_FORMS"), format!("0")),
            (format!("{PREFIX}-MAX_NUM_FORMS"), MAX_NUM_FORMS.to_string()),
        ]
    }

    /// The full form-encoded payload: management fields followed by every field of every form.
    pub(crate) fn wire_data(&self) -> Vec<(String, String)> {
        let mut data = self.management_form();
        data.extend(self.forms.iter().flat_map(ContestantForm::wire_data));
        data
    }
}
