//! The multi-step contestant entry page: one sub-form per contestant, a chip per completed form, and switching between them.

use {
    std::mem,
    crate::{
        config::PageConfig,
        prelude::*,
    },
    self::{
        form::{
            ContestantForm,
            Field,
            FormId,
            FormSet,
        },
        preview::PreviewList,
        validation::ContestantValidation,
    },
};

pub(crate) mod form;
pub(crate) mod preview;
pub(crate) mod validation;

/// State of the contestant entry page.
///
/// Exactly one form is visible at a time. A form is in `saved` iff it has a preview chip.
#[derive(Debug, Clone)]
pub(crate) struct Controller {
    individual: bool,
    formset: FormSet,
    previews: PreviewList,
    validation: ContestantValidation,
    visible: FormId,
    saved: BTreeSet<FormId>,
    scroll_to_top: bool,
}

impl Controller {
    pub(crate) fn new(config: &PageConfig) -> Self {
        Self {
            individual: config.individual,
            formset: FormSet::new(config.fields()),
            previews: PreviewList::default(),
            validation: ContestantValidation::new(config),
            visible: FormId(0),
            saved: BTreeSet::default(),
            scroll_to_top: false,
        }
    }

    pub(crate) fn visible_form(&self) -> FormId { self.visible }

    pub(crate) fn total_forms(&self) -> usize { self.formset.total_forms() }

    pub(crate) fn form(&self, id: FormId) -> Option<&ContestantForm> {
        self.formset.get(id)
    }

    pub(crate) fn previews(&self) -> &PreviewList { &self.previews }

    /// User input into the visible form. Returns `false` if the form has no such input.
    pub(crate) fn set_value(&mut self, field: Field, value: impl Into<String>) -> bool {
        self.formset.get_mut(self.visible).is_some_and(|form| form.set_value(field, value))
    }

    /// Validates the given form, or the visible one if `None`.
    pub(crate) fn validate_form(&mut self, id: Option<FormId>) -> bool {
        let id = id.unwrap_or(self.visible);
        let Some(form) = self.formset.get_mut(id) else { return false };
        self.validation.validate(form)
    }

    pub(crate) fn is_already_saved_form(&self, id: Option<FormId>) -> bool {
        self.saved.contains(&id.unwrap_or(self.visible))
    }

    pub(crate) fn is_last_form(&self, id: Option<FormId>) -> bool {
        self.formset.total_forms().checked_sub(id.unwrap_or(self.visible).0) == Some(1)
    }

    fn visible_name(&self) -> String {
        self.formset.get(self.visible).map(ContestantForm::display_name).unwrap_or_default()
    }

    /// Records the visible form as saved and creates its chip, or relabels the chip if it was saved before.
    fn save_visible(&mut self) {
        let name = self.visible_name();
        if self.saved.insert(self.visible) {
            self.previews.upsert(self.visible, &name);
        } else {
            self.previews.refresh(self.visible, &name);
        }
    }

    /// Confirms the visible form and opens a new blank one after it.
    ///
    /// Returns `false` without changing anything if the visible form is invalid or the contest takes a single contestant.
    pub(crate) fn add_next_contestant(&mut self) -> bool {
        if self.individual { return false }
        if !self.validate_form(None) {
            log::debug!("form {} is invalid, not advancing", self.visible);
            return false
        }
        self.save_visible();
        let next = self.formset.push_blank();
        log::debug!("saved form {}, opened form {next}", self.visible);
        self.scroll_to_top = true;
        self.visible = next;
        true
    }

    /// Switches to a previously saved form, as when its chip is clicked.
    ///
    /// A saved visible form must still be valid to be left. The unsaved trailing form is discarded instead.
    pub(crate) fn load_cached_contestant(&mut self, target: FormId) -> bool {
        if !self.previews.contains(target) {
            log::warn!("no saved contestant form {target}");
            return false
        }
        if self.is_already_saved_form(None) {
            if !self.validate_form(None) { return false }
            let name = self.visible_name();
            self.previews.refresh(self.visible, &name);
        } else if self.is_last_form(None) {
            self.formset.remove_trailing(self.visible);
            log::debug!("discarded unsaved form {}", self.visible);
        } else {
            let name = self.visible_name();
            self.previews.refresh(self.visible, &name);
        }
        log::debug!("switched from form {} to form {target}", self.visible);
        self.visible = target;
        true
    }

    /// Whether the viewport should jump to the top since this was last asked. Set by advancing to a new form.
    pub(crate) fn take_scroll_to_top(&mut self) -> bool {
        mem::take(&mut self.scroll_to_top)
    }

    /// Prepares the formset for submission to the backend.
    ///
    /// The visible form is saved if valid. A blank unsaved trailing form is dropped as long as something else was saved.
    /// Returns `None` if the visible form blocks submission; its errors stay annotated.
    pub(crate) fn submission(&mut self) -> Option<Vec<(String, String)>> {
        if self.validate_form(None) {
            self.save_visible();
        } else {
            let blank = self.formset.get(self.visible).is_some_and(ContestantForm::is_blank);
            if !blank || self.is_already_saved_form(None) || !self.is_last_form(None) { return None }
            let &last_saved = self.saved.last()?;
            self.formset.remove_trailing(self.visible);
            log::debug!("discarded blank form {} before submitting", self.visible);
            self.visible = last_saved;
        }
        Some(self.formset.wire_data())
    }

    pub(crate) fn render(&self) -> RawHtml<String> {
        html! {
            div(id = "contestant-formset") {
                @for (name, value) in self.formset.management_form() {
                    input(type = "hidden", id = format!("id_{name}"), name = name, value = value);
                }
                : self.previews.render();
                @for form in self.formset.iter() {
                    : form.render(form.id() == self.visible);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::{
            config::AgeBounds,
            lang::Message,
            util::FieldState,
        },
        super::*,
    };

    fn config(individual: bool) -> PageConfig {
        PageConfig { age_bounds: AgeBounds::Age { min: 11, max: 16 }, individual }
    }

    fn fill(controller: &mut Controller, first_name: &str, last_name: &str) {
        for (field, value) in [
            (Field::FirstName, first_name),
            (Field::LastName, last_name),
            (Field::Gender, "F"),
            (Field::Age, "12"),
            (Field::School, "SP 3"),
            (Field::StylesDistances, "50m grzbietowym"),
        ] {
            assert!(controller.set_value(field, value));
        }
    }

    #[test]
    fn advancing_saves_and_opens_blank_form() {
        let mut controller = Controller::new(&config(false));
        fill(&mut controller, "Aleksandra", "Kowalska");
        assert!(controller.add_next_contestant());
        assert_eq!(controller.total_forms(), 2);
        assert_eq!(controller.visible_form(), FormId(1));
        assert!(controller.is_already_saved_form(Some(FormId(0))));
        assert!(!controller.is_already_saved_form(None));
        assert!(controller.is_last_form(None));
        assert_eq!(controller.previews().get(FormId(0)).map(|chip| chip.label.as_str()), Some("Aleksandra Kowa..."));
        assert!(controller.form(FormId(1)).is_some_and(ContestantForm::is_blank));
        assert!(controller.take_scroll_to_top());
        assert!(!controller.take_scroll_to_top());
    }

    #[test]
    fn invalid_form_blocks_advancing() {
        let mut controller = Controller::new(&config(false));
        fill(&mut controller, "", "Kowalska");
        assert!(!controller.add_next_contestant());
        assert_eq!(controller.total_forms(), 1);
        assert_eq!(controller.visible_form(), FormId(0));
        assert_eq!(controller.previews().len(), 0);
        assert!(!controller.take_scroll_to_top());
        assert_eq!(controller.form(FormId(0)).map(|form| form.state(Field::FirstName)), Some(FieldState::Invalid(Message::Required)));
    }

    #[test]
    fn individual_contest_never_expands() {
        let mut controller = Controller::new(&config(true));
        fill(&mut controller, "Jan", "Kot");
        assert!(!controller.add_next_contestant());
        assert_eq!(controller.total_forms(), 1);
        assert_eq!(controller.previews().len(), 0);
        // no validation pass either
        assert_eq!(controller.form(FormId(0)).map(|form| form.state(Field::FirstName)), Some(FieldState::Unvalidated));
    }

    #[test]
    fn clicking_chip_discards_unsaved_trailing_form() {
        let mut controller = Controller::new(&config(false));
        fill(&mut controller, "Jan", "Kot");
        assert!(controller.add_next_contestant());
        assert_eq!(controller.total_forms(), 2);
        assert!(controller.load_cached_contestant(FormId(0)));
        assert_eq!(controller.total_forms(), 1);
        assert_eq!(controller.visible_form(), FormId(0));
        assert_eq!(controller.previews().len(), 1);
    }

    #[test]
    fn leaving_a_saved_form_requires_it_to_stay_valid() {
        let mut controller = Controller::new(&config(false));
        fill(&mut controller, "Jan", "Kot");
        assert!(controller.add_next_contestant());
        fill(&mut controller, "Anna", "Nowak");
        assert!(controller.add_next_contestant());
        assert!(controller.load_cached_contestant(FormId(0)));
        assert_eq!(controller.total_forms(), 2);
        assert!(controller.set_value(Field::Gender, "X"));
        assert!(!controller.load_cached_contestant(FormId(1)));
        assert_eq!(controller.visible_form(), FormId(0));
        assert!(controller.set_value(Field::Gender, "M"));
        assert!(controller.set_value(Field::FirstName, "Janusz"));
        assert!(controller.load_cached_contestant(FormId(1)));
        assert_eq!(controller.visible_form(), FormId(1));
        assert_eq!(controller.previews().get(FormId(0)).map(|chip| chip.label.as_str()), Some("Janusz Kot"));
    }

    #[test]
    fn advancing_from_a_saved_form_refreshes_its_chip() {
        let mut controller = Controller::new(&config(false));
        fill(&mut controller, "Jan", "Kot");
        assert!(controller.add_next_contestant());
        assert!(controller.load_cached_contestant(FormId(0)));
        assert!(controller.set_value(Field::LastName, "Kotowski"));
        assert!(controller.add_next_contestant());
        assert_eq!(controller.previews().len(), 1);
        assert_eq!(controller.previews().get(FormId(0)).map(|chip| chip.label.as_str()), Some("Jan Kotowski"));
        assert_eq!(controller.visible_form(), FormId(1));
        assert_eq!(controller.total_forms(), 2);
    }

    #[test]
    fn unknown_chip_is_ignored() {
        let mut controller = Controller::new(&config(false));
        assert!(!controller.load_cached_contestant(FormId(4)));
        assert_eq!(controller.total_forms(), 1);
        assert_eq!(controller.visible_form(), FormId(0));
    }

    #[test]
    fn saved_forms_and_chips_stay_in_step() {
        let mut controller = Controller::new(&config(false));
        for name in ["Jan", "Anna", "Ewa"] {
            fill(&mut controller, name, "Nowak");
            assert!(controller.add_next_contestant());
        }
        assert!(controller.load_cached_contestant(FormId(1)));
        for id in 0..controller.total_forms() {
            assert_eq!(controller.is_already_saved_form(Some(FormId(id))), controller.previews().contains(FormId(id)));
        }
    }

    #[test]
    fn submission_drops_blank_trailing_form() {
        let mut controller = Controller::new(&config(false));
        fill(&mut controller, "Jan", "Kowalski");
        assert!(controller.add_next_contestant());
        let data = controller.submission().unwrap();
        assert!(data.contains(&(format!("form-TOTAL_FORMS"), format!("1"))));
        assert!(data.contains(&(format!("form-0-last_name"), format!("Kowalski"))));
        assert_eq!(controller.visible_form(), FormId(0));
    }

    #[test]
    fn submission_saves_valid_visible_form() {
        let mut controller = Controller::new(&config(false));
        fill(&mut controller, "Jan", "Kowalski");
        assert!(controller.add_next_contestant());
        fill(&mut controller, "Anna", "Nowak");
        let data = controller.submission().unwrap();
        assert!(data.contains(&(format!("form-TOTAL_FORMS"), format!("2"))));
        assert!(controller.previews().contains(FormId(1)));
    }

    #[test]
    fn submission_is_blocked_by_partial_form() {
        let mut controller = Controller::new(&config(false));
        fill(&mut controller, "Jan", "Kowalski");
        assert!(controller.add_next_contestant());
        assert!(controller.set_value(Field::FirstName, "Anna"));
        assert!(controller.submission().is_none());
        assert_eq!(controller.total_forms(), 2);
    }

    #[test]
    fn empty_page_cannot_be_submitted() {
        let mut controller = Controller::new(&config(false));
        assert!(controller.submission().is_none());
    }

    #[test]
    fn renders_management_form_and_visible_form() {
        let mut controller = Controller::new(&config(false));
        fill(&mut controller, "Jan", "Kot");
        assert!(controller.add_next_contestant());
        let html = controller.render().0;
        assert!(html.contains("form-TOTAL_FORMS"));
        assert!(html.contains("id_form-1-first_name"));
        assert!(html.contains("chip"));
    }
}
