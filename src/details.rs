//! Expandable detail panels on the contest, account and contestant lists.

use {
    std::{
        collections::HashMap,
        future::Future,
    },
    crate::{
        api::{
            self,
            AgeRange,
            Backend,
            ContestInfo,
            ContestantInfo,
            UserInfo,
        },
        id::{
            Contestants,
            Contests,
            Id,
            Resource,
            Users,
        },
        lang::Toast,
        prelude::*,
    },
};

/// Result of clicking a detail toggle.
#[derive(Debug, Clone)]
pub(crate) enum PanelUpdate {
    Shown(RawHtml<String>),
    Hidden,
    Failed(Toast),
}

#[derive(Debug, Clone)]
struct Panel {
    html: RawHtml<String>,
    visible: bool,
}

/// Rendered detail fragments, fetched at most once per resource.
pub(crate) struct Panels<R: Resource> {
    cached: HashMap<Id<R>, Panel>,
}

impl<R: Resource> Default for Panels<R> {
    fn default() -> Self {
        Self { cached: HashMap::default() }
    }
}

impl<R: Resource> Panels<R> {
    /// Toggles the panel if it was loaded before, otherwise fetches and shows it. Failed fetches are not cached.
    async fn toggle_or_fetch<Fut: Future<Output = Result<RawHtml<String>, api::Error>>>(&mut self, id: Id<R>, fetch: impl FnOnce() -> Fut) -> PanelUpdate {
        if let Some(panel) = self.cached.get_mut(&id) {
            panel.visible = !panel.visible;
            return if panel.visible { PanelUpdate::Shown(panel.html.clone()) } else { PanelUpdate::Hidden }
        }
        match fetch().await {
            Ok(html) => {
                self.cached.insert(id, Panel { html: html.clone(), visible: true });
                PanelUpdate::Shown(html)
            }
            Err(e) => {
                log::warn!("failed to load details for {} {id}: {e}", R::COLLECTION);
                PanelUpdate::Failed(Toast::request_failed())
            }
        }
    }
}

impl Panels<Contests> {
    pub(crate) async fn get_contest_info(&mut self, backend: &dyn Backend, pk: Id<Contests>) -> PanelUpdate {
        self.toggle_or_fetch(pk, || async move { Ok::<_, api::Error>(render_contest(&backend.contest(pk).await?)) }).await
    }
}

impl Panels<Users> {
    pub(crate) async fn get_user_info(&mut self, backend: &dyn Backend, id: Id<Users>) -> PanelUpdate {
        self.toggle_or_fetch(id, || async move { Ok::<_, api::Error>(render_user(&backend.user(id).await?)) }).await
    }
}

impl Panels<Contestants> {
    pub(crate) async fn get_contestant_info(&mut self, backend: &dyn Backend, id: Id<Contestants>) -> PanelUpdate {
        self.toggle_or_fetch(id, || async move { Ok::<_, api::Error>(render_contestant(&backend.contestant(id).await?)) }).await
    }
}

/// Outcome of deleting a contestant from a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Removal {
    /// The page must be reloaded to reflect the deletion.
    Reload,
    Failed(Toast),
}

pub(crate) async fn remove_contestant(backend: &dyn Backend, id: Id<Contestants>) -> Removal {
    match backend.remove_contestant(id).await {
        Ok(()) => Removal::Reload,
        Err(e) => {
            log::warn!("failed to remove contestant {id}: {e}");
            Removal::Failed(Toast::request_failed())
        }
    }
}

fn age_range_text(range: AgeRange) -> String {
    match range {
        AgeRange::Years { lowest_year, highest_year } => format!("rocznik {lowest_year}–{highest_year}"),
        AgeRange::Ages { age_min, age_max } => format!("{age_min}–{age_max} lat"),
    }
}

pub(crate) fn render_contest(contest: &ContestInfo) -> RawHtml<String> {
    let contact = &contest.organizer.contact;
    html! {
        div(class = "contest-details") {
            h5 : &*contest.name;
            p {
                : "Data: ";
                : contest.date.to_html();
            }
            p : format!("Miejsce: {}", contest.place);
            p : format!("Wiek: {}", age_range_text(contest.age_range));
            p {
                : "Termin zgłoszeń: ";
                : contest.deadline.to_html();
            }
            @if !contest.files.is_empty() {
                ul(class = "contest-files") {
                    @for file in &contest.files {
                        li {
                            a(href = &*file.url) : &*file.name;
                        }
                    }
                }
            }
            p : format!("Organizator: {}", contest.organizer.name);
            @if let Some(ref phone_number) = contact.phone_number {
                p : format!("Telefon: {phone_number}");
            }
            @if let Some(ref email) = contact.email {
                p {
                    : "Email: ";
                    a(href = format!("mailto:{email}")) : &**email;
                }
            }
            @if let Some(ref website) = contact.website {
                p {
                    : "Strona: ";
                    a(href = &**website) : &**website;
                }
            }
            @if !contest.description.is_empty() {
                p(class = "description") : &*contest.description;
            }
        }
    }
}

pub(crate) fn render_user(user: &UserInfo) -> RawHtml<String> {
    html! {
        div(class = "user-details") {
            p : format!("Email: {}", user.email);
            p {
                : "Data dołączenia: ";
                : user.date_joined.to_html();
            }
            @if let Some(ref club) = user.club {
                p : format!("Klub: {club}");
            }
            p : format!("Organizacja: {}", user.organization_name);
            p : format!("Adres organizacji: {}", user.organization_address);
        }
    }
}

pub(crate) fn render_contestant(contestant: &ContestantInfo) -> RawHtml<String> {
    html! {
        div(class = "contestant-details") {
            p : format!("{} {}", contestant.first_name, contestant.last_name);
            p : format!("Płeć: {}", contestant.gender);
            @if let Some(year_of_birth) = contestant.year_of_birth {
                p : format!("Rok urodzenia: {year_of_birth}");
            }
            @if let (None, Some(age)) = (contestant.year_of_birth, contestant.age) {
                p : format!("Wiek: {age}");
            }
            @if !contestant.school.is_empty() {
                p : format!("Szkoła: {}", contestant.school);
            }
            @if !contestant.style.is_empty() {
                p : format!("Styl: {}", contestant.style);
            }
        }
    }
}
