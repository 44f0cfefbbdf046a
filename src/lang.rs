//! User-facing texts. The site is Polish-only.

use crate::prelude::*;

/// How long a toast stays on screen.
pub(crate) const TOAST_DURATION: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Message {
    // field annotations
    Required,
    NameLetters,
    LettersOnly,
    Gender,
    NotANumber,
    AgeOutOfRange,
    Email,
    ClubCode,
    TooLong { max: usize },
    // toasts
    AccountCreated,
    AccountRejected,
    RequestFailed,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "To pole jest wymagane."),
            Self::NameLetters => write!(f, "Wpisz co najmniej 3 litery."),
            Self::LettersOnly => write!(f, "Dozwolone są tylko litery."),
            Self::Gender => write!(f, "Wybierz płeć."),
            Self::NotANumber => write!(f, "Podaj liczbę."),
            Self::AgeOutOfRange => write!(f, "Zawodnik nie mieści się w wymaganym przedziale wiekowym."),
            Self::Email => write!(f, "Podaj poprawny adres email."),
            Self::ClubCode => write!(f, "Kod klubu składa się z 5 cyfr."),
            Self::TooLong { max } => write!(f, "Maksymalna długość to {max} znaków."),
            Self::AccountCreated => write!(f, "Utworzono konto"),
            Self::AccountRejected => write!(f, "Odrzucono zgłoszenie"),
            Self::RequestFailed => write!(f, "Ups... wystąpił problem"),
        }
    }
}

/// A short-lived notification shown after a one-shot request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Toast {
    pub(crate) message: Message,
    pub(crate) duration: Duration,
}

impl Toast {
    pub(crate) fn new(message: Message) -> Self {
        Self { message, duration: TOAST_DURATION }
    }

    pub(crate) fn request_failed() -> Self {
        Self::new(Message::RequestFailed)
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.message.fmt(f)
    }
}
