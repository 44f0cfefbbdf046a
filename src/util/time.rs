use {
    chrono::NaiveDateTime,
    crate::prelude::*,
};

/// The format the REST API renders dates and deadlines in.
pub(crate) const API_DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// A date as sent by the backend. Strings that don't match [`API_DATETIME_FORMAT`] are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub(crate) enum Timestamp {
    Parsed(NaiveDateTime),
    Raw(String),
}

impl From<String> for Timestamp {
    fn from(s: String) -> Self {
        match NaiveDateTime::parse_from_str(&s, API_DATETIME_FORMAT) {
            Ok(datetime) => Self::Parsed(datetime),
            Err(_) => Self::Raw(s),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsed(datetime) => datetime.format(API_DATETIME_FORMAT).fmt(f),
            Self::Raw(s) => s.fmt(f),
        }
    }
}

impl ToHtml for Timestamp {
    fn to_html(&self) -> RawHtml<String> {
        match self {
            Self::Parsed(datetime) => html! {
                span(class = "datetime", data_timestamp = datetime.and_utc().timestamp_millis()) : self.to_string();
            },
            Self::Raw(s) => html! {
                span(class = "datetime") : s;
            },
        }
    }
}
