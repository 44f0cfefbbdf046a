use {
    std::sync::Mutex,
    crate::{
        api::{
            Backend,
            ContestInfo,
            ContestantInfo,
            Error,
            UserInfo,
        },
        id::{
            Contestants,
            Contests,
            Id,
            Users,
        },
        prelude::*,
    },
};

/// In-memory stand-in for the site, answering every request with canned data or failing every request.
#[derive(Default)]
pub(crate) struct MockBackend {
    failing: bool,
    calls: Mutex<Vec<String>>,
    submitted: Mutex<Vec<Vec<(String, String)>>>,
}

impl MockBackend {
    pub(crate) fn failing() -> Self {
        Self { failing: true, ..Self::default() }
    }

    /// Requests made so far, as `METHOD /path`.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Form bodies of the contestant submissions made so far.
    pub(crate) fn submitted(&self) -> Vec<Vec<(String, String)>> {
        self.submitted.lock().unwrap().clone()
    }

    fn record<T>(&self, call: String, response: impl FnOnce() -> T) -> Result<T, Error> {
        self.calls.lock().unwrap().push(call);
        if self.failing {
            Err(Error::Url(url::ParseError::EmptyHost))
        } else {
            Ok(response())
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn manage_user(&self, user: Id<Users>, create: bool) -> Result<(), Error> {
        self.record(format!("{} /administrator/konta/{user}", if create { "POST" } else { "DELETE" }), || ())
    }

    async fn contest(&self, pk: Id<Contests>) -> Result<ContestInfo, Error> {
        self.record(format!("GET {}", pk.api_path()), || serde_json::from_str(r#"{
            "name": "Mistrzostwa Szkół",
            "date": "31.12.2050 10:00",
            "place": "Pływalnia Miejska",
            "lowest_year": 2004,
            "highest_year": 2008,
            "deadline": "20.11.2050 23:59",
            "files": [{"url": "/media/regulamin.pdf", "name": "regulamin.pdf"}],
            "organizer": {"name": "UKS Delfin", "contact": {"email": "delfin@example.pl"}}
        }"#).unwrap())
    }

    async fn user(&self, id: Id<Users>) -> Result<UserInfo, Error> {
        self.record(format!("GET {}", id.api_path()), || serde_json::from_str(r#"{
            "email": "trener@example.pl",
            "date_joined": "01.09.2050 08:30",
            "club": "12345",
            "organization_name": "UKS Delfin",
            "organization_address": "ul. Wodna 1, Kraków"
        }"#).unwrap())
    }

    async fn contestant(&self, id: Id<Contestants>) -> Result<ContestantInfo, Error> {
        self.record(format!("GET {}", id.api_path()), || serde_json::from_str(r#"{
            "first_name": "Anna",
            "last_name": "Nowak",
            "gender": "Kobieta",
            "year_of_birth": 2006,
            "school": "Szkoła podstawowa nr 3",
            "style": "Dowolny 50m"
        }"#).unwrap())
    }

    async fn remove_contestant(&self, id: Id<Contestants>) -> Result<(), Error> {
        self.record(format!("DELETE {}", id.api_path()), || ())
    }

    async fn add_contestants(&self, contest: Id<Contests>, formset: Vec<(String, String)>) -> Result<(), Error> {
        self.record(format!("POST /zawody/{contest}/zawodnicy/dodaj"), || self.submitted.lock().unwrap().push(formset))
    }

    async fn register(&self, _: Vec<(String, String)>) -> Result<(), Error> {
        self.record(format!("POST /register"), || ())
    }
}
