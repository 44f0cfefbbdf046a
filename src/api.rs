//! Client side of the Rush REST backend.

use {
    std::sync::Arc,
    reqwest::{
        Method,
        cookie::Jar,
        header::{
            CONTENT_TYPE,
            HeaderName,
            REFERER,
        },
    },
    wheel::traits::ReqwestResponseExt as _,
    crate::{
        config::Config,
        id::{
            Contestants,
            Contests,
            Id,
            Users,
        },
        prelude::*,
        util::Timestamp,
    },
};

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error(transparent)] Reqwest(#[from] reqwest::Error),
    #[error(transparent)] Url(#[from] url::ParseError),
    #[error(transparent)] UrlEncode(#[from] serde_urlencoded::ser::Error),
    #[error(transparent)] Wheel(#[from] wheel::Error),
}

/// Accepted ages as stored on a contest. Older contests use ages, newer ones years of birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum AgeRange {
    Years {
        lowest_year: i32,
        highest_year: i32,
    },
    Ages {
        age_min: i32,
        age_max: i32,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContestFile {
    pub(crate) url: String,
    pub(crate) name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Contact {
    #[serde(default)]
    pub(crate) phone_number: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) website: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Organizer {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) contact: Contact,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContestInfo {
    pub(crate) name: String,
    pub(crate) date: Timestamp,
    pub(crate) place: String,
    #[serde(flatten)]
    pub(crate) age_range: AgeRange,
    pub(crate) deadline: Timestamp,
    #[serde(default)]
    pub(crate) files: Vec<ContestFile>,
    pub(crate) organizer: Organizer,
    #[serde(default)]
    pub(crate) description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserInfo {
    pub(crate) email: String,
    pub(crate) date_joined: Timestamp,
    #[serde(default)]
    pub(crate) club: Option<String>,
    pub(crate) organization_name: String,
    pub(crate) organization_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContestantInfo {
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) gender: String,
    #[serde(default)]
    pub(crate) year_of_birth: Option<i32>,
    #[serde(default)]
    pub(crate) age: Option<i32>,
    #[serde(default)]
    pub(crate) school: String,
    #[serde(default, alias = "styles")]
    pub(crate) style: String,
}

/// The requests the site's scripts make against the backend.
#[async_trait]
pub(crate) trait Backend: Send + Sync {
    /// `POST` (create) or `DELETE` (reject) an account request.
    async fn manage_user(&self, user: Id<Users>, create: bool) -> Result<(), Error>;
    async fn contest(&self, pk: Id<Contests>) -> Result<ContestInfo, Error>;
    async fn user(&self, id: Id<Users>) -> Result<UserInfo, Error>;
    async fn contestant(&self, id: Id<Contestants>) -> Result<ContestantInfo, Error>;
    async fn remove_contestant(&self, id: Id<Contestants>) -> Result<(), Error>;
    /// Submits a contestant formset, already form-encoded.
    async fn add_contestants(&self, contest: Id<Contests>, formset: Vec<(String, String)>) -> Result<(), Error>;
    async fn register(&self, form: Vec<(String, String)>) -> Result<(), Error>;
}

/// A state-changing request, ready to hand to the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Mutation {
    method: Method,
    url: Url,
    headers: Vec<(HeaderName, String)>,
    body: String,
}

/// Addresses and credentials of the site, independent of the HTTP client.
#[derive(Debug, Clone)]
struct Site {
    base_url: Url,
    session_id: Option<String>,
    csrf_token: Option<String>,
    contestant_add_path: String,
    register_path: String,
}

impl Site {
    fn new(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            session_id: config.session_id.clone(),
            csrf_token: config.csrf_token.clone(),
            contestant_add_path: config.contestant_add_path.clone(),
            register_path: config.register_path.clone(),
        }
    }

    /// The Django session and CSRF cookies, scoped to the site.
    fn cookie_jar(&self) -> Jar {
        let jar = Jar::default();
        if let Some(ref session_id) = self.session_id {
            jar.add_cookie_str(&format!("sessionid={session_id}"), &self.base_url);
        }
        if let Some(ref csrf_token) = self.csrf_token {
            jar.add_cookie_str(&format!("csrftoken={csrf_token}"), &self.base_url);
        }
        jar
    }

    /// Carries the CSRF token both as header and as first form field, followed by `form`.
    fn mutation(&self, method: Method, path: &str, mut form: Vec<(String, String)>) -> Result<Mutation, Error> {
        let url = self.base_url.join(path)?;
        // Django rejects HTTPS form posts without a same-origin referer
        let mut headers = vec![
            (REFERER, self.base_url.to_string()),
            (CONTENT_TYPE, format!("application/x-www-form-urlencoded")),
        ];
        if let Some(ref csrf_token) = self.csrf_token {
            headers.push((HeaderName::from_static("x-csrftoken"), csrf_token.clone()));
            form.insert(0, (format!("csrfmiddlewaretoken"), csrf_token.clone()));
        }
        Ok(Mutation { body: serde_urlencoded::to_string(&form)?, method, url, headers })
    }

    fn manage_user(&self, user: Id<Users>, create: bool) -> Result<Mutation, Error> {
        self.mutation(if create { Method::POST } else { Method::DELETE }, &format!("/administrator/konta/{user}"), Vec::default())
    }

    fn remove_contestant(&self, id: Id<Contestants>) -> Result<Mutation, Error> {
        self.mutation(Method::DELETE, &id.api_path(), Vec::default())
    }

    fn add_contestants(&self, contest: Id<Contests>, formset: Vec<(String, String)>) -> Result<Mutation, Error> {
        let path = self.contestant_add_path.replace("{contest}", &contest.to_string());
        self.mutation(Method::POST, &path, formset)
    }

    fn register(&self, form: Vec<(String, String)>) -> Result<Mutation, Error> {
        self.mutation(Method::POST, &self.register_path, form)
    }
}

pub(crate) struct HttpBackend {
    client: reqwest::Client,
    site: Site,
}

impl HttpBackend {
    pub(crate) fn new(config: &Config) -> Result<Self, Error> {
        let site = Site::new(config);
        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("rush/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(30))
                .cookie_provider(Arc::new(site.cookie_jar()))
                .build()?,
            site,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.site.base_url.join(path)?;
        log::debug!("GET {url}");
        Ok(self.client.get(url)
            .query(&[("format", "json")])
            .send().await?
            .detailed_error_for_status().await?
            .json_with_text_in_error().await?)
    }

    async fn send(&self, Mutation { method, url, headers, body }: Mutation) -> Result<(), Error> {
        log::debug!("{method} {url}");
        let mut request = self.client.request(method, url);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        request.body(body)
            .send().await?
            .detailed_error_for_status().await?;
        Ok(())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn manage_user(&self, user: Id<Users>, create: bool) -> Result<(), Error> {
        self.send(self.site.manage_user(user, create)?).await
    }

    async fn contest(&self, pk: Id<Contests>) -> Result<ContestInfo, Error> {
        self.get_json(&pk.api_path()).await
    }

    async fn user(&self, id: Id<Users>) -> Result<UserInfo, Error> {
        self.get_json(&id.api_path()).await
    }

    async fn contestant(&self, id: Id<Contestants>) -> Result<ContestantInfo, Error> {
        self.get_json(&id.api_path()).await
    }

    async fn remove_contestant(&self, id: Id<Contestants>) -> Result<(), Error> {
        self.send(self.site.remove_contestant(id)?).await
    }

    async fn add_contestants(&self, contest: Id<Contests>, formset: Vec<(String, String)>) -> Result<(), Error> {
        self.send(self.site.add_contestants(contest, formset)?).await
    }

    async fn register(&self, form: Vec<(String, String)>) -> Result<(), Error> {
        self.send(self.site.register(form)?).await
    }
}
