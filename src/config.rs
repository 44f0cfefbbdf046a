use {
    std::io,
    tokio::fs,
    crate::{
        api::AgeRange,
        contestant::form::Field,
        prelude::*,
    },
};
#[cfg(unix)] use xdg::BaseDirectories;
#[cfg(windows)] use directories::ProjectDirs;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error(transparent)] Io(#[from] io::Error),
    #[error(transparent)] Json(#[from] serde_json::Error),
    #[error("missing config file")]
    Missing,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub(crate) struct Config {
    pub(crate) base_url: Url,
    #[serde(default)]
    pub(crate) session_id: Option<String>,
    #[serde(default)]
    pub(crate) csrf_token: Option<String>,
    #[serde(default = "default_contestant_add_path")]
    pub(crate) contestant_add_path: String,
    #[serde(default = "default_register_path")]
    pub(crate) register_path: String,
}

fn default_contestant_add_path() -> String { format!("/zawody/{{contest}}/zawodnicy/dodaj") }
fn default_register_path() -> String { format!("/register") }

impl Config {
    pub(crate) async fn load() -> Result<Self, Error> {
        #[cfg(unix)] let config_path = BaseDirectories::new().find_config_file("rush.json");
        #[cfg(windows)] let config_path = ProjectDirs::from("pl", "", "rush").map(|dirs| dirs.config_dir().join("rush.json")).filter(|path| path.exists());
        if let Some(config_path) = config_path {
            let buf = fs::read(config_path).await?;
            Ok(serde_json::from_slice(&buf)?)
        } else {
            Err(Error::Missing)
        }
    }
}

/// Accepted ages or years of birth, both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AgeBounds {
    Age { min: i32, max: i32 },
    YearOfBirth { lowest: i32, highest: i32 },
}

impl AgeBounds {
    pub(crate) fn contains(&self, value: i32) -> bool {
        match *self {
            Self::Age { min, max } => (min..=max).contains(&value),
            Self::YearOfBirth { lowest, highest } => (lowest..=highest).contains(&value),
        }
    }

    /// The form field this range applies to.
    pub(crate) fn field(&self) -> Field {
        match self {
            Self::Age { .. } => Field::Age,
            Self::YearOfBirth { .. } => Field::YearOfBirth,
        }
    }
}

impl From<AgeRange> for AgeBounds {
    fn from(range: AgeRange) -> Self {
        match range {
            AgeRange::Years { lowest_year, highest_year } => Self::YearOfBirth { lowest: lowest_year, highest: highest_year },
            AgeRange::Ages { age_min, age_max } => Self::Age { min: age_min, max: age_max },
        }
    }
}

/// Settings of the contestant entry page for one contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageConfig {
    pub(crate) age_bounds: AgeBounds,
    /// Single-contestant contests have no formset expansion and no school or styles requirement.
    pub(crate) individual: bool,
}

impl PageConfig {
    pub(crate) fn for_contest(age_range: AgeRange, individual: bool) -> Self {
        Self { age_bounds: age_range.into(), individual }
    }

    /// The inputs of one contestant form, in display order.
    pub(crate) fn fields(&self) -> Vec<Field> {
        vec![
            Field::FirstName,
            Field::LastName,
            Field::Gender,
            self.age_bounds.field(),
            Field::School,
            Field::StylesDistances,
        ]
    }
}
