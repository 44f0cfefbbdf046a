use {
    derivative::Derivative,
    crate::prelude::*,
};

/// A backend resource addressable by its numeric primary key.
pub(crate) trait Resource {
    /// The collection name under `/api/v1/`.
    const COLLECTION: &'static str;
    /// Whether the detail endpoint is addressed with a trailing slash.
    const TRAILING_SLASH: bool = false;
}

pub(crate) enum Contests {}

impl Resource for Contests {
    const COLLECTION: &'static str = "contests";
    const TRAILING_SLASH: bool = true;
}

pub(crate) enum Contestants {}

impl Resource for Contestants {
    const COLLECTION: &'static str = "contestants";
}

pub(crate) enum Users {}

impl Resource for Users {
    const COLLECTION: &'static str = "users";
}

#[derive(Derivative, Deserialize, Serialize)]
#[derivative(Debug(bound = ""), Clone(bound = ""), Copy(bound = ""), PartialEq(bound = ""), Eq(bound = ""), Hash(bound = ""), PartialOrd(bound = ""), Ord(bound = ""))]
#[serde(from = "u64", into = "u64")]
pub(crate) struct Id<T: Resource> {
    inner: u64,
    _resource: PhantomData<T>,
}

impl<T: Resource> Id<T> {
    /// The REST detail path of this resource, e.g. `/api/v1/users/7`.
    pub(crate) fn api_path(&self) -> String {
        format!("/api/v1/{}/{}{}", T::COLLECTION, self.inner, if T::TRAILING_SLASH { "/" } else { "" })
    }
}

impl<T: Resource> From<u64> for Id<T> {
    fn from(inner: u64) -> Self {
        Self {
            _resource: PhantomData,
            inner,
        }
    }
}

impl<T: Resource> From<Id<T>> for u64 {
    fn from(Id { inner, .. }: Id<T>) -> Self {
        inner
    }
}

impl<T: Resource> FromStr for Id<T> {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self::from)
    }
}

impl<T: Resource> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}
