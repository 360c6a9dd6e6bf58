use url::Url;

use crate::CrmError;

/// Root URL of a CRM deployment. Paths are appended verbatim so Django's
/// trailing slashes survive.
#[derive(Debug, Clone)]
pub struct CrmUrl(String);

impl AsRef<str> for CrmUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl CrmUrl {
    pub fn parse(base: &str) -> Result<Self, CrmError> {
        let trimmed = base.trim().trim_end_matches('/');
        Url::parse(trimmed).map_err(|e| CrmError::InvalidUrl(format!("{}: {}", base, e)))?;
        Ok(Self(trimmed.to_string()))
    }

    /// Append the given path to the root URL.
    pub fn append_path(&self, path: &str) -> Result<Url, CrmError> {
        let trimmed_path = path.trim_start_matches('/');
        let joined = format!("{}/{}", self.0, trimmed_path);
        Url::parse(&joined).map_err(|e| CrmError::InvalidUrl(format!("{}: {}", joined, e)))
    }

    pub fn as_url(&self) -> Result<Url, CrmError> {
        Url::parse(&self.0).map_err(|e| CrmError::InvalidUrl(format!("{}: {}", self.0, e)))
    }
}
