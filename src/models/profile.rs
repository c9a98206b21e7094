use serde::{Deserialize, Serialize};

/// Study level on a student profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    School,
    Bachelor,
    Master,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Level::School => "School",
            Level::Bachelor => "Bachelor",
            Level::Master => "Master",
        };
        write!(f, "{}", label)
    }
}

/// Student profile with partial-update semantics: every field is optional,
/// and a PUT sends only the fields being changed. Fields left `None` on an
/// update are untouched on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl Profile {
    /// A freshly registered account has an entirely empty profile; such
    /// users are routed through onboarding.
    pub fn needs_onboarding(&self) -> bool {
        self.full_name.is_none()
            && self.country.is_none()
            && self.city.is_none()
            && self.university.is_none()
            && self.level.is_none()
            && self.bio.is_none()
    }

    /// "City, Country" when both are present, otherwise whichever exists.
    pub fn location(&self) -> Option<String> {
        match (&self.city, &self.country) {
            (Some(city), Some(country)) => Some(format!("{}, {}", city, country)),
            (Some(city), None) => Some(city.clone()),
            (None, Some(country)) => Some(country.clone()),
            (None, None) => None,
        }
    }
}
