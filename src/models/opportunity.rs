use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Listing category. Mirrors the dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Internship,
    Grant,
    Hackathon,
    Job,
    Mentor,
    Event,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Internship,
        Category::Grant,
        Category::Hackathon,
        Category::Job,
        Category::Mentor,
        Category::Event,
    ];

    /// Wire value, as used in the `?category=` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Internship => "internship",
            Category::Grant => "grant",
            Category::Hackathon => "hackathon",
            Category::Job => "job",
            Category::Mentor => "mentor",
            Category::Event => "event",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Category::Internship => "Internship",
            Category::Grant => "Grant",
            Category::Hackathon => "Hackathon",
            Category::Job => "Job",
            Category::Mentor => "Mentor",
            Category::Event => "Event",
        };
        write!(f, "{}", label)
    }
}

/// Server-assigned confidence tag on a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustStatus {
    Official,
    Trusted,
    Unverified,
}

impl std::fmt::Display for TrustStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TrustStatus::Official => "Official",
            TrustStatus::Trusted => "Trusted",
            TrustStatus::Unverified => "Unverified",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    /// Only approved listings are shown to other users.
    pub fn is_visible(&self) -> bool {
        matches!(self, ModerationStatus::Approved)
    }
}

/// A published listing. Read-only projection of server state; all
/// moderation and referential integrity is a server concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Option<String>,
    pub category: Category,
    pub deadline: String,
    pub country: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    pub trust_status: TrustStatus,
    pub moderation_status: ModerationStatus,
    pub created_by: i64,
    pub created_at: String,
}

/// Days before the deadline at which a listing counts as closing soon.
const CLOSING_SOON_DAYS: i64 = 7;

impl Opportunity {
    /// Parse the deadline, which the API sends as `YYYY-MM-DD`.
    pub fn deadline_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.deadline, "%Y-%m-%d").ok()
    }

    /// Days remaining until the deadline; negative once it has passed.
    pub fn days_until_deadline(&self) -> Option<i64> {
        let deadline = self.deadline_date()?;
        Some((deadline - Utc::now().date_naive()).num_days())
    }

    pub fn is_closing_soon(&self) -> bool {
        matches!(self.days_until_deadline(), Some(days) if (0..=CLOSING_SOON_DAYS).contains(&days))
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.days_until_deadline(), Some(days) if days < 0)
    }

    /// Deadline for display: "Aug 12, 2026", falling back to the raw string.
    pub fn formatted_deadline(&self) -> String {
        match self.deadline_date() {
            Some(date) => date.format("%b %d, %Y").to_string(),
            None => self.deadline.clone(),
        }
    }

    /// "City, Country" when a city is present, otherwise just the country.
    pub fn location(&self) -> String {
        match &self.city {
            Some(city) => format!("{}, {}", city, self.country),
            None => self.country.clone(),
        }
    }
}

/// Write shape for POST /opportunities/. Only supplied fields are sent;
/// the server fills in ids, timestamps, and moderation state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOpportunity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}
