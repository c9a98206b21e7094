//! Bundled sample data served when the backend is unreachable or empty.
//!
//! Deadlines are computed relative to today so samples always read as
//! live listings.

use chrono::{Duration, Utc};

use crate::models::{
    Category, Level, ModerationStatus, Opportunity, Person, Profile, TrustStatus,
};

fn deadline_in(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

fn today() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

pub fn sample_opportunities() -> Vec<Opportunity> {
    vec![
        Opportunity {
            id: 1,
            title: "Google STEP Internship 2026".to_string(),
            description: "Summer internship program for first and second year students interested in computer science.".to_string(),
            requirements: None,
            category: Category::Internship,
            deadline: deadline_in(7),
            country: "USA".to_string(),
            city: Some("Mountain View".to_string()),
            source_url: None,
            trust_status: TrustStatus::Official,
            moderation_status: ModerationStatus::Approved,
            created_by: 1,
            created_at: today(),
        },
        Opportunity {
            id: 2,
            title: "Chevening Scholarship".to_string(),
            description: "UK government's international scholarships programme for future leaders.".to_string(),
            requirements: None,
            category: Category::Grant,
            deadline: deadline_in(30),
            country: "UK".to_string(),
            city: Some("London".to_string()),
            source_url: None,
            trust_status: TrustStatus::Official,
            moderation_status: ModerationStatus::Approved,
            created_by: 1,
            created_at: today(),
        },
        Opportunity {
            id: 3,
            title: "HackMIT 2026".to_string(),
            description: "Annual hackathon at MIT bringing together 1000+ hackers from around the world.".to_string(),
            requirements: None,
            category: Category::Hackathon,
            deadline: deadline_in(14),
            country: "USA".to_string(),
            city: Some("Cambridge".to_string()),
            source_url: None,
            trust_status: TrustStatus::Trusted,
            moderation_status: ModerationStatus::Approved,
            created_by: 1,
            created_at: today(),
        },
    ]
}

pub fn sample_profile() -> Profile {
    Profile {
        full_name: Some("John Doe".to_string()),
        country: Some("USA".to_string()),
        city: Some("San Francisco".to_string()),
        university: Some("Stanford University".to_string()),
        level: Some(Level::Bachelor),
        bio: Some(
            "Passionate software engineer and lifelong learner. Currently seeking internship opportunities in tech."
                .to_string(),
        ),
    }
}

pub fn sample_people() -> Vec<Person> {
    vec![
        Person {
            id: 1,
            name: "Alex Johnson".to_string(),
            university: "MIT".to_string(),
            location: "Boston, USA".to_string(),
            skills: vec!["React".to_string(), "Python".to_string(), "ML".to_string()],
            looking_for: "Hackathon team".to_string(),
        },
        Person {
            id: 2,
            name: "Sarah Chen".to_string(),
            university: "Stanford".to_string(),
            location: "Palo Alto, USA".to_string(),
            skills: vec!["UI/UX".to_string(), "Figma".to_string(), "Research".to_string()],
            looking_for: "Startup co-founder".to_string(),
        },
    ]
}
