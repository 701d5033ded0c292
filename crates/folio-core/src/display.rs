//! Presentation mapping for the public projects section

use serde::Serialize;
use std::str::FromStr;

use crate::content::{ContentItem, ContentType};
use crate::error::{CoreError, Result};
use crate::media::is_video_url;

/// Presentation-ready project card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayItem {
    pub id: String,
    pub title: String,
    pub category: ContentType,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech: Option<Vec<String>>,
}

impl DisplayItem {
    /// Video cards with a playable media URL render a player instead of an image
    pub fn plays_as_video(&self) -> bool {
        self.category == ContentType::Video && self.image.as_deref().is_some_and(is_video_url)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|s| !s.is_empty())
}

impl From<&ContentItem> for DisplayItem {
    fn from(item: &ContentItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            category: item.content_type,
            description: item.description.clone().unwrap_or_default(),
            image: non_empty(&item.media_url),
            link: non_empty(&item.external_link),
            tech: item.tags.clone(),
        }
    }
}

/// Map stored items to cards, or the legacy seed list when nothing is stored
pub fn to_display(items: &[ContentItem]) -> Vec<DisplayItem> {
    if items.is_empty() {
        return legacy_items();
    }
    items.iter().map(DisplayItem::from).collect()
}

/// Filter tab selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(ContentType),
}

impl CategoryFilter {
    pub fn matches(&self, item: &DisplayItem) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(content_type) => item.category == *content_type,
        }
    }

    pub fn apply(&self, items: Vec<DisplayItem>) -> Vec<DisplayItem> {
        match self {
            CategoryFilter::All => items,
            CategoryFilter::Only(_) => items.into_iter().filter(|i| self.matches(i)).collect(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse::<ContentType>()
            .map(CategoryFilter::Only)
            .map_err(|_| CoreError::InvalidCategory(s.to_string()))
    }
}

/// A filter tab shown above the projects grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
}

pub fn categories() -> Vec<Category> {
    let mut tabs = vec![Category { id: "all", name: "All" }];
    for content_type in [ContentType::Website, ContentType::Video, ContentType::Certificate] {
        tabs.push(Category {
            id: content_type.as_str(),
            name: content_type.label(),
        });
    }
    tabs
}

fn legacy(id: &str, title: &str, description: &str, tech: &[&str], image: &str) -> DisplayItem {
    DisplayItem {
        id: id.to_string(),
        title: title.to_string(),
        category: ContentType::Certificate,
        description: description.to_string(),
        image: Some(format!("/assets/certificates/{}", image)),
        link: None,
        tech: Some(tech.iter().map(|t| t.to_string()).collect()),
    }
}

/// Static placeholder cards shown until the store holds content
pub fn legacy_items() -> Vec<DisplayItem> {
    vec![
        legacy(
            "3",
            "AWS Solutions Architecture Job Simulation",
            "Certificate of Completion from AWS & Forage. Completed practical tasks in designing a simple, scalable, hosting architecture over October to November 2025.",
            &["AWS", "Cloud Architecture", "Forage"],
            "aws-solutions-architecture.png",
        ),
        legacy(
            "4",
            "Kaggle Vampire Badge",
            "Badge Certificate from Kaggle. Successfully earned the Vampire badge on Kaggle platform.",
            &["Kaggle", "Data Science"],
            "kaggle-vampire.png",
        ),
        legacy(
            "5",
            "Oracle Certified Foundations Associate",
            "Certificate of Recognition from Oracle University. Oracle Cloud Infrastructure 2025 Certified AI Foundations Associate. Recognized by Oracle Corporation as Oracle Certified.",
            &["Oracle", "AI", "Cloud Infrastructure"],
            "oracle-ai-foundations.png",
        ),
        legacy(
            "6",
            "Hack with UttarPradesh 2025",
            "Certificate of Participation. Actively participated in Hack with UttarPradesh 2025, held on 1st & 2nd November, contributing to innovation, collaboration, & problem-solving. Presented by Chandigarh University Technology Business Incubator.",
            &["Hackathon", "Innovation", "Problem Solving"],
            "hack-uttarpradesh.png",
        ),
        legacy(
            "7",
            "Google Cloud Agentic AI Day",
            "Certificate of Participation from Google Cloud & Hack2skill. Recognized for initiative and contribution to the Agentic AI Day, joining a community of changemakers harnessing Agentic AI to address real-world problems.",
            &["Google Cloud", "Agentic AI", "Hack2skill"],
            "google-cloud-agentic-ai.png",
        ),
        legacy(
            "8",
            "Triwizardathon 1.0 Finalist",
            "Certificate of Participation for successfully qualifying for the Finale Round of Triwizardathon 1.0 organized by Microsoft Learn Student Ambassador - GLA University Chapter, held on 2nd August 2025 at Microsoft Office, Gurugram.",
            &["Microsoft", "MLSA", "Hackathon"],
            "triwizardathon.png",
        ),
        legacy(
            "9",
            "Artificial Intelligence Upskilling Course",
            "Certificate of Course Completion from My Job Grow. Successfully completed the Artificial Intelligence Upskilling Course in January 2025, comprising 15 hours of learning and training.",
            &["AI", "Machine Learning", "My Job Grow"],
            "myjobgrow-ai-course.png",
        ),
        legacy(
            "10",
            "AI Internship - IIT Bombay Techfest",
            "Certificate of Internship Completion from My Job Grow in collaboration with IIT Bombay Techfest. Issued for outstanding achievement in Artificial Intelligence, recognizing successful completion of an internship and advanced projects.",
            &["AI", "IIT Bombay", "Techfest", "Internship"],
            "myjobgrow-techfest-internship.png",
        ),
    ]
}
