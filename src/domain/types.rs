// ==========================================
// Link Marketplace - Domain Types
// ==========================================
// Closed enumerations shared by the importer, the pricing engine
// and the repositories. String forms match the database and the
// upload files.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// Site category
// ==========================================
// Serialization: SCREAMING_SNAKE_CASE (same as the database)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Technology,
    Business,
    Health,
    Finance,
    Travel,
    Lifestyle,
    Education,
    News,
    Sports,
    Entertainment,
    Food,
    Fashion,
    RealEstate,
    Automotive,
    General,
}

/// Code and display name of every category, in presentation order.
pub const CATEGORY_TABLE: [(Category, &str, &str); 15] = [
    (Category::Technology, "TECHNOLOGY", "Technology"),
    (Category::Business, "BUSINESS", "Business"),
    (Category::Health, "HEALTH", "Health & Fitness"),
    (Category::Finance, "FINANCE", "Finance"),
    (Category::Travel, "TRAVEL", "Travel"),
    (Category::Lifestyle, "LIFESTYLE", "Lifestyle"),
    (Category::Education, "EDUCATION", "Education"),
    (Category::News, "NEWS", "News & Media"),
    (Category::Sports, "SPORTS", "Sports"),
    (Category::Entertainment, "ENTERTAINMENT", "Entertainment"),
    (Category::Food, "FOOD", "Food & Drink"),
    (Category::Fashion, "FASHION", "Fashion & Beauty"),
    (Category::RealEstate, "REAL_ESTATE", "Real Estate"),
    (Category::Automotive, "AUTOMOTIVE", "Automotive"),
    (Category::General, "GENERAL", "General"),
];

impl Category {
    /// Database/code form, e.g. `REAL_ESTATE`
    pub fn code(&self) -> &'static str {
        CATEGORY_TABLE
            .iter()
            .find(|(c, _, _)| c == self)
            .map(|(_, code, _)| *code)
            .unwrap_or("GENERAL")
    }

    /// Human-facing name, e.g. `Real Estate`
    pub fn display_name(&self) -> &'static str {
        CATEGORY_TABLE
            .iter()
            .find(|(c, _, _)| c == self)
            .map(|(_, _, name)| *name)
            .unwrap_or("General")
    }

    /// Matches a cell value against codes and display names.
    ///
    /// Case-insensitive; spaces, hyphens and underscores are interchangeable.
    pub fn parse_lenient(value: &str) -> Option<Category> {
        let wanted = fold_category_key(value);
        if wanted.is_empty() {
            return None;
        }
        CATEGORY_TABLE
            .iter()
            .find(|(_, code, name)| fold_category_key(code) == wanted || fold_category_key(name) == wanted)
            .map(|(c, _, _)| *c)
    }
}

fn fold_category_key(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|ch| match ch {
            '-' | '_' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse_lenient(s).ok_or_else(|| format!("unknown category: {}", s))
    }
}

// ==========================================
// Site status
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SiteStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteStatus::Active => write!(f, "ACTIVE"),
            SiteStatus::Inactive => write!(f, "INACTIVE"),
        }
    }
}

impl FromStr for SiteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(SiteStatus::Active),
            "INACTIVE" => Ok(SiteStatus::Inactive),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

// ==========================================
// Canonical field
// ==========================================
// Internal name of a site attribute that uploaded headers map onto.
// Declaration order is the template/presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Url,
    DomainAuthority,
    DomainRating,
    SpamScore,
    Traffic,
    Category,
    TurnaroundTime,
    BasePrice,
    Country,
    Language,
    Publisher,
    Status,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 12] = [
        CanonicalField::Url,
        CanonicalField::DomainAuthority,
        CanonicalField::DomainRating,
        CanonicalField::SpamScore,
        CanonicalField::Traffic,
        CanonicalField::Category,
        CanonicalField::TurnaroundTime,
        CanonicalField::BasePrice,
        CanonicalField::Country,
        CanonicalField::Language,
        CanonicalField::Publisher,
        CanonicalField::Status,
    ];

    /// Position in ALL
    pub fn index(&self) -> usize {
        match self {
            CanonicalField::Url => 0,
            CanonicalField::DomainAuthority => 1,
            CanonicalField::DomainRating => 2,
            CanonicalField::SpamScore => 3,
            CanonicalField::Traffic => 4,
            CanonicalField::Category => 5,
            CanonicalField::TurnaroundTime => 6,
            CanonicalField::BasePrice => 7,
            CanonicalField::Country => 8,
            CanonicalField::Language => 9,
            CanonicalField::Publisher => 10,
            CanonicalField::Status => 11,
        }
    }

    /// Wire name used in mapping payloads and validation errors
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Url => "url",
            CanonicalField::DomainAuthority => "domain_authority",
            CanonicalField::DomainRating => "domain_rating",
            CanonicalField::SpamScore => "spam_score",
            CanonicalField::Traffic => "traffic",
            CanonicalField::Category => "category",
            CanonicalField::TurnaroundTime => "turnaround_time",
            CanonicalField::BasePrice => "base_price",
            CanonicalField::Country => "country",
            CanonicalField::Language => "language",
            CanonicalField::Publisher => "publisher",
            CanonicalField::Status => "status",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalField::ALL
            .iter()
            .find(|f| f.as_str() == s.trim())
            .copied()
            .ok_or_else(|| format!("unknown canonical field: {}", s))
    }
}

// ==========================================
// Upload contract (versioned required-field set)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadContract {
    /// Authoritative contract: URL, price, language, category, country, turnaround, publisher
    #[default]
    Current,
    /// Older uploads: URL, price, category, publisher
    Legacy,
}

impl UploadContract {
    pub fn required_fields(&self) -> &'static [CanonicalField] {
        match self {
            UploadContract::Current => &[
                CanonicalField::Url,
                CanonicalField::BasePrice,
                CanonicalField::Language,
                CanonicalField::Category,
                CanonicalField::Country,
                CanonicalField::TurnaroundTime,
                CanonicalField::Publisher,
            ],
            UploadContract::Legacy => &[
                CanonicalField::Url,
                CanonicalField::BasePrice,
                CanonicalField::Category,
                CanonicalField::Publisher,
            ],
        }
    }

    pub fn is_required(&self, field: CanonicalField) -> bool {
        self.required_fields().contains(&field)
    }
}

impl fmt::Display for UploadContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadContract::Current => write!(f, "current"),
            UploadContract::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for UploadContract {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(UploadContract::Current),
            "legacy" => Ok(UploadContract::Legacy),
            other => Err(format!("unknown upload contract: {}", other)),
        }
    }
}

// ==========================================
// Delimited-text dialect
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsvDialect {
    /// Quote-aware parsing through the `csv` crate
    #[default]
    Standard,
    /// Newline/comma split with naive quote stripping
    Legacy,
}

impl fmt::Display for CsvDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvDialect::Standard => write!(f, "standard"),
            CsvDialect::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for CsvDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(CsvDialect::Standard),
            "legacy" => Ok(CsvDialect::Legacy),
            other => Err(format!("unknown csv dialect: {}", other)),
        }
    }
}

// ==========================================
// Template variant (header order of the downloadable CSV)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateVariant {
    #[default]
    Current,
    Legacy,
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateVariant::Current => write!(f, "current"),
            TemplateVariant::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for TemplateVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(TemplateVariant::Current),
            "legacy" => Ok(TemplateVariant::Legacy),
            other => Err(format!("unknown template variant: {}", other)),
        }
    }
}
