use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of organisation listed in the directory. Drives the sub-page an
/// entry is shown under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    #[serde(rename = "Record Label")]
    RecordLabel,
    #[serde(rename = "Artist")]
    Artist,
    #[serde(rename = "Music Distributor")]
    MusicDistributor,
    #[serde(rename = "Publishing Agency")]
    PublishingAgency,
}

impl EntryType {
    pub const ALL: [EntryType; 4] = [
        EntryType::RecordLabel,
        EntryType::Artist,
        EntryType::MusicDistributor,
        EntryType::PublishingAgency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::RecordLabel => "Record Label",
            EntryType::Artist => "Artist",
            EntryType::MusicDistributor => "Music Distributor",
            EntryType::PublishingAgency => "Publishing Agency",
        }
    }

    /// Path segment of the directory sub-page for this type.
    pub fn slug(&self) -> &'static str {
        match self {
            EntryType::RecordLabel => "labels",
            EntryType::Artist => "artists",
            EntryType::MusicDistributor => "distributors",
            EntryType::PublishingAgency => "publishers",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = UnknownVariant;

    /// Exact, case-sensitive match on the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(UnknownVariant)
    }
}

/// Style token selecting the avatar background of a directory card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BgColor {
    Primary,
    Secondary,
    Accent,
    Dark,
}

impl BgColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BgColor::Primary => "primary",
            BgColor::Secondary => "secondary",
            BgColor::Accent => "accent",
            BgColor::Dark => "dark",
        }
    }
}

impl FromStr for BgColor {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(BgColor::Primary),
            "secondary" => Ok(BgColor::Secondary),
            "accent" => Ok(BgColor::Accent),
            "dark" => Ok(BgColor::Dark),
            _ => Err(UnknownVariant),
        }
    }
}

/// Tab selected on the resource library page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceTab {
    #[default]
    All,
    Guides,
    Tools,
    Templates,
}

impl ResourceTab {
    /// Resource `category` label the tab selects; `None` selects everything.
    pub fn category(&self) -> Option<&'static str> {
        match self {
            ResourceTab::All => None,
            ResourceTab::Guides => Some("Guide"),
            ResourceTab::Tools => Some("Tool"),
            ResourceTab::Templates => Some("Template"),
        }
    }
}

impl FromStr for ResourceTab {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ResourceTab::All),
            "guides" => Ok(ResourceTab::Guides),
            "tools" => Ok(ResourceTab::Tools),
            "templates" => Ok(ResourceTab::Templates),
            _ => Err(UnknownVariant),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownVariant;
