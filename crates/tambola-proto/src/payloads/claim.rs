//! Claim catalog and claim payloads.
//!
//! The catalog is fixed: six winning patterns, each with a wire code and a
//! human-readable label. Validation of a claim is the server's job; these
//! types only name the pattern.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A winning pattern that can be claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimKind {
    /// Any five numbers marked.
    #[serde(rename = "QUICK_5")]
    Quick5,
    /// The four corner numbers marked.
    FourCorners,
    /// Every number on the top row marked.
    FirstLine,
    /// Every number on the middle row marked.
    SecondLine,
    /// Every number on the bottom row marked.
    ThirdLine,
    /// Every number on the ticket marked.
    Tambola,
}

impl ClaimKind {
    /// The full catalog in display order.
    pub const ALL: [Self; 6] = [
        Self::Quick5,
        Self::FourCorners,
        Self::FirstLine,
        Self::SecondLine,
        Self::ThirdLine,
        Self::Tambola,
    ];

    /// Wire code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Quick5 => "QUICK_5",
            Self::FourCorners => "FOUR_CORNERS",
            Self::FirstLine => "FIRST_LINE",
            Self::SecondLine => "SECOND_LINE",
            Self::ThirdLine => "THIRD_LINE",
            Self::Tambola => "TAMBOLA",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Quick5 => "Quick 5",
            Self::FourCorners => "Four Corners",
            Self::FirstLine => "1st Line",
            Self::SecondLine => "2nd Line",
            Self::ThirdLine => "3rd Line",
            Self::Tambola => "Tambola",
        }
    }

    /// Look up a catalog entry by its exact label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    /// Look up a catalog entry by its exact wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names no catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownClaim(pub String);

impl fmt::Display for UnknownClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown claim: {}", self.0)
    }
}

impl std::error::Error for UnknownClaim {}

impl FromStr for ClaimKind {
    type Err = UnknownClaim;

    /// Accepts a wire code or a label, ignoring case, spaces and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|kind| normalize(kind.code()) == wanted || normalize(kind.label()) == wanted)
            .ok_or_else(|| UnknownClaim(s.to_string()))
    }
}

fn normalize(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).map(|c| c.to_ascii_lowercase()).collect()
}

/// Server verdict on a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    /// The claim was valid and nobody had won it yet.
    Success,
    /// The claim does not hold for the claimant's ticket.
    Invalid,
    /// Someone already won this claim.
    Already,
}

/// Claim submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeClaim {
    /// Pattern being claimed.
    pub claim: ClaimKind,
}

/// Claim adjudication.
///
/// `claim` and `player` are required on `SUCCESS`. Rejections carry `claim`
/// when the server echoes it and never carry `player`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimResult {
    /// Verdict.
    pub status: ClaimStatus,
    /// Pattern the verdict is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<ClaimKind>,
    /// Winner's display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
}
