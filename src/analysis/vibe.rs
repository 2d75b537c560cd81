//! Rule-based vibe classification.
//!
//! Statistics and the top genres are turned into [`VibeFeatures`], then checked
//! against [`RULES`] in order. The first rule whose predicate holds decides the
//! label; if none does the result is [`VibeLabel::Mixed`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::summary::AnalysisSummary;

pub const PARTY_KEYWORDS: &[&str] = &[
    "party", "dance", "edm", "club", "house", "hip hop", "rap", "reggaeton", "trap",
];
pub const CHILL_KEYWORDS: &[&str] = &[
    "chill", "lo-fi", "lofi", "ambient", "acoustic", "jazz", "soul", "bossa nova", "downtempo",
];
pub const SAD_KEYWORDS: &[&str] = &[
    "sad", "emo", "blues", "melancholy", "indie folk", "slowcore", "singer-songwriter",
];
pub const HAPPY_KEYWORDS: &[&str] = &[
    "happy", "pop", "sunshine", "funk", "disco", "k-pop", "bubblegum",
];
pub const ENERGETIC_KEYWORDS: &[&str] = &[
    "rock", "metal", "punk", "drum and bass", "hardcore", "techno", "electro",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VibeLabel {
    #[serde(rename = "Party Mode")]
    Party,
    #[serde(rename = "Chill Zone")]
    Chill,
    #[serde(rename = "Sad Hours")]
    Sad,
    #[serde(rename = "Happy Vibes")]
    Happy,
    #[serde(rename = "Fast-Paced Energy")]
    FastPaced,
    #[serde(rename = "Mixed Bag")]
    Mixed,
}

impl VibeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VibeLabel::Party => "Party Mode",
            VibeLabel::Chill => "Chill Zone",
            VibeLabel::Sad => "Sad Hours",
            VibeLabel::Happy => "Happy Vibes",
            VibeLabel::FastPaced => "Fast-Paced Energy",
            VibeLabel::Mixed => "Mixed Bag",
        }
    }
}

impl fmt::Display for VibeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of top genres matching each keyword list.
///
/// A genre matching several lists counts towards each of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenreScores {
    pub party: u32,
    pub chill: u32,
    pub sad: u32,
    pub happy: u32,
    pub energetic: u32,
}

impl GenreScores {
    pub fn from_genres<'a, I>(genres: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut scores = Self::default();
        for genre in genres {
            let genre = genre.to_lowercase();
            let hit = |keywords: &[&str]| u32::from(keywords.iter().any(|k| genre.contains(k)));
            scores.party += hit(PARTY_KEYWORDS);
            scores.chill += hit(CHILL_KEYWORDS);
            scores.sad += hit(SAD_KEYWORDS);
            scores.happy += hit(HAPPY_KEYWORDS);
            scores.energetic += hit(ENERGETIC_KEYWORDS);
        }
        scores
    }
}

/// Everything the rules look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibeFeatures {
    pub scores: GenreScores,
    pub avg_popularity: f64,
    pub avg_duration_minutes: f64,
    pub explicit_ratio: f64,
    pub avg_release_year: f64,
}

impl VibeFeatures {
    pub fn is_recent(&self) -> bool {
        self.avg_release_year > 2015.0
    }

    pub fn is_popular(&self) -> bool {
        self.avg_popularity > 60.0
    }

    pub fn is_very_popular(&self) -> bool {
        self.avg_popularity > 80.0
    }

    pub fn is_long(&self) -> bool {
        self.avg_duration_minutes > 4.5
    }
}

pub struct Rule {
    pub label: VibeLabel,
    pub description: &'static str,
    pub matches: fn(&VibeFeatures) -> bool,
}

fn popular_party(f: &VibeFeatures) -> bool {
    f.scores.party >= 1 && f.is_popular()
}

fn chill(f: &VibeFeatures) -> bool {
    f.scores.chill >= 1 || (f.is_long() && f.avg_popularity < 50.0)
}

fn sad(f: &VibeFeatures) -> bool {
    f.scores.sad >= 1 || (f.avg_popularity < 30.0 && !f.is_recent())
}

fn happy(f: &VibeFeatures) -> bool {
    f.scores.happy >= 1 || f.is_very_popular()
}

fn fast_paced(f: &VibeFeatures) -> bool {
    f.scores.energetic >= 1 || (f.avg_duration_minutes < 3.5 && f.is_recent())
}

fn any_party(f: &VibeFeatures) -> bool {
    f.scores.party >= 1
}

/// Decision list, evaluated top to bottom. Order matters.
pub const RULES: &[Rule] = &[
    Rule {
        label: VibeLabel::Party,
        description: "party genres and popularity above 60",
        matches: popular_party,
    },
    Rule {
        label: VibeLabel::Chill,
        description: "chill genres, or long tracks with popularity below 50",
        matches: chill,
    },
    Rule {
        label: VibeLabel::Sad,
        description: "sad genres, or popularity below 30 for older releases",
        matches: sad,
    },
    Rule {
        label: VibeLabel::Happy,
        description: "happy genres, or popularity above 80",
        matches: happy,
    },
    Rule {
        label: VibeLabel::FastPaced,
        description: "energetic genres, or short recent tracks",
        matches: fast_paced,
    },
    Rule {
        label: VibeLabel::Party,
        description: "any party genre",
        matches: any_party,
    },
];

/// Returns the first rule matching `features`, if any.
pub fn first_match(features: &VibeFeatures) -> Option<&'static Rule> {
    RULES.iter().find(|rule| (rule.matches)(features))
}

/// Classifies a set of statistics. Total and deterministic.
pub fn classify(
    top_genres: &[(String, usize)],
    avg_popularity: f64,
    avg_duration_minutes: f64,
    explicit_ratio: f64,
    avg_release_year: f64,
) -> VibeLabel {
    let features = VibeFeatures {
        scores: GenreScores::from_genres(top_genres.iter().map(|(g, _)| g.as_str())),
        avg_popularity,
        avg_duration_minutes,
        explicit_ratio,
        avg_release_year,
    };

    first_match(&features).map_or(VibeLabel::Mixed, |rule| rule.label)
}

pub fn classify_summary(summary: &AnalysisSummary) -> VibeLabel {
    classify(
        &summary.top_genres,
        summary.avg_popularity,
        summary.avg_duration_minutes,
        summary.explicit_ratio,
        summary.avg_release_year,
    )
}
