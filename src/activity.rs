// ============================================
// src/activity.rs
// Activity types, subject areas and the canned templates
// ============================================

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::form::ValidatedInput;

// --------------------------------------------------
// ActivityType
// --------------------------------------------------

/// The five kinds of starter activity, each shown with an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ActivityType {
    OddOneOut,
    MysteryVisual,
    WeirdFactOrLie,
    WhatIf,
    ConnectionChallenge,
}

impl ActivityType {
    pub const ALL: [ActivityType; 5] = [
        ActivityType::OddOneOut,
        ActivityType::MysteryVisual,
        ActivityType::WeirdFactOrLie,
        ActivityType::WhatIf,
        ActivityType::ConnectionChallenge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ActivityType::OddOneOut => "Odd One Out",
            ActivityType::MysteryVisual => "Mystery Visual",
            ActivityType::WeirdFactOrLie => "Weird Fact or Lie",
            ActivityType::WhatIf => "What If...",
            ActivityType::ConnectionChallenge => "Connection Challenge",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ActivityType::OddOneOut => "🧩",
            ActivityType::MysteryVisual => "🔍",
            ActivityType::WeirdFactOrLie => "⁉️",
            ActivityType::WhatIf => "💭",
            ActivityType::ConnectionChallenge => "🔗",
        }
    }

    /// Uniform draw over [`ActivityType::ALL`].
    pub fn draw<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// --------------------------------------------------
// SubjectArea
// --------------------------------------------------

/// Subject choices offered by the selector, in display order.
pub const SUBJECT_AREAS: &[&str] = &[
    "Mathematics",
    "Science",
    "English",
    "History",
    "Geography",
    "Art",
    "Physical Education",
    "Music",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectArea {
    Mathematics,
    Science,
    English,
    History,
    Geography,
    Art,
    PhysicalEducation,
    Music,
    /// Anything typed outside the fixed list.
    Other(String),
}

impl SubjectArea {
    /// Exact match against the display names; anything else is `Other`.
    pub fn parse(name: &str) -> Self {
        match name {
            "Mathematics" => SubjectArea::Mathematics,
            "Science" => SubjectArea::Science,
            "English" => SubjectArea::English,
            "History" => SubjectArea::History,
            "Geography" => SubjectArea::Geography,
            "Art" => SubjectArea::Art,
            "Physical Education" => SubjectArea::PhysicalEducation,
            "Music" => SubjectArea::Music,
            other => SubjectArea::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SubjectArea::Mathematics => "Mathematics",
            SubjectArea::Science => "Science",
            SubjectArea::English => "English",
            SubjectArea::History => "History",
            SubjectArea::Geography => "Geography",
            SubjectArea::Art => "Art",
            SubjectArea::PhysicalEducation => "Physical Education",
            SubjectArea::Music => "Music",
            SubjectArea::Other(name) => name,
        }
    }
}

impl fmt::Display for SubjectArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// --------------------------------------------------
// GeneratedActivity
// --------------------------------------------------

/// The finished starter activity. Serializes to the generation service
/// response shape: `{type, icon, title, prompt, questions}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedActivity {
    #[serde(rename = "type")]
    pub activity_type: String,
    pub icon: String,
    pub title: String,
    pub prompt: String,
    pub questions: [String; 4],
}

/// Builds the activity for `input` using the given activity type.
pub fn compose(input: &ValidatedInput, activity_type: ActivityType) -> GeneratedActivity {
    GeneratedActivity {
        activity_type: activity_type.name().to_string(),
        icon: activity_type.icon().to_string(),
        title: title_for(activity_type),
        prompt: prompt_for(&input.subject_area, &input.unit_topic),
        questions: questions_for(activity_type, &input.subject_area, &input.unit_topic),
    }
}

/// Every activity type shares the same title suffix.
pub fn title_for(activity_type: ActivityType) -> String {
    format!(
        "{} {} - Which of these doesn't belong?",
        activity_type.icon(),
        activity_type.name()
    )
}

/// MARK: prompt template, chosen by subject
pub fn prompt_for(subject: &SubjectArea, topic: &str) -> String {
    match subject {
        SubjectArea::Mathematics => format!(
            "Look at these four mathematical concepts related to {topic}. Three of them share a common property, but one doesn't fit with the others. Can you identify which one is different and explain why?"
        ),
        SubjectArea::Science => format!(
            "Examine these scientific elements related to {topic}. Which one is the odd one out based on its properties or characteristics?"
        ),
        other => format!(
            "Consider these four items related to {topic} in {other}. One of them doesn't belong with the others. Identify which one and explain your reasoning."
        ),
    }
}

/// MARK: discussion questions, chosen by activity type
pub fn questions_for(activity_type: ActivityType, subject: &SubjectArea, topic: &str) -> [String; 4] {
    match activity_type {
        ActivityType::OddOneOut => [
            "Which item do you think is the odd one out and why?".to_string(),
            "Could any of the other items be considered the odd one out for different reasons?"
                .to_string(),
            "What connections can you find between all four items despite their differences?"
                .to_string(),
            format!("How do these items relate to our current unit on {topic}?"),
        ],
        ActivityType::MysteryVisual => [
            "What do you observe in this visual?".to_string(),
            format!("How does this connect to our study of {topic}?"),
            "What questions does this visual raise for you?".to_string(),
            format!("How might this visual represent a key concept in {subject}?"),
        ],
        ActivityType::WeirdFactOrLie | ActivityType::WhatIf | ActivityType::ConnectionChallenge => [
            format!(
                "What's your initial reaction to this {}?",
                activity_type.name().to_lowercase()
            ),
            format!("How does this connect to what we've been learning about {topic}?"),
            "What new perspective does this give you on the topic?".to_string(),
            format!("How might you apply this thinking to solve problems in {subject}?"),
        ],
    }
}
