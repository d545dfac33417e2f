//! Rule-driven recommendations.
//!
//! [`RULES`] is an ordered table of `(guard, template)` pairs. Every rule is
//! evaluated against the score profile, gender and age; firing rules yield one
//! [`AdviceItem`] each, and the result is stably sorted by priority so ties
//! keep table order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::score::{Metric, ScoreProfile};
use crate::types::Gender;

/// Jawline sub-score below which body-composition advice fires.
pub const JAWLINE_THRESHOLD: f64 = 70.0;
/// Eye sub-score below which under-eye advice fires.
pub const EYES_THRESHOLD: f64 = 68.0;
/// Age from which the retinoid/SPF advice fires.
pub const ANTI_AGING_MIN_AGE: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(s)
    }
}

/// When a rule fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Guard {
    Always,
    MetricBelow(Metric, f64),
    GenderIs(Gender),
    AgeAtLeast(u32),
}

impl Guard {
    pub fn holds(&self, scores: &ScoreProfile, gender: Gender, age: u32) -> bool {
        match *self {
            Guard::Always => true,
            Guard::MetricBelow(metric, threshold) => scores.get(metric) < threshold,
            Guard::GenderIs(g) => gender == g,
            Guard::AgeAtLeast(min) => age >= min,
        }
    }
}

/// Static content of a recommendation.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub priority: u8,
    pub category: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub expected_gain: &'static str,
    pub timeline: &'static str,
    pub difficulty: Difficulty,
    /// Gender the item is reserved for; `None` shows it to everyone.
    pub restricted_to: Option<Gender>,
    pub metrics: &'static [Metric],
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub guard: Guard,
    pub template: Template,
}

/// One recommendation. `priority` 1 is the highest impact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceItem {
    pub priority: u8,
    pub category: String,
    pub title: String,
    pub description: String,
    /// Expected overall-score gain, as a range ("+0.3 to +0.8").
    pub expected_gain: String,
    pub timeline: String,
    pub difficulty: Difficulty,
    /// Only shown to `restricted_to`.
    pub gender_restricted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_to: Option<Gender>,
    /// Sub-scores this item addresses; empty for general advice.
    pub metrics: Vec<Metric>,
}

impl From<&Template> for AdviceItem {
    fn from(t: &Template) -> Self {
        Self {
            priority: t.priority,
            category: t.category.to_string(),
            title: t.title.to_string(),
            description: t.description.to_string(),
            expected_gain: t.expected_gain.to_string(),
            timeline: t.timeline.to_string(),
            difficulty: t.difficulty,
            gender_restricted: t.restricted_to.is_some(),
            restricted_to: t.restricted_to,
            metrics: t.metrics.to_vec(),
        }
    }
}

pub static RULES: [Rule; 13] = [
    Rule {
        guard: Guard::MetricBelow(Metric::Jawline, JAWLINE_THRESHOLD),
        template: Template {
            priority: 1,
            category: "Body",
            title: "Lose facial fat",
            description: "The face sheds fat first in a calorie deficit; a leaner face sharpens the jawline.",
            expected_gain: "+0.8 to +2.0",
            timeline: "4-8 weeks",
            difficulty: Difficulty::Hard,
            restricted_to: None,
            metrics: &[Metric::Jawline],
        },
    },
    Rule {
        guard: Guard::MetricBelow(Metric::Jawline, JAWLINE_THRESHOLD),
        template: Template {
            priority: 1,
            category: "Hydration",
            title: "Cut water retention",
            description: "Sodium puffs up the cheeks. Reduce salt and sugar, drink more water.",
            expected_gain: "+0.3 to +0.8",
            timeline: "72 hours",
            difficulty: Difficulty::Easy,
            restricted_to: None,
            metrics: &[Metric::Jawline],
        },
    },
    Rule {
        guard: Guard::Always,
        template: Template {
            priority: 1,
            category: "Posture",
            title: "Fix your posture",
            description: "Forward head posture creates a double chin and hides the jawline.",
            expected_gain: "+0.5 to +1.2",
            timeline: "Immediate",
            difficulty: Difficulty::Easy,
            restricted_to: None,
            metrics: &[Metric::Jawline, Metric::Symmetry],
        },
    },
    Rule {
        guard: Guard::MetricBelow(Metric::Eyes, EYES_THRESHOLD),
        template: Template {
            priority: 2,
            category: "Eyes",
            title: "Treat under-eye area",
            description: "Cold compresses and a caffeine eye serum reduce puffiness and dark circles.",
            expected_gain: "+0.2 to +0.5",
            timeline: "2-4 weeks",
            difficulty: Difficulty::Medium,
            restricted_to: None,
            metrics: &[Metric::Eyes],
        },
    },
    Rule {
        guard: Guard::Always,
        template: Template {
            priority: 2,
            category: "Skincare",
            title: "AM/PM skincare routine",
            description: "Cleanser, vitamin C, then SPF 50 in the morning; cleanser and moisturizer at night.",
            expected_gain: "+0.3 to +0.8",
            timeline: "4 weeks",
            difficulty: Difficulty::Easy,
            restricted_to: None,
            metrics: &[Metric::DetectionQuality],
        },
    },
    Rule {
        guard: Guard::Always,
        template: Template {
            priority: 2,
            category: "Sleep",
            title: "Sleep 7-9 hours",
            description: "Consistent sleep reduces puffiness and under-eye darkness.",
            expected_gain: "+0.2 to +0.5",
            timeline: "1-2 weeks",
            difficulty: Difficulty::Easy,
            restricted_to: None,
            metrics: &[Metric::Eyes],
        },
    },
    Rule {
        guard: Guard::Always,
        template: Template {
            priority: 2,
            category: "Fitness",
            title: "Train three times a week",
            description: "Resistance training and cardio improve body composition and facial definition.",
            expected_gain: "+0.3 to +1.0",
            timeline: "8-12 weeks",
            difficulty: Difficulty::Medium,
            restricted_to: None,
            metrics: &[],
        },
    },
    Rule {
        guard: Guard::GenderIs(Gender::Female),
        template: Template {
            priority: 2,
            category: "Makeup",
            title: "Contour and highlight",
            description: "Contour under the cheekbones and along the jaw; highlight the cheekbone tops.",
            expected_gain: "+0.3 to +0.8",
            timeline: "Immediate",
            difficulty: Difficulty::Easy,
            restricted_to: Some(Gender::Female),
            metrics: &[Metric::Jawline],
        },
    },
    Rule {
        guard: Guard::GenderIs(Gender::Female),
        template: Template {
            priority: 3,
            category: "Makeup",
            title: "Winged eyeliner",
            description: "An upswept liner at the outer corner lifts the apparent canthal tilt.",
            expected_gain: "+0.2 to +0.5",
            timeline: "Immediate",
            difficulty: Difficulty::Easy,
            restricted_to: Some(Gender::Female),
            metrics: &[Metric::CanthalTilt, Metric::Eyes],
        },
    },
    Rule {
        guard: Guard::AgeAtLeast(ANTI_AGING_MIN_AGE),
        template: Template {
            priority: 3,
            category: "Skincare",
            title: "Add a retinoid",
            description: "A nightly retinoid plus daily sunscreen slows collagen loss.",
            expected_gain: "+0.2 to +0.4",
            timeline: "12 weeks",
            difficulty: Difficulty::Medium,
            restricted_to: None,
            metrics: &[Metric::DetectionQuality],
        },
    },
    Rule {
        guard: Guard::Always,
        template: Template {
            priority: 3,
            category: "Teeth",
            title: "Whiten your teeth",
            description: "Whitening strips or a dentist treatment brighten the smile.",
            expected_gain: "+0.1 to +0.3",
            timeline: "2 weeks",
            difficulty: Difficulty::Medium,
            restricted_to: None,
            metrics: &[Metric::Lips],
        },
    },
    Rule {
        guard: Guard::Always,
        template: Template {
            priority: 3,
            category: "Style",
            title: "Get a face-framing haircut",
            description: "Ask for a cut that adds height or volume to balance your facial thirds.",
            expected_gain: "+0.3 to +0.7",
            timeline: "1 day",
            difficulty: Difficulty::Easy,
            restricted_to: None,
            metrics: &[Metric::FacialThirds],
        },
    },
    Rule {
        guard: Guard::Always,
        template: Template {
            priority: 3,
            category: "Style",
            title: "Groom your brows",
            description: "Clean brow lines frame the eyes and even out brow height.",
            expected_gain: "+0.1 to +0.3",
            timeline: "1 day",
            difficulty: Difficulty::Easy,
            restricted_to: None,
            metrics: &[Metric::Symmetry, Metric::Eyes],
        },
    },
];

/// Evaluate every rule and return the firing items, sorted by priority.
pub fn generate_advice(scores: &ScoreProfile, gender: Gender, age: u32) -> Vec<AdviceItem> {
    generate_from(&RULES, scores, gender, age)
}

/// Like [`generate_advice`] over an arbitrary rule table.
pub fn generate_from(
    rules: &[Rule],
    scores: &ScoreProfile,
    gender: Gender,
    age: u32,
) -> Vec<AdviceItem> {
    let mut items: Vec<AdviceItem> = rules
        .iter()
        .filter(|r| r.guard.holds(scores, gender, age))
        .map(|r| AdviceItem::from(&r.template))
        .collect();
    // sort_by_key is stable: equal priorities keep table order.
    items.sort_by_key(|a| a.priority);
    tracing::debug!(count = items.len(), %gender, age, "advice generated");
    items
}

/// Items to show a viewer of the given gender: restricted items only when
/// the declared gender is the one they target.
pub fn displayable(items: &[AdviceItem], gender: Gender) -> Vec<&AdviceItem> {
    items
        .iter()
        .filter(|a| a.restricted_to.map_or(true, |target| target == gender))
        .collect()
}
