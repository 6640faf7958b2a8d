//! Persona catalog and classification result

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::extract::Fallback;

/// Catalog code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonaCode {
    A,
    B,
    C,
    D,
    E,
    F,
}

/// Persona assigned when classification yields nothing usable
pub const DEFAULT_PERSONA: PersonaCode = PersonaCode::F;

impl PersonaCode {
    pub const ALL: [PersonaCode; 6] = [
        PersonaCode::A,
        PersonaCode::B,
        PersonaCode::C,
        PersonaCode::D,
        PersonaCode::E,
        PersonaCode::F,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PersonaCode::A => "A",
            PersonaCode::B => "B",
            PersonaCode::C => "C",
            PersonaCode::D => "D",
            PersonaCode::E => "E",
            PersonaCode::F => "F",
        }
    }

    /// Resolve a model-supplied code, mapping anything unrecognized to [`DEFAULT_PERSONA`]
    pub fn resolve(raw: &str) -> Self {
        match raw.parse() {
            Ok(code) => code,
            Err(_) => {
                warn!(%raw, default = %DEFAULT_PERSONA, "PersonaCode::resolve: unknown code, using default");
                DEFAULT_PERSONA
            }
        }
    }

    pub fn profile(self) -> PersonaProfile {
        let (name, description, traits, vision_focus): (&str, &str, [&str; 3], &str) = match self {
            PersonaCode::A => (
                "Fast Executor",
                "Sets goals quickly and turns them into action right away",
                ["Action-oriented", "Quick decisions", "Results-driven"],
                "Short-term wins and rapid growth",
            ),
            PersonaCode::B => (
                "Strategic Planner",
                "Plans systematically and executes step by step",
                ["Analytical", "Systematic", "Long-range planning"],
                "Sustainable development and steady growth",
            ),
            PersonaCode::C => (
                "Creative Innovator",
                "Looks for new approaches and pursues innovation",
                ["Creative", "Flexible", "Experimental"],
                "Transformative change and new possibilities",
            ),
            PersonaCode::D => (
                "Relationship Builder",
                "Values teamwork and collaboration",
                ["Cooperative", "Communication-centered", "Team-oriented"],
                "Growing together with the team and widening influence",
            ),
            PersonaCode::E => (
                "Balance Seeker",
                "Puts weight on balancing work and life",
                ["Balance-oriented", "Sustainability", "Well-being first"],
                "Healthy growth and quality of life",
            ),
            PersonaCode::F => (
                "Learning Grower",
                "Pursues continuous learning and self-development",
                ["Learning-oriented", "Growth mindset", "Curiosity"],
                "Deeper expertise and broader knowledge",
            ),
        };
        PersonaProfile {
            code: self,
            name: name.to_string(),
            description: description.to_string(),
            traits: traits.iter().map(|t| t.to_string()).collect(),
            vision_focus: vision_focus.to_string(),
        }
    }

    /// The whole catalog, in code order
    pub fn catalog() -> Vec<PersonaProfile> {
        Self::ALL.into_iter().map(Self::profile).collect()
    }
}

impl fmt::Display for PersonaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonaCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PersonaCode::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown persona code: '{}'", s))
    }
}

/// Catalog metadata for one persona
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaProfile {
    pub code: PersonaCode,
    pub name: String,
    pub description: String,
    pub traits: Vec<String>,
    pub vision_focus: String,
}

/// A classified persona: catalog metadata plus the model's confidence and reasoning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub code: PersonaCode,
    pub name: String,
    pub description: String,
    pub traits: Vec<String>,
    pub vision_focus: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
}

impl Persona {
    pub fn new(code: PersonaCode, confidence: f64, reasoning: impl Into<String>) -> Self {
        let profile = code.profile();
        Self {
            code,
            name: profile.name,
            description: profile.description,
            traits: profile.traits,
            vision_focus: profile.vision_focus,
            confidence: normalize_confidence(confidence),
            reasoning: reasoning.into(),
        }
    }

    /// The default persona with zero confidence
    pub fn default_persona() -> Self {
        Self::new(DEFAULT_PERSONA, 0.0, "")
    }
}

/// Bring a model confidence into 0..=1; values in (1, 100] are read as percentages
fn normalize_confidence(confidence: f64) -> f64 {
    if !confidence.is_finite() {
        return 0.0;
    }
    let scaled = if confidence > 1.0 && confidence <= 100.0 {
        confidence / 100.0
    } else {
        confidence
    };
    scaled.clamp(0.0, 1.0)
}

/// Raw classification as the model returns it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaClassification {
    #[serde(alias = "persona_code")]
    pub persona_code: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
}

impl PersonaClassification {
    /// Resolve against the catalog; never fails
    pub fn into_persona(self) -> Persona {
        debug!(code = %self.persona_code, confidence = self.confidence, "PersonaClassification::into_persona: called");
        Persona::new(PersonaCode::resolve(&self.persona_code), self.confidence, self.reasoning)
    }
}

impl Fallback for PersonaClassification {
    fn fallback() -> Self {
        Self {
            persona_code: DEFAULT_PERSONA.to_string(),
            confidence: 0.0,
            reasoning: String::new(),
        }
    }
}
