//! Life-vision questionnaire answers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::or_placeholder;

/// Placeholder substituted for an unanswered vision field in prompts
pub const NOT_ENTERED: &str = "not entered";

/// The five questionnaire categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisionCategory {
    Career,
    Personal,
    Relationships,
    Learning,
    Values,
}

/// (field key, question, example answer)
type Question = (&'static str, &'static str, &'static str);

impl VisionCategory {
    pub const ALL: [VisionCategory; 5] = [
        VisionCategory::Career,
        VisionCategory::Personal,
        VisionCategory::Relationships,
        VisionCategory::Learning,
        VisionCategory::Values,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VisionCategory::Career => "Career",
            VisionCategory::Personal => "Personal",
            VisionCategory::Relationships => "Relationships",
            VisionCategory::Learning => "Learning",
            VisionCategory::Values => "Values",
        }
    }

    /// The three questions of this category, in form order
    pub fn questions(self) -> [Question; 3] {
        match self {
            VisionCategory::Career => [
                ("achievement", "What do you want to achieve in your current role?", "Raise team productivity by 30%"),
                ("position", "Where do you want to be in three years?", "Team lead or manager"),
                ("skills", "Which skills do you want to develop?", "AI/ML, leadership, project management"),
            ],
            VisionCategory::Personal => [
                ("goals", "Is there a personal goal you want to reach?", "Publish a book, invest in property"),
                ("hobbies", "Which hobbies or interests do you want to grow?", "Golf, music, cooking"),
                ("lifestyle", "Any plans for your health or lifestyle?", "Exercise three times a week, eat better"),
            ],
            VisionCategory::Relationships => [
                ("team", "What should change in how you work with your team?", "Build a better culture of collaboration"),
                ("networking", "Any networking or mentoring plans?", "Grow a network of industry experts"),
                ("family", "How do you want to spend time with family and friends?", "Weekends belong to family"),
            ],
            VisionCategory::Learning => [
                ("newThings", "Is there something new you want to learn?", "A new programming language, an instrument"),
                ("expertise", "Which field do you want to build expertise in?", "Data analysis, UX design"),
                ("certification", "Any certificate or degree plans?", "PMP, MBA, AWS certification"),
            ],
            VisionCategory::Values => [
                ("important", "What value matters most to you?", "Growth, balance, impact"),
                ("workStyle", "How do you want to work?", "Autonomous, collaborative, creative"),
                ("purpose", "Is there a larger meaning or purpose you pursue?", "A positive impact on society"),
            ],
        }
    }
}

impl fmt::Display for VisionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

impl FromStr for VisionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VisionCategory::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown vision category: '{}'", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CareerAnswers {
    pub achievement: String,
    pub position: String,
    pub skills: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalAnswers {
    pub goals: String,
    pub hobbies: String,
    pub lifestyle: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelationshipAnswers {
    pub team: String,
    pub networking: String,
    pub family: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningAnswers {
    pub new_things: String,
    pub expertise: String,
    pub certification: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueAnswers {
    pub important: String,
    pub work_style: String,
    pub purpose: String,
}

/// Answers to the life-vision questionnaire; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisionAnswers {
    pub career: CareerAnswers,
    pub personal: PersonalAnswers,
    pub relationships: RelationshipAnswers,
    pub learning: LearningAnswers,
    pub values: ValueAnswers,
}

impl VisionAnswers {
    /// Look up a field by category and camelCase key
    pub fn get(&self, category: VisionCategory, key: &str) -> Option<&str> {
        let value = match (category, key) {
            (VisionCategory::Career, "achievement") => &self.career.achievement,
            (VisionCategory::Career, "position") => &self.career.position,
            (VisionCategory::Career, "skills") => &self.career.skills,
            (VisionCategory::Personal, "goals") => &self.personal.goals,
            (VisionCategory::Personal, "hobbies") => &self.personal.hobbies,
            (VisionCategory::Personal, "lifestyle") => &self.personal.lifestyle,
            (VisionCategory::Relationships, "team") => &self.relationships.team,
            (VisionCategory::Relationships, "networking") => &self.relationships.networking,
            (VisionCategory::Relationships, "family") => &self.relationships.family,
            (VisionCategory::Learning, "newThings") => &self.learning.new_things,
            (VisionCategory::Learning, "expertise") => &self.learning.expertise,
            (VisionCategory::Learning, "certification") => &self.learning.certification,
            (VisionCategory::Values, "important") => &self.values.important,
            (VisionCategory::Values, "workStyle") => &self.values.work_style,
            (VisionCategory::Values, "purpose") => &self.values.purpose,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn slot(&mut self, category: VisionCategory, key: &str) -> Option<&mut String> {
        Some(match (category, key) {
            (VisionCategory::Career, "achievement") => &mut self.career.achievement,
            (VisionCategory::Career, "position") => &mut self.career.position,
            (VisionCategory::Career, "skills") => &mut self.career.skills,
            (VisionCategory::Personal, "goals") => &mut self.personal.goals,
            (VisionCategory::Personal, "hobbies") => &mut self.personal.hobbies,
            (VisionCategory::Personal, "lifestyle") => &mut self.personal.lifestyle,
            (VisionCategory::Relationships, "team") => &mut self.relationships.team,
            (VisionCategory::Relationships, "networking") => &mut self.relationships.networking,
            (VisionCategory::Relationships, "family") => &mut self.relationships.family,
            (VisionCategory::Learning, "newThings") => &mut self.learning.new_things,
            (VisionCategory::Learning, "expertise") => &mut self.learning.expertise,
            (VisionCategory::Learning, "certification") => &mut self.learning.certification,
            (VisionCategory::Values, "important") => &mut self.values.important,
            (VisionCategory::Values, "workStyle") => &mut self.values.work_style,
            (VisionCategory::Values, "purpose") => &mut self.values.purpose,
            _ => return None,
        })
    }

    /// Set a field; returns false for an unknown key
    pub fn set(&mut self, category: VisionCategory, key: &str, value: impl Into<String>) -> bool {
        match self.slot(category, key) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Number of answered fields
    pub fn answered(&self) -> usize {
        VisionCategory::ALL
            .into_iter()
            .flat_map(|c| c.questions().into_iter().map(move |(key, _, _)| (c, key)))
            .filter(|(c, key)| self.get(*c, key).is_some_and(|v| !v.trim().is_empty()))
            .count()
    }

    /// Render every category and field, with [`NOT_ENTERED`] for blanks
    pub fn render_full(&self) -> String {
        let mut out = String::new();
        for category in VisionCategory::ALL {
            out.push_str(&format!("**{}:**\n", category.label()));
            for (key, question, _) in category.questions() {
                let value = self.get(category, key).unwrap_or_default();
                out.push_str(&format!("- {} {}\n", question, or_placeholder(value, NOT_ENTERED)));
            }
            out.push('\n');
        }
        out.trim_end().to_string()
    }

    /// Render only the highlights the weekly plan uses; `None` when all are blank
    pub fn render_highlights(&self) -> Option<String> {
        let parts: Vec<String> = [
            ("Career goal", &self.career.achievement),
            ("Learning goal", &self.learning.expertise),
            ("Lifestyle", &self.personal.lifestyle),
            ("Core value", &self.values.important),
        ]
        .into_iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .map(|(label, v)| format!("- {}: {}", label, v.trim()))
        .collect();

        if parts.is_empty() { None } else { Some(parts.join("\n")) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!("career".parse::<VisionCategory>().unwrap(), VisionCategory::Career);
        assert_eq!("VALUES".parse::<VisionCategory>().unwrap(), VisionCategory::Values);
        assert!("health".parse::<VisionCategory>().is_err());
    }

    #[test]
    fn test_set_and_get() {
        let mut answers = VisionAnswers::default();
        assert!(answers.set(VisionCategory::Learning, "newThings", "Rust"));
        assert_eq!(answers.learning.new_things, "Rust");
        assert_eq!(answers.get(VisionCategory::Learning, "newThings"), Some("Rust"));
        assert!(!answers.set(VisionCategory::Learning, "bogus", "x"));
        assert_eq!(answers.answered(), 1);
    }

    #[test]
    fn test_every_question_key_is_addressable() {
        let answers = VisionAnswers::default();
        for category in VisionCategory::ALL {
            for (key, _, _) in category.questions() {
                assert!(answers.get(category, key).is_some(), "{}.{}", category, key);
            }
        }
    }

    #[test]
    fn test_render_full_uses_placeholder() {
        let mut answers = VisionAnswers::default();
        answers.career.achievement = "Ship v2".to_string();
        let text = answers.render_full();
        assert!(text.contains("Ship v2"));
        assert_eq!(text.matches(NOT_ENTERED).count(), 14);
    }

    #[test]
    fn test_render_highlights() {
        assert_eq!(VisionAnswers::default().render_highlights(), None);

        let mut answers = VisionAnswers::default();
        answers.values.important = "Growth".to_string();
        assert_eq!(answers.render_highlights().as_deref(), Some("- Core value: Growth"));
    }

    #[test]
    fn test_partial_json() {
        let answers: VisionAnswers = serde_json::from_str(r#"{"career":{"position":"Lead"},"values":{}}"#).unwrap();
        assert_eq!(answers.career.position, "Lead");
        assert_eq!(answers.personal, PersonalAnswers::default());
    }
}
