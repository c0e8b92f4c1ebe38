use serde::{Deserialize, Serialize};

pub type SectionId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SectionType {
    Mcq,
    Code,
}

/// MCQ or code sub-unit of an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub section_type: SectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcq: Option<McqSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeSection>,
}

impl Section {
    pub fn draft(&self) -> SectionDraft {
        SectionDraft {
            section_type: self.section_type,
            mcq: self.mcq.clone(),
            code: self.code.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqSection {
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub points: f64,
    /// index into `choices`
    pub correct: usize,
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSection {
    pub renderer: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub expected: String,
    pub driver: String,
    pub points: f64,
    #[serde(default)]
    pub hidden: bool,
}

/// Body of `POST /section/{activityId}` and `PUT /section/{sectionId}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDraft {
    pub section_type: SectionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcq: Option<McqSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeSection>,
}

impl SectionDraft {
    pub fn mcq(instructions: &str) -> Self {
        Self {
            section_type: SectionType::Mcq,
            mcq: Some(McqSection {
                instructions: instructions.to_string(),
                questions: Vec::new(),
            }),
            code: None,
        }
    }

    pub fn code(renderer: &str, instructions: &str) -> Self {
        Self {
            section_type: SectionType::Code,
            mcq: None,
            code: Some(CodeSection {
                renderer: renderer.to_string(),
                instructions: instructions.to_string(),
                default_code: None,
                sources: None,
                test_cases: Vec::new(),
            }),
        }
    }
}
