use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::BankError;

pub(crate) static DATA_DIR: Dir = include_dir!("src/data");

const BUILTIN_BANK: &str = "questions.json";

pub type QuestionId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    /// seconds allowed to answer
    pub time_limit: u32,
    #[serde(default)]
    pub hint: Option<String>,
}

impl Question {
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer == option
    }

    pub fn option_index(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|o| o == option)
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.option_index(&self.correct_answer)
    }

    fn validate(&self) -> Result<(), BankError> {
        let invalid = |reason: &str| BankError::InvalidQuestion {
            id: self.id,
            reason: reason.to_string(),
        };

        if self.text.trim().is_empty() {
            return Err(invalid("prompt text is empty"));
        }
        if self.options.is_empty() {
            return Err(invalid("no answer options"));
        }
        let mut seen = HashSet::new();
        if !self.options.iter().all(|o| seen.insert(o.as_str())) {
            return Err(invalid("answer options contain duplicates"));
        }
        if self.correct_index().is_none() {
            return Err(invalid("correct answer is not one of the options"));
        }
        if self.time_limit == 0 {
            return Err(invalid("time limit must be positive"));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct BankFile {
    #[serde(default)]
    name: Option<String>,
    questions: Vec<Question>,
}

/// Ordered, validated set of questions; immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    name: String,
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        let mut ids = HashSet::new();
        for q in &questions {
            if !ids.insert(q.id) {
                return Err(BankError::InvalidQuestion {
                    id: q.id,
                    reason: "duplicate question id".to_string(),
                });
            }
            q.validate()?;
        }

        Ok(Self {
            name: name.into(),
            questions,
        })
    }

    /// The bank compiled into the binary.
    pub fn builtin() -> Result<Self, BankError> {
        let file = DATA_DIR
            .get_file(BUILTIN_BANK)
            .ok_or(BankError::MissingData(BUILTIN_BANK))?;
        let contents = file
            .contents_utf8()
            .ok_or(BankError::MissingData(BUILTIN_BANK))?;
        Self::from_json(contents)
    }

    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let file: BankFile = serde_json::from_str(json)?;
        Self::new(file.name.unwrap_or_else(|| "custom".to_string()), file.questions)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BankError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn find(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

#[cfg(test)]
pub(crate) fn question(id: QuestionId, correct: &str, time_limit: u32) -> Question {
    Question {
        id,
        text: format!("question {id}"),
        options: ["London", "Berlin", "Paris", "Madrid"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        correct_answer: correct.to_string(),
        time_limit,
        hint: Some(format!("hint {id}")),
    }
}
