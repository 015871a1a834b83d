use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::{
    QuestionGroup,
    document::{TestData, TestPart},
    question::{ChoiceQuestion, McqQuestion, MultiQuestion},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Which reading parts are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidationScope {
    /// Only `part1`, matching what the authoring UI has always checked.
    #[default]
    FirstPart,
    /// Every present part; messages are prefixed with the part number.
    AllParts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    #[serde(default)]
    pub scope: ValidationScope,
    /// Also require answers to reference existing options or choices.
    #[serde(default)]
    pub check_answers: bool,
}

/// Validates `part1` only, without answer checks.
pub fn validate(data: &TestData) -> ValidationReport {
    Validator::default().validate(data)
}

impl Validator {
    pub fn new(scope: ValidationScope, check_answers: bool) -> Self {
        Self {
            scope,
            check_answers,
        }
    }

    /// Walks the whole document and collects every defect. Never fails.
    pub fn validate(&self, data: &TestData) -> ValidationReport {
        let reading = data.reading();
        let mut errors = Vec::new();

        match self.scope {
            ValidationScope::FirstPart => match reading.part1.as_deref() {
                Some(parts) if !parts.is_empty() => {
                    for part in parts {
                        self.check_part(part, "", &mut errors);
                    }
                }
                _ => errors.push("Reading part 1 is required".to_string()),
            },
            ValidationScope::AllParts => {
                let mut seen = false;
                for (number, part) in reading.parts() {
                    seen = true;
                    self.check_part(part, &format!("Part {number}: "), &mut errors);
                }
                if !seen {
                    errors.push("Test must have at least one reading part".to_string());
                }
            }
        }

        debug!(scope = ?self.scope, errors = errors.len(), "test document validated");
        ValidationReport::from_errors(errors)
    }

    fn check_part(&self, part: &TestPart, prefix: &str, errors: &mut Vec<String>) {
        if part.title.trim().is_empty() {
            errors.push(format!("{prefix}Test title is required"));
        }
        if part.passage.is_empty() {
            errors.push(format!("{prefix}Passage content is required"));
        }
        if part.groups.is_empty() {
            errors.push(format!("{prefix}Test must have at least one question group"));
        }

        for (g, group) in part.groups.iter().enumerate() {
            self.check_group(group, g + 1, prefix, errors);
        }
    }

    fn check_group(&self, group: &QuestionGroup, g: usize, prefix: &str, errors: &mut Vec<String>) {
        if group.instruction().trim().is_empty() {
            errors.push(format!("{prefix}Group {g} must have an instruction"));
        }
        if group.question_count() == 0 {
            errors.push(format!("{prefix}Group {g} must have at least one question"));
        }

        let mut push = |i: usize, what: &str| {
            errors.push(format!("{prefix}Question {i} in group {g} must have {what}"));
        };

        match group {
            QuestionGroup::Tfng { questions, .. } => {
                for (i, q) in questions.iter().enumerate() {
                    if q.question.trim().is_empty() {
                        push(i + 1, "question text");
                    }
                }
            }
            QuestionGroup::Mcq { questions, .. } => {
                for (i, q) in questions.iter().enumerate() {
                    check_option_question(&q.question, &q.options, i + 1, &mut push);
                    if self.check_answers && !mcq_answer_is_option(q) {
                        push(i + 1, "an answer matching one of its options");
                    }
                }
            }
            QuestionGroup::Multi { questions, .. } => {
                for (i, q) in questions.iter().enumerate() {
                    check_option_question(&q.question, &q.options, i + 1, &mut push);
                    if self.check_answers && !multi_answers_are_options(q) {
                        push(i + 1, "answers chosen from its options");
                    }
                }
            }
            QuestionGroup::MatchTable { choices, questions, .. }
            | QuestionGroup::DragDrop { choices, questions, .. }
            | QuestionGroup::MatchingHeader { choices, questions, .. }
            | QuestionGroup::Dropdown { choices, questions, .. } => {
                if self.check_answers {
                    for (i, q) in questions.iter().enumerate() {
                        if !choice_answer_is_listed(q, choices) {
                            push(i + 1, "an answer from the group's choices");
                        }
                    }
                }
            }
            QuestionGroup::FillBlanks { questions, .. } => {
                if self.check_answers {
                    for (i, q) in questions.iter().enumerate() {
                        if q.answer.iter().all(|a| is_unset(a)) {
                            push(i + 1, "an answer");
                        }
                    }
                }
            }
        }
    }
}

fn check_option_question(
    question: &str,
    options: &[String],
    i: usize,
    push: &mut impl FnMut(usize, &str),
) {
    if question.trim().is_empty() {
        push(i, "question text");
    }
    if options.is_empty() {
        push(i, "options");
    }
}

// blank answers never count as a pick, even against blank option slots
fn is_unset(answer: &str) -> bool {
    answer.trim().is_empty()
}

fn mcq_answer_is_option(q: &McqQuestion) -> bool {
    !is_unset(&q.answer) && q.options.contains(&q.answer)
}

fn multi_answers_are_options(q: &MultiQuestion) -> bool {
    !q.answer.is_empty() && q.answer.iter().all(|a| !is_unset(a) && q.options.contains(a))
}

fn choice_answer_is_listed(q: &ChoiceQuestion, choices: &[String]) -> bool {
    !is_unset(&q.answer) && choices.contains(&q.answer)
}
