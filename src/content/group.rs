use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::content::{
    AuthoringError, AuthoringResult,
    question::{
        ChoiceQuestion, FillBlanksQuestion, GroupType, McqQuestion, MultiQuestion, Question,
        QuestionPatch, TfngQuestion, next_number, total_marks,
    },
};

/// A cluster of questions sharing one instruction.
///
/// `instruction`, `paragraph` and `imgContent` hold editor HTML and are never interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(tag = "type")]
pub enum QuestionGroup {
    #[serde(rename = "FILL_BLANKS")]
    FillBlanks {
        #[serde(default)]
        instruction: String,
        #[serde(default)]
        paragraph: String,
        #[serde(
            rename = "imgContent",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        img_content: Option<String>,
        #[serde(default)]
        questions: Vec<FillBlanksQuestion>,
    },
    #[serde(rename = "TFNG")]
    Tfng {
        #[serde(default)]
        instruction: String,
        #[serde(default)]
        questions: Vec<TfngQuestion>,
    },
    #[serde(rename = "MCQ")]
    Mcq {
        #[serde(default)]
        instruction: String,
        #[serde(default)]
        questions: Vec<McqQuestion>,
    },
    #[serde(rename = "MULTI")]
    Multi {
        #[serde(default)]
        instruction: String,
        #[serde(default)]
        questions: Vec<MultiQuestion>,
    },
    #[serde(rename = "MATCH_TABLE")]
    MatchTable {
        #[serde(default)]
        instruction: String,
        #[serde(default)]
        choices: Vec<String>,
        #[serde(default)]
        questions: Vec<ChoiceQuestion>,
    },
    #[serde(rename = "DRAG_DROP")]
    DragDrop {
        #[serde(default)]
        instruction: String,
        /// Text with blank markers the choices are dropped into.
        #[serde(default)]
        paragraph: String,
        #[serde(default)]
        choices: Vec<String>,
        #[serde(default)]
        questions: Vec<ChoiceQuestion>,
    },
    #[serde(rename = "MATCHING_HEADER")]
    MatchingHeader {
        #[serde(default)]
        instruction: String,
        #[serde(default)]
        choices: Vec<String>,
        #[serde(default)]
        questions: Vec<ChoiceQuestion>,
    },
    #[serde(rename = "DROPDOWN")]
    Dropdown {
        #[serde(default)]
        instruction: String,
        #[serde(default)]
        choices: Vec<String>,
        #[serde(default)]
        questions: Vec<ChoiceQuestion>,
    },
}

impl QuestionGroup {
    /// Empty group of the given variant, as created by the "add group" action.
    pub fn new(kind: GroupType) -> Self {
        let instruction = String::new();
        match kind {
            GroupType::FillBlanks => Self::FillBlanks {
                instruction,
                paragraph: String::new(),
                img_content: None,
                questions: Vec::new(),
            },
            GroupType::Tfng => Self::Tfng {
                instruction,
                questions: Vec::new(),
            },
            GroupType::Mcq => Self::Mcq {
                instruction,
                questions: Vec::new(),
            },
            GroupType::Multi => Self::Multi {
                instruction,
                questions: Vec::new(),
            },
            GroupType::MatchTable => Self::MatchTable {
                instruction,
                choices: Vec::new(),
                questions: Vec::new(),
            },
            GroupType::DragDrop => Self::DragDrop {
                instruction,
                paragraph: String::new(),
                choices: Vec::new(),
                questions: Vec::new(),
            },
            GroupType::MatchingHeader => Self::MatchingHeader {
                instruction,
                choices: Vec::new(),
                questions: Vec::new(),
            },
            GroupType::Dropdown => Self::Dropdown {
                instruction,
                choices: Vec::new(),
                questions: Vec::new(),
            },
        }
    }

    pub fn group_type(&self) -> GroupType {
        match self {
            Self::FillBlanks { .. } => GroupType::FillBlanks,
            Self::Tfng { .. } => GroupType::Tfng,
            Self::Mcq { .. } => GroupType::Mcq,
            Self::Multi { .. } => GroupType::Multi,
            Self::MatchTable { .. } => GroupType::MatchTable,
            Self::DragDrop { .. } => GroupType::DragDrop,
            Self::MatchingHeader { .. } => GroupType::MatchingHeader,
            Self::Dropdown { .. } => GroupType::Dropdown,
        }
    }

    pub fn instruction(&self) -> &str {
        match self {
            Self::FillBlanks { instruction, .. }
            | Self::Tfng { instruction, .. }
            | Self::Mcq { instruction, .. }
            | Self::Multi { instruction, .. }
            | Self::MatchTable { instruction, .. }
            | Self::DragDrop { instruction, .. }
            | Self::MatchingHeader { instruction, .. }
            | Self::Dropdown { instruction, .. } => instruction.as_str(),
        }
    }

    pub fn set_instruction<S: Into<String>>(&mut self, value: S) {
        match self {
            Self::FillBlanks { instruction, .. }
            | Self::Tfng { instruction, .. }
            | Self::Mcq { instruction, .. }
            | Self::Multi { instruction, .. }
            | Self::MatchTable { instruction, .. }
            | Self::DragDrop { instruction, .. }
            | Self::MatchingHeader { instruction, .. }
            | Self::Dropdown { instruction, .. } => *instruction = value.into(),
        }
    }

    pub fn question_count(&self) -> usize {
        match self {
            Self::FillBlanks { questions, .. } => questions.len(),
            Self::Tfng { questions, .. } => questions.len(),
            Self::Mcq { questions, .. } => questions.len(),
            Self::Multi { questions, .. } => questions.len(),
            Self::MatchTable { questions, .. }
            | Self::DragDrop { questions, .. }
            | Self::MatchingHeader { questions, .. }
            | Self::Dropdown { questions, .. } => questions.len(),
        }
    }

    /// Mark-numbers of every question in order.
    pub fn numbers(&self) -> Vec<u32> {
        fn collect<Q: Question>(questions: &[Q]) -> Vec<u32> {
            questions.iter().map(Question::number).collect()
        }

        match self {
            Self::FillBlanks { questions, .. } => collect(questions),
            Self::Tfng { questions, .. } => collect(questions),
            Self::Mcq { questions, .. } => collect(questions),
            Self::Multi { questions, .. } => collect(questions),
            Self::MatchTable { questions, .. }
            | Self::DragDrop { questions, .. }
            | Self::MatchingHeader { questions, .. }
            | Self::Dropdown { questions, .. } => collect(questions),
        }
    }

    /// Mark-numbers consumed by the whole group.
    pub fn mark_count(&self) -> u32 {
        fn sum<Q: Question>(questions: &[Q]) -> u32 {
            total_marks(questions)
        }

        match self {
            Self::FillBlanks { questions, .. } => sum(questions),
            Self::Tfng { questions, .. } => sum(questions),
            Self::Mcq { questions, .. } => sum(questions),
            Self::Multi { questions, .. } => sum(questions),
            Self::MatchTable { questions, .. }
            | Self::DragDrop { questions, .. }
            | Self::MatchingHeader { questions, .. }
            | Self::Dropdown { questions, .. } => sum(questions),
        }
    }

    /// Number the next added question receives when the group starts after `start_number`.
    pub fn next_number(&self, start_number: u32) -> u32 {
        start_number
            .saturating_add(self.mark_count())
            .saturating_add(1)
    }

    pub fn choices(&self) -> Option<&[String]> {
        match self {
            Self::MatchTable { choices, .. }
            | Self::DragDrop { choices, .. }
            | Self::MatchingHeader { choices, .. }
            | Self::Dropdown { choices, .. } => Some(choices.as_slice()),
            Self::FillBlanks { .. } | Self::Tfng { .. } | Self::Mcq { .. } | Self::Multi { .. } => {
                None
            }
        }
    }

    fn choices_mut(&mut self) -> AuthoringResult<&mut Vec<String>> {
        let kind = self.group_type();
        match self {
            Self::MatchTable { choices, .. }
            | Self::DragDrop { choices, .. }
            | Self::MatchingHeader { choices, .. }
            | Self::Dropdown { choices, .. } => Ok(choices),
            Self::FillBlanks { .. } | Self::Tfng { .. } | Self::Mcq { .. } | Self::Multi { .. } => {
                Err(AuthoringError::NoSharedChoices(kind))
            }
        }
    }

    /// Returns a copy with one scaffolded question appended.
    pub fn add_question(&self, start_number: u32) -> Self {
        fn push<Q: Question>(questions: &mut Vec<Q>, start_number: u32, kind: GroupType) {
            let number = next_number(questions, start_number);
            questions.push(Q::blank(number, kind));
        }

        let kind = self.group_type();
        let mut group = self.clone();
        match &mut group {
            Self::FillBlanks { questions, .. } => push(questions, start_number, kind),
            Self::Tfng { questions, .. } => push(questions, start_number, kind),
            Self::Mcq { questions, .. } => push(questions, start_number, kind),
            Self::Multi { questions, .. } => push(questions, start_number, kind),
            Self::MatchTable { questions, .. }
            | Self::DragDrop { questions, .. }
            | Self::MatchingHeader { questions, .. }
            | Self::Dropdown { questions, .. } => push(questions, start_number, kind),
        }

        trace!(%kind, start_number, count = group.question_count(), "question added");
        group
    }

    /// Returns a copy with `patch` merged into the question at `index` and the tag re-stamped.
    pub fn update_question(&self, index: usize, patch: QuestionPatch) -> AuthoringResult<Self> {
        fn merge<Q: Question>(
            questions: &mut [Q],
            index: usize,
            patch: Q::Patch,
            kind: GroupType,
        ) -> AuthoringResult<()> {
            let len = questions.len();
            let question = questions
                .get_mut(index)
                .ok_or(AuthoringError::question_index(index, len))?;
            question.apply(patch);
            question.stamp(kind);
            Ok(())
        }

        let kind = self.group_type();
        let shape = patch.shape();
        let mut group = self.clone();
        match (&mut group, patch) {
            (Self::FillBlanks { questions, .. }, QuestionPatch::FillBlanks(p)) => {
                merge(questions, index, p, kind)?
            }
            (Self::Tfng { questions, .. }, QuestionPatch::Tfng(p)) => {
                merge(questions, index, p, kind)?
            }
            (Self::Mcq { questions, .. }, QuestionPatch::Mcq(p)) => {
                merge(questions, index, p, kind)?
            }
            (Self::Multi { questions, .. }, QuestionPatch::Multi(p)) => {
                merge(questions, index, p, kind)?
            }
            (
                Self::MatchTable { questions, .. }
                | Self::DragDrop { questions, .. }
                | Self::MatchingHeader { questions, .. }
                | Self::Dropdown { questions, .. },
                QuestionPatch::Choice(p),
            ) => merge(questions, index, p, kind)?,
            _ => {
                return Err(AuthoringError::PatchMismatch { group: kind, patch: shape });
            }
        }

        Ok(group)
    }

    /// Returns a copy without the question at `index`. Remaining numbers are left untouched.
    pub fn remove_question(&self, index: usize) -> AuthoringResult<Self> {
        fn drop_at<Q>(questions: &mut Vec<Q>, index: usize) -> AuthoringResult<()> {
            if index >= questions.len() {
                return Err(AuthoringError::question_index(index, questions.len()));
            }
            questions.remove(index);
            Ok(())
        }

        let mut group = self.clone();
        match &mut group {
            Self::FillBlanks { questions, .. } => drop_at(questions, index)?,
            Self::Tfng { questions, .. } => drop_at(questions, index)?,
            Self::Mcq { questions, .. } => drop_at(questions, index)?,
            Self::Multi { questions, .. } => drop_at(questions, index)?,
            Self::MatchTable { questions, .. }
            | Self::DragDrop { questions, .. }
            | Self::MatchingHeader { questions, .. }
            | Self::Dropdown { questions, .. } => drop_at(questions, index)?,
        }

        Ok(group)
    }

    /// Returns a copy with the shared choice list replaced.
    pub fn update_choices(&self, choices: Vec<String>) -> AuthoringResult<Self> {
        let mut group = self.clone();
        *group.choices_mut()? = choices;
        Ok(group)
    }

    /// Returns a copy with an empty choice appended.
    pub fn add_choice(&self) -> AuthoringResult<Self> {
        let mut group = self.clone();
        group.choices_mut()?.push(String::new());
        Ok(group)
    }

    /// Returns a copy without the choice at `index`.
    ///
    /// Answers that referenced the removed choice are kept as they are.
    pub fn remove_choice(&self, index: usize) -> AuthoringResult<Self> {
        let mut group = self.clone();
        let choices = group.choices_mut()?;
        if index >= choices.len() {
            return Err(AuthoringError::choice_index(index, choices.len()));
        }
        choices.remove(index);
        Ok(group)
    }

    /// Re-applies the group tag to every question that carries one.
    pub fn stamped(&self) -> Self {
        fn stamp_all<Q: Question>(questions: &mut [Q], kind: GroupType) {
            questions.iter_mut().for_each(|q| q.stamp(kind));
        }

        let kind = self.group_type();
        let mut group = self.clone();
        match &mut group {
            Self::FillBlanks { questions, .. } => stamp_all(questions, kind),
            Self::Tfng { questions, .. } => stamp_all(questions, kind),
            Self::Mcq { questions, .. } => stamp_all(questions, kind),
            Self::Multi { questions, .. } => stamp_all(questions, kind),
            Self::MatchTable { questions, .. }
            | Self::DragDrop { questions, .. }
            | Self::MatchingHeader { questions, .. }
            | Self::Dropdown { questions, .. } => stamp_all(questions, kind),
        }
        group
    }
}

/// `startNumber` of every group when numbering begins after `first`.
pub fn start_numbers(groups: &[QuestionGroup], first: u32) -> Vec<u32> {
    groups
        .iter()
        .scan(first, |next, group| {
            let start = *next;
            *next = next.saturating_add(group.mark_count());
            Some(start)
        })
        .collect()
}
