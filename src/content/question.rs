use serde::{Deserialize, Serialize};

/// Discriminator shared by question groups and the questions inside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupType {
    FillBlanks,
    Tfng,
    Mcq,
    Multi,
    MatchTable,
    DragDrop,
    MatchingHeader,
    Dropdown,
}

impl GroupType {
    pub const ALL: [GroupType; 8] = [
        Self::FillBlanks,
        Self::Tfng,
        Self::Mcq,
        Self::Multi,
        Self::MatchTable,
        Self::DragDrop,
        Self::MatchingHeader,
        Self::Dropdown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FillBlanks => "FILL_BLANKS",
            Self::Tfng => "TFNG",
            Self::Mcq => "MCQ",
            Self::Multi => "MULTI",
            Self::MatchTable => "MATCH_TABLE",
            Self::DragDrop => "DRAG_DROP",
            Self::MatchingHeader => "MATCHING_HEADER",
            Self::Dropdown => "DROPDOWN",
        }
    }

    /// Variants whose questions pick from a choice list owned by the group.
    pub fn has_shared_choices(&self) -> bool {
        matches!(
            self,
            Self::MatchTable | Self::DragDrop | Self::MatchingHeader | Self::Dropdown
        )
    }
}

impl std::fmt::Display for GroupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GroupType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown group type `{s}`"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum TfngAnswer {
    #[serde(rename = "TRUE")]
    True,
    #[serde(rename = "FALSE")]
    False,
    #[serde(rename = "NOT GIVEN")]
    NotGiven,
}

/// Number of empty option slots a new MCQ/MULTI question starts with.
pub const DEFAULT_OPTION_SLOTS: usize = 4;

/// Behaviour every question shape shares, independent of its variant.
pub trait Question: Clone {
    type Patch;

    /// Empty question as the authoring form scaffolds it.
    fn blank(number: u32, kind: GroupType) -> Self;

    fn number(&self) -> u32;

    /// Mark-numbers this question consumes.
    fn marks(&self) -> u32 {
        1
    }

    fn apply(&mut self, patch: Self::Patch);

    /// Writes the parent group's tag onto the question, when the shape carries one.
    fn stamp(&mut self, kind: GroupType);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FillBlanksQuestion {
    pub number: u32,
    #[serde(rename = "type")]
    pub kind: GroupType,
    /// Accepted spellings.
    #[serde(default)]
    pub answer: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FillBlanksPatch {
    pub number: Option<u32>,
    pub answer: Option<Vec<String>>,
}

impl Question for FillBlanksQuestion {
    type Patch = FillBlanksPatch;

    fn blank(number: u32, kind: GroupType) -> Self {
        Self {
            number,
            kind,
            answer: vec![String::new()],
        }
    }

    fn number(&self) -> u32 {
        self.number
    }

    fn apply(&mut self, patch: FillBlanksPatch) {
        if let Some(number) = patch.number {
            self.number = number;
        }
        if let Some(answer) = patch.answer {
            self.answer = answer;
        }
    }

    fn stamp(&mut self, kind: GroupType) {
        self.kind = kind;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TfngQuestion {
    pub number: u32,
    #[serde(default)]
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<TfngAnswer>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TfngPatch {
    pub number: Option<u32>,
    pub question: Option<String>,
    /// `Some(None)` (JSON `null`) clears the answer, absent leaves it alone.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub answer: Option<Option<TfngAnswer>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Question for TfngQuestion {
    type Patch = TfngPatch;

    fn blank(number: u32, _kind: GroupType) -> Self {
        Self {
            number,
            question: String::new(),
            answer: None,
        }
    }

    fn number(&self) -> u32 {
        self.number
    }

    fn apply(&mut self, patch: TfngPatch) {
        if let Some(number) = patch.number {
            self.number = number;
        }
        if let Some(question) = patch.question {
            self.question = question;
        }
        if let Some(answer) = patch.answer {
            self.answer = answer;
        }
    }

    // TFNG questions inherit their type from the group
    fn stamp(&mut self, _kind: GroupType) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct McqQuestion {
    pub number: u32,
    #[serde(rename = "type")]
    pub kind: GroupType,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct McqPatch {
    pub number: Option<u32>,
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub answer: Option<String>,
}

impl Question for McqQuestion {
    type Patch = McqPatch;

    fn blank(number: u32, kind: GroupType) -> Self {
        Self {
            number,
            kind,
            question: String::new(),
            options: vec![String::new(); DEFAULT_OPTION_SLOTS],
            answer: String::new(),
        }
    }

    fn number(&self) -> u32 {
        self.number
    }

    fn apply(&mut self, patch: McqPatch) {
        if let Some(number) = patch.number {
            self.number = number;
        }
        if let Some(question) = patch.question {
            self.question = question;
        }
        if let Some(options) = patch.options {
            self.options = options;
        }
        if let Some(answer) = patch.answer {
            self.answer = answer;
        }
    }

    fn stamp(&mut self, kind: GroupType) {
        self.kind = kind;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MultiQuestion {
    pub number: u32,
    #[serde(rename = "type")]
    pub kind: GroupType,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub answer: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MultiPatch {
    pub number: Option<u32>,
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub answer: Option<Vec<String>>,
}

impl Question for MultiQuestion {
    type Patch = MultiPatch;

    fn blank(number: u32, kind: GroupType) -> Self {
        Self {
            number,
            kind,
            question: String::new(),
            options: vec![String::new(); DEFAULT_OPTION_SLOTS],
            answer: Vec::new(),
        }
    }

    fn number(&self) -> u32 {
        self.number
    }

    /// Every selected answer is scored as its own mark.
    fn marks(&self) -> u32 {
        u32::try_from(self.answer.len()).unwrap_or(u32::MAX)
    }

    fn apply(&mut self, patch: MultiPatch) {
        if let Some(number) = patch.number {
            self.number = number;
        }
        if let Some(question) = patch.question {
            self.question = question;
        }
        if let Some(options) = patch.options {
            self.options = options;
        }
        if let Some(answer) = patch.answer {
            self.answer = answer;
        }
    }

    fn stamp(&mut self, kind: GroupType) {
        self.kind = kind;
    }
}

/// Question picking its answer from the group-level `choices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChoiceQuestion {
    pub number: u32,
    #[serde(rename = "type")]
    pub kind: GroupType,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ChoicePatch {
    pub number: Option<u32>,
    pub question: Option<String>,
    pub answer: Option<String>,
}

impl Question for ChoiceQuestion {
    type Patch = ChoicePatch;

    fn blank(number: u32, kind: GroupType) -> Self {
        Self {
            number,
            kind,
            question: String::new(),
            answer: String::new(),
        }
    }

    fn number(&self) -> u32 {
        self.number
    }

    fn apply(&mut self, patch: ChoicePatch) {
        if let Some(number) = patch.number {
            self.number = number;
        }
        if let Some(question) = patch.question {
            self.question = question;
        }
        if let Some(answer) = patch.answer {
            self.answer = answer;
        }
    }

    fn stamp(&mut self, kind: GroupType) {
        self.kind = kind;
    }
}

/// Partial update for a single question. The shape must match the group variant.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum QuestionPatch {
    FillBlanks(FillBlanksPatch),
    Tfng(TfngPatch),
    Mcq(McqPatch),
    Multi(MultiPatch),
    Choice(ChoicePatch),
}

impl QuestionPatch {
    pub fn shape(&self) -> &'static str {
        match self {
            Self::FillBlanks(_) => "fill_blanks",
            Self::Tfng(_) => "tfng",
            Self::Mcq(_) => "mcq",
            Self::Multi(_) => "multi",
            Self::Choice(_) => "choice",
        }
    }
}

/// Mark-numbers consumed by `questions`, saturating at `u32::MAX`.
pub fn total_marks<Q: Question>(questions: &[Q]) -> u32 {
    questions
        .iter()
        .fold(0u32, |acc, q| acc.saturating_add(q.marks()))
}

/// Next free mark-number after `start_number` given the questions already present.
pub fn next_number<Q: Question>(questions: &[Q], start_number: u32) -> u32 {
    start_number
        .saturating_add(total_marks(questions))
        .saturating_add(1)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn group_type_wire_names() {
        let json = serde_json::to_string(&GroupType::MatchingHeader).unwrap();
        assert_eq!(json, "\"MATCHING_HEADER\"");
        let parsed: GroupType = serde_json::from_str("\"FILL_BLANKS\"").unwrap();
        assert_eq!(parsed, GroupType::FillBlanks);
        assert_eq!("drag_drop".parse::<GroupType>().unwrap(), GroupType::DragDrop);
        assert!("ESSAY".parse::<GroupType>().is_err());
    }

    #[test]
    fn tfng_not_given_has_a_space() {
        let json = serde_json::to_string(&TfngAnswer::NotGiven).unwrap();
        assert_eq!(json, "\"NOT GIVEN\"");
    }

    #[test]
    fn tfng_question_carries_no_type_tag() {
        let q = TfngQuestion::blank(3, GroupType::Tfng);
        let value = serde_json::to_value(&q).unwrap();
        assert!(value.get("type").is_none());
        assert_eq!(value["number"], 3);
    }

    #[test]
    fn blank_scaffolding() {
        let fill = FillBlanksQuestion::blank(1, GroupType::FillBlanks);
        assert_eq!(fill.answer, vec![String::new()]);

        let mcq = McqQuestion::blank(1, GroupType::Mcq);
        assert_eq!(mcq.options, vec![String::new(); 4]);
        assert!(mcq.answer.is_empty());

        let multi = MultiQuestion::blank(1, GroupType::Multi);
        assert_eq!(multi.options.len(), 4);
        assert!(multi.answer.is_empty());
    }

    #[test]
    fn patch_merges_only_given_fields() {
        let mut q = McqQuestion::blank(5, GroupType::Mcq);
        q.apply(McqPatch {
            question: Some("Which one?".into()),
            ..Default::default()
        });
        assert_eq!(q.question, "Which one?");
        assert_eq!(q.number, 5);
        assert_eq!(q.options.len(), 4);
    }

    #[test]
    fn multi_marks_follow_answer_count() {
        let mut q = MultiQuestion::blank(1, GroupType::Multi);
        assert_eq!(q.marks(), 0);
        q.answer = vec!["A".into(), "C".into()];
        assert_eq!(q.marks(), 2);
    }

    #[test]
    fn tfng_patch_sets_and_clears_answer() {
        let mut q = TfngQuestion::blank(1, GroupType::Tfng);

        let set: TfngPatch = serde_json::from_value(serde_json::json!({ "answer": "FALSE" })).unwrap();
        q.apply(set);
        assert_eq!(q.answer, Some(TfngAnswer::False));

        let untouched: TfngPatch = serde_json::from_value(serde_json::json!({ "question": "Q" })).unwrap();
        q.apply(untouched);
        assert_eq!(q.answer, Some(TfngAnswer::False));

        let clear: TfngPatch = serde_json::from_value(serde_json::json!({ "answer": null })).unwrap();
        assert_eq!(clear.answer, Some(None));
        q.apply(clear);
        assert_eq!(q.answer, None);
    }

    #[test]
    fn fill_blanks_answer_defaults_to_empty() {
        let q: FillBlanksQuestion =
            serde_json::from_value(serde_json::json!({ "number": 2, "type": "FILL_BLANKS" })).unwrap();
        assert!(q.answer.is_empty());
    }

    #[test]
    fn next_number_saturates() {
        let mut q = MultiQuestion::blank(1, GroupType::Multi);
        q.answer = vec!["A".into(), "B".into()];
        assert_eq!(next_number(&[q.clone(), q], u32::MAX - 1), u32::MAX);
        assert_eq!(next_number::<TfngQuestion>(&[], u32::MAX), u32::MAX);
    }
}
