use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use tracing::debug;

use crate::content::{
    QuestionGroup,
    document::{DetailedTest, Listening, Reading, TestData, TestPart, split_passage},
};

pub const FULL_TEST_PARTS: u32 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    #[default]
    SinglePart,
    FullTest,
}

impl TestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SinglePart => "single_part",
            Self::FullTest => "full_test",
        }
    }
}

impl std::str::FromStr for TestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::SinglePart, Self::FullTest]
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown test type `{s}`"))
    }
}

/// Passage text and groups authored for one part of a full test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PartDraft {
    #[serde(default)]
    pub passage: String,
    #[serde(default)]
    pub groups: Vec<QuestionGroup>,
}

impl PartDraft {
    fn has_content(&self) -> bool {
        !self.passage.trim().is_empty() || !self.groups.is_empty()
    }
}

/// Snapshot of the authoring form.
///
/// `passage`/`groups` are read in single-part mode, `parts` in full-test mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TestForm {
    pub title: String,
    /// Minutes. For a full test this is the total across all parts.
    pub time: u32,
    #[serde(default)]
    pub test_type: TestType,
    /// 1..=3. Anything else is rejected when the form is decoded.
    #[serde(default, deserialize_with = "part_number_in_range")]
    #[schema(minimum = 1, maximum = 3)]
    pub part_number: Option<u32>,
    #[serde(default)]
    pub passage: String,
    #[serde(default)]
    pub groups: Vec<QuestionGroup>,
    #[serde(default)]
    pub parts: Vec<PartDraft>,
}

fn part_number_in_range<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<u32>::deserialize(deserializer)? {
        Some(n) if !(1..=FULL_TEST_PARTS).contains(&n) => Err(D::Error::custom(format!(
            "part_number must be between 1 and {FULL_TEST_PARTS}, got {n}"
        ))),
        number => Ok(number),
    }
}

/// Builds the wire document from a form snapshot. The result owns copies of all groups.
pub fn assemble(form: &TestForm) -> TestData {
    let mut reading = Reading::default();

    match form.test_type {
        TestType::SinglePart => {
            let number = match form.part_number.unwrap_or(1) {
                n @ 1..=FULL_TEST_PARTS => n,
                n => {
                    debug!(number = n, "part number outside 1..=3, placing under part1");
                    1
                }
            };
            let part = TestPart {
                id: number,
                title: form.title.clone(),
                time: form.time.to_string(),
                passage: split_passage(&form.passage),
                groups: form.groups.iter().map(QuestionGroup::stamped).collect(),
            };

            if let Some(slot) = reading.part_mut(number) {
                *slot = Some(vec![part]);
            }
        }
        TestType::FullTest => {
            let time = form.time.div_ceil(FULL_TEST_PARTS).to_string();

            for (number, draft) in (1..=FULL_TEST_PARTS).zip(form.parts.iter()) {
                if !draft.has_content() {
                    continue;
                }

                let part = TestPart {
                    id: number,
                    title: format!("{} - Part {}", form.title, number),
                    time: time.clone(),
                    passage: split_passage(&draft.passage),
                    groups: draft.groups.iter().map(QuestionGroup::stamped).collect(),
                };
                if let Some(slot) = reading.part_mut(number) {
                    *slot = Some(vec![part]);
                }
            }
        }
    }

    TestData {
        detailed_test: DetailedTest {
            reading,
            listening: Listening::default(),
        },
    }
}
