//! Wire document describing a whole test, as consumed by rendering and grading.

use serde::{Deserialize, Serialize};

use crate::content::QuestionGroup;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TestData {
    #[serde(rename = "Detailedtest")]
    pub detailed_test: DetailedTest,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DetailedTest {
    pub reading: Reading,
    #[serde(default)]
    pub listening: Listening,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Reading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part1: Option<Vec<TestPart>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part2: Option<Vec<TestPart>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part3: Option<Vec<TestPart>>,
}

/// Always `{}` on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Listening {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TestPart {
    pub id: u32,
    pub title: String,
    pub time: String,
    #[serde(default)]
    pub passage: Vec<String>,
    #[serde(default)]
    pub groups: Vec<QuestionGroup>,
}

impl Reading {
    /// Slot for part `number` (1..=3).
    pub fn part(&self, number: u32) -> Option<&[TestPart]> {
        let slot = match number {
            1 => &self.part1,
            2 => &self.part2,
            3 => &self.part3,
            _ => return None,
        };
        slot.as_deref()
    }

    pub fn part_mut(&mut self, number: u32) -> Option<&mut Option<Vec<TestPart>>> {
        match number {
            1 => Some(&mut self.part1),
            2 => Some(&mut self.part2),
            3 => Some(&mut self.part3),
            _ => None,
        }
    }

    /// Present parts in order, paired with their part number.
    pub fn parts(&self) -> impl Iterator<Item = (u32, &TestPart)> {
        (1..=3).flat_map(move |n| {
            self.part(n)
                .unwrap_or_default()
                .iter()
                .map(move |p| (n, p))
        })
    }
}

impl TestData {
    pub fn reading(&self) -> &Reading {
        &self.detailed_test.reading
    }
}

/// Splits editor text into paragraphs on blank lines, dropping empty ones.
pub fn split_passage(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
