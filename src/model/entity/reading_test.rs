use crate::content::{
    QuestionGroup, TestData, TestPart, TestType, ValidationScope, Validator,
    document::{DetailedTest, Reading},
};
use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{DatabaseError, ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use sqlx::prelude::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// One stored reading part: the relational projection of a `TestPart`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct ReadingTest {
    id: Uuid,
    exam_id: Uuid,
    title: String,
    time: String,
    test_type: String,
    part_number: i32,
    passage: Vec<String>,
    #[schema(value_type = Vec<QuestionGroup>)]
    groups: Json<Vec<QuestionGroup>>,
    created_at: DateTime<Utc>,
}

impl ResourceTyped for ReadingTest {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::ReadingTest
    }
}

impl ReadingTest {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn exam_id(&self) -> Uuid {
        self.exam_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn test_type(&self) -> &str {
        &self.test_type
    }

    pub fn part_number(&self) -> i32 {
        self.part_number
    }

    pub fn passage(&self) -> &[String] {
        &self.passage
    }

    pub fn groups(&self) -> &[QuestionGroup] {
        &self.groups
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn to_part(&self) -> TestPart {
        TestPart {
            id: self.part_number as u32,
            title: self.title.clone(),
            time: self.time.clone(),
            passage: self.passage.clone(),
            groups: self.groups.0.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ReadingTestCreate {
    pub exam_id: Uuid,
    pub title: String,
    pub time: String,
    pub test_type: TestType,
    pub part_number: i32,
    #[serde(default)]
    pub passage: Vec<String>,
    #[serde(default)]
    pub groups: Vec<QuestionGroup>,
}

/// New content for one stored part. Exam, test type and part number stay as stored.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ReadingTestRevision {
    pub title: String,
    pub time: String,
    #[serde(default)]
    pub passage: Vec<String>,
    #[serde(default)]
    pub groups: Vec<QuestionGroup>,
}

impl ReadingTestCreate {
    /// One row per present reading part.
    pub fn from_document(exam_id: Uuid, data: &TestData, test_type: TestType) -> Vec<Self> {
        data.reading()
            .parts()
            .map(|(number, part)| Self {
                exam_id,
                title: part.title.clone(),
                time: part.time.clone(),
                test_type,
                part_number: number as i32,
                passage: part.passage.clone(),
                groups: part.groups.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl CrudRepository<ReadingTest, ReadingTestCreate, Uuid> for ReadingTest {
    async fn create(mm: &ModelManager, data: ReadingTestCreate) -> DatabaseResult<Self> {
        Self::insert(mm.executor(), &data).await
    }

    async fn update(mut self, mm: &ModelManager, data: ReadingTestCreate) -> DatabaseResult<Self> {
        sqlx::query(
            "UPDATE reading_tests SET exam_id = $1, title = $2, time = $3, test_type = $4, \
             part_number = $5, passage = $6, groups = $7 WHERE id = $8",
        )
        .bind(data.exam_id)
        .bind(&data.title)
        .bind(&data.time)
        .bind(data.test_type.as_str())
        .bind(data.part_number)
        .bind(&data.passage)
        .bind(Json(&data.groups))
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.exam_id = data.exam_id;
        self.title = data.title;
        self.time = data.time;
        self.test_type = data.test_type.as_str().to_string();
        self.part_number = data.part_number;
        self.passage = data.passage;
        self.groups = Json(data.groups);
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM reading_tests WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM reading_tests WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM reading_tests ORDER BY created_at DESC, part_number LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reading_tests")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(ReadingTest, ReadingTestCreate, Uuid);

// Utils

impl ReadingTest {
    async fn insert<'e, E>(executor: E, data: &ReadingTestCreate) -> DatabaseResult<Self>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as(
            "INSERT INTO reading_tests (id, exam_id, title, time, test_type, part_number, passage, groups) \
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.exam_id)
        .bind(&data.title)
        .bind(&data.time)
        .bind(data.test_type.as_str())
        .bind(data.part_number)
        .bind(&data.passage)
        .bind(Json(&data.groups))
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    pub async fn find_all_by_exam(mm: &ModelManager, exam_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let rows: Vec<Self> = sqlx::query_as(
            r#"
            SELECT *
            FROM reading_tests rt
            WHERE rt.exam_id = $1
            ORDER BY rt.part_number ASC
            "#,
        )
        .bind(exam_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }

    /// Validates `data` and stores every present part in one transaction.
    #[tracing::instrument(skip(mm, data, validator))]
    pub async fn submit(
        mm: &ModelManager,
        exam_id: Uuid,
        data: &TestData,
        test_type: TestType,
        validator: &Validator,
    ) -> DatabaseResult<Vec<Self>> {
        let report = validator.validate(data);
        if !report.valid {
            return Err(DatabaseError::DocumentRejected {
                errors: report.errors,
            });
        }

        let mut tx = mm.executor().begin().await?;
        let mut created = Vec::new();
        for create in ReadingTestCreate::from_document(exam_id, data, test_type) {
            let row = Self::insert(&mut *tx, &create).await?;
            created.push(row);
        }
        tx.commit().await?;

        tracing::info!(parts = created.len(), "reading test stored");
        Ok(created)
    }
}

impl ReadingTest {
    /// The stored part with `revision` applied, as it would be re-assembled.
    pub fn revised_part(&self, revision: &ReadingTestRevision) -> TestPart {
        TestPart {
            id: self.part_number as u32,
            title: revision.title.clone(),
            time: revision.time.clone(),
            passage: revision.passage.clone(),
            groups: revision.groups.iter().map(QuestionGroup::stamped).collect(),
        }
    }

    /// Validates the revised part on its own, then rewrites the row in place.
    #[tracing::instrument(skip(self, mm, revision, validator), fields(id = %self.id))]
    pub async fn revise(
        self,
        mm: &ModelManager,
        revision: ReadingTestRevision,
        validator: &Validator,
    ) -> DatabaseResult<Self> {
        let part = self.revised_part(&revision);
        let single = TestData {
            detailed_test: DetailedTest {
                reading: Reading {
                    part1: Some(vec![part.clone()]),
                    ..Default::default()
                },
                ..Default::default()
            },
        };
        let report =
            Validator::new(ValidationScope::FirstPart, validator.check_answers).validate(&single);
        if !report.valid {
            return Err(DatabaseError::DocumentRejected {
                errors: report.errors,
            });
        }

        let test_type = self
            .test_type
            .parse::<TestType>()
            .map_err(DatabaseError::CorruptRow)?;
        let data = ReadingTestCreate {
            exam_id: self.exam_id,
            title: part.title,
            time: part.time,
            test_type,
            part_number: self.part_number,
            passage: part.passage,
            groups: part.groups,
        };

        let updated = self.update(mm, data).await?;
        tracing::info!("reading part revised");
        Ok(updated)
    }
}

/// Rebuilds the wire document from stored rows of one exam.
pub fn document_from_rows(rows: &[ReadingTest]) -> TestData {
    let mut reading = Reading::default();
    for row in rows {
        if let Some(slot) = reading.part_mut(row.part_number as u32) {
            slot.get_or_insert_with(Vec::new).push(row.to_part());
        }
    }

    TestData {
        detailed_test: DetailedTest {
            reading,
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::content::{GroupType, PartDraft, TestForm, assemble};

    fn full_test() -> TestData {
        let group = QuestionGroup::new(GroupType::Tfng).add_question(0);
        assemble(&TestForm {
            title: "Mock".into(),
            time: 60,
            test_type: TestType::FullTest,
            parts: vec![
                PartDraft {
                    passage: "One.".into(),
                    groups: vec![group.clone()],
                },
                PartDraft::default(),
                PartDraft {
                    passage: "Three.".into(),
                    groups: vec![group],
                },
            ],
            ..Default::default()
        })
    }

    fn row(create: ReadingTestCreate) -> ReadingTest {
        ReadingTest {
            id: Uuid::new_v4(),
            exam_id: create.exam_id,
            title: create.title,
            time: create.time,
            test_type: create.test_type.as_str().to_string(),
            part_number: create.part_number,
            passage: create.passage,
            groups: Json(create.groups),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn projection_has_one_row_per_present_part() {
        let exam_id = Uuid::new_v4();
        let rows = ReadingTestCreate::from_document(exam_id, &full_test(), TestType::FullTest);
        let numbers: Vec<_> = rows.iter().map(|r| r.part_number).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert!(rows.iter().all(|r| r.exam_id == exam_id && r.time == "20"));
    }

    #[test]
    fn rows_rebuild_the_document() {
        let data = full_test();
        let rows: Vec<_> = ReadingTestCreate::from_document(Uuid::new_v4(), &data, TestType::FullTest)
            .into_iter()
            .map(row)
            .collect();
        assert_eq!(document_from_rows(&rows), data);
    }

    #[test]
    fn revision_keeps_slot_and_stamps_groups() {
        let data = full_test();
        let stored = row(
            ReadingTestCreate::from_document(Uuid::new_v4(), &data, TestType::FullTest)
                .remove(1),
        );
        assert_eq!(stored.test_type().parse::<TestType>(), Ok(TestType::FullTest));

        let mut group = QuestionGroup::new(GroupType::Mcq).add_question(0);
        if let QuestionGroup::Mcq { questions, .. } = &mut group {
            questions[0].kind = GroupType::Dropdown;
        }
        let part = stored.revised_part(&ReadingTestRevision {
            title: "Mock - Part 3 (rev)".into(),
            time: "25".into(),
            passage: vec!["New text.".into()],
            groups: vec![group],
        });

        assert_eq!(part.id, 3);
        assert_eq!(part.time, "25");
        let value = serde_json::to_value(&part.groups[0]).unwrap();
        assert_eq!(value["questions"][0]["type"], "MCQ");
    }
}
