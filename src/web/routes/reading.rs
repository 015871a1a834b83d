use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    content::{QuestionGroup, TestData, TestForm, ValidationReport, assemble},
    model::{
        CrudRepository, Page, PaginatableRepository, ResourceType, ResourceTyped,
        entity::{ReadingTest, ReadingTestRevision, document_from_rows},
    },
    web::{
        AppState, WebError, WebResult,
        dto::reading::{GroupEditRequest, PaginationQuery, SubmitTestRequest, ValidateQuery},
        error::ErrorResponse,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", post(reading_submit_handler).get(reading_list_handler))
        .route("/validate", post(reading_validate_handler))
        .route("/assemble", post(reading_assemble_handler))
        .route("/groups/edit", post(reading_group_edit_handler))
        .route("/exam/{exam_id}", get(reading_exam_document_handler))
        .route(
            "/{id}",
            get(reading_get_handler)
                .put(reading_update_handler)
                .delete(reading_delete_handler),
        )
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/reading/validate",
    description = "Check a test document and list every defect found",
    params(ValidateQuery),
    request_body = TestData,
    responses(
        (status = 200, description = "Document checked", body = ValidationReport),
    ),
    tag = "reading"
)]
pub async fn reading_validate_handler(
    State(state): State<AppState>,
    Query(query): Query<ValidateQuery>,
    Json(data): Json<TestData>,
) -> WebResult<impl IntoResponse> {
    let report = query.apply(state.validator()).validate(&data);
    Ok((StatusCode::OK, Json(report)))
}

#[utoipa::path(
    post,
    path = "/api/v1/reading/assemble",
    description = "Build the test document from an authoring form snapshot",
    request_body = TestForm,
    responses(
        (status = 200, description = "Document assembled", body = TestData),
    ),
    tag = "reading"
)]
pub async fn reading_assemble_handler(Json(form): Json<TestForm>) -> WebResult<impl IntoResponse> {
    Ok((StatusCode::OK, Json(assemble(&form))))
}

#[utoipa::path(
    post,
    path = "/api/v1/reading/groups/edit",
    description = "Apply one authoring step to a question group and return the new group",
    request_body = GroupEditRequest,
    responses(
        (status = 200, description = "Group edited", body = QuestionGroup),
        (status = 400, description = "Edit does not fit the group", body = ErrorResponse),
    ),
    tag = "reading"
)]
pub async fn reading_group_edit_handler(
    Json(req): Json<GroupEditRequest>,
) -> WebResult<impl IntoResponse> {
    let group = req.edit.apply(&req.group)?;
    Ok((StatusCode::OK, Json(group)))
}

#[utoipa::path(
    post,
    path = "/api/v1/reading",
    description = "Assemble, validate and store a reading test. One row is stored per part",
    request_body = SubmitTestRequest,
    responses(
        (status = 201, description = "Test stored", body = Vec<ReadingTest>),
        (status = 422, description = "Test content is invalid", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "reading"
)]
pub async fn reading_submit_handler(
    State(state): State<AppState>,
    Json(req): Json<SubmitTestRequest>,
) -> WebResult<impl IntoResponse> {
    let data = assemble(&req.form);
    let created = ReadingTest::submit(
        state.pool(),
        req.exam_id,
        &data,
        req.form.test_type,
        state.validator(),
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(ReadingTest::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reading",
    description = "List stored reading parts, newest first",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Stored parts", body = Page<ReadingTest>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "reading"
)]
pub async fn reading_list_handler(
    State(state): State<AppState>,
    Query(page): Query<PaginationQuery>,
) -> WebResult<impl IntoResponse> {
    if page.limit <= 0 || page.offset < 0 {
        return Err(WebError::resource_bad_request(
            ReadingTest::get_resource_type(),
            "limit must be positive and offset non-negative",
        ));
    }

    let tests = ReadingTest::page(state.pool(), page.limit, page.offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(ReadingTest::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(tests)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reading/{id}",
    params(
        ("id" = Uuid, Path, description = "ID of the stored part")
    ),
    responses(
        (status = 200, description = "Part found", body = ReadingTest),
        (status = 404, description = "Part not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "reading"
)]
pub async fn reading_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let found = ReadingTest::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(ReadingTest::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(ReadingTest::get_resource_type()))?;

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reading/exam/{exam_id}",
    description = "Rebuild the test document of an exam from its stored parts",
    params(
        ("exam_id" = Uuid, Path, description = "Exam the parts belong to")
    ),
    responses(
        (status = 200, description = "Document rebuilt", body = TestData),
        (status = 404, description = "No parts stored for this exam", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "reading"
)]
pub async fn reading_exam_document_handler(
    State(state): State<AppState>,
    Path(exam_id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let rows = ReadingTest::find_all_by_exam(state.pool(), exam_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(ResourceType::TestDocument, e))?;

    if rows.is_empty() {
        return Err(WebError::resource_not_found(ResourceType::TestDocument));
    }

    Ok((StatusCode::OK, Json(document_from_rows(&rows))))
}

#[utoipa::path(
    put,
    path = "/api/v1/reading/{id}",
    description = "Replace the content of a stored part. The revised part is validated on its own",
    params(
        ("id" = Uuid, Path, description = "ID of the stored part")
    ),
    request_body = ReadingTestRevision,
    responses(
        (status = 200, description = "Part updated", body = ReadingTest),
        (status = 404, description = "Part not found", body = ErrorResponse),
        (status = 422, description = "Revised content is invalid", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "reading"
)]
pub async fn reading_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(revision): Json<ReadingTestRevision>,
) -> WebResult<impl IntoResponse> {
    let found = ReadingTest::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(ReadingTest::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(ReadingTest::get_resource_type()))?;

    let updated = found
        .revise(state.pool(), revision, state.validator())
        .await
        .map_err(|e| WebError::resource_fetch_error(ReadingTest::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reading/{id}",
    description = "Deletes specified part",
    params(
        ("id" = Uuid, Path, description = "ID of the stored part")
    ),
    responses(
        (status = 200, description = "Part deleted"),
        (status = 404, description = "Part not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "reading"
)]
pub async fn reading_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let found = ReadingTest::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(ReadingTest::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(ReadingTest::get_resource_type()))?;

    found
        .delete(state.pool())
        .await
        .map_err(|e| WebError::resource_fetch_error(ReadingTest::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}
