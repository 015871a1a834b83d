use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "ieltsprep", description = "Reading test authoring API"),
    paths(
        crate::web::routes::reading::reading_validate_handler,
        crate::web::routes::reading::reading_assemble_handler,
        crate::web::routes::reading::reading_group_edit_handler,
        crate::web::routes::reading::reading_submit_handler,
        crate::web::routes::reading::reading_list_handler,
        crate::web::routes::reading::reading_get_handler,
        crate::web::routes::reading::reading_exam_document_handler,
        crate::web::routes::reading::reading_update_handler,
        crate::web::routes::reading::reading_delete_handler,
    ),
    tags(
        (name = "reading", description = "Reading test content")
    )
)]
pub struct ApiDoc;
