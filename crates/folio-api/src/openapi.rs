//! OpenAPI document served at `/openapi.json`.

use utoipa::OpenApi;

use folio_core::{
    Block, BlockId, BlockMetadata, BlockType, CheckboxMetadata, CreateNoteRequest, EmptyMetadata,
    FieldError, MediaMetadata, Note, UpdateNoteRequest,
};

use crate::error::ErrorResponse;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Folio API",
        description = "Block-based note storage: list, search, create, update and delete notes."
    ),
    paths(
        handlers::health_check,
        handlers::notes::list_notes,
        handlers::notes::search_notes,
        handlers::notes::get_note,
        handlers::notes::create_note,
        handlers::notes::update_note,
        handlers::notes::delete_note,
    ),
    components(schemas(
        Note,
        Block,
        BlockId,
        BlockType,
        BlockMetadata,
        CheckboxMetadata,
        MediaMetadata,
        EmptyMetadata,
        CreateNoteRequest,
        UpdateNoteRequest,
        FieldError,
        ErrorResponse,
    )),
    tags(
        (name = "Notes", description = "Note CRUD and search"),
        (name = "System", description = "Health and metadata")
    )
)]
pub struct ApiDoc;
