//! Item registration and deletion endpoints.

use std::sync::Arc;

use axum::{
    Extension, Form,
    extract::{Multipart, State, multipart::MultipartError},
};
use entities::{Category, NewPortalItem, SessionUser};
use serde::Deserialize;

use crate::error::{ServerError, ServerResult};
use crate::gateway::{FileUpload, GatewayError, GatewayResult, PortalGateway, is_allowed_upload};
use crate::navigation::RerenderRequested;
use crate::session::{Notice, SessionId};
use crate::state::AppState;

/// Fields of the registration form.
#[derive(Debug, Default)]
pub struct RegistrationForm {
    /// Item title.
    pub title: String,
    /// External link, sent only by categories that show the field.
    pub link_url: Option<String>,
    /// Attached file, if the user picked one.
    pub file: Option<FileUpload>,
}

/// Deletion form.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    /// Item ID.
    pub id: String,
}

fn bad_multipart(e: MultipartError) -> ServerError {
    ServerError::InvalidRequest(format!("Malformed form data: {}", e.body_text()))
}

async fn read_registration_form(mut multipart: Multipart) -> ServerResult<RegistrationForm> {
    let mut form = RegistrationForm::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = field.text().await.map_err(bad_multipart)?,
            "link_url" => form.link_url = Some(field.text().await.map_err(bad_multipart)?),
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;

                // Browsers send an empty part when no file was picked.
                if !file_name.is_empty() && !bytes.is_empty() {
                    form.file = Some(FileUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Registers a new item in the session's active category.
pub async fn register_item(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    multipart: Multipart,
) -> ServerResult<RerenderRequested> {
    let form = read_registration_form(multipart).await?;
    let (user, category) = state
        .update_session(session, |context| {
            (context.user.clone(), context.active_category)
        })
        .await?;

    let notices = match check_submission(&form) {
        Some(rejection) => vec![rejection],
        None => match submit(&state.gateway, &user, category, form).await {
            Ok(notices) => notices,
            Err(e) => vec![write_failure(e)?],
        },
    };

    state
        .update_session(session, |context| {
            for notice in notices {
                context.push_notice(notice);
            }
        })
        .await?;
    Ok(RerenderRequested)
}

/// Deletes an item.
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<DeleteForm>,
) -> ServerResult<RerenderRequested> {
    let id = form.id.trim();
    if id.is_empty() {
        return Err(ServerError::InvalidRequest("Item ID is required".to_string()));
    }

    let notice = match state.gateway.delete_item(id).await {
        Ok(()) => Notice::success("Deleted"),
        Err(e) => write_failure(e)?,
    };

    state
        .update_session(session, |context| context.push_notice(notice))
        .await?;
    Ok(RerenderRequested)
}

/// Returns a warning when the form must not be submitted.
fn check_submission(form: &RegistrationForm) -> Option<Notice> {
    if form.title.trim().is_empty() {
        return Some(Notice::warning("Please enter a title."));
    }

    match &form.file {
        Some(file) if !is_allowed_upload(&file.file_name) => Some(Notice::warning(format!(
            "This file type cannot be uploaded: {}",
            file.file_name
        ))),
        _ => None,
    }
}

/// Uploads the file (if any), then writes the metadata record.
async fn submit(
    gateway: &PortalGateway,
    user: &SessionUser,
    category: &Category,
    form: RegistrationForm,
) -> GatewayResult<Vec<Notice>> {
    let mut notices = Vec::new();

    let file_url = match form.file {
        Some(file) => {
            let uploaded = gateway.upload_file(file, category.id).await?;
            if let Some(warning) = uploaded.warning {
                notices.push(Notice::warning(warning));
            }
            Some(uploaded.url)
        }
        None => None,
    };

    let link_url = form
        .link_url
        .filter(|_| category.accepts_link())
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    let item = NewPortalItem::new(form.title.trim(), category.id, &user.name)
        .with_file_url(file_url)
        .with_link_url(link_url);
    gateway.create_item(item).await?;

    notices.push(Notice::success("Registered"));
    Ok(notices)
}

/// Turns a failed write into a notice, or into a request error when the
/// backend itself failed.
fn write_failure(error: GatewayError) -> ServerResult<Notice> {
    match error {
        GatewayError::Unavailable(reason) => Ok(Notice::error(format!(
            "Cannot save because the backend is not connected: {reason}"
        ))),
        GatewayError::Validation(e) => Ok(Notice::warning(e.to_string())),
        GatewayError::DisallowedFile(name) => Ok(Notice::warning(format!(
            "This file type cannot be uploaded: {name}"
        ))),
        e @ GatewayError::Store(_) => Err(e.into()),
    }
}
