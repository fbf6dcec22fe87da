//! Request body decoding into an [`UploadForm`].

use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, Method};
use axum::Form;
use inkwell_processing::UploadForm;

use crate::dispatch::BodyError;

/// Decode a POST body (multipart or url-encoded) into file parts and text fields.
///
/// Other methods and other content types yield an empty form. A failure while
/// reading the body is classified so an oversized body can be told apart.
pub async fn read_form(request: Request) -> Result<UploadForm, BodyError> {
    if request.method() != Method::POST {
        return Ok(UploadForm::new());
    }

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        read_multipart(request).await
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, &())
            .await
            .map_err(|e| BodyError::from_rejection(e.status(), e.body_text()))?;
        let mut form = UploadForm::new();
        for (name, value) in pairs {
            form.push_field(name, value);
        }
        Ok(form)
    } else {
        Ok(UploadForm::new())
    }
}

async fn read_multipart(request: Request) -> Result<UploadForm, BodyError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| BodyError::from_rejection(e.status(), e.body_text()))?;

    let mut form = UploadForm::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let data = field.bytes().await.map_err(multipart_error)?;
                form.push_file(name, file_name, data);
            }
            None => {
                let value = field.text().await.map_err(multipart_error)?;
                form.push_field(name, value);
            }
        }
    }
    Ok(form)
}

fn multipart_error(e: MultipartError) -> BodyError {
    BodyError::from_rejection(e.status(), e.body_text())
}
