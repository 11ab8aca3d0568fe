//! The sign-up page and the handler that creates an account on the REST API.
//!
//! The optional profile image is uploaded to the image host first so that
//! only its URL is sent to the API.

use axum::{
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    api::{
        ApiClient,
        records::{self, Registration},
    },
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, form_input, link, log_in_register,
        submit_button,
    },
    image_host::{ImageFile, ImageHost},
    model::is_valid_email,
};

fn register_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::REGISTER_API)
            hx-encoding="multipart/form-data"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#indicator"
            class="space-y-4 md:space-y-6"
        {
            (form_input("Full name", "full_name", "text", "", None))
            (form_input("Email", "email", "email", "", None))
            (form_input("Password", "password", "password", "", None))

            div
            {
                label for="profile_image" class=(FORM_LABEL_STYLE) { "Profile image (optional)" }

                input
                    id="profile_image"
                    name="profile_image"
                    type="file"
                    accept="image/*"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (submit_button("Sign up"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let content = log_in_register("Create an account", &register_form());

    base("Register", &[], &content).into_response()
}

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegisterState {
    pub api: ApiClient,
    pub image_host: ImageHost,
}

impl FromRef<AppState> for RegisterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            image_host: state.image_host.clone(),
        }
    }
}

/// The raw fields of the registration form.
#[derive(Debug, Default)]
struct RegistrationForm {
    full_name: String,
    email: String,
    password: String,
    profile_image: Option<ImageFile>,
}

impl RegistrationForm {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, Error> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|error| Error::MultipartError(error.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_owned();

            match name.as_str() {
                "full_name" => form.full_name = field_text(field).await?,
                "email" => form.email = field_text(field).await?,
                "password" => form.password = field_text(field).await?,
                "profile_image" => form.profile_image = field_image(field).await?,
                _ => {}
            }
        }

        Ok(form)
    }

    /// Check every field is filled in and split off the profile image.
    fn validate(self) -> Result<(Registration, Option<ImageFile>), Error> {
        let full_name = self.full_name.trim();
        let email = self.email.trim();

        if full_name.is_empty() {
            return Err(Error::MissingField("full name"));
        }
        if email.is_empty() {
            return Err(Error::MissingField("email"));
        }
        if self.password.trim().is_empty() {
            return Err(Error::MissingField("password"));
        }
        if !is_valid_email(email) {
            return Err(Error::InvalidEmail);
        }

        let registration = Registration {
            full_name: full_name.to_owned(),
            email: email.to_owned(),
            password: self.password,
            profile_image_url: None,
        };

        Ok((registration, self.profile_image))
    }
}

async fn field_text(field: Field<'_>) -> Result<String, Error> {
    field
        .text()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))
}

/// An empty file input still sends a part, which is treated as no image.
async fn field_image(field: Field<'_>) -> Result<Option<ImageFile>, Error> {
    let file_name = field.file_name().unwrap_or("profile_image").to_owned();
    let content_type = field.content_type().map(str::to_owned);
    let bytes = field
        .bytes()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?;

    if bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(ImageFile {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    }))
}

async fn register_user(state: &RegisterState, multipart: Multipart) -> Result<(), Error> {
    let (mut registration, profile_image) =
        RegistrationForm::from_multipart(multipart).await?.validate()?;

    if let Some(profile_image) = profile_image {
        let uploaded = state.image_host.upload(profile_image).await?;
        tracing::debug!("Uploaded profile image {}", uploaded.public_id);
        registration.profile_image_url = Some(uploaded.secure_url);
    }

    records::register(&state.api, &registration)
        .await
        .map_err(|error| error.context("Signup failed. Please try again."))
}

/// Handler for the multipart registration form.
///
/// On success the client is sent to the log-in page, otherwise an alert
/// explains what went wrong.
pub async fn post_register(State(state): State<RegisterState>, multipart: Multipart) -> Response {
    match register_user(&state, multipart).await {
        Ok(()) => (
            HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
            StatusCode::OK,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}
