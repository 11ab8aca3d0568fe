//! Fetchers and mutations for the records each page needs.

use serde::{Deserialize, Serialize};

use crate::{
    api::{ApiClient, ApiError, BearerToken, ListResponse, paths},
    endpoints::format_endpoint,
    model::{
        Category, CategoryPayload, NewTransaction, ProfileResponse, RecordId, Transaction,
        TransactionKind, User,
    },
};

/// Everything the dashboard and filters pages work with.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Records {
    pub incomes: Vec<Transaction>,
    pub expenses: Vec<Transaction>,
    pub categories: Vec<Category>,
}

pub async fn fetch_profile(api: &ApiClient, token: &BearerToken) -> Result<User, ApiError> {
    api.get_json::<ProfileResponse>(paths::PROFILE, Some(token))
        .await
        .map(ProfileResponse::into_user)
}

pub async fn fetch_categories(
    api: &ApiClient,
    token: &BearerToken,
) -> Result<Vec<Category>, ApiError> {
    api.get_json::<ListResponse<Category>>(paths::CATEGORIES, Some(token))
        .await
        .map(ListResponse::into_vec)
}

pub async fn fetch_transactions(
    api: &ApiClient,
    token: &BearerToken,
    kind: TransactionKind,
) -> Result<Vec<Transaction>, ApiError> {
    api.get_json::<ListResponse<Transaction>>(paths::collection(kind), Some(token))
        .await
        .map(ListResponse::into_vec)
}

/// Fetch incomes, expenses and categories concurrently.
///
/// Fails as soon as any of the three requests fails.
pub async fn fetch_all(api: &ApiClient, token: &BearerToken) -> Result<Records, ApiError> {
    let (incomes, expenses, categories) = tokio::try_join!(
        fetch_transactions(api, token, TransactionKind::Income),
        fetch_transactions(api, token, TransactionKind::Expense),
        fetch_categories(api, token),
    )?;

    Ok(Records {
        incomes,
        expenses,
        categories,
    })
}

/// Fetch the records of one kind together with the categories.
pub async fn fetch_kind_with_categories(
    api: &ApiClient,
    token: &BearerToken,
    kind: TransactionKind,
) -> Result<(Vec<Transaction>, Vec<Category>), ApiError> {
    tokio::try_join!(
        fetch_transactions(api, token, kind),
        fetch_categories(api, token),
    )
}

pub async fn create_transaction(
    api: &ApiClient,
    token: &BearerToken,
    kind: TransactionKind,
    transaction: &NewTransaction,
) -> Result<(), ApiError> {
    api.post(paths::collection(kind), Some(token), transaction)
        .await
}

pub async fn delete_transaction(
    api: &ApiClient,
    token: &BearerToken,
    kind: TransactionKind,
    id: &RecordId,
) -> Result<(), ApiError> {
    api.delete(&format_endpoint(paths::record(kind), id), Some(token))
        .await
}

pub async fn create_category(
    api: &ApiClient,
    token: &BearerToken,
    category: &CategoryPayload,
) -> Result<(), ApiError> {
    api.post(paths::CATEGORIES, Some(token), category).await
}

pub async fn update_category(
    api: &ApiClient,
    token: &BearerToken,
    id: &RecordId,
    category: &CategoryPayload,
) -> Result<(), ApiError> {
    api.put_json(&format_endpoint(paths::CATEGORY, id), Some(token), category)
        .await
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// The body of a successful log-in.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct LogInResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

pub async fn log_in(api: &ApiClient, email: &str, password: &str) -> Result<LogInResponse, ApiError> {
    api.post_json(paths::LOG_IN, None, &Credentials { email, password })
        .await
}

/// The sign-up details sent to the remote API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

pub async fn register(api: &ApiClient, registration: &Registration) -> Result<(), ApiError> {
    api.post(paths::REGISTER, None, registration).await
}
