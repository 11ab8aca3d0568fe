//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in,
        post_register,
    },
    category::{
        create_category_endpoint, get_categories_page, get_edit_category_page,
        update_category_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    filter::{export_filtered, get_filters_page},
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        create_expense_endpoint, create_income_endpoint, delete_expense_endpoint,
        delete_income_endpoint, export_expenses, export_incomes, get_expense_page,
        get_income_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::REGISTER_API, post(post_register))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::INCOME_VIEW, get(get_income_page))
        .route(endpoints::EXPENSE_VIEW, get(get_expense_page))
        .route(endpoints::INCOME_EXPORT, get(export_incomes))
        .route(endpoints::EXPENSE_EXPORT, get(export_expenses))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(endpoints::FILTERS_VIEW, get(get_filters_page))
        .route(endpoints::FILTERS_EXPORT, get(export_filtered))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::INCOME_API, post(create_income_endpoint))
            .route(endpoints::INCOME_RECORD, delete(delete_income_endpoint))
            .route(endpoints::EXPENSE_API, post(create_expense_endpoint))
            .route(endpoints::EXPENSE_RECORD, delete(delete_expense_endpoint))
            .route(endpoints::CATEGORIES_API, post(create_category_endpoint))
            .route(endpoints::CATEGORY_API, put(update_category_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        http::{StatusCode, header::SET_COOKIE},
        routing::get,
    };
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        AppState, Config,
        endpoints,
        test_utils::spawn_mock_api,
    };

    use super::build_router;

    async fn get_test_server() -> TestServer {
        let base_url = spawn_mock_api(Router::new().route(
            "/profile",
            get(|| async { Json(json!({"user": {"id": 1, "fullName": "Asha Rao", "email": "asha@example.com"}})) }),
        ))
        .await;
        let mut config = Config::new("foobar");
        config.api_base_url = base_url;
        let state = AppState::new(&config).expect("Could not create app state.");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn pages_redirect_to_log_in_without_cookie() {
        let server = get_test_server().await;

        for page in [
            endpoints::ROOT,
            endpoints::DASHBOARD_VIEW,
            endpoints::INCOME_VIEW,
            endpoints::EXPENSE_VIEW,
            endpoints::CATEGORIES_VIEW,
            endpoints::FILTERS_VIEW,
        ] {
            let response = server.get(page).await;

            response.assert_status(StatusCode::SEE_OTHER);
            let location = response.header("location");
            let location = location.to_str().unwrap();
            assert!(
                location.starts_with(endpoints::LOG_IN_VIEW),
                "{page} redirected to {location}"
            );
        }
    }

    #[tokio::test]
    async fn log_in_page_is_public() {
        let server = get_test_server().await;

        server.get(endpoints::LOG_IN_VIEW).await.assert_status_ok();
        server.get(endpoints::REGISTER_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server().await;

        server
            .get("/definitely/not/a/page")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn log_out_clears_cookie() {
        let server = get_test_server().await;

        let response = server.get(endpoints::LOG_OUT).await;

        response.assert_status(StatusCode::SEE_OTHER);
        let set_cookie = response.header(SET_COOKIE);
        let cookie = Cookie::parse(set_cookie.to_str().unwrap()).unwrap();
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
