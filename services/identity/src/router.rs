use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use prestige_core::health::{healthz, readiness};
use prestige_core::middleware::with_http_layers;
use prestige_domain::access::PermissionCode;

use crate::handlers::{
    auth::{
        admin_send_password_reset_token, admin_sign_in, check_password_reset_token,
        customer_send_password_reset_token, customer_sign_in, reset_password,
        resend_verification_token, set_password, sign_up, verify_account,
    },
    directory::{get_countries, get_country, get_languages},
    guard::{admin_gate, customer_gate, require_permission},
    me::{get_me, update_me},
    permission::{get_permission, get_permissions},
    role::{add_role, delete_role, get_role, get_roles, update_role},
    user::{add_user, delete_user, get_user, get_users, update_user},
};
use crate::state::{AppState, Repositories};

pub fn build_router<R: Repositories>(state: AppState<R>) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz::<R>))
        .nest("/api/admin/v1", admin_routes(&state))
        .nest("/api/customer/v1", customer_routes(&state));
    with_http_layers(router).with_state(state)
}

async fn readyz<R: Repositories>(State(state): State<AppState<R>>) -> StatusCode {
    readiness(state.repos.ping().await)
}

fn admin_routes<R: Repositories>(state: &AppState<R>) -> Router<AppState<R>> {
    let permission =
        |code: PermissionCode| from_fn_with_state((state.clone(), code), require_permission::<R>);

    let public = Router::new()
        .route("/auth/password/{token}", post(set_password::<R>))
        .route(
            "/auth/password-reset",
            post(admin_send_password_reset_token::<R>),
        )
        .route(
            "/auth/password-reset/{token}",
            get(check_password_reset_token::<R>).post(reset_password::<R>),
        )
        .route("/auth/sign-in", post(admin_sign_in::<R>));

    let protected = Router::new()
        // Current user
        .route("/me", get(get_me::<R>).put(update_me::<R>))
        // Users
        .route(
            "/users",
            post(add_user::<R>)
                .get(get_users::<R>)
                .route_layer(permission(PermissionCode::ManageUsers)),
        )
        .route(
            "/users/{id}",
            get(get_user::<R>)
                .route_layer(permission(PermissionCode::ManageUsers))
                .put(update_user::<R>)
                .delete(delete_user::<R>),
        )
        // Roles
        .route(
            "/roles",
            post(add_role::<R>)
                .get(get_roles::<R>)
                .route_layer(permission(PermissionCode::ManageRoles)),
        )
        .route(
            "/roles/{id}",
            get(get_role::<R>)
                .put(update_role::<R>)
                .delete(delete_role::<R>)
                .route_layer(permission(PermissionCode::ManageRoles)),
        )
        // Permissions
        .route(
            "/permissions",
            get(get_permissions::<R>).route_layer(permission(PermissionCode::ManagePermissions)),
        )
        .route(
            "/permissions/{id}",
            get(get_permission::<R>).route_layer(permission(PermissionCode::ManagePermissions)),
        )
        // Directories
        .route("/directories/languages", get(get_languages::<R>))
        .route("/directories/countries", get(get_countries::<R>))
        .route("/directories/countries/{iso3}", get(get_country::<R>))
        .route_layer(from_fn_with_state(state.clone(), admin_gate::<R>));

    public.merge(protected)
}

fn customer_routes<R: Repositories>(state: &AppState<R>) -> Router<AppState<R>> {
    let public = Router::new()
        .route("/auth/sign-up", post(sign_up::<R>))
        .route(
            "/auth/account-verify",
            post(resend_verification_token::<R>),
        )
        .route(
            "/auth/account-verify/{token}",
            post(verify_account::<R>),
        )
        .route("/auth/password/{token}", post(set_password::<R>))
        .route(
            "/auth/password-reset",
            post(customer_send_password_reset_token::<R>),
        )
        .route(
            "/auth/password-reset/{token}",
            get(check_password_reset_token::<R>).post(reset_password::<R>),
        )
        .route("/auth/sign-in", post(customer_sign_in::<R>))
        // Directories
        .route("/directories/languages", get(get_languages::<R>))
        .route("/directories/countries", get(get_countries::<R>))
        .route("/directories/countries/{iso3}", get(get_country::<R>));

    let protected = Router::new()
        .route("/me", get(get_me::<R>).put(update_me::<R>))
        .route_layer(from_fn_with_state(state.clone(), customer_gate::<R>));

    public.merge(protected)
}
