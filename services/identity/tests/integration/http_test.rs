use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use serde_json::{Value, json};
use uuid::Uuid;

use prestige_auth_types::headers::{ACCESS_TOKEN_HEADER, LANG_CODE_HEADER};
use prestige_domain::access::{AccessType, PermissionCode};
use prestige_domain::account::AccountType;
use prestige_testing::auth::TestTokens;
use prestige_testing::envelope::{assert_error_code, data, warning_codes};

use prestige_identity::router::build_router;

use crate::helpers::{
    MockRepositories, PASSWORD, RecordingMailer, admin_with, onboarded_user, superuser,
};

const ADMIN: &str = "/api/admin/v1";
const CUSTOMER: &str = "/api/customer/v1";

fn server(repos: &MockRepositories) -> TestServer {
    TestServer::new(build_router(crate::helpers::test_state(repos.clone()))).unwrap()
}

fn with_headers(mut request: TestRequest, headers: HeaderMap) -> TestRequest {
    for (name, value) in headers.iter() {
        request = request.add_header(name.clone(), value.clone());
    }
    request
}

fn sign_up_body(email: &str) -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "emailAddress": email,
        "phoneNumber": "+33123456789",
        "countryCode": "FRA",
        "stateId": 75,
        "cityId": "PAR"
    })
}

#[tokio::test]
async fn should_answer_health_probes() {
    let server = server(&MockRepositories::new());
    server.get("/healthz").await.assert_status_ok();
    server.get("/readyz").await.assert_status_ok();
}

// ── Customer onboarding ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_sign_up_customer_through_envelope() {
    let repos = MockRepositories::new();
    let response = server(&repos)
        .post(&format!("{CUSTOMER}/auth/sign-up"))
        .json(&sign_up_body("ada@example.com"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(data(&body)["success"], true);
    assert!(warning_codes(&body).is_empty());

    let users = repos.users.users.lock().unwrap().clone();
    assert_eq!(users[0].address.as_ref().unwrap().state_id.as_deref(), Some("75"));
    assert_eq!(repos.mailer.messages().len(), 1);
}

#[tokio::test]
async fn should_warn_when_mail_delivery_fails() {
    let repos = MockRepositories {
        mailer: RecordingMailer::failing(),
        ..MockRepositories::new()
    };
    let response = server(&repos)
        .post(&format!("{CUSTOMER}/auth/sign-up"))
        .json(&sign_up_body("ada@example.com"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(data(&body)["success"], false);
    assert_eq!(warning_codes(&body), ["EmailNotSent"]);
    assert_eq!(repos.users.users.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_malformed_sign_up_bodies() {
    let server = server(&MockRepositories::new());

    let response = server
        .post(&format!("{CUSTOMER}/auth/sign-up"))
        .json(&json!({ "firstName": "Ada" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_error_code(&response.json::<Value>(), "RequiredFields");

    let response = server
        .post(&format!("{CUSTOMER}/auth/sign-up"))
        .json(&sign_up_body("not-an-email"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_error_code(&response.json::<Value>(), "InvalidEmailFormat");
}

#[tokio::test]
async fn should_report_unknown_reset_token_as_invalid() {
    let response = server(&MockRepositories::new())
        .get(&format!("{ADMIN}/auth/password-reset/{}", Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(data(&response.json::<Value>())["isValid"], false);
}

// ── Sign-in and the gate ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_sign_in_and_read_own_profile() {
    let repos = MockRepositories::new();
    let admin = superuser();
    repos.users.insert(admin.clone());
    let server = server(&repos);

    let response = server
        .post(&format!("{ADMIN}/auth/sign-in"))
        .json(&json!({ "emailAddress": admin.email.address, "password": PASSWORD }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    let session = data(&body);
    assert_eq!(session["accountType"], "Admin");
    let access_token = session["accessToken"].as_str().unwrap().to_owned();

    let response = server
        .get(&format!("{ADMIN}/me"))
        .add_header(
            HeaderName::from_static(ACCESS_TOKEN_HEADER),
            HeaderValue::from_str(&access_token).unwrap(),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(data(&body)["email"]["address"], admin.email.address.as_str());
}

#[tokio::test]
async fn should_reject_protected_route_without_token() {
    let response = server(&MockRepositories::new())
        .get(&format!("{ADMIN}/users"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_error_code(&response.json::<Value>(), "WrongAuthentication");
}

#[tokio::test]
async fn should_return_rotated_access_token_header() {
    let repos = MockRepositories::new();
    let customer = onboarded_user(AccountType::Customer, "c@example.com");
    repos.users.insert(customer.clone());
    let tokens = TestTokens::new(customer.id, AccountType::Customer);

    let response = with_headers(
        server(&repos).get(&format!("{CUSTOMER}/me")),
        tokens.expired_headers(),
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.headers().get(ACCESS_TOKEN_HEADER).is_some());
}

#[tokio::test]
async fn should_keep_customers_off_the_admin_surface() {
    let repos = MockRepositories::new();
    let customer = onboarded_user(AccountType::Customer, "c@example.com");
    repos.users.insert(customer.clone());
    let tokens = TestTokens::new(customer.id, AccountType::Customer);

    let response = with_headers(server(&repos).get(&format!("{ADMIN}/me")), tokens.headers()).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_error_code(&response.json::<Value>(), "AccessDenied");
}

// ── Permission checks ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_enforce_read_only_grant_per_method() {
    let repos = MockRepositories::new();
    let roles_id = repos.permissions.id_of(PermissionCode::ManageRoles);
    let admin = admin_with(vec![(roles_id, AccessType::ReadOnly)]);
    repos.users.insert(admin.clone());
    let tokens = TestTokens::new(admin.id, AccountType::Admin);
    let server = server(&repos);

    let response = with_headers(server.get(&format!("{ADMIN}/roles")), tokens.headers()).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(data(&response.json::<Value>())["pagination"]["totalCount"], 0);

    let response = with_headers(server.post(&format!("{ADMIN}/roles")), tokens.headers())
        .json(&json!({ "name": "Support" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_error_code(&response.json::<Value>(), "AccessDenied");

    let response = with_headers(server.get(&format!("{ADMIN}/users")), tokens.headers()).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_let_any_admin_update_users_by_id() {
    let repos = MockRepositories::new();
    let admin = admin_with(Vec::new());
    let customer = onboarded_user(AccountType::Customer, "c@example.com");
    repos.users.insert(admin.clone());
    repos.users.insert(customer.clone());
    let tokens = TestTokens::new(admin.id, AccountType::Admin);

    let mut body = sign_up_body("c@example.com");
    body["phoneNumber"] = json!(customer.phone.number);
    body["firstName"] = json!("Renamed");
    let response = with_headers(
        server(&repos).put(&format!("{ADMIN}/users/{}", customer.id)),
        tokens.headers(),
    )
    .json(&body)
    .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        repos.users.get(customer.id).unwrap().personal.first_name,
        "Renamed"
    );
}

#[tokio::test]
async fn should_report_pagination_and_id_format_errors() {
    let repos = MockRepositories::new();
    let admin = superuser();
    repos.users.insert(admin.clone());
    let tokens = TestTokens::new(admin.id, AccountType::Admin);
    let server = server(&repos);

    let response = with_headers(
        server.get(&format!("{ADMIN}/users?pageSize=abc")),
        tokens.headers(),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_error_code(&response.json::<Value>(), "InvalidPageSizeFormat");

    let response = with_headers(server.get(&format!("{ADMIN}/users?page=0")), tokens.headers()).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_error_code(&response.json::<Value>(), "InvalidPageNumberValue");

    let response = with_headers(
        server.get(&format!("{ADMIN}/users/not-an-id")),
        tokens.headers(),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_error_code(&response.json::<Value>(), "InvalidObjectId");
}

#[tokio::test]
async fn should_return_empty_page_far_past_the_end() {
    let repos = MockRepositories::new();
    let admin = superuser();
    repos.users.insert(admin.clone());
    let tokens = TestTokens::new(admin.id, AccountType::Admin);

    let response = with_headers(
        server(&repos).get(&format!("{ADMIN}/users?page={}&pageSize=100", i64::MAX)),
        tokens.headers(),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(data(&body)["items"], json!([]));
    assert_eq!(data(&body)["pagination"]["totalCount"], 1);
}

#[tokio::test]
async fn should_refuse_to_delete_admin_accounts() {
    let repos = MockRepositories::new();
    let admin = superuser();
    let other = onboarded_user(AccountType::Admin, "other@example.com");
    repos.users.insert(admin.clone());
    repos.users.insert(other.clone());
    let tokens = TestTokens::new(admin.id, AccountType::Admin);

    let response = with_headers(
        server(&repos).delete(&format!("{ADMIN}/users/{}", other.id)),
        tokens.headers(),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_error_code(&response.json::<Value>(), "CannotDeleteAdminAccount");
}

#[tokio::test]
async fn should_create_and_read_role() {
    let repos = MockRepositories::new();
    let admin = superuser();
    repos.users.insert(admin.clone());
    let users_id = repos.permissions.id_of(PermissionCode::ManageUsers);
    let tokens = TestTokens::new(admin.id, AccountType::Admin);
    let server = server(&repos);

    let response = with_headers(server.post(&format!("{ADMIN}/roles")), tokens.headers())
        .json(&json!({
            "name": "Support",
            "accessControl": {
                "permissions": [{ "permissionId": users_id, "accessType": "ReadOnly" }]
            }
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    let role_id = data(&body)["roleId"].as_str().unwrap().to_owned();

    let response = with_headers(
        server.get(&format!("{ADMIN}/roles/{role_id}")),
        tokens.headers(),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    let grant = &data(&body)["accessControl"]["permissions"][0];
    assert_eq!(grant["permission"]["name"], "ManageUsers");
    assert_eq!(grant["accessType"], "ReadOnly");
}

// ── Directories ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_serve_customer_directories_without_token() {
    let server = server(&MockRepositories::new());

    let response = server
        .get(&format!("{CUSTOMER}/directories/countries"))
        .add_header(
            HeaderName::from_static(LANG_CODE_HEADER),
            HeaderValue::from_static("de"),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(data(&response.json::<Value>())[0]["name"], "Frankreich");

    let response = server
        .get(&format!("{CUSTOMER}/directories/countries/xxx"))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_error_code(&response.json::<Value>(), "CountryNotFound");

    let response = server.get(&format!("{ADMIN}/directories/languages")).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}
