use http::Method;
use uuid::Uuid;

use prestige_domain::access::{AccessType, PermissionCode};
use prestige_domain::account::AccountType;
use prestige_domain::pagination::PageRequest;

use prestige_identity::error::IdentityError;
use prestige_identity::usecase::permission::{
    EvaluatePermissionUseCase, GetPermissionUseCase, GetPermissionsUseCase,
};

use crate::helpers::{
    MockPermissionRepo, MockUserRepo, admin_with, catalog, onboarded_user, superuser,
};

fn evaluator(
    users: MockUserRepo,
    permissions: MockPermissionRepo,
) -> EvaluatePermissionUseCase<MockUserRepo, MockPermissionRepo> {
    EvaluatePermissionUseCase { users, permissions }
}

#[tokio::test]
async fn should_allow_full_control_grant_for_every_method() {
    let permissions = MockPermissionRepo::new(catalog());
    let users_id = permissions.id_of(PermissionCode::ManageUsers);
    let admin = admin_with(vec![(users_id, AccessType::FullControl)]);
    let usecase = evaluator(MockUserRepo::new(vec![admin.clone()]), permissions);

    for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
        usecase
            .execute(admin.id, PermissionCode::ManageUsers, &method)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn should_limit_read_only_grant_to_get() {
    let permissions = MockPermissionRepo::new(catalog());
    let roles_id = permissions.id_of(PermissionCode::ManageRoles);
    let admin = admin_with(vec![(roles_id, AccessType::ReadOnly)]);
    let usecase = evaluator(MockUserRepo::new(vec![admin.clone()]), permissions);

    usecase
        .execute(admin.id, PermissionCode::ManageRoles, &Method::GET)
        .await
        .unwrap();
    let result = usecase
        .execute(admin.id, PermissionCode::ManageRoles, &Method::POST)
        .await;
    assert!(matches!(result, Err(IdentityError::AccessDenied)));
}

#[tokio::test]
async fn should_deny_permission_absent_from_snapshot() {
    let permissions = MockPermissionRepo::new(catalog());
    let roles_id = permissions.id_of(PermissionCode::ManageRoles);
    let admin = admin_with(vec![(roles_id, AccessType::FullControl)]);
    let usecase = evaluator(MockUserRepo::new(vec![admin.clone()]), permissions);

    let result = usecase
        .execute(admin.id, PermissionCode::ManagePermissions, &Method::GET)
        .await;
    assert!(matches!(result, Err(IdentityError::AccessDenied)));
}

#[tokio::test]
async fn should_allow_everything_with_all_permissions_flag() {
    let admin = superuser();
    let usecase = evaluator(
        MockUserRepo::new(vec![admin.clone()]),
        MockPermissionRepo::new(catalog()),
    );

    for code in PermissionCode::ALL {
        usecase.execute(admin.id, code, &Method::DELETE).await.unwrap();
    }
}

#[tokio::test]
async fn should_deny_admin_without_snapshot_or_catalog_entry() {
    let mut admin = onboarded_user(AccountType::Admin, "bare@example.com");
    admin.access_control = None;
    let usecase = evaluator(
        MockUserRepo::new(vec![admin.clone()]),
        MockPermissionRepo::new(catalog()),
    );
    let result = usecase
        .execute(admin.id, PermissionCode::ManageUsers, &Method::GET)
        .await;
    assert!(matches!(result, Err(IdentityError::AccessDenied)));

    let granted = admin_with(vec![(Uuid::new_v4(), AccessType::FullControl)]);
    let usecase = evaluator(
        MockUserRepo::new(vec![granted.clone()]),
        MockPermissionRepo::default(),
    );
    let result = usecase
        .execute(granted.id, PermissionCode::ManageUsers, &Method::GET)
        .await;
    assert!(matches!(result, Err(IdentityError::AccessDenied)));
}

#[tokio::test]
async fn should_pass_non_admin_principals() {
    let customer = onboarded_user(AccountType::Customer, "c@example.com");
    let usecase = evaluator(
        MockUserRepo::new(vec![customer.clone()]),
        MockPermissionRepo::new(catalog()),
    );
    usecase
        .execute(customer.id, PermissionCode::ManageUsers, &Method::DELETE)
        .await
        .unwrap();
}

// ── Catalog reads ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_search_permissions_by_name_or_code() {
    let permissions = MockPermissionRepo::new(catalog());
    let usecase = GetPermissionsUseCase {
        permissions: permissions.clone(),
    };

    let all = usecase.execute(None, PageRequest::default()).await.unwrap();
    assert_eq!(all.pagination.total_count, 3);
    assert_eq!(all.items[0].code, "ManagePermissions");

    let roles = usecase
        .execute(Some("roles"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(roles.items.len(), 1);
    assert_eq!(roles.items[0].code, "ManageRoles");
}

#[tokio::test]
async fn should_report_missing_permission() {
    let usecase = GetPermissionUseCase {
        permissions: MockPermissionRepo::new(catalog()),
    };
    let result = usecase.execute(Uuid::new_v4()).await;
    assert!(matches!(result, Err(IdentityError::PermissionNotFound)));
}
