use uuid::Uuid;

use prestige_domain::access::{AccessControl, AccessType, PermissionCode, PermissionGrant};
use prestige_domain::pagination::PageRequest;

use prestige_identity::domain::types::RoleDraft;
use prestige_identity::error::IdentityError;
use prestige_identity::usecase::role::{
    AddRoleUseCase, DeleteRoleUseCase, GetRoleUseCase, GetRolesUseCase, UpdateRoleUseCase,
};

use crate::helpers::{MockPermissionRepo, MockRoleRepo, catalog, role};

fn draft(name: &str) -> RoleDraft {
    RoleDraft {
        name: name.to_owned(),
        description: None,
        access_control: AccessControl::default(),
    }
}

#[tokio::test]
async fn should_add_role_with_trimmed_name() {
    let roles = MockRoleRepo::default();
    let id = AddRoleUseCase {
        roles: roles.clone(),
    }
    .execute(draft("  Support "))
    .await
    .unwrap();

    assert_eq!(roles.get(id).unwrap().name, "Support");
}

#[tokio::test]
async fn should_reject_role_name_clash_ignoring_case() {
    let roles = MockRoleRepo::new(vec![role("Support")]);
    let result = AddRoleUseCase { roles }.execute(draft("SUPPORT")).await;
    assert!(matches!(result, Err(IdentityError::RoleAlreadyExists)));
}

#[tokio::test]
async fn should_allow_update_that_keeps_own_name() {
    let existing = role("Support");
    let other = role("Billing");
    let roles = MockRoleRepo::new(vec![existing.clone(), other]);
    let usecase = UpdateRoleUseCase {
        roles: roles.clone(),
    };

    let mut renamed = draft("support");
    renamed.description = Some("Front line".into());
    usecase.execute(existing.id, renamed).await.unwrap();
    let stored = roles.get(existing.id).unwrap();
    assert_eq!(stored.name, "support");
    assert_eq!(stored.description.as_deref(), Some("Front line"));

    let result = usecase.execute(existing.id, draft("billing")).await;
    assert!(matches!(result, Err(IdentityError::RoleAlreadyExists)));

    let result = usecase.execute(Uuid::new_v4(), draft("Ghost")).await;
    assert!(matches!(result, Err(IdentityError::RoleNotFound)));
}

#[tokio::test]
async fn should_resolve_permission_names_in_role_details() {
    let permissions = MockPermissionRepo::new(catalog());
    let users_id = permissions.id_of(PermissionCode::ManageUsers);
    let removed = Uuid::new_v4();

    let mut support = role("Support");
    support.access_control.permissions = vec![
        PermissionGrant {
            permission_id: users_id,
            access_type: AccessType::ReadOnly,
        },
        PermissionGrant {
            permission_id: removed,
            access_type: AccessType::FullControl,
        },
    ];
    let usecase = GetRoleUseCase {
        roles: MockRoleRepo::new(vec![support.clone()]),
        permissions,
    };

    let details = usecase.execute(support.id).await.unwrap();
    assert_eq!(details.permissions.len(), 2);
    assert_eq!(details.permissions[0].name.as_deref(), Some("ManageUsers"));
    assert_eq!(details.permissions[0].access_type, AccessType::ReadOnly);
    assert_eq!(details.permissions[1].permission_id, removed);
    assert!(details.permissions[1].name.is_none());

    let result = usecase.execute(Uuid::new_v4()).await;
    assert!(matches!(result, Err(IdentityError::RoleNotFound)));
}

#[tokio::test]
async fn should_list_roles_sorted_and_filtered() {
    let roles = MockRoleRepo::new(vec![role("support"), role("Billing"), role("Auditor")]);
    let usecase = GetRolesUseCase { roles };

    let page = usecase.execute(None, PageRequest::default()).await.unwrap();
    let names: Vec<_> = page.items.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Auditor", "Billing", "support"]);
    assert_eq!(page.pagination.total_count, 3);
    assert_eq!(page.pagination.page_count, 1);

    let page = usecase
        .execute(Some("BILL"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn should_delete_role_once() {
    let support = role("Support");
    let usecase = DeleteRoleUseCase {
        roles: MockRoleRepo::new(vec![support.clone()]),
    };

    usecase.execute(support.id).await.unwrap();
    let result = usecase.execute(support.id).await;
    assert!(matches!(result, Err(IdentityError::RoleNotFound)));
}
