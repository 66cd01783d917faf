//! Integration tests for the status and issue type catalogs.

use issueflow_db::models::issue_type::{CreateIssueType, UpdateIssueType};
use issueflow_db::models::status::{CreateStatus, UpdateStatus};
use issueflow_db::models::workflow::CreateWorkflowChain;
use issueflow_db::repositories::{IssueTypeRepo, StatusRepo, WorkflowRepo};
use sqlx::PgPool;

fn new_status(name: &str, sort_order: Option<i32>) -> CreateStatus {
    CreateStatus {
        name: name.to_string(),
        description: None,
        color: None,
        sort_order,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_crud(pool: PgPool) {
    let todo = StatusRepo::create(&pool, &new_status("To Do", Some(1)))
        .await
        .unwrap();
    let done = StatusRepo::create(&pool, &new_status("Done", None))
        .await
        .unwrap();
    assert_eq!(todo.sort_order, 1);
    assert_eq!(done.sort_order, 0); // default

    // Ordered by sort_order, then name.
    let listed: Vec<String> = StatusRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(listed, vec!["Done", "To Do"]);

    let updated = StatusRepo::update(
        &pool,
        todo.id,
        &UpdateStatus {
            name: None,
            description: Some("Not started".to_string()),
            color: Some("#cccccc".to_string()),
            sort_order: None,
        },
    )
    .await
    .unwrap()
    .expect("update should return the row");
    assert_eq!(updated.name, "To Do"); // unchanged
    assert_eq!(updated.description.as_deref(), Some("Not started"));
    assert_eq!(updated.sort_order, 1);

    let found = StatusRepo::find_by_ids(&pool, &[todo.id, done.id, 999_999])
        .await
        .unwrap();
    assert_eq!(found.len(), 2);

    assert!(StatusRepo::delete(&pool, done.id).await.unwrap());
    assert!(StatusRepo::find_by_id(&pool, done.id).await.unwrap().is_none());
    assert!(!StatusRepo::delete(&pool, done.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_status_name_violates_unique_constraint(pool: PgPool) {
    StatusRepo::create(&pool, &new_status("Open", None))
        .await
        .unwrap();
    let err = StatusRepo::create(&pool, &new_status("Open", None))
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_statuses_name"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_referenced_status_cannot_be_deleted(pool: PgPool) {
    let a = StatusRepo::create(&pool, &new_status("A", None)).await.unwrap();
    let b = StatusRepo::create(&pool, &new_status("B", None)).await.unwrap();
    let c = StatusRepo::create(&pool, &new_status("C", None)).await.unwrap();

    WorkflowRepo::create_chain(
        &pool,
        &CreateWorkflowChain {
            name: "Guarded".to_string(),
            description: None,
            status_ids: vec![a.id, b.id],
            issue_type_ids: vec![],
        },
    )
    .await
    .unwrap();

    assert_eq!(
        StatusRepo::count_transition_references(&pool, a.id).await.unwrap(),
        1
    );
    assert_eq!(
        StatusRepo::count_transition_references(&pool, b.id).await.unwrap(),
        1
    );
    assert_eq!(
        StatusRepo::count_transition_references(&pool, c.id).await.unwrap(),
        0
    );

    // The foreign key restricts deletion even without the handler-level check.
    let err = StatusRepo::delete(&pool, a.id).await.unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23503"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
    assert!(StatusRepo::find_by_id(&pool, a.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_issue_type_crud(pool: PgPool) {
    let bug = IssueTypeRepo::create(
        &pool,
        &CreateIssueType {
            name: "Bug".to_string(),
            color: Some("#ff0000".to_string()),
            icon: Some("bug".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(bug.icon.as_deref(), Some("bug"));

    let updated = IssueTypeRepo::update(
        &pool,
        bug.id,
        &UpdateIssueType {
            name: Some("Defect".to_string()),
            color: None,
            icon: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.name, "Defect");
    assert_eq!(updated.color.as_deref(), Some("#ff0000"));

    assert_eq!(IssueTypeRepo::list(&pool).await.unwrap().len(), 1);
    assert!(IssueTypeRepo::delete(&pool, bug.id).await.unwrap());
    assert!(IssueTypeRepo::find_by_id(&pool, bug.id).await.unwrap().is_none());
}
