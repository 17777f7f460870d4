use campusconnect_core::AppError;
use campusconnect_domain::{AuditAction, AuditTargetType};

use crate::AUDIT_LOG_PAGE_SIZE;
use crate::test_support::Harness;

#[tokio::test]
async fn record_requires_admin() {
    let harness = Harness::new();
    let club = harness.seed_club("Robotics").await;

    let result = harness
        .audit_log_service
        .record(&club, AuditAction::DeleteClub, "anything")
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(harness.audit_log.snapshot().await.is_empty());
}

#[tokio::test]
async fn record_derives_target_type_from_action() {
    let harness = Harness::new();
    let admin = harness.seed_admin("Root").await;

    let entry = harness
        .audit_log_service
        .record(&admin, AuditAction::UpdateClub, "club-1")
        .await
        .unwrap_or_else(|error| panic!("record failed: {error}"));

    assert_eq!(entry.target_type, AuditTargetType::Club);
    assert_eq!(entry.actor_admin_id, admin.subject());
    assert_eq!(harness.audit_log.snapshot().await, vec![entry]);
}

#[tokio::test]
async fn list_pages_newest_first() {
    let harness = Harness::new();
    let admin = harness.seed_admin("Root").await;

    for index in 0..23 {
        assert!(
            harness
                .audit_log_service
                .record(&admin, AuditAction::DeleteEvent, format!("event-{index}"))
                .await
                .is_ok()
        );
    }

    let first = harness
        .audit_log_service
        .list(&admin, None)
        .await
        .unwrap_or_else(|error| panic!("list failed: {error}"));
    assert_eq!(first.current_page, 1);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.entries.len(), AUDIT_LOG_PAGE_SIZE);
    assert_eq!(first.entries[0].target_id, "event-22");

    let last = harness
        .audit_log_service
        .list(&admin, Some(3))
        .await
        .unwrap_or_else(|error| panic!("list failed: {error}"));
    assert_eq!(last.current_page, 3);
    assert_eq!(last.entries.len(), 3);
    assert_eq!(last.entries[2].target_id, "event-0");

    let beyond = harness
        .audit_log_service
        .list(&admin, Some(9))
        .await
        .unwrap_or_else(|error| panic!("list failed: {error}"));
    assert!(beyond.entries.is_empty());
    assert_eq!(beyond.total_pages, 3);
}

#[tokio::test]
async fn page_zero_serves_first_page_and_empty_log_has_no_pages() {
    let harness = Harness::new();
    let admin = harness.seed_admin("Root").await;

    let page = harness.audit_log_service.list(&admin, Some(0)).await;

    assert!(matches!(
        page,
        Ok(ref page) if page.current_page == 1 && page.total_pages == 0 && page.entries.is_empty()
    ));
}

#[tokio::test]
async fn activity_filters_by_target() {
    let harness = Harness::new();
    let admin = harness.seed_admin("Root").await;

    for (action, target) in [
        (AuditAction::UpdateEvent, "shared-id"),
        (AuditAction::UpdateClub, "shared-id"),
        (AuditAction::DeleteEvent, "shared-id"),
        (AuditAction::DeleteEvent, "other-id"),
    ] {
        assert!(
            harness
                .audit_log_service
                .record(&admin, action, target)
                .await
                .is_ok()
        );
    }

    let activity = harness
        .audit_log_service
        .activity_for_target(&admin, "event", "shared-id")
        .await
        .unwrap_or_default();

    let actions: Vec<AuditAction> = activity.iter().map(|entry| entry.action).collect();
    assert_eq!(actions, [AuditAction::DeleteEvent, AuditAction::UpdateEvent]);
}

#[tokio::test]
async fn activity_rejects_unknown_target_type() {
    let harness = Harness::new();
    let admin = harness.seed_admin("Root").await;

    let result = harness
        .audit_log_service
        .activity_for_target(&admin, "student", "x")
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn reads_require_admin() {
    let harness = Harness::new();
    let student = harness.seed_student("Sam Lee").await;

    let listed = harness.audit_log_service.list(&student, None).await;
    let activity = harness
        .audit_log_service
        .activity_for_target(&student, "event", "x")
        .await;

    assert!(matches!(listed, Err(AppError::Forbidden(_))));
    assert!(matches!(activity, Err(AppError::Forbidden(_))));
}
