use chrono::Duration;
use weekly_core::model::{GoalDraft, GoalPatch, GoalType, ProgressValue};
use weekly_core::time::fixed_now;
use weekly_core::week::{last_n_weeks, week_boundaries};
use storage::repository::{GoalRepository, ProgressRepository, ProgressUpsert, StorageError};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn draft(title: &str, goal_type: GoalType) -> GoalDraft {
    GoalDraft {
        title: title.to_string(),
        goal_type,
        target: Some(10.0),
        unit: Some("km".to_string()),
        icon: Some("🏃".to_string()),
    }
}

#[tokio::test]
async fn sqlite_goal_roundtrip_and_update() {
    let repo = connect("memdb_goal_roundtrip").await;

    let goal = repo
        .insert_goal(draft("Run", GoalType::Measurable).validate(fixed_now()).unwrap())
        .await
        .unwrap();
    let fetched = repo.get_goal(goal.id()).await.unwrap().expect("goal");
    assert_eq!(fetched, goal);
    assert_eq!(fetched.kind().unit(), Some("km"));

    let patched = goal
        .apply_patch(
            GoalPatch {
                title: Some("Run more".to_string()),
                goal_type: Some(GoalType::YesNo),
                ..GoalPatch::default()
            },
            fixed_now() + Duration::minutes(5),
        )
        .unwrap();
    repo.update_goal(&patched).await.unwrap();

    let fetched = repo.get_goal(goal.id()).await.unwrap().expect("goal");
    assert_eq!(fetched.title(), "Run more");
    assert_eq!(fetched.goal_type(), GoalType::YesNo);
    assert_eq!(fetched.kind().target(), None);
    assert_eq!(fetched.updated_at(), fixed_now() + Duration::minutes(5));
}

#[tokio::test]
async fn sqlite_lists_goals_in_creation_order() {
    let repo = connect("memdb_goal_order").await;

    let later = draft("Later", GoalType::YesNo)
        .validate(fixed_now() + Duration::hours(1))
        .unwrap();
    let earlier = draft("Earlier", GoalType::YesNo).validate(fixed_now()).unwrap();
    repo.insert_goal(later).await.unwrap();
    repo.insert_goal(earlier).await.unwrap();

    let titles: Vec<String> = repo
        .list_goals()
        .await
        .unwrap()
        .iter()
        .map(|g| g.title().to_string())
        .collect();
    assert_eq!(titles, ["Earlier", "Later"]);
}

#[tokio::test]
async fn sqlite_upsert_keeps_one_row_per_week() {
    let repo = connect("memdb_upsert").await;
    let goal = repo
        .insert_goal(draft("Run", GoalType::Measurable).validate(fixed_now()).unwrap())
        .await
        .unwrap();
    let week = week_boundaries(&fixed_now());

    let first = repo
        .upsert_progress(ProgressUpsert {
            goal_id: goal.id(),
            week,
            value: ProgressValue::Measurable(2.0),
            recorded_at: fixed_now(),
        })
        .await
        .unwrap();
    let second = repo
        .upsert_progress(ProgressUpsert {
            goal_id: goal.id(),
            week,
            value: ProgressValue::Measurable(6.5),
            recorded_at: fixed_now() + Duration::hours(3),
        })
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.value, ProgressValue::Measurable(6.5));
    assert_eq!(second.week, week);
    assert_eq!(second.created_at, fixed_now());
    assert_eq!(second.updated_at, fixed_now() + Duration::hours(3));

    let rows = repo
        .list_progress_between(goal.id(), week.start(), week.start())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);

    let current = repo.get_progress(goal.id(), week.start()).await.unwrap();
    assert_eq!(current, Some(second));
}

#[tokio::test]
async fn sqlite_range_query_and_cascade_delete() {
    let repo = connect("memdb_cascade").await;
    let goal = repo
        .insert_goal(draft("Meditate", GoalType::YesNo).validate(fixed_now()).unwrap())
        .await
        .unwrap();
    let weeks = last_n_weeks(5, &fixed_now());

    for week in [weeks[4], weeks[1], weeks[2]] {
        repo.upsert_progress(ProgressUpsert {
            goal_id: goal.id(),
            week,
            value: ProgressValue::YesNo(true),
            recorded_at: fixed_now(),
        })
        .await
        .unwrap();
    }

    let rows = repo
        .list_progress_between(goal.id(), weeks[1].start(), weeks[3].start())
        .await
        .unwrap();
    let starts: Vec<_> = rows.iter().map(|r| r.week.start()).collect();
    assert_eq!(starts, [weeks[1].start(), weeks[2].start()]);

    repo.delete_goal(goal.id()).await.unwrap();
    for week in [weeks[1], weeks[2], weeks[4]] {
        assert_eq!(repo.get_progress(goal.id(), week.start()).await.unwrap(), None);
    }
    let remaining = repo
        .list_progress_between(goal.id(), weeks[0].start(), weeks[4].start())
        .await
        .unwrap();
    assert!(remaining.is_empty());

    assert!(matches!(
        repo.delete_goal(goal.id()).await.unwrap_err(),
        StorageError::NotFound
    ));
}

#[tokio::test]
async fn sqlite_upsert_for_missing_goal_is_a_conflict() {
    let repo = connect("memdb_fk").await;
    let err = repo
        .upsert_progress(ProgressUpsert {
            goal_id: weekly_core::model::GoalId::new(404),
            week: week_boundaries(&fixed_now()),
            value: ProgressValue::Measurable(1.0),
            recorded_at: fixed_now(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict));
}

#[tokio::test]
async fn sqlite_update_of_missing_goal_is_not_found() {
    let repo = connect("memdb_update_missing").await;
    let ghost = draft("Ghost", GoalType::YesNo)
        .validate(fixed_now())
        .unwrap()
        .assign_id(weekly_core::model::GoalId::new(77));
    assert!(matches!(
        repo.update_goal(&ghost).await.unwrap_err(),
        StorageError::NotFound
    ));
}
