use weekly_core::history::HistorySummary;
use weekly_core::model::{GoalDraft, GoalPatch, GoalType, ProgressInput, ProgressValue};
use weekly_core::time::fixed_now;
use services::{AppServices, Clock, ProgressServiceError, WeekZone};

#[tokio::test]
async fn measurable_goal_flow_against_sqlite() {
    let services = AppServices::new_sqlite(
        "sqlite:file:memdb_progress_flow?mode=memory&cache=shared",
        Clock::fixed(fixed_now()),
        WeekZone::Utc,
    )
    .await
    .expect("connect sqlite");
    let goals = services.goals();
    let progress = services.progress();

    let goal = goals
        .create_goal(GoalDraft {
            title: "Run".to_string(),
            goal_type: GoalType::Measurable,
            target: Some(10.0),
            unit: Some("km".to_string()),
            icon: None,
        })
        .await
        .expect("create goal");

    assert!(progress.current_progress(goal.id()).await.unwrap().is_none());

    let recorded = progress
        .record_progress(
            goal.id(),
            ProgressInput {
                value: Some(6.5),
                completed: None,
            },
        )
        .await
        .expect("record progress");
    assert_eq!(recorded.value, ProgressValue::Measurable(6.5));

    let current = progress
        .current_progress(goal.id())
        .await
        .unwrap()
        .expect("current week recorded");
    assert_eq!(current, recorded);

    let history = progress.history(goal.id(), 1).await.expect("history");
    assert_eq!(history.len(), 1);
    assert!(history[0].is_recorded());
    assert_eq!(history[0].value(), ProgressValue::Measurable(6.5));

    let summary = progress.summary(goal.id(), 1).await.expect("summary");
    assert_eq!(
        summary,
        HistorySummary::Measurable {
            weeks: 1,
            recorded_weeks: 1,
            average: 6.5,
            target: Some(10.0),
            weeks_on_target: Some(0),
        }
    );
}

#[tokio::test]
async fn deleting_a_goal_removes_its_history() {
    let services = AppServices::new_sqlite(
        "sqlite:file:memdb_progress_delete?mode=memory&cache=shared",
        Clock::fixed(fixed_now()),
        WeekZone::Utc,
    )
    .await
    .expect("connect sqlite");
    let goals = services.goals();
    let progress = services.progress();

    let goal = goals
        .create_goal(GoalDraft {
            title: "Meditate".to_string(),
            goal_type: GoalType::YesNo,
            target: None,
            unit: None,
            icon: Some("🧘".to_string()),
        })
        .await
        .unwrap();
    progress
        .record_progress(
            goal.id(),
            ProgressInput {
                value: None,
                completed: Some(true),
            },
        )
        .await
        .unwrap();

    // Switching the kind keeps already recorded weeks readable.
    let switched = goals
        .update_goal(
            goal.id(),
            GoalPatch {
                goal_type: Some(GoalType::Measurable),
                ..GoalPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(switched.goal_type(), GoalType::Measurable);
    assert!(progress.current_progress(goal.id()).await.unwrap().is_some());

    goals.delete_goal(goal.id()).await.unwrap();
    assert!(matches!(
        progress.history(goal.id(), 10).await.unwrap_err(),
        ProgressServiceError::GoalNotFound(_)
    ));
    assert!(progress.current_progress(goal.id()).await.unwrap().is_none());
}
