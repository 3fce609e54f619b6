use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::GoalId;

/// Icon used when a goal is created without one.
pub const DEFAULT_ICON: &str = "🎯";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GoalError {
    #[error("goal title cannot be empty")]
    EmptyTitle,

    #[error("goal target must be a finite, non-negative number")]
    InvalidTarget,

    #[error("unknown goal type: {0}")]
    UnknownType(String),
}

//
// ─── GOAL TYPE ─────────────────────────────────────────────────────────────────
//

/// Discriminant of a goal's measurement kind, as it appears on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalType {
    Measurable,
    YesNo,
}

impl GoalType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GoalType::Measurable => "MEASURABLE",
            GoalType::YesNo => "YES_NO",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MEASURABLE" => Ok(GoalType::Measurable),
            "YES_NO" => Ok(GoalType::YesNo),
            other => Err(GoalError::UnknownType(other.to_owned())),
        }
    }
}

//
// ─── GOAL KIND ─────────────────────────────────────────────────────────────────
//

/// How progress towards a goal is measured.
#[derive(Debug, Clone, PartialEq)]
pub enum GoalKind {
    /// A numeric amount per week, optionally against a target in some unit.
    Measurable {
        target: Option<f64>,
        unit: Option<String>,
    },
    /// Done or not done this week.
    YesNo,
}

impl GoalKind {
    /// Build a measurable kind, validating the target and dropping a blank unit.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::InvalidTarget` if the target is negative or not finite.
    pub fn measurable(target: Option<f64>, unit: Option<String>) -> Result<Self, GoalError> {
        if let Some(t) = target {
            if !t.is_finite() || t < 0.0 {
                return Err(GoalError::InvalidTarget);
            }
        }
        let unit = unit
            .map(|u| u.trim().to_owned())
            .filter(|u| !u.is_empty());
        Ok(Self::Measurable { target, unit })
    }

    #[must_use]
    pub fn goal_type(&self) -> GoalType {
        match self {
            GoalKind::Measurable { .. } => GoalType::Measurable,
            GoalKind::YesNo => GoalType::YesNo,
        }
    }

    #[must_use]
    pub fn target(&self) -> Option<f64> {
        match self {
            GoalKind::Measurable { target, .. } => *target,
            GoalKind::YesNo => None,
        }
    }

    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        match self {
            GoalKind::Measurable { unit, .. } => unit.as_deref(),
            GoalKind::YesNo => None,
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// User input for a new goal, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalDraft {
    pub title: String,
    pub goal_type: GoalType,
    pub target: Option<f64>,
    pub unit: Option<String>,
    pub icon: Option<String>,
}

impl GoalDraft {
    /// Validate the draft into a goal that only lacks its store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns `GoalError` if the title is blank or the target is invalid.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ValidatedGoal, GoalError> {
        let title = normalize_title(self.title)?;
        let kind = match self.goal_type {
            GoalType::Measurable => GoalKind::measurable(self.target, self.unit)?,
            GoalType::YesNo => GoalKind::YesNo,
        };
        Ok(ValidatedGoal {
            title,
            kind,
            icon: normalize_icon(self.icon),
            created_at: now,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedGoal {
    pub title: String,
    pub kind: GoalKind,
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

impl ValidatedGoal {
    #[must_use]
    pub fn assign_id(self, id: GoalId) -> Goal {
        Goal {
            id,
            title: self.title,
            kind: self.kind,
            icon: self.icon,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub goal_type: Option<GoalType>,
    pub target: Option<f64>,
    pub unit: Option<String>,
    pub icon: Option<String>,
}

//
// ─── GOAL ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    id: GoalId,
    title: String,
    kind: GoalKind,
    icon: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Goal {
    /// Rehydrate a goal from storage.
    ///
    /// # Errors
    ///
    /// Returns `GoalError` if the persisted title or target no longer validate.
    pub fn from_persisted(
        id: GoalId,
        title: String,
        kind: GoalKind,
        icon: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, GoalError> {
        let title = normalize_title(title)?;
        let kind = match kind {
            GoalKind::Measurable { target, unit } => GoalKind::measurable(target, unit)?,
            GoalKind::YesNo => GoalKind::YesNo,
        };
        Ok(Self {
            id,
            title,
            kind,
            icon,
            created_at,
            updated_at,
        })
    }

    /// Merge a partial update into a copy of this goal.
    ///
    /// Switching to `YesNo` drops target and unit. Switching to `Measurable`
    /// takes them from the patch.
    ///
    /// # Errors
    ///
    /// Returns `GoalError` if a supplied title or target is invalid.
    pub fn apply_patch(&self, patch: GoalPatch, now: DateTime<Utc>) -> Result<Self, GoalError> {
        let title = match patch.title {
            Some(title) => normalize_title(title)?,
            None => self.title.clone(),
        };
        let kind = match patch.goal_type.unwrap_or(self.goal_type()) {
            GoalType::YesNo => GoalKind::YesNo,
            GoalType::Measurable => {
                let (target, unit) = match &self.kind {
                    GoalKind::Measurable { target, unit } => (*target, unit.clone()),
                    GoalKind::YesNo => (None, None),
                };
                GoalKind::measurable(patch.target.or(target), patch.unit.or(unit))?
            }
        };
        let icon = match patch.icon {
            Some(icon) => normalize_icon(Some(icon)),
            None => self.icon.clone(),
        };

        Ok(Self {
            id: self.id,
            title,
            kind,
            icon,
            created_at: self.created_at,
            updated_at: now,
        })
    }

    #[must_use]
    pub fn id(&self) -> GoalId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn kind(&self) -> &GoalKind {
        &self.kind
    }

    #[must_use]
    pub fn goal_type(&self) -> GoalType {
        self.kind.goal_type()
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn normalize_title(raw: String) -> Result<String, GoalError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GoalError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

fn normalize_icon(raw: Option<String>) -> String {
    raw.map(|i| i.trim().to_owned())
        .filter(|i| !i.is_empty())
        .unwrap_or_else(|| DEFAULT_ICON.to_owned())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn draft(goal_type: GoalType) -> GoalDraft {
        GoalDraft {
            title: "  Run  ".into(),
            goal_type,
            target: Some(10.0),
            unit: Some("km".into()),
            icon: None,
        }
    }

    #[test]
    fn validate_trims_title_and_defaults_icon() {
        let goal = draft(GoalType::Measurable)
            .validate(fixed_now())
            .unwrap()
            .assign_id(GoalId::new(1));
        assert_eq!(goal.title(), "Run");
        assert_eq!(goal.icon(), DEFAULT_ICON);
        assert_eq!(goal.kind().target(), Some(10.0));
        assert_eq!(goal.kind().unit(), Some("km"));
        assert_eq!(goal.created_at(), goal.updated_at());
    }

    #[test]
    fn yes_no_draft_discards_target_and_unit() {
        let validated = draft(GoalType::YesNo).validate(fixed_now()).unwrap();
        assert_eq!(validated.kind, GoalKind::YesNo);
        assert_eq!(validated.kind.target(), None);
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut d = draft(GoalType::YesNo);
        d.title = "   ".into();
        assert_eq!(d.validate(fixed_now()).unwrap_err(), GoalError::EmptyTitle);
    }

    #[test]
    fn negative_or_nan_target_is_rejected() {
        assert_eq!(
            GoalKind::measurable(Some(-1.0), None).unwrap_err(),
            GoalError::InvalidTarget
        );
        assert_eq!(
            GoalKind::measurable(Some(f64::NAN), None).unwrap_err(),
            GoalError::InvalidTarget
        );
    }

    #[test]
    fn goal_type_round_trips_through_str() {
        assert_eq!("YES_NO".parse::<GoalType>().unwrap(), GoalType::YesNo);
        assert_eq!(GoalType::Measurable.to_string(), "MEASURABLE");
        assert!(matches!(
            "yes-no".parse::<GoalType>(),
            Err(GoalError::UnknownType(_))
        ));
    }

    #[test]
    fn patch_only_changes_supplied_fields() {
        let goal = draft(GoalType::Measurable)
            .validate(fixed_now())
            .unwrap()
            .assign_id(GoalId::new(3));
        let later = fixed_now() + Duration::hours(1);
        let patched = goal
            .apply_patch(
                GoalPatch {
                    target: Some(12.5),
                    ..GoalPatch::default()
                },
                later,
            )
            .unwrap();

        assert_eq!(patched.title(), "Run");
        assert_eq!(patched.kind().target(), Some(12.5));
        assert_eq!(patched.kind().unit(), Some("km"));
        assert_eq!(patched.created_at(), fixed_now());
        assert_eq!(patched.updated_at(), later);
    }

    #[test]
    fn patch_switching_kind_resets_measurement_fields() {
        let goal = draft(GoalType::Measurable)
            .validate(fixed_now())
            .unwrap()
            .assign_id(GoalId::new(3));
        let yes_no = goal
            .apply_patch(
                GoalPatch {
                    goal_type: Some(GoalType::YesNo),
                    ..GoalPatch::default()
                },
                fixed_now(),
            )
            .unwrap();
        assert_eq!(yes_no.kind(), &GoalKind::YesNo);

        let back = yes_no
            .apply_patch(
                GoalPatch {
                    goal_type: Some(GoalType::Measurable),
                    unit: Some("pages".into()),
                    ..GoalPatch::default()
                },
                fixed_now(),
            )
            .unwrap();
        assert_eq!(back.kind().target(), None);
        assert_eq!(back.kind().unit(), Some("pages"));
    }

    #[test]
    fn patch_rejects_blank_title() {
        let goal = draft(GoalType::YesNo)
            .validate(fixed_now())
            .unwrap()
            .assign_id(GoalId::new(1));
        let err = goal
            .apply_patch(
                GoalPatch {
                    title: Some(String::new()),
                    ..GoalPatch::default()
                },
                fixed_now(),
            )
            .unwrap_err();
        assert_eq!(err, GoalError::EmptyTitle);
    }
}
