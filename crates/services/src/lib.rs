#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod goal_service;
pub mod progress_service;

pub use weekly_core::{Clock, WeekZone};

pub use app_services::AppServices;
pub use error::{AppServicesError, ErrorKind, GoalServiceError, ProgressServiceError};
pub use goal_service::GoalService;
pub use progress_service::{
    DEFAULT_HISTORY_WEEKS, MAX_HISTORY_WEEKS, MIN_HISTORY_WEEKS, ProgressService,
};
