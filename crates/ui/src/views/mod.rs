mod auth;
mod landing;
mod materials;
mod performance;
mod pre_quiz;
mod quiz;
mod quiz_selection;
mod state;
mod unit_history;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use auth::{LoginView, SignupView};
pub use landing::LandingView;
pub use materials::MaterialsView;
pub use performance::PerformanceView;
pub use pre_quiz::PreQuizView;
pub use quiz::QuizView;
pub use quiz_selection::QuizSelectionView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use unit_history::UnitHistoryView;
