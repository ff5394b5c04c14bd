use dioxus::prelude::*;
use services::ApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    LoginRequired,
    Offline,
    InvalidQuiz,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unknown => "Something went wrong. Please try again.",
            Self::LoginRequired => "Please log in to continue.",
            Self::Offline => "Could not connect to the server.",
            Self::InvalidQuiz => "This quiz does not exist.",
        }
    }

    #[must_use]
    pub fn from_api(err: &ApiError) -> Self {
        match err {
            err if err.requires_login() => Self::LoginRequired,
            ApiError::Http(inner) if inner.is_connect() || inner.is_timeout() => Self::Offline,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_errors_map_to_login_required() {
        assert_eq!(
            ViewError::from_api(&ApiError::NotLoggedIn),
            ViewError::LoginRequired
        );
        assert_eq!(
            ViewError::from_api(&ApiError::Unauthorized),
            ViewError::LoginRequired
        );
        assert_eq!(
            ViewError::LoginRequired.message(),
            "Please log in to continue."
        );
    }
}
