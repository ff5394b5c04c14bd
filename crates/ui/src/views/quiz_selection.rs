use dioxus::prelude::*;
use dioxus_router::Link;

use quiz_core::model::{QuizAvailability, QuizSelector};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn QuizSelectionView(subject: String) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();

    let resource = use_resource({
        let subject = subject.clone();
        move || {
            let catalog = catalog.clone();
            let subject = subject.clone();
            async move {
                catalog
                    .availability(&subject)
                    .await
                    .map_err(|err| ViewError::from_api(&err))
            }
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "{subject} Quizzes" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading quizzes..." }
                },
                ViewState::Ready(availability) => rsx! {
                    QuizList { subject: subject.clone(), availability }
                },
                ViewState::Error(ViewError::LoginRequired) => rsx! {
                    LoginPrompt {}
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn QuizList(subject: String, availability: QuizAvailability) -> Element {
    rsx! {
        if availability.units.is_empty() {
            p { "No unit quizzes are available yet." }
        } else {
            ul { class: "quiz-list",
                for unit in availability.units.iter().cloned() {
                    li { class: "quiz-card", key: "{unit}",
                        h3 { "{unit}" }
                        div { class: "actions",
                            Link {
                                class: "btn btn-primary",
                                to: Route::PreQuiz { kind: "unit".to_string(), name: unit.clone() },
                                "Start Quiz"
                            }
                            Link {
                                class: "btn",
                                to: Route::UnitHistory { subject: subject.clone(), unit: unit.clone() },
                                "History"
                            }
                        }
                    }
                }
            }
        }
        section { class: "quiz-card grand",
            h3 { "Grand Quiz" }
            if availability.is_grand_quiz_locked {
                p { class: "locked", "Complete every unit quiz to unlock the Grand Quiz." }
                button { class: "btn", disabled: true, "Locked" }
            } else {
                p { "All units, one attempt." }
                Link {
                    class: "btn btn-primary",
                    to: Route::PreQuiz { kind: "grand".to_string(), name: subject.clone() },
                    "Start Grand Quiz"
                }
            }
            Link {
                class: "btn",
                to: Route::UnitHistory {
                    subject: subject.clone(),
                    unit: QuizSelector::Grand.title().to_string(),
                },
                "History"
            }
        }
    }
}

#[component]
pub(crate) fn LoginPrompt() -> Element {
    rsx! {
        div { class: "login-prompt",
            p { "{ViewError::LoginRequired.message()}" }
            Link { class: "btn btn-primary", to: Route::Login {}, "Login" }
        }
    }
}
