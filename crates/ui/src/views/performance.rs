use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::quiz_selection::LoginPrompt;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizHistoryCardVm, map_quiz_history_cards};

/// Every quiz of the subject, grand quiz included, with links to its attempts.
#[component]
pub fn PerformanceView(subject: String) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let performance = ctx.performance();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        let performance = performance.clone();
        async move {
            let history = performance
                .history()
                .await
                .map_err(|err| ViewError::from_api(&err))?;
            let units = catalog
                .units()
                .await
                .map_err(|err| ViewError::from_api(&err))?;
            Ok(map_quiz_history_cards(&units, &history))
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page performance",
            h2 { "Performance Overview" }
            p { class: "subtitle", "Select a quiz to review your past attempts." }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading history..." }
                },
                ViewState::Ready(cards) => rsx! {
                    ul { class: "quiz-list",
                        for card in cards {
                            HistoryCard { subject: subject.clone(), card }
                        }
                    }
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
fn HistoryCard(subject: String, card: QuizHistoryCardVm) -> Element {
    let attempts = match card.attempts {
        0 => "No attempts yet".to_string(),
        1 => "1 attempt".to_string(),
        count => format!("{count} attempts"),
    };

    rsx! {
        li { class: "quiz-card",
            Link { to: Route::UnitHistory { subject, unit: card.name.clone() },
                h3 { "{card.name}" }
            }
            p { "{attempts}" }
            if let Some(latest) = card.latest {
                p { class: "attempt-date", "Last attempt: {latest}" }
            }
        }
    }
}
