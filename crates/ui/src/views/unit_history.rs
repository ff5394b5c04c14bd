use dioxus::prelude::*;
use dioxus_router::Link;
use tracing::warn;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::quiz_selection::LoginPrompt;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AttemptCardVm, TopicVm, map_attempt_cards, map_topic_analysis};

#[derive(Clone, Debug, PartialEq)]
enum Analysis {
    Running,
    Ready(Vec<TopicVm>),
    Failed(ViewError),
}

#[component]
pub fn UnitHistoryView(subject: String, unit: String) -> Element {
    let ctx = use_context::<AppContext>();
    let performance = ctx.performance();
    let mut selected = use_signal(|| None::<usize>);
    let mut analysis = use_signal(|| None::<Analysis>);

    let resource = use_resource({
        let performance = performance.clone();
        let unit = unit.clone();
        move || {
            let performance = performance.clone();
            let unit = unit.clone();
            async move {
                let records = performance
                    .unit_history(&unit)
                    .await
                    .map_err(|err| ViewError::from_api(&err))?;
                Ok(map_attempt_cards(&records))
            }
        }
    });
    let state = view_state_from_resource(&resource);

    let analyze = use_callback(move |card: AttemptCardVm| {
        let performance = performance.clone();
        selected.set(Some(card.number));
        analysis.set(Some(Analysis::Running));
        spawn(async move {
            let outcome = match performance.analyze(&card.breakdown).await {
                Ok(topics) => Analysis::Ready(map_topic_analysis(&topics)),
                Err(err) => {
                    warn!(error = %err, "attempt analysis failed");
                    Analysis::Failed(ViewError::from_api(&err))
                }
            };
            analysis.set(Some(outcome));
        });
    });

    rsx! {
        div { class: "page history",
            h2 { "{unit}" }
            p { class: "subtitle", "Previous attempts" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading attempts..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { "You have not attempted this quiz yet." }
                    } else {
                        ul { class: "attempts",
                            for card in cards {
                                AttemptItem {
                                    expanded: selected() == Some(card.number),
                                    analysis: analysis(),
                                    on_analyze: analyze,
                                    card,
                                }
                            }
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
            Link { class: "btn", to: Route::QuizSelection { subject }, "Back to Quizzes" }
        }
    }
}

#[component]
fn AttemptItem(
    card: AttemptCardVm,
    expanded: bool,
    analysis: Option<Analysis>,
    on_analyze: Callback<AttemptCardVm>,
) -> Element {
    let can_analyze = card.can_analyze();
    let for_click = card.clone();

    rsx! {
        li { class: "attempt-card",
            div { class: "attempt-summary",
                h3 { "Attempt {card.number}" }
                span { class: "attempt-date", "{card.attempted_at}" }
                p { "Score: {card.score_label}" }
                p { "Correct: {card.correct} | Incorrect: {card.incorrect} | Total: {card.total}" }
                p { "Time taken: {card.duration}" }
            }
            if can_analyze {
                button {
                    class: "btn",
                    onclick: move |_| on_analyze.call(for_click.clone()),
                    "Analyze"
                }
            }
            if expanded {
                AnalysisPanel { analysis }
            }
        }
    }
}

#[component]
fn AnalysisPanel(analysis: Option<Analysis>) -> Element {
    match analysis {
        None => rsx! {},
        Some(Analysis::Running) => rsx! {
            p { "Analyzing..." }
        },
        Some(Analysis::Failed(err)) => rsx! {
            p { class: "error", "{err.message()}" }
        },
        Some(Analysis::Ready(topics)) => rsx! {
            if topics.is_empty() {
                p { "No topic data for this attempt." }
            }
            for topic in topics {
                table { class: "topic-table", key: "{topic.name}",
                    caption { "{topic.name} ({topic.accuracy})" }
                    thead {
                        tr {
                            th { "Subtopic" }
                            th { "Correct" }
                            th { "Total" }
                            th { "Accuracy" }
                        }
                    }
                    tbody {
                        for row in topic.subtopics {
                            tr { key: "{row.name}",
                                td { "{row.name}" }
                                td { "{row.correct}" }
                                td { "{row.total}" }
                                td { "{row.accuracy}" }
                            }
                        }
                    }
                }
            }
        },
    }
}
