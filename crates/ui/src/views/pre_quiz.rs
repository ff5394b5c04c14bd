use dioxus::prelude::*;
use dioxus_router::Link;

use quiz_core::model::QuizSelector;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;

#[component]
pub fn PreQuizView(kind: String, name: String) -> Element {
    let ctx = use_context::<AppContext>();
    let subject = ctx.subject().to_string();

    let Ok(selector) = QuizSelector::from_route(&kind, &name) else {
        return rsx! {
            div { class: "page",
                p { class: "error", "{ViewError::InvalidQuiz.message()}" }
                Link { to: Route::QuizSelection { subject }, "Back to Quizzes" }
            }
        };
    };
    let title = selector.title().to_string();
    let question_count = selector.expected_question_count();

    rsx! {
        div { class: "page pre-quiz",
            h2 { "{title}" }
            ul { class: "instructions",
                li { "This quiz has {question_count} questions." }
                li { "The timer starts as soon as the first question appears." }
                li { "You can move between questions and change answers before submitting." }
                li { "Unanswered questions are marked as not answered." }
            }
            div { class: "actions",
                Link { class: "btn", to: Route::QuizSelection { subject }, "Back" }
                Link { class: "btn btn-primary", to: Route::Quiz { kind, name }, "Start Quiz" }
            }
        }
    }
}
