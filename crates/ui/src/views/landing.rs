use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn LandingView() -> Element {
    let ctx = use_context::<AppContext>();
    let subject = ctx.subject().to_string();

    rsx! {
        div { class: "page landing",
            section { class: "hero",
                h1 { "Welcome to EduConnect" }
                p { "Practice unit quizzes, review your answers and track how each topic is going." }
            }
            section { class: "subject-card",
                h2 { "{subject}" }
                div { class: "actions",
                    Link { class: "btn btn-primary", to: Route::QuizSelection { subject: subject.clone() }, "Take a Quiz" }
                    Link { class: "btn", to: Route::Materials { subject: subject.clone() }, "Study Materials" }
                    Link { class: "btn", to: Route::Performance { subject: subject.clone() }, "Performance" }
                }
            }
        }
    }
}
