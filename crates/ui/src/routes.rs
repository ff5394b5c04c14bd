use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};
use tracing::warn;

use crate::context::AppContext;
use crate::views::{
    LandingView, LoginView, MaterialsView, PerformanceView, PreQuizView, QuizSelectionView, QuizView,
    SignupView, UnitHistoryView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", LandingView)] Landing {},
        #[route("/login", LoginView)] Login {},
        #[route("/signup", SignupView)] Signup {},
        #[route("/subject/:subject/quizzes", QuizSelectionView)] QuizSelection { subject: String },
        #[route("/subject/:subject/materials", MaterialsView)] Materials { subject: String },
        #[route("/subject/:subject/performance", PerformanceView)] Performance { subject: String },
        #[route("/subject/:subject/performance/:unit", UnitHistoryView)] UnitHistory { subject: String, unit: String },
    #[end_layout]
    #[route("/quiz/welcome/:kind/:name", PreQuizView)] PreQuiz { kind: String, name: String },
    #[route("/quiz/start/:kind/:name", QuizView)] Quiz { kind: String, name: String },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Header {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Header() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let subject = ctx.subject().to_string();
    let auth = ctx.auth();

    let mut logged_in = use_resource({
        let auth = auth.clone();
        move || {
            let auth = auth.clone();
            async move { auth.is_logged_in().await.unwrap_or(false) }
        }
    });
    let is_logged_in = matches!(*logged_in.read(), Some(true));

    let on_logout = move |_: MouseEvent| {
        let auth = auth.clone();
        spawn(async move {
            if let Err(err) = auth.logout().await {
                warn!(error = %err, "logout failed");
            }
            logged_in.restart();
            navigator.push(Route::Login {});
        });
    };

    rsx! {
        header { class: "topbar",
            Link { class: "brand", to: Route::Landing {}, "EduConnect" }
            nav {
                Link { to: Route::QuizSelection { subject: subject.clone() }, "Quizzes" }
                Link { to: Route::Materials { subject: subject.clone() }, "Study Materials" }
                if is_logged_in {
                    Link { to: Route::Performance { subject: subject.clone() }, "Performance" }
                    button { class: "link-button", onclick: on_logout, "Logout" }
                } else {
                    Link { to: Route::Login {}, "Login" }
                    Link { to: Route::Signup {}, "Sign Up" }
                }
            }
        }
    }
}
