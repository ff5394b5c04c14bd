use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use tracing::{debug, info, warn};

use quiz_core::model::QuizSelector;
use services::{QuizPhase, QuizSessionController};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;
use crate::vm::{OutcomeRowVm, QuestionVm, QuizScreen, ResultVm, timer_label};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Everything the student can do on the quiz page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum QuizAction {
    Select(usize),
    Next,
    Prev,
    Submit,
    RetrySubmit,
    /// Throw away a failed load and fetch the same quiz again.
    Reload,
}

/// One quiz attempt. The controller lives in a signal owned by this view, so
/// leaving the page drops it and cancels its timer.
#[component]
pub fn QuizView(kind: String, name: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let subject = ctx.subject().to_string();

    let controller = use_signal(|| {
        QuizSelector::from_route(&kind, &name)
            .ok()
            .map(|selector| ctx.start_quiz(selector))
    });
    let elapsed = use_signal(|| 0_u64);

    use_hook(move || {
        spawn(async move {
            run_attempt(controller, elapsed).await;
        })
    });

    let dispatch = use_callback({
        let ctx = ctx.clone();
        let kind = kind.clone();
        let name = name.clone();
        move |action: QuizAction| match action {
            QuizAction::Select(option) => {
                let mut controller = controller;
                if let Some(active) = controller.write().as_mut() {
                    if let Err(err) = active.select_answer(option) {
                        warn!(error = %err, "answer rejected");
                    }
                }
            }
            QuizAction::Next => {
                let mut controller = controller;
                if let Some(active) = controller.write().as_mut() {
                    active.next();
                }
            }
            QuizAction::Prev => {
                let mut controller = controller;
                if let Some(active) = controller.write().as_mut() {
                    active.prev();
                }
            }
            QuizAction::Submit => submit(controller),
            QuizAction::RetrySubmit => retry(controller),
            QuizAction::Reload => reload(&ctx, &kind, &name, controller, elapsed),
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch, controller);
            }
        }
    }

    use_effect(move || {
        let needs_login = controller
            .read()
            .as_ref()
            .is_some_and(|active| *active.phase() == QuizPhase::AuthRequired);
        if needs_login {
            navigator.replace(Route::Login {});
        }
    });

    let screen = controller
        .read()
        .as_ref()
        .map(|active| QuizScreen::from_session(active.session()));
    let Some(screen) = screen else {
        return rsx! {
            div { class: "page",
                p { class: "error", "{ViewError::InvalidQuiz.message()}" }
                Link { to: Route::QuizSelection { subject }, "Back to Quizzes" }
            }
        };
    };

    let title = QuizSelector::from_route(&kind, &name)
        .map(|selector| selector.title().to_string())
        .unwrap_or_default();
    let clock = timer_label(elapsed());
    let shows_timer = screen.shows_timer();

    rsx! {
        div { class: "page quiz",
            header { class: "quiz-header",
                h2 { "{title}" }
                if shows_timer {
                    span { class: "timer", "{clock}" }
                }
            }
            match screen {
                QuizScreen::Loading => rsx! {
                    p { "Loading questions..." }
                },
                QuizScreen::Question(question) => rsx! {
                    QuestionPanel { dispatch, question }
                },
                QuizScreen::Submitting => rsx! {
                    p { class: "submitting", "Calculating results..." }
                },
                QuizScreen::SubmitFailed { message } => rsx! {
                    div { class: "error-panel",
                        p { class: "error", "{message}" }
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| dispatch.call(QuizAction::RetrySubmit),
                            "Retry"
                        }
                    }
                },
                QuizScreen::LoadFailed { message } => rsx! {
                    div { class: "error-panel",
                        p { class: "error", "{message}" }
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| dispatch.call(QuizAction::Reload),
                            "Try again"
                        }
                        Link { class: "btn", to: Route::QuizSelection { subject: subject.clone() }, "Back to Quizzes" }
                    }
                },
                QuizScreen::AuthRequired => rsx! {
                    p { "{ViewError::LoginRequired.message()}" }
                },
                QuizScreen::Finished(result) => rsx! {
                    ResultPanel { subject: subject.clone(), result }
                },
            }
        }
    }
}

/// Load the questions, then mirror the running clock into `elapsed` until the
/// controller goes away.
async fn run_attempt(
    mut controller: Signal<Option<QuizSessionController>>,
    mut elapsed: Signal<u64>,
) {
    let request = controller
        .write()
        .as_mut()
        .and_then(QuizSessionController::begin_load);
    let Some(request) = request else {
        return;
    };
    let fetch = request.fetch().await;

    let updates = controller.write().as_mut().map(|active| {
        active.finish_load(fetch);
        active.elapsed_updates()
    });
    let Some(mut updates) = updates else {
        return;
    };
    elapsed.set(*updates.borrow());
    while updates.changed().await.is_ok() {
        let seconds = *updates.borrow_and_update();
        elapsed.set(seconds);
    }
    debug!("quiz clock closed");
}

/// Swap in a fresh controller for the same quiz and load it from scratch.
fn reload(
    ctx: &AppContext,
    kind: &str,
    name: &str,
    mut controller: Signal<Option<QuizSessionController>>,
    mut elapsed: Signal<u64>,
) {
    let retryable = controller
        .read()
        .as_ref()
        .is_some_and(|active| matches!(active.phase(), QuizPhase::LoadFailed(_)));
    if !retryable {
        warn!("reload ignored outside a failed load");
        return;
    }

    info!(kind, name, "reloading quiz");
    let fresh = QuizSelector::from_route(kind, name)
        .ok()
        .map(|selector| ctx.start_quiz(selector));
    controller.set(fresh);
    elapsed.set(0);
    spawn(run_attempt(controller, elapsed));
}

fn submit(mut controller: Signal<Option<QuizSessionController>>) {
    let request = controller
        .write()
        .as_mut()
        .map(QuizSessionController::begin_submit);
    match request {
        Some(Ok(request)) => {
            spawn(async move {
                let outcome = request.send().await;
                if let Some(active) = controller.write().as_mut() {
                    active.finish_submit(outcome);
                }
            });
        }
        Some(Err(err)) => warn!(error = %err, "submit rejected"),
        None => {}
    }
}

fn retry(mut controller: Signal<Option<QuizSessionController>>) {
    let request = controller
        .write()
        .as_mut()
        .map(QuizSessionController::begin_retry);
    match request {
        Some(Ok(request)) => {
            spawn(async move {
                let outcome = request.send().await;
                if let Some(active) = controller.write().as_mut() {
                    active.finish_submit(outcome);
                }
            });
        }
        Some(Err(err)) => warn!(error = %err, "retry rejected"),
        None => {}
    }
}

#[component]
fn QuestionPanel(dispatch: Callback<QuizAction>, question: QuestionVm) -> Element {
    let is_last = question.is_last;

    rsx! {
        section { class: "question",
            div { class: "progress",
                span { class: "progress-count", "{question.progress_label}" }
                span { class: "progress-answered", "Answered {question.answered} of {question.total}" }
            }
            p { class: "question-text", "{question.text}" }
            div { class: "options",
                for option in question.options {
                    button {
                        key: "{option.index}",
                        class: if option.selected { "option selected" } else { "option" },
                        onclick: move |_| dispatch.call(QuizAction::Select(option.index)),
                        "{option.label}"
                    }
                }
            }
            div { class: "quiz-nav",
                button {
                    class: "btn",
                    disabled: !question.can_go_back,
                    onclick: move |_| dispatch.call(QuizAction::Prev),
                    "Previous"
                }
                if is_last {
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| dispatch.call(QuizAction::Submit),
                        "Submit"
                    }
                } else {
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| dispatch.call(QuizAction::Next),
                        "Next"
                    }
                }
            }
        }
    }
}

#[component]
fn ResultPanel(subject: String, result: ResultVm) -> Element {
    rsx! {
        section { class: "results",
            div { class: "score",
                h3 { "Your Score: {result.score_label}" }
                p { "Correct answers: {result.correct} of {result.total}" }
                p { "Time taken: {result.time_label}" }
            }
            ol { class: "outcomes",
                for row in result.rows {
                    OutcomeRow { row }
                }
            }
            Link { class: "btn btn-primary", to: Route::QuizSelection { subject }, "Back to Quizzes" }
        }
    }
}

#[component]
fn OutcomeRow(row: OutcomeRowVm) -> Element {
    rsx! {
        li { class: if row.is_correct { "outcome correct" } else { "outcome incorrect" },
            p { class: "question-text", "{row.question_text}" }
            p { "Your Answer: {row.your_answer}" }
            if let Some(correct) = row.correct_answer {
                p { class: "correct-answer", "Correct Answer: {correct}" }
            }
            p { class: "explanation", "Explanation: {row.explanation}" }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizAction>>>>,
    controller: Rc<RefCell<Option<Signal<Option<QuizSessionController>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<QuizAction>,
        controller: Signal<Option<QuizSessionController>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.controller.borrow_mut() = Some(controller);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizAction> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn phase(&self) -> Option<QuizPhase> {
        let controller = (*self.controller.borrow()).expect("quiz controller registered");
        let phase = controller.read().as_ref().map(|active| active.phase().clone());
        phase
    }
}
