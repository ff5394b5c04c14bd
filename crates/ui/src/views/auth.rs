use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use tracing::warn;

use quiz_core::model::{LoginDraft, SignupDraft, SignupErrors};
use services::AuthError;

use crate::context::AppContext;
use crate::routes::Route;

/// Message shown under the form for a failed login or signup.
fn auth_error_message(err: &AuthError) -> String {
    match err {
        AuthError::Api(api) => api.user_message(),
        AuthError::Storage(_) => "Could not save your login on this device.".to_string(),
        other => other.to_string(),
    }
}

//
// ─── LOGIN ─────────────────────────────────────────────────────────────────────
//

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let subject = ctx.subject().to_string();
    let auth = ctx.auth();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut remember_me = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let draft = LoginDraft {
            username: username.read().trim().to_string(),
            password: password.read().clone(),
            remember_me: remember_me(),
        };
        let auth = auth.clone();
        let subject = subject.clone();
        busy.set(true);
        spawn(async move {
            match auth.login(&draft).await {
                Ok(_) => {
                    error.set(None);
                    navigator.push(Route::QuizSelection { subject });
                }
                Err(err) => {
                    warn!(error = %err, "login failed");
                    error.set(Some(auth_error_message(&err)));
                }
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "page auth",
            h2 { "Login" }
            form { class: "auth-form", onsubmit: on_submit,
                label { r#for: "login-username", "Username" }
                input {
                    id: "login-username",
                    r#type: "text",
                    value: "{username}",
                    oninput: move |evt| username.set(evt.value()),
                }
                label { r#for: "login-password", "Password" }
                input {
                    id: "login-password",
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                label { class: "checkbox",
                    input {
                        r#type: "checkbox",
                        checked: remember_me(),
                        onchange: move |evt| remember_me.set(evt.checked()),
                    }
                    "Remember me"
                }
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                button { class: "btn btn-primary", r#type: "submit", disabled: busy(),
                    if busy() { "Logging in..." } else { "Login" }
                }
            }
            p { class: "auth-switch",
                "Don't have an account? "
                Link { to: Route::Signup {}, "Sign Up" }
            }
        }
    }
}

//
// ─── SIGNUP ────────────────────────────────────────────────────────────────────
//

#[component]
pub fn SignupView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let subject = ctx.subject().to_string();
    let auth = ctx.auth();
    let email_domain = auth.email_domain().to_string();

    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut terms_accepted = use_signal(|| false);
    let mut field_errors = use_signal(SignupErrors::default);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let draft = SignupDraft {
            username: username.read().trim().to_string(),
            email: email.read().trim().to_string(),
            password: password.read().clone(),
            terms_accepted: terms_accepted(),
        };
        let auth = auth.clone();
        let subject = subject.clone();
        busy.set(true);
        spawn(async move {
            match auth.register(&draft).await {
                Ok(_) => {
                    field_errors.set(SignupErrors::default());
                    error.set(None);
                    navigator.push(Route::QuizSelection { subject });
                }
                Err(AuthError::InvalidSignup(errors)) => {
                    field_errors.set(errors);
                    error.set(None);
                }
                Err(err) => {
                    warn!(error = %err, "signup failed");
                    field_errors.set(SignupErrors::default());
                    error.set(Some(auth_error_message(&err)));
                }
            }
            busy.set(false);
        });
    };

    let errors = field_errors.read().clone();

    rsx! {
        div { class: "page auth",
            h2 { "Sign Up" }
            form { class: "auth-form", onsubmit: on_submit,
                label { r#for: "signup-username", "Username" }
                input {
                    id: "signup-username",
                    r#type: "text",
                    value: "{username}",
                    oninput: move |evt| username.set(evt.value()),
                }
                FieldError { message: errors.username.as_ref().map(ToString::to_string) }
                label { r#for: "signup-email", "Email" }
                input {
                    id: "signup-email",
                    r#type: "email",
                    placeholder: "name{email_domain}",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                FieldError { message: errors.email.as_ref().map(ToString::to_string) }
                label { r#for: "signup-password", "Password" }
                input {
                    id: "signup-password",
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                FieldError { message: errors.password.as_ref().map(ToString::to_string) }
                label { class: "checkbox",
                    input {
                        r#type: "checkbox",
                        checked: terms_accepted(),
                        onchange: move |evt| terms_accepted.set(evt.checked()),
                    }
                    "I agree to the terms and conditions"
                }
                FieldError { message: errors.terms.as_ref().map(ToString::to_string) }
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                button { class: "btn btn-primary", r#type: "submit", disabled: busy(),
                    if busy() { "Creating account..." } else { "Sign Up" }
                }
            }
            p { class: "auth-switch",
                "Already have an account? "
                Link { to: Route::Login {}, "Login" }
            }
        }
    }
}

#[component]
fn FieldError(message: Option<String>) -> Element {
    rsx! {
        if let Some(message) = message {
            p { class: "field-error", "{message}" }
        }
    }
}
