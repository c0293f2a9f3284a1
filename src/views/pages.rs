use crate::auth::Session;
use crate::forms::{FieldDescriptor, FieldErrors, FormValues};
use crate::notify::Toast;

use super::form::{self, FormView, SelectOptions};
use super::{document, escape, layout, toasts};

fn auth_card(title: &str, notices: &[Toast], form_html: &str, footer: &str) -> String {
    let body = format!(
        r#"<main class="main" style="max-width:460px;margin:48px auto"><h1>{}</h1>{}{}<p>{}</p></main>"#,
        escape(title),
        toasts(notices),
        form_html,
        footer
    );
    document(title, &body)
}

pub fn login(fields: &[FieldDescriptor], values: &FormValues, errors: Option<&FieldErrors>, notices: &[Toast]) -> String {
    let form_html = form::render(&FormView {
        fields,
        values,
        errors,
        options: &SelectOptions::new(),
        action: "/login",
        hidden: &[],
        submit: "Login",
        cancel: None,
    });
    auth_card(
        "Login",
        notices,
        &form_html,
        r#"Don't have an account? <a href="/register">Register</a>"#,
    )
}

pub fn register(fields: &[FieldDescriptor], values: &FormValues, errors: Option<&FieldErrors>, notices: &[Toast]) -> String {
    let form_html = form::render(&FormView {
        fields,
        values,
        errors,
        options: &SelectOptions::new(),
        action: "/register",
        hidden: &[],
        submit: "Create account",
        cancel: None,
    });
    auth_card(
        "Create an account",
        notices,
        &form_html,
        r#"Already have an account? <a href="/login">Login</a>"#,
    )
}

/// Blocking confirmation shown before any delete
pub fn confirm_delete(
    session: &Session,
    current_path: &str,
    what: &str,
    label: &str,
    action: &str,
    hidden: &[(&'static str, String)],
    cancel: &str,
) -> String {
    let hidden_inputs: String = hidden
        .iter()
        .map(|(name, value)| format!(r#"<input type="hidden" name="{}" value="{}">"#, name, escape(value)))
        .collect();
    let body = format!(
        r#"<div class="card" role="alertdialog"><h2>Are you sure?</h2><p>This will permanently delete the {} <strong>{}</strong>. This action cannot be undone.</p><form method="post" action="{}">{}<button type="submit" class="danger">Delete</button> <a class="button secondary" href="{}">Cancel</a></form></div>"#,
        escape(what),
        escape(label),
        escape(action),
        hidden_inputs,
        escape(cancel)
    );
    layout(&format!("Delete {}", what), current_path, session, &[], &body)
}

pub fn logout_confirm(session: &Session) -> String {
    let body = r#"<div class="card" role="alertdialog"><h2>Are you sure you want to logout?</h2><p>You will need to sign in again to access the dashboard.</p><form method="post" action="/logout"><button type="submit" class="danger">Logout</button> <a class="button secondary" href="/dashboard">Cancel</a></form></div>"#;
    layout("Logout", "/logout", session, &[], body)
}

pub fn not_found() -> String {
    document(
        "Page not found",
        r#"<main class="main" style="text-align:center;margin-top:80px"><h1>404</h1><p>The page you are looking for does not exist.</p><a class="button" href="/dashboard">Back to dashboard</a></main>"#,
    )
}

pub fn error(status: u16, message: &str) -> String {
    document(
        "Something went wrong",
        &format!(
            r#"<main class="main" style="text-align:center;margin-top:80px"><h1>{}</h1><p>{}</p><a class="button" href="/dashboard">Back to dashboard</a></main>"#,
            status,
            escape(message)
        ),
    )
}
