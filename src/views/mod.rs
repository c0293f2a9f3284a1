//! Server-rendered HTML.
//!
//! Pages are assembled with `format!` around [`escape`]d values. Every dashboard page goes through
//! [`layout`], which adds the sidebar and the toast region.

pub mod form;
pub mod overview;
pub mod pages;
pub mod table;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::auth::Session;
use crate::notify::{Flash, Toast};

/// Escape text for element content and double-quoted attributes
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

struct NavItem {
    label: &'static str,
    href: &'static str,
}

const SIDEBAR: &[NavItem] = &[
    NavItem { label: "Overview", href: "/dashboard" },
    NavItem { label: "All Projects", href: "/dashboard/projects" },
    NavItem { label: "Categories", href: "/dashboard/categories" },
    NavItem { label: "Profiles", href: "/dashboard/profile" },
];

/// `/dashboard` is active only on an exact match, the others on their whole subtree
pub fn is_active(href: &str, current: &str) -> bool {
    if href == "/dashboard" {
        return current == href;
    }
    current == href || current.starts_with(&format!("{}/", href))
}

const STYLE: &str = r#"
body{margin:0;font-family:system-ui,sans-serif;color:#111827;background:#F9FAFB}
a{color:#2563EB}
.shell{display:flex;min-height:100vh}
.sidebar{width:220px;background:#111827;color:#F9FAFB;padding:24px 16px}
.sidebar a{display:block;padding:8px 12px;border-radius:6px;color:#D1D5DB;text-decoration:none}
.sidebar a.active{background:#374151;color:#FFFFFF}
.main{flex:1;padding:24px 32px}
.topbar{display:flex;justify-content:space-between;align-items:center;margin-bottom:24px}
.card{background:#FFFFFF;border:1px solid #E5E7EB;border-radius:8px;padding:16px}
.cards{display:grid;grid-template-columns:repeat(4,1fr);gap:16px;margin-bottom:24px}
table{width:100%;border-collapse:collapse;background:#FFFFFF}
th,td{text-align:left;padding:12px;border-bottom:1px solid #E5E7EB;font-size:14px}
.badge{display:inline-block;padding:2px 10px;border-radius:999px;font-size:12px;background:#E5E7EB}
.toast{padding:10px 14px;border-radius:6px;margin-bottom:8px}
.toast.success{background:#DCFCE7;color:#166534}
.toast.error{background:#FEE2E2;color:#991B1B}
.field{margin-bottom:14px}
.field label{display:block;font-size:14px;margin-bottom:4px}
.field input,.field select{width:100%;max-width:420px;padding:8px;border:1px solid #D1D5DB;border-radius:6px}
.field .error{color:#B91C1C;font-size:13px}
.pager{display:flex;justify-content:space-between;align-items:center;margin-top:16px}
.pager a,.pager span{padding:4px 10px;border:1px solid #D1D5DB;border-radius:6px;margin-left:4px;text-decoration:none}
.pager .current{background:#E5E7EB}
.pager .disabled{color:#9CA3AF}
button,.button{padding:8px 14px;border-radius:6px;border:1px solid #111827;background:#111827;color:#FFFFFF;cursor:pointer;text-decoration:none}
.button.secondary{background:#FFFFFF;color:#111827}
.danger{background:#B91C1C;border-color:#B91C1C}
"#;

pub fn toasts(toasts: &[Toast]) -> String {
    if toasts.is_empty() {
        return String::new();
    }
    let items: String = toasts
        .iter()
        .map(|t| format!(r#"<div class="toast {}" role="status">{}</div>"#, t.kind.as_str(), escape(&t.message)))
        .collect();
    format!(r#"<div class="toasts">{}</div>"#, items)
}

/// Bare document used by the public pages
pub fn document(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><title>{} | Admin Dashboard</title><style>{}</style></head><body>{}</body></html>",
        escape(title),
        STYLE,
        body
    )
}

/// Dashboard chrome: sidebar, header with the signed-in user, notifications, then `body`
pub fn layout(title: &str, current_path: &str, session: &Session, notices: &[Toast], body: &str) -> String {
    let nav: String = SIDEBAR
        .iter()
        .map(|item| {
            let class = if is_active(item.href, current_path) { " class=\"active\"" } else { "" };
            format!(r#"<a href="{}"{}>{}</a>"#, item.href, class, item.label)
        })
        .collect();

    let main = format!(
        r#"<div class="shell"><nav class="sidebar"><h2>Dashboard</h2>{nav}<a href="/logout">Logout</a></nav><main class="main"><div class="topbar"><h1>{title}</h1><span>{user}</span></div>{toasts}{body}</main></div>"#,
        nav = nav,
        title = escape(title),
        user = escape(&session.name),
        toasts = toasts(notices),
        body = body,
    );
    document(title, &main)
}

/// HTML response that also expires the consumed flash cookie
pub fn render(status: StatusCode, html: String, flash: &Flash) -> Response {
    crate::notify::consume((status, Html(html)).into_response(), flash)
}
