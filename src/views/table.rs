use crate::backend::{NamedEntity, Page, Pagination};
use crate::list::ListState;
use crate::resources::{Cell, Resource, ResourceKind};

use super::escape;

/// Full list page body: toolbar, table and pagination footer
pub fn render<R: Resource>(
    page: Option<&Page<R::Record>>,
    state: &ListState,
    categories: &[NamedEntity],
    load_error: Option<&str>,
) -> String {
    let kind = R::KIND;
    let mut html = toolbar(kind, state, categories);

    html.push_str(r#"<div class="card"><table><thead><tr>"#);
    for column in R::columns() {
        html.push_str(&format!("<th>{}</th>", escape(column)));
    }
    html.push_str(r#"<th>Actions</th></tr></thead><tbody>"#);

    let span = R::columns().len() + 1;
    match (page, load_error) {
        (_, Some(message)) => {
            html.push_str(&format!(r#"<tr><td colspan="{}">{}</td></tr>"#, span, escape(message)));
        }
        (Some(page), None) if page.items.is_empty() => {
            let message = if state.is_filtered() {
                format!("No {} match your filters", kind.plural_lower())
            } else {
                format!("No {} found", kind.plural_lower())
            };
            html.push_str(&format!(r#"<tr><td colspan="{}">{}</td></tr>"#, span, message));
        }
        (Some(page), None) => {
            for record in &page.items {
                html.push_str(&row::<R>(record, state));
            }
        }
        (None, None) => {
            html.push_str(&format!(r#"<tr><td colspan="{}">Loading {}...</td></tr>"#, span, kind.plural_lower()));
        }
    }
    html.push_str("</tbody></table></div>");

    if let (Some(page), None) = (page, load_error) {
        html.push_str(&pager(&kind.list_path(), state, &page.pagination));
    }
    html
}

fn toolbar(kind: ResourceKind, state: &ListState, categories: &[NamedEntity]) -> String {
    let new_href = format!("{}/new", kind.list_path());
    let mut html = String::from(r#"<div class="topbar">"#);

    if kind.supports_filters() {
        html.push_str(&format!(
            r#"<form method="get" action="{}"><input type="search" name="search" value="{}" placeholder="Search {}"> "#,
            kind.list_path(),
            escape(&state.search),
            kind.plural_lower()
        ));
        html.push_str(r#"<select name="category"><option value="all">All categories</option>"#);
        for category in categories {
            let selected = if state.category.as_deref() == Some(category.id.as_str()) { " selected" } else { "" };
            html.push_str(&format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape(&category.id),
                selected,
                escape(&category.name)
            ));
        }
        html.push_str(r#"</select> <button type="submit">Filter</button></form>"#);
    } else {
        html.push_str("<span></span>");
    }

    html.push_str(&format!(
        r#"<a class="button" href="{}">Add {}</a></div>"#,
        escape(&state.href(&new_href)),
        kind.singular()
    ));
    html
}

fn row<R: Resource>(record: &R::Record, state: &ListState) -> String {
    let mut html = String::from("<tr>");
    for cell in R::cells(record) {
        html.push_str(&format!("<td>{}</td>", render_cell(&cell)));
    }

    let base = R::KIND.record_path(R::id(record));
    html.push_str(&format!(
        r#"<td><a href="{}">Edit</a> <a href="{}">Delete</a></td></tr>"#,
        escape(&state.href(&format!("{}/edit", base))),
        escape(&state.href(&format!("{}/delete", base)))
    ));
    html
}

pub fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => escape(text),
        Cell::Link(Some(url)) if url.starts_with("http://") || url.starts_with("https://") => format!(
            r#"<a href="{0}" target="_blank" rel="noopener noreferrer">{0}</a>"#,
            escape(url)
        ),
        Cell::Link(Some(other)) => escape(other),
        Cell::Link(None) => String::new(),
        Cell::Badge { text, .. } if text.is_empty() => String::new(),
        Cell::Badge { text, color: Some(color) } => format!(
            r#"<span class="badge" style="background:{};color:{}">{}</span>"#,
            color.background,
            color.text,
            escape(text)
        ),
        Cell::Badge { text, color: None } => format!(r#"<span class="badge">{}</span>"#, escape(text)),
        Cell::Date(Some(at)) => at.format("%b %d, %Y").to_string(),
        Cell::Date(None) => "-".to_string(),
    }
}

/// "Showing X to Y of Z results", then prev, numbered pages and next
pub fn pager(base: &str, state: &ListState, pagination: &Pagination) -> String {
    let (first, last) = pagination.item_range();
    let mut html = format!(
        r#"<div class="pager"><p>Showing {} to {} of {} results</p><div>"#,
        first, last, pagination.total
    );

    let link = |page: u32, label: &str, enabled: bool, current: bool| -> String {
        if current {
            format!(r#"<span class="current" aria-current="page">{}</span>"#, label)
        } else if enabled {
            format!(r#"<a href="{}">{}</a>"#, escape(&state.with_page(page).href(base)), label)
        } else {
            format!(r#"<span class="disabled">{}</span>"#, label)
        }
    };

    html.push_str(&link(pagination.page.saturating_sub(1), "&lsaquo; Prev", pagination.has_prev_page, false));
    for page in 1..=pagination.total_pages {
        html.push_str(&link(page, &page.to_string(), true, page == pagination.page));
    }
    html.push_str(&link(pagination.page + 1, "Next &rsaquo;", pagination.has_next_page, false));
    html.push_str("</div></div>");
    html
}
