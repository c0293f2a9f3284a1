use crate::backend::{MonthlyProjects, OverviewStats};

use super::escape;

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 240.0;
const CHART_PAD: f64 = 28.0;

pub fn render(stats: Result<&OverviewStats, &str>, monthly: Result<&[MonthlyProjects], &str>) -> String {
    let cards = match stats {
        Ok(stats) => {
            let items = [
                ("Total Users", stats.total_users),
                ("Total Projects", stats.total_projects),
                ("Total Categories", stats.total_categories),
                ("Total Profiles", stats.total_profiles),
            ];
            let cards: String = items
                .iter()
                .map(|(label, value)| format!(r#"<div class="card"><p>{}</p><h2>{}</h2></div>"#, label, value))
                .collect();
            format!(r#"<div class="cards">{}</div>"#, cards)
        }
        Err(message) => format!(r#"<div class="card">{}</div>"#, escape(message)),
    };

    let chart = match monthly {
        Ok(points) => chart(points),
        Err(message) => escape(message),
    };

    format!(
        r#"{}<div class="card"><h3>Monthly Projects</h3><p>Showing total projects for the last 12 months</p>{}</div>"#,
        cards, chart
    )
}

/// Three-letter month label ("January" -> "Jan")
pub fn month_label(month: &str) -> String {
    month.chars().take(3).collect()
}

/// Inline SVG area chart of projects per month
pub fn chart(points: &[MonthlyProjects]) -> String {
    if points.is_empty() {
        return "<p>No project data yet</p>".to_string();
    }

    let max = points.iter().map(|p| p.total_projects).max().unwrap_or(0).max(1) as f64;
    let plot_w = CHART_WIDTH - CHART_PAD * 2.0;
    let plot_h = CHART_HEIGHT - CHART_PAD * 2.0;
    let step = if points.len() > 1 { plot_w / (points.len() - 1) as f64 } else { 0.0 };

    let coords: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = CHART_PAD + step * i as f64;
            let y = CHART_PAD + plot_h - (p.total_projects as f64 / max) * plot_h;
            (x, y)
        })
        .collect();

    let baseline = CHART_PAD + plot_h;
    let line: Vec<String> = coords.iter().map(|(x, y)| format!("{:.1},{:.1}", x, y)).collect();
    let (first_x, _) = coords[0];
    let (last_x, _) = coords[coords.len() - 1];
    let area = format!(
        "M{:.1},{:.1} L{} L{:.1},{:.1} Z",
        first_x,
        baseline,
        line.join(" L"),
        last_x,
        baseline
    );

    let labels: String = points
        .iter()
        .zip(&coords)
        .map(|(p, (x, _))| {
            format!(
                r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle">{}</text>"#,
                x,
                CHART_HEIGHT - 6.0,
                escape(&month_label(&p.month))
            )
        })
        .collect();

    let dots: String = points
        .iter()
        .zip(&coords)
        .map(|(p, (x, y))| {
            format!(
                r#"<circle cx="{:.1}" cy="{:.1}" r="3" fill="{}"><title>{}: {}</title></circle>"#,
                x,
                y,
                "#F59E0B",
                escape(&p.month),
                p.total_projects
            )
        })
        .collect();

    format!(
        r##"<svg viewBox="0 0 {w} {h}" width="100%" role="img" aria-label="Monthly projects"><line x1="{pad}" y1="{base:.1}" x2="{end}" y2="{base:.1}" stroke="#E5E7EB"/><path d="{area}" fill="#FACC15" fill-opacity="0.4" stroke="none"/><polyline points="{line}" fill="none" stroke="#F59E0B" stroke-width="2"/>{dots}{labels}</svg>"##,
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        pad = CHART_PAD,
        end = CHART_WIDTH - CHART_PAD,
        base = baseline,
        area = area,
        line = line.join(" "),
        dots = dots,
        labels = labels,
    )
}
