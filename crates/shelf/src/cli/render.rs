//! # Rendering
//!
//! Turns a [`CmdResult`] into terminal text. Everything here is a pure
//! function from data to `String`; printing happens in `commands.rs`.
//!
//! ## Layouts
//!
//! - **grid**: one card per record, as many cards per line as the terminal
//!   width allows
//! - **list**: a table with one row per record
//!
//! Both mark selected records with `[x]`. Column widths are measured with
//! `unicode-width` on the plain text, then styles are applied, so alignment
//! survives wide characters and escape codes.

use super::styles;
use shelfapp::aggregate::Metric;
use shelfapp::commands::{CmdMessage, CmdResult, ListedRow, Listing, MessageLevel};
use shelfapp::reports::Report;
use shelfapp::search::{RecentSearch, SearchHit, SearchType};
use shelfapp::view::Layout;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const CARD_WIDTH: usize = 36;
const CARD_GAP: usize = 2;
const MAX_COLUMN: usize = 28;
const BAR_WIDTH: usize = 20;

/// Width of the terminal, or [`LINE_WIDTH`] when it cannot be told.
pub fn terminal_width() -> usize {
    console::Term::stdout()
        .size_checked()
        .map(|(_, cols)| cols as usize)
        .unwrap_or(LINE_WIDTH)
}

/// Cut `text` to `width` columns, ending in "…" when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Truncate and right-pad to exactly `width` columns.
pub fn pad(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    let fill = width.saturating_sub(cut.width());
    format!("{}{}", cut, " ".repeat(fill))
}

fn marker(selected: bool) -> String {
    if selected {
        styles::SELECTED.apply_to("[x]").to_string()
    } else {
        styles::FAINT.apply_to("[ ]").to_string()
    }
}

pub fn render_result(result: &CmdResult, width: usize) -> String {
    let mut out = String::new();

    if let Some(listing) = &result.listing {
        out.push_str(&render_listing(listing, width));
        if !result.metrics.is_empty() {
            out.push_str(&render_metric_line(&result.metrics));
        }
    } else if !result.metrics.is_empty() {
        out.push_str(&render_metrics(&result.metrics));
    }
    if !result.facets.is_empty() {
        out.push_str(&render_facets(&result.facets));
    }
    if !result.hits.is_empty() {
        out.push_str(&render_hits(&result.hits));
    }
    if !result.recent.is_empty() {
        out.push_str(&render_recent(&result.recent));
    }
    if let Some(report) = &result.report {
        out.push_str(&render_report(report));
    }
    if !result.entries.is_empty() {
        out.push_str(&render_entries(&result.entries));
    }
    out.push_str(&render_messages(&result.messages));
    out
}

pub fn render_listing(listing: &Listing, width: usize) -> String {
    if listing.rows.is_empty() {
        return String::new();
    }
    match listing.layout {
        Layout::List => render_table(listing),
        Layout::Grid => render_grid(&listing.rows, width),
    }
}

fn render_table(listing: &Listing) -> String {
    let mut widths: Vec<usize> = listing.columns.iter().map(|c| c.width()).collect();
    for row in &listing.rows {
        for (i, cell) in row.cells.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.width()).min(MAX_COLUMN);
            }
        }
    }

    let mut out = String::new();
    let header: Vec<String> = listing
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| styles::HEADER.apply_to(pad(c, *w)).to_string())
        .collect();
    out.push_str(&format!("    {}\n", header.join("  ")));

    for row in &listing.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect();
        out.push_str(&format!("{} {}\n", marker(row.selected), cells.join("  ").trim_end()));
    }
    out
}

fn card_lines(row: &ListedRow) -> Vec<String> {
    let inner = CARD_WIDTH - 4;
    let card = &row.card;
    let mut lines = vec![
        format!(
            "{} {}",
            marker(row.selected),
            styles::TITLE.apply_to(pad(&card.title, inner))
        ),
        format!("    {}", styles::MUTED.apply_to(pad(&card.subtitle, inner))),
        format!("    {}", styles::badge(&card.badge).apply_to(pad(&card.badge, inner))),
    ];
    for detail in &card.details {
        lines.push(format!("    {}", styles::MUTED.apply_to(pad(detail, inner))));
    }
    lines
}

fn render_grid(rows: &[ListedRow], width: usize) -> String {
    let per_line = (width / (CARD_WIDTH + CARD_GAP)).max(1);
    let gap = " ".repeat(CARD_GAP);
    let blank = " ".repeat(CARD_WIDTH);
    let mut out = String::new();

    for (n, chunk) in rows.chunks(per_line).enumerate() {
        if n > 0 {
            out.push('\n');
        }
        let cards: Vec<Vec<String>> = chunk.iter().map(card_lines).collect();
        let height = cards.iter().map(Vec::len).max().unwrap_or(0);
        for i in 0..height {
            let line: Vec<&str> = cards
                .iter()
                .map(|c| c.get(i).map(String::as_str).unwrap_or(blank.as_str()))
                .collect();
            out.push_str(line.join(gap.as_str()).trim_end());
            out.push('\n');
        }
    }
    out
}

/// Metrics on one line, under a listing.
fn render_metric_line(metrics: &[Metric]) -> String {
    let parts: Vec<String> = metrics
        .iter()
        .map(|m| {
            format!(
                "{} {}",
                styles::MUTED.apply_to(m.label),
                styles::VALUE.apply_to(&m.value)
            )
        })
        .collect();
    format!("\n{}\n", parts.join("   "))
}

pub fn render_metrics(metrics: &[Metric]) -> String {
    let label_width = metrics.iter().map(|m| m.label.width()).max().unwrap_or(0);
    metrics
        .iter()
        .map(|m| {
            format!(
                "{}  {}\n",
                styles::MUTED.apply_to(pad(m.label, label_width)),
                styles::VALUE.apply_to(&m.value)
            )
        })
        .collect()
}

fn render_facets(facets: &[(String, Vec<String>)]) -> String {
    facets
        .iter()
        .map(|(name, options)| {
            format!("{}: {}\n", styles::TITLE.apply_to(name), options.join(", "))
        })
        .collect()
}

fn category_title(category: SearchType) -> &'static str {
    match category {
        SearchType::Books => "Books",
        SearchType::Members => "Members",
        SearchType::Ebooks => "E-books",
        SearchType::Reservations => "Reservations",
        SearchType::All => "Results",
    }
}

fn render_hits(hits: &[SearchHit]) -> String {
    let mut out = String::new();
    let mut current: Option<SearchType> = None;
    for hit in hits {
        if current != Some(hit.category) {
            if current.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("{}\n", styles::HEADER.apply_to(category_title(hit.category))));
            current = Some(hit.category);
        }
        let status = hit
            .status
            .as_deref()
            .map(|s| format!("  {}", styles::badge(s).apply_to(s)))
            .unwrap_or_default();
        out.push_str(&format!(
            "  {}  {}{}\n",
            pad(&hit.title, MAX_COLUMN),
            styles::MUTED.apply_to(&hit.detail),
            status
        ));
    }
    out
}

fn render_recent(recent: &[RecentSearch]) -> String {
    let mut out = format!("{}\n", styles::HEADER.apply_to("Recent searches"));
    for r in recent {
        let noun = if r.count == 1 { "result" } else { "results" };
        out.push_str(&format!(
            "  {}  {}\n",
            r.term,
            styles::MUTED.apply_to(format!("({}, {} {})", r.search_type, r.count, noun))
        ));
    }
    out
}

fn bar(share: f64) -> String {
    let filled = ((share / 100.0) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled.min(BAR_WIDTH))
}

pub fn render_report(report: &Report) -> String {
    let mut out = format!(
        "{}  {}\n{}\n\n",
        styles::TITLE.apply_to(&report.title),
        styles::MUTED.apply_to(&report.period.label),
        styles::FAINT.apply_to(format!(
            "generated {}",
            report
                .generated_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
        ))
    );
    out.push_str(&render_metrics(&report.metrics));
    for chart in &report.charts {
        out.push_str(&format!("\n{}\n", styles::HEADER.apply_to(&chart.title)));
        if chart.points.is_empty() {
            out.push_str(&format!("  {}\n", styles::MUTED.apply_to("no data")));
        }
        for point in &chart.points {
            out.push_str(&format!(
                "  {}  {:>8}  {:>5.1}%  {}\n",
                pad(&point.label, 24),
                format_number(point.value),
                point.share,
                styles::VALUE.apply_to(bar(point.share))
            ));
        }
    }
    out
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn render_entries(entries: &[(String, String)]) -> String {
    let key_width = entries.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
    entries
        .iter()
        .map(|(k, v)| format!("{}  {}\n", styles::MUTED.apply_to(pad(k, key_width)), v))
        .collect()
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    messages
        .iter()
        .map(|m| {
            let style = match m.level {
                MessageLevel::Info => &*styles::INFO,
                MessageLevel::Success => &*styles::SUCCESS,
                MessageLevel::Warning => &*styles::WARNING,
                MessageLevel::Error => &*styles::ERROR,
            };
            format!("{}\n", style.apply_to(&m.content))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;
    use shelfapp::commands::ViewQuery;
    use shelfapp::store::fixtures::sample_fines;
    use shelfapp::view::SelectionPolicy;

    fn fines_listing(layout: Layout, selected: &[u32]) -> Listing {
        let result = shelfapp::commands::list::run(
            sample_fines(),
            &ViewQuery::new().layout(layout),
            selected,
            SelectionPolicy::Sticky,
            Layout::Grid,
        )
        .unwrap();
        result.listing.unwrap()
    }

    #[test]
    fn truncate_respects_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("The Great Gatsby", 8), "The Gre…");
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(truncate("日本語の本", 5), "日本…");
    }

    #[test]
    fn table_has_header_and_markers() {
        let text = render_listing(&fines_listing(Layout::List, &[2]), 120);
        let plain = strip_ansi_codes(&text);
        let lines: Vec<&str> = plain.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].contains("Member"));
        assert!(lines[2].starts_with("[x]"));
        assert!(lines[1].starts_with("[ ]"));
    }

    #[test]
    fn grid_places_cards_side_by_side() {
        let text = render_listing(&fines_listing(Layout::Grid, &[]), 80);
        let plain = strip_ansi_codes(&text);
        let first = plain.lines().next().unwrap();
        assert!(first.contains("#1 John Doe"));
        assert!(first.contains("#2 Jane Smith"));
        assert!(!first.contains("#3"));
    }

    #[test]
    fn narrow_terminal_gets_one_card_per_line() {
        let text = render_listing(&fines_listing(Layout::Grid, &[]), 20);
        let plain = strip_ansi_codes(&text);
        assert!(!plain.lines().any(|l| l.contains("#1") && l.contains("#2")));
    }

    #[test]
    fn messages_keep_their_text() {
        let text = render_messages(&[
            CmdMessage::success("Waiving 2 fines"),
            CmdMessage::warning("careful"),
        ]);
        assert_eq!(strip_ansi_codes(&text), "Waiving 2 fines\ncareful\n");
    }

    #[test]
    fn bars_scale_with_share() {
        assert_eq!(bar(0.0), "");
        assert_eq!(bar(50.0), "#".repeat(10));
        assert_eq!(bar(100.0), "#".repeat(20));
    }
}
