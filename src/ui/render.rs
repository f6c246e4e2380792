use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use super::app::{App, StatusKind};
use super::form::FormField;
use super::theme;
use super::util::{format_amount, truncate};
use crate::models::Reimbursed;

const LABEL_WIDTH: usize = 20;
const FORM_HEIGHT: u16 = 6;
const TOTALS_HEIGHT: u16 = 3;

/// Rows taken by everything except the table body: title, form, totals,
/// status bar, plus the table's borders and header.
pub(crate) const CHROME_HEIGHT: u16 = 1 + FORM_HEIGHT + TOTALS_HEIGHT + 1 + 3;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Title bar
            Constraint::Length(FORM_HEIGHT),   // Entry form
            Constraint::Min(5),                // Record table
            Constraint::Length(TOTALS_HEIGHT), // Totals
            Constraint::Length(1),             // Status bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0], app);
    render_form(f, chunks[1], app);
    render_table(f, chunks[2], app);
    render_totals(f, chunks[3], app);
    render_status_bar(f, chunks[4], app);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_title_bar(f: &mut Frame, area: Rect, app: &App) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            " Prepaid Ledger ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", app.data_path), theme::dim_style()),
    ]))
    .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(title, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.form;
    let mut lines = Vec::with_capacity(FormField::all().len());
    let mut cursor = None;

    for (row, field) in FormField::all().iter().enumerate() {
        let focused = *field == form.focus;
        let marker = if focused { "›" } else { " " };
        let label = format!("{marker} {:<width$}", field.label(), width = LABEL_WIDTH - 2);
        let label_style = if focused {
            theme::focused_label_style()
        } else {
            theme::dim_style()
        };

        let mut spans = vec![Span::styled(label, label_style)];
        match form.text(*field) {
            Some(text) => {
                spans.push(Span::styled(text.to_string(), theme::input_style(focused)));
                if focused {
                    let col = LABEL_WIDTH + text.chars().count();
                    cursor = Some((area.x + 1 + col as u16, area.y + 1 + row as u16));
                }
            }
            None => {
                for choice in Reimbursed::all() {
                    let selected = *choice == form.reimbursed;
                    let radio = if selected { "(•)" } else { "( )" };
                    let style = match (selected, focused) {
                        (true, true) => theme::focused_label_style(),
                        (true, false) => theme::normal_style(),
                        _ => theme::dim_style(),
                    };
                    spans.push(Span::styled(format!("{radio} {choice}   "), style));
                }
            }
        }
        lines.push(Line::from(spans));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(true))
        .title(Span::styled(
            " New record ",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Span::styled(" Enter add · Esc clear ", theme::dim_style()));
    f.render_widget(Paragraph::new(lines).block(block), area);

    if !app.show_help {
        if let Some(position) = cursor {
            f.set_cursor_position(position);
        }
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(false))
        .title(Span::styled(
            format!(" Records ({}) ", app.records.len()),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    if app.records.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No records yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Fill in the form above and press Enter to add one",
                theme::dim_style(),
            )),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Date"),
        Cell::from("Item"),
        Cell::from(Line::from("Amount").alignment(Alignment::Right)),
        Cell::from(Line::from("Reimbursed").alignment(Alignment::Center)),
    ])
    .style(theme::header_style())
    .height(1);

    let item_width = area.width.saturating_sub(14 + 14 + 12 + 5) as usize;

    let rows: Vec<Row> = app
        .records
        .iter()
        .enumerate()
        .skip(app.table_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, record)| {
            let flag_style = if record.is_reimbursed() {
                theme::reimbursed_style()
            } else {
                theme::outstanding_style()
            };
            let row_style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(record.date.clone()),
                Cell::from(truncate(&record.item, item_width.max(8))),
                Cell::from(Line::from(format!("{:.2}", record.amount)).alignment(Alignment::Right)),
                Cell::from(
                    Line::from(Span::styled(record.reimbursed.to_string(), flag_style))
                        .alignment(Alignment::Center),
                ),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Min(20),
        Constraint::Length(14),
        Constraint::Length(12),
    ];

    f.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

fn render_totals(f: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(format!("{} record(s)", app.records.len()), theme::dim_style()),
        Span::styled("   Outstanding: ", theme::dim_style()),
        Span::styled(format_amount(app.outstanding), theme::outstanding_style()),
        Span::styled("   Total spent: ", theme::normal_style().add_modifier(Modifier::BOLD)),
        Span::styled(format_amount(app.total), theme::total_style()),
        Span::raw(" "),
    ])
    .alignment(Alignment::Right);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(false));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let hints = " Tab field · Enter add · PgUp/PgDn scroll · F1 help · Ctrl-q quit ";

    let (text, style) = match &app.status {
        Some(status) => {
            let style = match status.kind {
                StatusKind::Info => theme::status_bar_style(),
                StatusKind::Success => theme::success_style(),
                StatusKind::Error => theme::error_style(),
            };
            (format!(" {}", status.text), style)
        }
        None => (String::new(), theme::status_bar_style()),
    };

    let available = area.width as usize;
    let room = available.saturating_sub(hints.chars().count());
    let text = truncate(&text, room);
    let pad = room.saturating_sub(text.chars().count());

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(text, style),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(hints, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let entry = |text: &'static str| Line::from(Span::styled(text, theme::normal_style()));

    let help_text = vec![
        Line::from(Span::styled(
            " Prepaid Ledger Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Form"),
        entry("  Tab/Down        Next field            Shift-Tab/Up  Previous field"),
        entry("  Enter           Add record            Esc           Clear form"),
        entry("  Ctrl-t          Today's date          Backspace     Delete character"),
        entry("  y/n/Space       Set reimbursed        Left/Right    Toggle reimbursed"),
        Line::from(""),
        section(" Records"),
        entry("  PgUp/PgDn       Scroll a page         Home/End      First/Last page"),
        Line::from(""),
        section(" General"),
        entry("  F1              Toggle this help      Ctrl-q        Quit"),
        Line::from(""),
        Line::from(Span::styled(
            " Press any key to close ",
            Style::default().fg(theme::TEXT_DIM),
        )),
    ];

    // Center the popup, clamped to terminal height
    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 76.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}
