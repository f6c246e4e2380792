use ratatui::style::{Color, Modifier, Style};

pub(crate) const HEADER_BG: Color = Color::Rgb(30, 30, 46);
pub(crate) const HEADER_FG: Color = Color::Rgb(205, 214, 244);
pub(crate) const ACCENT: Color = Color::Rgb(137, 180, 250);
pub(crate) const GREEN: Color = Color::Rgb(166, 227, 161);
pub(crate) const RED: Color = Color::Rgb(243, 139, 168);
pub(crate) const YELLOW: Color = Color::Rgb(249, 226, 175);
pub(crate) const SURFACE: Color = Color::Rgb(49, 50, 68);
pub(crate) const TEXT: Color = Color::Rgb(205, 214, 244);
pub(crate) const TEXT_DIM: Color = Color::Rgb(127, 132, 156);
pub(crate) const OVERLAY: Color = Color::Rgb(69, 71, 90);
pub(crate) const COMMAND_BG: Color = Color::Rgb(24, 24, 37);

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(HEADER_FG)
        .bg(HEADER_BG)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn normal_style() -> Style {
    Style::default().fg(TEXT)
}

pub(crate) fn dim_style() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub(crate) fn alt_row_style() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub(crate) fn focused_label_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub(crate) fn input_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(TEXT).bg(SURFACE)
    } else {
        normal_style()
    }
}

pub(crate) fn reimbursed_style() -> Style {
    Style::default().fg(GREEN)
}

pub(crate) fn outstanding_style() -> Style {
    Style::default().fg(YELLOW)
}

pub(crate) fn total_style() -> Style {
    Style::default().fg(RED).add_modifier(Modifier::BOLD)
}

pub(crate) fn success_style() -> Style {
    Style::default().fg(GREEN).bg(COMMAND_BG)
}

pub(crate) fn error_style() -> Style {
    Style::default()
        .fg(RED)
        .bg(COMMAND_BG)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn status_bar_style() -> Style {
    Style::default().fg(TEXT_DIM).bg(COMMAND_BG)
}

pub(crate) fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(OVERLAY)
    }
}
