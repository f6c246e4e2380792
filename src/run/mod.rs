mod cli;
mod tui;

pub(crate) use cli::{as_cli, extract_file_flag};
pub(crate) use tui::as_tui;
