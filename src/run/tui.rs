use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::store::RecordStore;
use crate::ui::app::App;
use crate::ui::form::FormField;
use crate::ui::render::CHROME_HEIGHT;

pub(crate) fn as_tui(store: &mut RecordStore) -> Result<()> {
    let mut app = App::new(store);
    app.startup(store);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, store);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &mut RecordStore,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(CHROME_HEIGHT) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            handle_key(key, app, store);
        }
    }
    Ok(())
}

// ── Input handling ───────────────────────────────────────────

fn handle_key(key: KeyEvent, app: &mut App, store: &mut RecordStore) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => {
            app.running = false;
        }
        KeyCode::Char('t') if ctrl => {
            app.form.fill_date(chrono::Local::now().date_naive());
        }
        KeyCode::F(1) => {
            app.show_help = true;
        }
        KeyCode::Tab | KeyCode::Down => app.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.form.focus_prev(),
        KeyCode::Enter => app.submit(store),
        KeyCode::Esc => {
            if !app.form.is_empty() {
                app.form.clear();
                app.set_info("Form cleared");
            }
        }
        KeyCode::Left | KeyCode::Right if app.form.focus == FormField::Reimbursed => {
            app.form.toggle_reimbursed();
        }
        KeyCode::Backspace => app.form.pop_char(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Home => app.scroll_to_top(),
        KeyCode::End => app.scroll_to_bottom(),
        KeyCode::Char(c) if !ctrl => app.form.push_char(c),
        _ => {}
    }
}
