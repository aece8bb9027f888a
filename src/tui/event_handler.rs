use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;

use super::app::{App, AppMode, InputTarget, PendingAction, View};
use crate::api::ImageGenerator;
use crate::core::BrandField;

/// Handle input in main mode
pub async fn handle_main_input<G: ImageGenerator>(app: &mut App<G>, key: KeyEvent) -> Result<()> {
    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Tab | KeyCode::Right => app.view = app.view.next(),
        KeyCode::BackTab | KeyCode::Left => app.view = app.view.previous(),

        // Product
        KeyCode::Char('u') => app.enter_input(InputTarget::UploadPath),
        KeyCode::Char(c @ '1'..='9') => {
            let n = c as usize - '0' as usize;
            app.load_sample(n).await;
        }

        // Brand and style
        KeyCode::Char('e') => {
            app.mode = AppMode::Brand;
            app.brand_selected = 0;
            app.brand_editing = false;
            app.clear_messages();
        }
        KeyCode::Char('s') => app.cycle_style(),
        KeyCode::Char('b') => app.toggle_brand_text(),
        KeyCode::Char('m') => app.toggle_mode(),
        KeyCode::Char('O') => app.cycle_overlay_color(),
        KeyCode::Char('y') => app.queue(PendingAction::SuggestStyles),

        // Generation
        KeyCode::Char(' ') if app.view == View::Generate => app.toggle_cursor_asset(),
        KeyCode::Char('g') => app.queue(PendingAction::GenerateAll),

        // Finishing and background edits of the result under the cursor
        KeyCode::Char('o') if app.view == View::Generate => app.toggle_cursor_overlay(),
        KeyCode::Char('a') if app.view == View::Generate => app.cycle_cursor_crop(),
        KeyCode::Char('p') if app.view == View::Generate => app.start_plate_edit(),

        // Results
        KeyCode::Char('w') => match app.view {
            View::Generate => app.save_cursor_result(),
            View::Chat => app.save_chat_result(),
            View::Gallery => app.set_status("Already in the gallery"),
        },
        KeyCode::Enter | KeyCode::Char('c') if app.view == View::Gallery => {
            app.target_selected_for_chat()
        }
        KeyCode::Char('i') if app.view == View::Chat => {
            if app.session.chat_target().is_some() {
                app.enter_input(InputTarget::ChatInstruction);
            } else {
                app.set_error("Select an image in the Gallery first (Enter)");
            }
        }
        KeyCode::Char('d') => app.export_focused().await,
        KeyCode::Char('v') => app.preview_focused(),

        // Session
        KeyCode::Char('x') => app.clear_cache(),
        KeyCode::Char('X') => app.reset(),

        KeyCode::Char('?') => app.mode = AppMode::Help,

        // Quit
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
        }

        _ => {}
    }
    Ok(())
}

fn byte_index(input: &str, char_pos: usize) -> usize {
    input
        .char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(input.len())
}

/// Handle input in text input mode
pub async fn handle_input_mode<G: ImageGenerator>(
    app: &mut App<G>,
    target: InputTarget,
    key: KeyEvent,
) -> Result<()> {
    let len = app.input.chars().count();
    match key.code {
        KeyCode::Esc => {
            app.mode = AppMode::Main;
            app.input.clear();
            app.cursor_pos = 0;
        }

        KeyCode::Enter => {
            let value = app.input.trim().to_string();
            if !value.is_empty() {
                app.input.clear();
                app.cursor_pos = 0;
                app.mode = AppMode::Main;

                let action = match target {
                    InputTarget::UploadPath => PendingAction::Upload(PathBuf::from(value)),
                    InputTarget::ChatInstruction => PendingAction::Chat(value),
                    InputTarget::PlateInstruction(index) => PendingAction::PlateEdit(index, value),
                };
                app.queue(action);
            }
        }

        KeyCode::Tab if target == InputTarget::ChatInstruction => {
            app.cycle_edit_suggestion();
        }

        KeyCode::Char(c) => {
            let at = byte_index(&app.input, app.cursor_pos);
            app.input.insert(at, c);
            app.cursor_pos += 1;
        }

        KeyCode::Backspace => {
            if app.cursor_pos > 0 {
                app.cursor_pos -= 1;
                let at = byte_index(&app.input, app.cursor_pos);
                app.input.remove(at);
            }
        }

        KeyCode::Delete => {
            if app.cursor_pos < len {
                let at = byte_index(&app.input, app.cursor_pos);
                app.input.remove(at);
            }
        }

        KeyCode::Left => {
            if app.cursor_pos > 0 {
                app.cursor_pos -= 1;
            }
        }

        KeyCode::Right => {
            if app.cursor_pos < len {
                app.cursor_pos += 1;
            }
        }

        KeyCode::Home => {
            app.cursor_pos = 0;
        }

        KeyCode::End => {
            app.cursor_pos = len;
        }

        _ => {}
    }
    Ok(())
}

/// Handle input in the brand form
pub fn handle_brand_input<G: ImageGenerator>(app: &mut App<G>, key: KeyEvent) -> Result<()> {
    let fields = BrandField::all();

    if app.brand_editing {
        // Editing a text field
        match key.code {
            KeyCode::Esc => {
                app.brand_editing = false;
                app.brand_edit_buffer.clear();
            }

            KeyCode::Enter => {
                let field = fields[app.brand_selected];
                let value = std::mem::take(&mut app.brand_edit_buffer);
                app.session.brand.set(field, &value);
                app.set_status(format!("Updated {}", field.label()));
                app.brand_editing = false;
            }

            KeyCode::Char(c) => {
                app.brand_edit_buffer.push(c);
            }

            KeyCode::Backspace => {
                app.brand_edit_buffer.pop();
            }

            _ => {}
        }
    } else {
        // Navigation
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if app.brand_selected > 0 {
                    app.brand_selected -= 1;
                }
            }

            KeyCode::Down | KeyCode::Char('j') => {
                if app.brand_selected < fields.len() - 1 {
                    app.brand_selected += 1;
                }
            }

            KeyCode::Enter | KeyCode::Char(' ') => {
                let field = fields[app.brand_selected];
                app.brand_editing = true;
                app.brand_edit_buffer = app.brand_value(field);
            }

            KeyCode::Char('S') => app.save_brand_defaults(),

            KeyCode::Esc | KeyCode::Char('q') => {
                app.mode = AppMode::Main;
                app.clear_messages();
            }

            _ => {}
        }
    }
    Ok(())
}

/// Any key leaves the help screen
pub fn handle_help_input<G: ImageGenerator>(app: &mut App<G>, _key: KeyEvent) -> Result<()> {
    app.mode = AppMode::Main;
    Ok(())
}
