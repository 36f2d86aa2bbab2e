mod audio;
mod cliqueur;
mod input;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use audio::{BackgroundMusic, HtmlAudioPlayer};
use cliqueur::config::EngineConfig;
use cliqueur::engine::GameEngine;
use cliqueur::store::{LocalStorageStore, STORAGE_KEY};
use cliqueur::CliqueurGame;
use input::{pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};

type Game = CliqueurGame<LocalStorageStore, HtmlAudioPlayer>;

const MUSIC_SRC: &str = "background_music.mp3";

/// Optional localStorage key holding a JSON override of the game rules.
const CONFIG_KEY: &str = "game_config";

/// Query the grid container's bounding rect and convert pixel coordinates to a cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_x = mouse_x as f64 - rect.left();
    let click_y = mouse_y as f64 - rect.top();

    let col = pixel_x_to_col(click_x, rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(click_y, rect.height(), cs.terminal_rows)?;
    log::debug!("click: col={col}, row={row}, targets={}", cs.targets.len());
    Some((col, row))
}

/// Rule override stored under [`CONFIG_KEY`], if present and valid.
fn load_config_override() -> Option<EngineConfig> {
    let json = web_sys::window()?
        .local_storage()
        .ok()??
        .get_item(CONFIG_KEY)
        .ok()??;
    match EngineConfig::from_json(&json) {
        Ok(config) => {
            log::info!("using rule override from '{CONFIG_KEY}'");
            Some(config)
        }
        Err(e) => {
            log::warn!("ignoring invalid '{CONFIG_KEY}': {e}");
            None
        }
    }
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Pause the music while the tab is hidden and free it when the page goes away.
fn install_lifecycle_handlers(game: &Rc<RefCell<Game>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    {
        let game = game.clone();
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = doc.visibility_state() == web_sys::VisibilityState::Hidden;
            game.borrow_mut().set_hidden(hidden);
        });
        if let Err(e) = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())
        {
            log::warn!("visibilitychange listener not installed: {e:?}");
        }
        closure.forget();
    }

    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().release_music();
        });
        if let Err(e) =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())
        {
            log::warn!("pagehide listener not installed: {e:?}");
        }
        closure.forget();
    }
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger init failed: {e}").into());
    }

    let store = LocalStorageStore::open(STORAGE_KEY);
    let engine = match load_config_override() {
        Some(config) => GameEngine::with_config(store, config),
        None => GameEngine::load(store),
    };
    let music = BackgroundMusic::new(HtmlAudioPlayer::new(MUSIC_SRC));
    let game = Rc::new(RefCell::new(CliqueurGame::new(engine, music)));
    let click_state = Rc::new(RefCell::new(ClickState::new()));

    install_lifecycle_handlers(&game);

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }

            let action = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs)
                .and_then(|(col, row)| cs.hit_test(col, row));
            drop(cs);

            if let Some(action_id) = action {
                game.borrow_mut().handle_input(&InputEvent::Click(action_id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            let event = match key_event.code {
                KeyCode::Char(c) => InputEvent::Key(c.to_ascii_lowercase()),
                KeyCode::Enter => InputEvent::Key('\n'),
                KeyCode::Esc => InputEvent::Cancel,
                _ => return,
            };
            game.borrow_mut().handle_input(&event);
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let size = f.area();

            // Update terminal dimensions and clear click targets
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            let mut g = game.borrow_mut();
            g.advance(now_ms());
            g.render(f, size, &click_state);
        }
    });

    Ok(())
}
