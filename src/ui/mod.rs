//! Browser front end. Builds the page once, keeps the session in a
//! thread-local and re-renders the dynamic parts after every event.

pub mod confetti;

use std::cell::RefCell;

use chrono::Local;
use log::{error, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement, window};

use crate::config::GameConfig;
use crate::difficulty::Difficulty;
use crate::random::ThreadRandom;
use crate::session::{GameSession, GuessRecord, Status};
use crate::store::LocalStore;

const RESTART_PROMPT: &str = "Restart the game? Your current progress will be lost.";
const EMPTY_HISTORY: &str = "No guesses yet. Make your first guess!";

struct App {
    session: GameSession,
    /// Digits typed but not yet submitted.
    input: String,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app(f: impl FnOnce(&mut App) -> Result<(), JsValue>) {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            if let Err(e) = f(app) {
                error!("ui handler failed: {:?}", e);
            }
        }
    });
}

#[cfg(feature = "serde_json")]
pub(crate) fn snapshot_of<T>(f: impl FnOnce(&GameSession) -> T) -> Option<T> {
    APP.with(|cell| cell.borrow().as_ref().map(|app| f(&app.session)))
}

fn document() -> Result<Document, JsValue> {
    window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn by_id(doc: &Document, id: &str) -> Result<Element, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", id)))
}

fn input_el(doc: &Document) -> Result<HtmlInputElement, JsValue> {
    Ok(by_id(doc, "ng-input")?.dyn_into()?)
}

fn listen(
    target: &Element,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn page_html() -> String {
    let options: String = Difficulty::all()
        .iter()
        .map(|d| format!("<option value='{}'>{}</option>", d.name(), d.label()))
        .collect();
    format!(
        "<header style='text-align:center; margin-bottom:18px;'>\
           <h1 style='margin:0; font-size:34px; letter-spacing:1px;'>NumGuess Pro</h1>\
           <p style='margin:4px 0 0; color:#9aa4b2;'>Guess the secret number, fast and fun</p>\
         </header>\
         <main style='display:flex; flex-wrap:wrap; gap:18px; justify-content:center;'>\
           <section style='{panel} flex:2 1 320px;'>\
             <div style='display:flex; justify-content:space-between;'>\
               <div><div style='{label}'>Attempts</div><div id='ng-attempts' style='{value}'>0</div></div>\
               <div style='text-align:right;'><div style='{label}'>High Score</div><div id='ng-highscore' style='{value}'>—</div></div>\
             </div>\
             <div id='ng-number' aria-live='polite' style='margin:18px auto; width:140px; height:140px; border-radius:50%; display:flex; align-items:center; justify-content:center; font-size:56px; font-weight:700; background:#1f2633; border:3px solid #2e3a4f;'>?</div>\
             <div id='ng-feedback' role='status' style='text-align:center; font-size:20px; min-height:28px;'></div>\
             <div id='ng-hint' role='status' style='display:none; margin:10px 0; padding:8px 12px; border-radius:8px; background:rgba(252,255,66,0.08); border:1px solid #5c5a2a;'>\
               <span id='ng-hint-text'></span>\
               <div id='ng-hint-count' style='font-size:12px; color:#9aa4b2; margin-top:4px;'></div>\
             </div>\
             <div style='display:flex; gap:8px; flex-wrap:wrap; justify-content:center; margin-top:12px;'>\
               <input id='ng-input' inputmode='numeric' aria-label='Enter your guess' autocomplete='off' style='width:120px; font-size:18px; padding:6px 10px; border-radius:6px; border:1px solid #334; background:#0f141c; color:#eee;'>\
               <button id='ng-guess' type='button' style='{button} background:#2f7cf6;'>Guess</button>\
               <button id='ng-restart' type='button' style='{button} background:transparent; border:1px solid #445;'>Restart</button>\
               <button id='ng-hint-btn' type='button' style='{button} display:none; background:#a07a12;'>Get Math Hint</button>\
             </div>\
             <div style='margin-top:14px; text-align:center;'>\
               <label for='ng-difficulty'>Difficulty: </label>\
               <select id='ng-difficulty' style='font-size:15px; padding:4px 6px; border-radius:6px;'>{options}</select>\
             </div>\
           </section>\
           <aside style='{panel} flex:1 1 220px;'>\
             <h2 style='margin-top:0; font-size:20px;'>Guess History</h2>\
             <div id='ng-history'></div>\
           </aside>\
         </main>",
        panel = "background:#161b24; border:1px solid #252d3b; border-radius:14px; padding:18px;",
        label = "font-size:12px; text-transform:uppercase; color:#9aa4b2;",
        value = "font-size:28px; font-weight:700;",
        button = "font-size:16px; padding:6px 14px; border-radius:6px; border:none; color:#fff; cursor:pointer;",
        options = options,
    )
}

fn feedback_color(status: Status, feedback: &str) -> &'static str {
    if status == Status::Won {
        "#58d68d"
    } else if feedback.contains("High") {
        "#ff7a59"
    } else if feedback.contains("Low") {
        "#5ab0ff"
    } else {
        "#c8d0dc"
    }
}

fn history_html(history: &[GuessRecord]) -> String {
    if history.is_empty() {
        return format!("<div style='color:#9aa4b2;'>{}</div>", EMPTY_HISTORY);
    }
    let items: String = history
        .iter()
        .map(|r| {
            format!(
                "<li style='display:flex; justify-content:space-between; padding:4px 0; border-bottom:1px solid #222a36;'>\
                   <span style='font-weight:700;'>{}</span><span style='color:#9aa4b2;'>{}</span></li>",
                r.value,
                r.time.with_timezone(&Local).format("%H:%M:%S")
            )
        })
        .collect();
    format!(
        "<ul aria-label='Guess history' style='list-style:none; margin:0; padding:0;'>{}</ul>",
        items
    )
}

fn show(el: &Element, visible: bool, display: &str) -> Result<(), JsValue> {
    let style = el.get_attribute("style").unwrap_or_default();
    let stripped: String = style
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty() && !part.starts_with("display:"))
        .map(|part| format!("{};", part))
        .collect::<Vec<_>>()
        .join(" ");
    let display = if visible { display } else { "none" };
    el.set_attribute("style", &format!("{} display:{};", stripped, display))
}

fn render(app: &App) -> Result<(), JsValue> {
    let doc = document()?;
    let s = app.session.snapshot();

    by_id(&doc, "ng-attempts")?.set_text_content(Some(&s.attempts.to_string()));
    let best = s
        .high_score
        .map(|v| v.to_string())
        .unwrap_or_else(|| "—".to_string());
    by_id(&doc, "ng-highscore")?.set_text_content(Some(&best));

    let shown = if app.input.is_empty() { "?" } else { app.input.as_str() };
    by_id(&doc, "ng-number")?.set_text_content(Some(shown));

    let feedback = by_id(&doc, "ng-feedback")?;
    feedback.set_text_content(Some(&s.feedback));
    feedback.set_attribute(
        "style",
        &format!(
            "text-align:center; font-size:20px; min-height:28px; color:{};",
            feedback_color(s.status, &s.feedback)
        ),
    )?;

    let hint = by_id(&doc, "ng-hint")?;
    match &s.current_hint {
        Some(text) => {
            by_id(&doc, "ng-hint-text")?.set_text_content(Some(&format!("💡 Hint: {}", text)));
            by_id(&doc, "ng-hint-count")?
                .set_text_content(Some(&format!("Hints used: {}", s.hints_used)));
            show(&hint, true, "block")?;
        }
        None => show(&hint, false, "block")?,
    }
    show(&by_id(&doc, "ng-hint-btn")?, s.hint_available, "inline-block")?;

    let input = input_el(&doc)?;
    input.set_value(&app.input);
    input.set_max_length(s.max_number.to_string().len() as i32);
    input.set_placeholder(&format!("Enter 1-{}", s.max_number));

    let select: HtmlSelectElement = by_id(&doc, "ng-difficulty")?.dyn_into()?;
    select.set_value(s.difficulty.name());

    by_id(&doc, "ng-history")?.set_inner_html(&history_html(&s.guess_history));
    Ok(())
}

fn focus_input() {
    if let Ok(input) = document().and_then(|d| input_el(&d)) {
        let _ = input.focus();
    }
}

fn submit(app: &mut App) -> Result<(), JsValue> {
    let raw = app.input.clone();
    // a rejected guess keeps the input; its message is already the feedback
    if let Ok(outcome) = app.session.submit_guess(&raw) {
        app.input.clear();
        if outcome.is_win() {
            confetti::celebrate()?;
        }
    }
    render(app)?;
    focus_input();
    Ok(())
}

fn wire_events(doc: &Document) -> Result<(), JsValue> {
    let input = by_id(doc, "ng-input")?;
    listen(&input, "input", |evt| {
        let Some(target) = evt
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        with_app(|app| {
            let max_len = app.session.max_number().to_string().len();
            let digits: String = target
                .value()
                .chars()
                .filter(|c| c.is_ascii_digit())
                .take(max_len)
                .collect();
            app.input = digits;
            render(app)
        });
    })?;

    listen(&input, "keydown", |evt| {
        let Some(key) = evt.dyn_ref::<web_sys::KeyboardEvent>().map(|k| k.key()) else {
            return;
        };
        if key == "Enter" {
            evt.prevent_default();
            with_app(submit);
        }
    })?;

    listen(&by_id(doc, "ng-guess")?, "click", |_| with_app(submit))?;

    listen(&by_id(doc, "ng-restart")?, "click", |_| {
        let confirmed = window()
            .and_then(|w| w.confirm_with_message(RESTART_PROMPT).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        with_app(|app| {
            app.session.restart();
            app.input.clear();
            render(app)?;
            focus_input();
            Ok(())
        });
    })?;

    listen(&by_id(doc, "ng-hint-btn")?, "click", |_| {
        with_app(|app| {
            app.session.request_hint();
            render(app)
        });
    })?;

    listen(&by_id(doc, "ng-difficulty")?, "change", |evt| {
        let Some(value) = evt
            .target()
            .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
            .map(|s| s.value())
        else {
            return;
        };
        with_app(|app| {
            match value.parse::<Difficulty>() {
                Ok(d) => {
                    app.session.change_difficulty(d);
                    app.input.clear();
                    info!("difficulty changed to {}", d);
                }
                Err(e) => error!("{}", e),
            }
            render(app)?;
            focus_input();
            Ok(())
        });
    })?;
    Ok(())
}

/// Builds the page under `#ng-root` (created if missing) and starts a session.
pub fn mount(config: GameConfig) -> Result<(), JsValue> {
    crate::logging::init(config.log_level());
    let doc = document()?;

    let root = match doc.get_element_by_id("ng-root") {
        Some(el) => el,
        None => {
            let el = doc.create_element("div")?;
            el.set_id("ng-root");
            el.set_attribute(
                "style",
                "max-width:880px; margin:32px auto; padding:0 16px; font-family:'Fira Code', system-ui, sans-serif; color:#e6ebf2;",
            )?;
            doc.body()
                .ok_or_else(|| JsValue::from_str("no body"))?
                .append_child(&el)?;
            el
        }
    };
    root.set_inner_html(&page_html());

    let session = GameSession::new(config, Box::new(ThreadRandom::new()), Box::new(LocalStore));
    info!("NumGuess started at {}", session.difficulty());
    let app = App {
        session,
        input: String::new(),
    };
    render(&app)?;
    APP.with(|cell| cell.replace(Some(app)));

    wire_events(&doc)?;
    focus_input();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn empty_history_shows_prompt() {
        assert!(history_html(&[]).contains(EMPTY_HISTORY));
    }

    #[test]
    fn history_lists_every_guess() {
        let records = vec![
            GuessRecord { value: 77, time: Utc::now() },
            GuessRecord { value: 12, time: Utc::now() },
        ];
        let html = history_html(&records);
        assert_eq!(html.matches("<li").count(), 2);
        assert!(html.find(">77<").unwrap() < html.find(">12<").unwrap());
    }

    #[test]
    fn feedback_colors_by_direction() {
        assert_eq!(feedback_color(Status::Won, "Correct! It was 3"), "#58d68d");
        assert_eq!(feedback_color(Status::Playing, "Too High!"), "#ff7a59");
        assert_eq!(feedback_color(Status::Playing, "Too Low!"), "#5ab0ff");
        assert_eq!(feedback_color(Status::Playing, "Make a guess..."), "#c8d0dc");
    }

    #[test]
    fn selector_lists_all_difficulties() {
        let html = page_html();
        for d in Difficulty::all() {
            assert!(html.contains(&d.label()));
        }
    }
}
