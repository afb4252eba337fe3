//! Interactive terminal shell
//!
//! Reads one line at a time from stdin, turns it into a [`Command`] for the
//! active screen, applies it to the [`Core`], and redraws whenever the state
//! changes. Timer ticks and dictation results redraw too, since they publish
//! through the same update channel.

use std::io::{self, Write};

use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use crate::catalog::Fact;
use crate::content::{self, Card};
use crate::models::{Core, DictationOutcome, Snapshot, View};
use crate::notes::Note;
use crate::timer::{format_clock, TimerPhase};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// One user action, already resolved against the active screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(View),
    Back,
    Quit,
    ToggleTimer,
    ToggleSound,
    AnotherFact,
    DraftLine(String),
    SaveNote,
    Dictate,
    /// 1-based position in the list as shown
    DeleteNote(usize),
    ClearDraft,
    /// Blank input; redraw only
    Nothing,
    Unknown(String),
}

/// Parses a line of input for the screen currently shown
pub fn parse(view: View, line: &str) -> Command {
    let input = line.trim();

    match view {
        // Any input at all leaves the blackout screen
        View::Blackout => Command::Back,
        View::Notes => parse_notes(line),
        _ if input.is_empty() => Command::Nothing,
        View::Home => match input {
            "q" | "quit" => Command::Quit,
            key => match content::menu_entry(key) {
                Some(entry) => Command::Open(entry.view),
                None => Command::Unknown(key.to_string()),
            },
        },
        _ => match (view, input) {
            (_, "b" | "back") => Command::Back,
            (_, "q" | "quit") => Command::Quit,
            (View::Rest, "s") => Command::ToggleTimer,
            (View::Rest, "m") => Command::ToggleSound,
            (View::Facts, "n") => Command::AnotherFact,
            (_, other) => Command::Unknown(other.to_string()),
        },
    }
}

fn parse_notes(line: &str) -> Command {
    let input = line.trim();
    if input.is_empty() {
        return Command::Nothing;
    }
    if !input.starts_with('/') {
        return Command::DraftLine(line.trim_end().to_string());
    }

    let mut parts = input.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("/save"), None) => Command::SaveNote,
        (Some("/dictate"), None) => Command::Dictate,
        (Some("/clear"), None) => Command::ClearDraft,
        (Some("/back"), None) => Command::Back,
        (Some("/quit"), None) => Command::Quit,
        (Some("/delete"), Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Command::DeleteNote(n),
            _ => Command::Unknown(input.to_string()),
        },
        _ => Command::Unknown(input.to_string()),
    }
}

/// What the loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Keep going, optionally showing a one-line notice
    Continue(Option<String>),
    Quit,
}

/// Applies a command to the core
pub fn apply(core: &Core, command: Command) -> Step {
    let notice = match command {
        Command::Quit => return Step::Quit,
        Command::Open(view) => {
            core.navigate(view);
            None
        }
        Command::Back => {
            core.back();
            None
        }
        Command::ToggleTimer => {
            core.toggle_timer();
            None
        }
        Command::ToggleSound => {
            core.toggle_sound();
            None
        }
        Command::AnotherFact => {
            core.next_fact();
            None
        }
        Command::DraftLine(line) => {
            core.push_draft_line(&line);
            None
        }
        Command::ClearDraft => {
            core.clear_draft();
            None
        }
        Command::SaveNote => match core.save_draft() {
            Ok(_) => None,
            Err(e) => Some(format!("Could not save notes: {}", e)),
        },
        Command::DeleteNote(position) => delete_at(core, position),
        Command::Dictate => match core.toggle_dictation() {
            DictationOutcome::Unsupported => Some(content::DICTATION_UNSUPPORTED.to_string()),
            _ => None,
        },
        Command::Nothing => None,
        Command::Unknown(input) => Some(format!("Unknown command: {}", input)),
    };

    Step::Continue(notice)
}

fn delete_at(core: &Core, position: usize) -> Option<String> {
    let id = match core.snapshot() {
        Snapshot::Notes { notes, .. } => position
            .checked_sub(1)
            .and_then(|index| notes.get(index))
            .map(Note::id),
        _ => None,
    };

    let Some(id) = id else {
        return Some(format!("No note {}", position));
    };
    match core.remove_note(id) {
        Ok(_) => None,
        Err(e) => Some(format!("Could not save notes: {}", e)),
    }
}

/// Runs the shell until the user quits or stdin closes
pub async fn run(core: Core) -> io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut updates = core.subscribe();
    let mut notice: Option<String> = None;

    draw(&core.snapshot(), notice.as_deref())?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed");
                    break;
                };

                match apply(&core, parse(core.view(), &line)) {
                    Step::Quit => break,
                    Step::Continue(next) => notice = next,
                }
                draw(&core.snapshot(), notice.as_deref())?;
            }
            update = updates.recv() => match update {
                Ok(()) => draw(&core.snapshot(), notice.as_deref())?,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::trace!("Skipped {} redraws", skipped);
                    draw(&core.snapshot(), notice.as_deref())?;
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    // Leave on a clean screen so no note text lingers in the terminal
    core.back();
    let mut out = io::stdout().lock();
    write!(out, "{}", CLEAR_SCREEN)?;
    out.flush()
}

fn draw(snapshot: &Snapshot, notice: Option<&str>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "{}", render(snapshot, notice))?;
    out.flush()
}

/// The full screen for `snapshot`: clear, body, notice, and key hints
pub fn render(snapshot: &Snapshot, notice: Option<&str>) -> String {
    let mut screen = String::from(CLEAR_SCREEN);

    if let Snapshot::Blackout = snapshot {
        // Nothing but the exit hint
        screen.push_str(&format!("\n\n\n{}\n", content::BLACKOUT_HINT.dimmed()));
        return screen;
    }

    screen.push_str(&render_body(snapshot));
    if let Some(notice) = notice {
        screen.push_str(&format!("\n{}\n", notice.yellow()));
    }
    screen.push_str(&format!("\n{}\n> ", hints(snapshot).dimmed()));
    screen
}

/// The screen content without terminal control, for one-shot printing
pub fn render_body(snapshot: &Snapshot) -> String {
    let view = snapshot.view();
    let mut body = String::new();

    if view != View::Home && view != View::Blackout {
        body.push_str(&format!("{}\n\n", content::title(view).bold()));
    }

    match snapshot {
        Snapshot::Home => render_home(&mut body),
        Snapshot::Blackout => body.push_str(content::BLACKOUT_HINT),
        Snapshot::Rest {
            remaining,
            phase,
            sound_enabled,
        } => render_rest(&mut body, *remaining, *phase, *sound_enabled),
        Snapshot::Fuel => {
            render_card(&mut body, &content::HYDRATION);
            body.push('\n');
            render_card(&mut body, &content::PROTEIN);
        }
        Snapshot::Facts(fact) => render_fact(&mut body, fact),
        Snapshot::Pacing => render_pacing(&mut body),
        Snapshot::Notes {
            notes,
            draft,
            listening,
        } => render_notes(&mut body, notes, draft, *listening),
    }

    body
}

fn render_home(body: &mut String) {
    body.push_str(&format!("{}\n", content::APP_TITLE.bold()));
    body.push_str(&format!("{}\n\n", content::TAGLINE.dimmed()));

    for entry in content::HOME_MENU {
        match entry.caption {
            Some(caption) => body.push_str(&format!(
                "  [{}] {}  {}\n",
                entry.key,
                entry.label.bold(),
                caption.dimmed()
            )),
            None => body.push_str(&format!("  [{}] {}\n", entry.key, entry.label.bold())),
        }
    }

    body.push_str(&format!("\n{}\n", content::PRIVACY_NOTICE.green()));
}

fn render_rest(body: &mut String, remaining: u32, phase: TimerPhase, sound_enabled: bool) {
    render_card(body, &content::REST_INSTRUCTIONS);

    body.push_str(&format!("\n    {}\n\n", format_clock(remaining).bold()));

    let status = match phase {
        TimerPhase::Ready => content::REST_IDLE.normal(),
        TimerPhase::Running => content::REST_RUNNING.cyan(),
        TimerPhase::Paused => content::REST_PAUSED.normal(),
        TimerPhase::Expired => content::REST_COMPLETE.green(),
    };
    body.push_str(&format!("{}\n", status));

    let sound = if sound_enabled {
        content::SOUND_ON
    } else {
        content::SOUND_OFF
    };
    body.push_str(&format!("{}\n", sound.dimmed()));
}

fn render_card(body: &mut String, card: &Card) {
    body.push_str(&format!("{}\n", card.heading.bold()));
    for line in card.lines {
        body.push_str(&format!("  {}\n", line));
    }
}

fn render_fact(body: &mut String, fact: &Fact) {
    body.push_str(&format!("{}\n", fact.category.cyan()));
    body.push_str(&format!("\"{}\"\n", fact.text));
}

fn render_pacing(body: &mut String) {
    render_card(body, &content::PACING_RULE);
    body.push('\n');
    for example in content::PACING_EXAMPLES {
        body.push_str(&format!("  {} {}\n", example.situation.bold(), example.advice));
    }
}

fn render_notes(body: &mut String, notes: &[Note], draft: &str, listening: bool) {
    if draft.is_empty() {
        body.push_str(&format!("{}\n", content::NOTES_PLACEHOLDER.dimmed()));
    } else {
        for line in draft.lines() {
            body.push_str(&format!("| {}\n", line));
        }
    }

    if listening {
        body.push_str(&format!("{}\n", content::LISTENING.red()));
    }
    body.push('\n');

    for (position, note) in notes.iter().enumerate() {
        let mut lines = note.text().lines();
        let first = lines.next().unwrap_or_default();
        body.push_str(&format!("{:>3}. {}\n", position + 1, first));
        for line in lines {
            body.push_str(&format!("     {}\n", line));
        }
    }
}

fn hints(snapshot: &Snapshot) -> String {
    match snapshot {
        Snapshot::Home => "1-6 open a screen, q quit".to_string(),
        Snapshot::Blackout => String::new(),
        Snapshot::Rest { phase, .. } => match phase {
            TimerPhase::Expired => "m sound, b back".to_string(),
            _ => "s start/pause, m sound, b back".to_string(),
        },
        Snapshot::Facts(_) => format!("n {}, b back", content::FACTS_ANOTHER),
        Snapshot::Notes { listening, .. } => {
            let dictate = if *listening {
                "/dictate stop"
            } else {
                "/dictate"
            };
            format!(
                "type to add to the draft, /save, {}, /delete N, /clear, /back",
                dictate
            )
        }
        _ => "b back".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FACTS;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_home() {
        assert_eq!(parse(View::Home, "1"), Command::Open(View::Blackout));
        assert_eq!(parse(View::Home, " 6 "), Command::Open(View::Notes));
        assert_eq!(parse(View::Home, "q"), Command::Quit);
        assert_eq!(parse(View::Home, ""), Command::Nothing);
        assert_eq!(parse(View::Home, "9"), Command::Unknown("9".to_string()));
    }

    #[test]
    fn test_parse_blackout_any_line_goes_back() {
        assert_eq!(parse(View::Blackout, ""), Command::Back);
        assert_eq!(parse(View::Blackout, "anything"), Command::Back);
    }

    #[test]
    fn test_parse_sub_views() {
        assert_eq!(parse(View::Rest, "s"), Command::ToggleTimer);
        assert_eq!(parse(View::Rest, "m"), Command::ToggleSound);
        assert_eq!(parse(View::Rest, "b"), Command::Back);
        assert_eq!(parse(View::Facts, "n"), Command::AnotherFact);
        assert_eq!(parse(View::Fuel, "back"), Command::Back);
        assert_eq!(parse(View::Fuel, "n"), Command::Unknown("n".to_string()));
    }

    #[test]
    fn test_parse_notes() {
        assert_eq!(
            parse(View::Notes, "  buy salt  "),
            Command::DraftLine("  buy salt".to_string())
        );
        assert_eq!(parse(View::Notes, "b"), Command::DraftLine("b".to_string()));
        assert_eq!(parse(View::Notes, "/save"), Command::SaveNote);
        assert_eq!(parse(View::Notes, "/dictate"), Command::Dictate);
        assert_eq!(parse(View::Notes, "/delete 2"), Command::DeleteNote(2));
        assert_eq!(
            parse(View::Notes, "/delete 0"),
            Command::Unknown("/delete 0".to_string())
        );
        assert_eq!(parse(View::Notes, "/clear"), Command::ClearDraft);
        assert_eq!(parse(View::Notes, "/back"), Command::Back);
        assert_eq!(parse(View::Notes, ""), Command::Nothing);
    }

    #[test]
    fn test_delete_position_zero_is_reported() {
        use crate::capabilities::Capabilities;
        use crate::models::AppState;
        use crate::store::MemoryNoteStore;
        use std::sync::Arc;

        let core = Core::new(
            AppState::new(Arc::new(MemoryNoteStore::new())),
            Capabilities::default(),
        );
        core.navigate(View::Notes);
        core.add_note("keep me").unwrap();

        assert_eq!(
            apply(&core, Command::DeleteNote(0)),
            Step::Continue(Some("No note 0".to_string()))
        );
        match core.snapshot() {
            Snapshot::Notes { notes, .. } => assert_eq!(notes.len(), 1),
            other => panic!("expected notes screen, got {:?}", other),
        }
    }

    #[test]
    fn test_render_home_mentions_privacy() {
        let screen = render(&Snapshot::Home, None);
        assert!(screen.contains(content::PRIVACY_NOTICE));
        assert!(screen.contains("I am Crashing"));
        assert!(screen.contains("Unload Brain"));
    }

    #[test]
    fn test_render_blackout_is_minimal() {
        let screen = render(&Snapshot::Blackout, Some("ignored"));
        assert!(screen.contains(content::BLACKOUT_HINT));
        assert!(!screen.contains("ignored"));
        assert!(!screen.contains(content::APP_TITLE));
    }

    #[test]
    fn test_render_rest() {
        let body = render_body(&Snapshot::Rest {
            remaining: 900,
            phase: TimerPhase::Ready,
            sound_enabled: true,
        });
        assert!(body.contains("15:00"));
        assert!(body.contains(content::REST_IDLE));
        assert!(body.contains(content::SOUND_ON));

        let body = render_body(&Snapshot::Rest {
            remaining: 65,
            phase: TimerPhase::Running,
            sound_enabled: false,
        });
        assert!(body.contains("1:05"));
        assert!(body.contains(content::REST_RUNNING));
        assert!(body.contains(content::SOUND_OFF));
    }

    #[test]
    fn test_render_fact() {
        let body = render_body(&Snapshot::Facts(FACTS[0]));
        assert!(body.contains(FACTS[0].category));
        assert!(body.contains(FACTS[0].text));
    }

    #[test]
    fn test_render_notes_numbers_newest_first() {
        let body = render_body(&Snapshot::Notes {
            notes: vec![
                Note::new(2, "second".to_string()),
                Note::new(1, "first\nwith detail".to_string()),
            ],
            draft: String::new(),
            listening: true,
        });
        assert!(body.contains("  1. second"));
        assert!(body.contains("  2. first"));
        assert!(body.contains("with detail"));
        assert!(body.contains(content::NOTES_PLACEHOLDER));
        assert!(body.contains(content::LISTENING));
    }
}
