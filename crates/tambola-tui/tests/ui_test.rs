//! Rendering tests against ratatui's `TestBackend`.
//!
//! Game state comes from a real `Bridge` fed with server JSON, so each screen
//! is drawn from the same snapshots the runtime would produce.

use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
use tambola_client::ClientConfig;
use tambola_tui::{App, AppEvent, Bridge, KeyInput, SystemEnv, ui};

const WIDTH: u16 = 100;
const HEIGHT: u16 = 30;

/// Rows of the rendered buffer as plain text.
fn buffer_text(buffer: &Buffer) -> String {
    let width = usize::from(buffer.area.width);
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn draw(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
    terminal.draw(|frame| ui::render(frame, app)).unwrap();
    buffer_text(terminal.backend().buffer())
}

struct Session {
    app: App,
    bridge: Bridge<SystemEnv>,
}

impl Session {
    fn new() -> Self {
        let mut app = App::new("ws://127.0.0.1:10000".into());
        app.handle(AppEvent::Connected);
        Self { app, bridge: Bridge::new(SystemEnv::new(), ClientConfig::default()) }
    }

    fn typed(&mut self, line: &str) {
        for c in line.chars() {
            self.app.handle(AppEvent::Key(KeyInput::Char(c)));
        }
        let actions = self.app.handle(AppEvent::Key(KeyInput::Enter));
        for action in actions {
            if action.is_protocol() {
                for event in self.bridge.process_app_action(action) {
                    self.app.handle(event);
                }
            }
        }
    }

    fn receive(&mut self, text: &str) {
        for event in self.bridge.handle_text(text) {
            self.app.handle(event);
        }
    }

    fn hosted_game(&mut self) {
        self.typed("/create Alice");
        self.receive(r#"{"type":"ROOM_CREATED","data":{"room_id":"R7K2Q"}}"#);
        self.receive(r#"{"type":"PLAYERS_UPDATE","data":{"players":["Alice","Bob"]}}"#);
        self.receive(
            concat!(
                r#"{"type":"TICKET_ASSIGNED","data":{"ticket":["#,
                r#"[4,0,21,0,45,0,63,0,88],"#,
                r#"[9,12,0,33,0,56,0,72,0],"#,
                r#"[0,17,28,0,49,0,67,0,90]]}}"#,
            ),
        );
        self.receive(r#"{"type":"GAME_STARTED","data":{"mode":"AUTO"}}"#);
    }
}

#[test]
fn lobby_lists_commands_with_default_name() {
    let mut session = Session::new();
    session.app.set_default_name("Cara");

    let screen = draw(&session.app);
    assert!(screen.contains("Welcome to Tambola"));
    assert!(screen.contains("/create Cara [auto|manual]"));
    assert!(screen.contains("/join Cara <room>"));
    assert!(screen.contains("Connected (ws://127.0.0.1:10000)"));
}

#[test]
fn waiting_room_shows_code_and_roster() {
    let mut session = Session::new();
    session.typed("/create Alice manual");
    session.receive(r#"{"type":"ROOM_CREATED","data":{"room_id":"R7K2Q"}}"#);
    session.receive(r#"{"type":"PLAYERS_UPDATE","data":{"players":["Alice","Bob"]}}"#);

    let screen = draw(&session.app);
    assert!(screen.contains("Room: R7K2Q"));
    assert!(screen.contains("Mode: MANUAL (until the host starts)"));
    assert!(screen.contains("Type /start when everyone is here"));
    assert!(screen.contains("Players (2)"));
    assert!(screen.contains(" Bob"));
}

#[test]
fn guest_waits_for_the_host() {
    let mut session = Session::new();
    session.typed("/join Bob R7K2Q");

    let screen = draw(&session.app);
    assert!(screen.contains("Waiting for the host to start..."));
    assert!(!screen.contains("/start"));
}

#[test]
fn game_screen_shows_marks_claims_and_banner() {
    let mut session = Session::new();
    session.hosted_game();
    session.receive(r#"{"type":"NUMBER_DRAWN","data":{"number":21}}"#);
    session.receive(r#"{"type":"NUMBER_DRAWN","data":{"number":50}}"#);
    session.receive(
        r#"{"type":"CLAIM_RESULT","data":{"status":"SUCCESS","claim":"QUICK_5","player":"Bob"}}"#,
    );
    session.receive(r#"{"type":"SCORE_UPDATE","data":{"scores":{"Alice":0,"Bob":1}}}"#);

    let screen = draw(&session.app);
    assert!(screen.contains("[21]"));
    assert!(screen.contains(" 45 "));
    assert!(screen.contains("Current: 50 | Drawn 2/90"));
    assert!(screen.contains("50 21"));
    assert!(screen.contains("QUICK_5 WON by Bob (Quick 5)"));
    assert!(screen.contains("1 Quick 5      Bob"));
    assert!(screen.contains("6 Tambola      open"));
    assert!(screen.contains("Bob: 1"));
    assert!(screen.contains("/draw to call the next number"));
}

#[test]
fn rejected_command_shows_in_status_bar() {
    let mut session = Session::new();
    session.hosted_game();
    session.receive(
        r#"{"type":"CLAIM_RESULT","data":{"status":"SUCCESS","claim":"TAMBOLA","player":"Bob"}}"#,
    );

    session.typed("/claim tambola");

    let screen = draw(&session.app);
    assert!(screen.contains("Tambola was already won by Bob"));
}

#[test]
fn leaderboard_ranks_players() {
    let mut session = Session::new();
    session.hosted_game();
    session.receive(
        concat!(
            r#"{"type":"GAME_ENDED","data":{"leaderboard":"#,
            r#"[{"name":"Bob","score":2},{"name":"Alice","score":1}]}}"#,
        ),
    );

    let screen = draw(&session.app);
    assert!(screen.contains("Game Over"));
    assert!(screen.contains("1. Bob - 2"));
    assert!(screen.contains("2. Alice - 1"));
}

#[test]
fn tiny_terminal_does_not_panic() {
    let mut session = Session::new();
    session.hosted_game();

    let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
    terminal.draw(|frame| ui::render(frame, &session.app)).unwrap();
}
