use crate::events::GameEvent;
use async_channel::Sender;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

pub const HELP: &str = "commands: spin | reset | players <2-12> | mute | show | quit";

pub fn parse_command(line: &str) -> Option<GameEvent> {
    let mut words = line.split_whitespace();
    let command = words.next()?.to_ascii_lowercase();

    let event = match (command.as_str(), words.next()) {
        ("spin" | "s", None) => GameEvent::Spin,
        ("reset" | "r", None) => GameEvent::Reset,
        ("mute" | "m", None) => GameEvent::ToggleMute,
        ("show", None) => GameEvent::Show,
        ("quit" | "exit" | "q", None) => GameEvent::Quit,
        ("players" | "p", Some(n)) => GameEvent::SetPlayers(n.parse().ok()?),
        _ => return None,
    };

    words.next().is_none().then_some(event)
}

pub async fn read_commands<R: AsyncBufRead + Unpin>(reader: R, tx: Sender<GameEvent>) {
    let mut lines = reader.lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match parse_command(line) {
                    Some(event) => {
                        if tx.send(event).await.is_err() {
                            return;
                        }
                    }
                    None => {
                        log::warn!("Unknown command '{}'", line);
                        println!("{}", HELP);
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::error!("Failed to read input: {}", e);
                break;
            }
        }
    }

    let _ = tx.send(GameEvent::Quit).await;
}

pub async fn run_stdin_reader(tx: Sender<GameEvent>) {
    read_commands(BufReader::new(tokio::io::stdin()), tx).await;
}
