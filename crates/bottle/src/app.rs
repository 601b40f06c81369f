use crate::config::{self, Config};
use crate::events::GameEvent;
use crate::session::Session;
use crate::sound::{Bell, Silent, SoundSink};
use crate::sys::{input, runtime};
use crate::view;
use async_channel::Sender;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct App<S: SoundSink> {
    pub session: Session<S>,
    tx: Sender<GameEvent>,
    config_path: Option<PathBuf>,
    spin_duration: Duration,
    /// Bumped on every spin and every cancellation. A `SpinFinished` carrying
    /// any other number belongs to a spin that no longer exists.
    spin_count: u64,
    animation: Option<JoinHandle<()>>,
}

impl<S: SoundSink> App<S> {
    pub fn new(
        session: Session<S>,
        tx: Sender<GameEvent>,
        config_path: Option<PathBuf>,
        spin_duration: Duration,
    ) -> Self {
        Self {
            session,
            tx,
            config_path,
            spin_duration,
            spin_count: 0,
            animation: None,
        }
    }

    /// Handles one event. Returns `false` once the game should stop.
    pub fn update(&mut self, event: GameEvent) -> bool {
        match self.handle(event) {
            Ok(keep_running) => keep_running,
            Err(e) => {
                log::info!("Request ignored: {}", e);
                println!("{}", e);
                true
            }
        }
    }

    fn handle(&mut self, event: GameEvent) -> Result<bool, spinring::Error> {
        match event {
            GameEvent::Spin => {
                let plan = self.session.spin()?;
                println!("{} (bottle turns to {:.0}°)", self.session.status(), plan.rotation);
                self.spin_count += 1;
                self.animation = Some(runtime::spawn_spin_animation(
                    self.tx.clone(),
                    plan.target.id,
                    self.spin_count,
                    self.spin_duration,
                ));
            }
            GameEvent::SpinFinished { id, spin } => {
                if spin != self.spin_count {
                    log::debug!("Ignoring finish of cancelled spin #{} ({})", spin, id);
                    return Ok(true);
                }
                self.animation = None;
                self.session.finish_spin(id)?;
                self.show();
            }
            GameEvent::Reset => {
                self.cancel_animation();
                self.session.reset();
                self.show();
            }
            GameEvent::SetPlayers(n) => {
                self.session.set_player_count(n)?;
                self.cancel_animation();
                self.show();
            }
            GameEvent::ToggleMute => {
                let muted = self.session.toggle_mute();
                println!("Sound {}", if muted { "off" } else { "on" });
            }
            GameEvent::Show => self.show(),
            GameEvent::ConfigReload => self.reload_config()?,
            GameEvent::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn reload_config(&mut self) -> Result<(), spinring::Error> {
        let Some(path) = &self.config_path else {
            return Ok(());
        };
        match config::load_config_from(path) {
            Ok(new_config) => {
                let was_spinning = self.session.engine().state().is_spinning();
                self.session.apply_config(&new_config)?;
                if was_spinning && !self.session.engine().state().is_spinning() {
                    self.cancel_animation();
                }
                self.spin_duration = new_config.spin_duration();
                log::info!("Configuration reloaded");
                self.show();
            }
            Err(e) => log::error!("Failed to reload config: {}", e),
        }
        Ok(())
    }

    fn cancel_animation(&mut self) {
        if let Some(animation) = self.animation.take() {
            animation.abort();
        }
        self.spin_count += 1;
    }

    fn show(&self) {
        println!("{}", view::draw(&self.session));
    }
}

pub async fn run(config: Config, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let (tx, rx) = async_channel::bounded(32);

    let sound: Box<dyn SoundSink> = if config.sound.bell {
        Box::new(Bell::stderr())
    } else {
        Box::new(Silent)
    };
    let session = Session::new(&config, sound)?;

    runtime::start_background_services(tx.clone(), config_path.clone());

    let mut app = App::new(session, tx, config_path, config.spin_duration());
    app.show();
    println!("{}", input::HELP);

    while let Ok(event) = rx.recv().await {
        if !app.update(event) {
            break;
        }
    }
    Ok(())
}
