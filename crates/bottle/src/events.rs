use spinring::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Spin,
    Reset,
    SetPlayers(usize),
    ToggleMute,
    Show,
    /// `spin` numbers the spin that started the animation.
    SpinFinished { id: PlayerId, spin: u64 },
    ConfigReload,
    Quit,
}
