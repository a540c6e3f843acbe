//! Core game logic and state management
//!
//! This module contains the main game struct wiring the screen router,
//! settings, roster, spin state machine, history and task provider into
//! one message-driven loop: the frontend feeds incoming messages in,
//! timed alarms resolve spins, and every change goes back out as update
//! messages or a full state sync.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::{
    constants,
    history::{self, History},
    names::NameDirectory,
    roster::{BlankNames, Roster, SeatView},
    screen::{Action, FocusContext, FocusTarget, Router, Screen},
    session::Tunnel,
    settings::{Settings, SettingsView},
    spin::{self, SpinPhase, SpinPlan, spin_duration},
    tasks::{Generate, TaskProvider},
    TruncatedVec,
};

/// Result of a finished round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    /// Name of the sole survivor, or `None` when nobody survived
    pub winner: Option<String>,
}

/// The main game struct
///
/// A single `Game` is the source of truth for one session: it owns every
/// piece of state and is only ever mutated from `receive_message` and
/// `receive_alarm`, both called from the one logical thread of control.
#[derive(Serialize, Deserialize)]
pub struct Game {
    /// Active screen and keyboard focus
    router: Router,
    /// Session settings, surviving restarts
    settings: Settings,
    /// Player count picked on the setup screen
    player_count: usize,
    /// Name-entry slot texts, rebuilt on every setup confirmation
    drafts: Vec<String>,
    /// Players of the current round
    roster: Roster,
    /// Append-only turn log for the whole session
    history: History,
    /// Turn selector phase
    spin: SpinPhase,
    /// Serial of the most recent spin, matched against resolve alarms
    spin_serial: u64,
    /// Seat index of the most recently selected player
    last_selected: Option<usize>,
    /// Task currently presented to the selected player
    pending_task: Option<String>,
    /// Outcome of the finished round, set when the end screen is entered
    outcome: Option<Outcome>,
    /// Autocomplete directory for the name-entry slots
    names: NameDirectory,
    /// Policy for filling blank name slots
    blank_names: BlankNames,
}

impl Debug for Game {
    /// Custom debug implementation that avoids printing the directory
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("screen", &self.router.screen())
            .field("players", &self.roster.len())
            .field("spin", &self.spin)
            .finish_non_exhaustive()
    }
}

/// Messages received from the frontend
///
/// Everything the operator can do arrives through this enum: activating
/// a tagged element, pressing one of the four control keys, or typing
/// into a name slot.
#[derive(Debug, Deserialize, Clone)]
pub enum IncomingMessage {
    /// A tagged action element was activated
    Action(Action),
    /// A control key was pressed
    Key(KeyMessage),
    /// Text was typed into a name-entry slot
    NameInput {
        /// Index of the slot being edited
        slot: usize,
        /// Full current text of the slot
        text: String,
    },
    /// An autocomplete suggestion was picked for a slot
    SuggestionPick {
        /// Index of the slot being completed
        slot: usize,
        /// The chosen name
        name: String,
    },
}

/// The four keyboard controls
#[derive(Debug, Deserialize, Clone, Copy)]
pub enum KeyMessage {
    /// Move the focus cursor backwards
    FocusPrevious,
    /// Move the focus cursor forwards
    FocusNext,
    /// Activate the focused element
    Confirm,
    /// Return to the main menu
    Back,
}

/// Update messages sent to the frontend about state changes
///
/// `None` values are serialized: a `Focus(null)` or a `GameOver` without
/// a winner are meaningful states, not omissions.
#[serde_with::serde_as]
#[derive(Debug, Serialize, Clone)]
pub enum UpdateMessage {
    /// The active screen changed
    Screen(Screen),
    /// The focus cursor moved
    Focus(Option<FocusTarget>),
    /// The player count on the setup screen changed
    PlayerCount(usize),
    /// Fresh autocomplete suggestions for a name slot
    Suggestions {
        /// Slot the suggestions belong to
        slot: usize,
        /// Top matches, best first
        matches: TruncatedVec<String>,
    },
    /// The frontend should open the editor of a name slot
    EditSlot(usize),
    /// The settings display changed
    Settings(SettingsView),
    /// The in-round HUD changed
    Hud(HudView),
    /// The seat ring changed
    Ring(Vec<SeatView>),
    /// A spin started; play the animation
    SpinStarted {
        /// Rotation in degrees at which the bottle stops
        target_rotation: f64,
        /// Length of the animation
        #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
        duration: Duration,
    },
    /// The bottle stopped and a task is being fetched
    TaskLoading {
        /// Name of the selected player
        player: String,
    },
    /// The task for the selected player is ready
    TaskPrompt {
        /// Name of the selected player
        player: String,
        /// The task text
        task: String,
    },
    /// The requested slice of the turn history
    History(TruncatedVec<history::Entry>),
    /// The round ended
    GameOver {
        /// Name of the sole survivor, or `None` when nobody survived
        winner: Option<String>,
    },
}

/// Sync messages carrying the full view model of the active screen
#[derive(Debug, Serialize, Clone)]
pub enum SyncMessage {
    /// The main menu
    Menu,
    /// The player-count selection screen
    Setup {
        /// Currently selected player count
        player_count: usize,
    },
    /// The name-entry screen
    Players {
        /// One view per name slot
        slots: Vec<SlotView>,
    },
    /// The active round
    Round(RoundView),
    /// The settings screen
    Settings(SettingsView),
    /// The end screen
    End(EndView),
}

/// View model of one name-entry slot
#[derive(Debug, Serialize, Clone)]
pub struct SlotView {
    /// Slot position
    pub index: usize,
    /// Current text of the slot
    pub text: String,
    /// Placeholder shown while the slot is blank
    pub placeholder: String,
    /// Autocomplete suggestions for the current text
    pub suggestions: TruncatedVec<String>,
}

/// View model of the in-round HUD
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct HudView {
    /// Display label of the session difficulty
    pub difficulty: &'static str,
    /// Lives each player started with
    pub lives: u8,
    /// Name of the most recently selected player
    pub last_selected: Option<String>,
}

/// View model of the turn selector for the round screen
#[serde_with::serde_as]
#[derive(Debug, Serialize, Clone)]
pub enum PhaseView {
    /// Waiting for a spin
    Idle,
    /// The bottle is turning
    Spinning {
        /// Rotation in degrees at which the bottle stops
        target_rotation: f64,
        /// Length of the animation
        #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
        duration: Duration,
    },
    /// A task is being presented to the selected player
    Task {
        /// Name of the selected player
        player: String,
        /// The task text
        task: String,
    },
}

/// View model of the whole round screen
#[derive(Debug, Serialize, Clone)]
pub struct RoundView {
    /// Seats around the ring in order
    pub seats: Vec<SeatView>,
    /// The HUD values
    pub hud: HudView,
    /// What the turn selector is doing
    pub phase: PhaseView,
}

/// View model of the end screen
#[derive(Debug, Serialize, Clone)]
pub struct EndView {
    /// Name of the sole survivor, or `None` when nobody survived
    pub winner: Option<String>,
    /// Totals over the session's turn log
    pub summary: history::Summary,
}

// Convenience methods
impl Game {
    /// Returns the currently active screen
    pub fn screen(&self) -> Screen {
        self.router.screen()
    }

    /// Returns the session settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the players of the current round
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Returns the session turn log
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns the turn selector phase
    pub fn spin(&self) -> SpinPhase {
        self.spin
    }

    /// Returns the seat index of the most recently selected player
    pub fn last_selected(&self) -> Option<usize> {
        self.last_selected
    }

    /// Returns the player count picked on the setup screen
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// The focus-list context for the current state
    fn focus_context(&self) -> FocusContext {
        FocusContext {
            slots: self.drafts.len(),
            task_open: self.pending_task.is_some(),
        }
    }

    /// Name of the player at a seat, `"?"` when the seat is unknown
    fn seat_name(&self, index: usize) -> String {
        self.roster
            .get(index)
            .map_or_else(|| "?".to_string(), |player| player.name.clone())
    }

    /// The current HUD values
    fn hud_view(&self) -> HudView {
        HudView {
            difficulty: self.settings.difficulty().label(),
            lives: self.settings.lives(),
            last_selected: self.last_selected.map(|index| self.seat_name(index)),
        }
    }

    /// The current turn-selector view
    fn phase_view(&self) -> PhaseView {
        match self.spin {
            SpinPhase::Idle => PhaseView::Idle,
            SpinPhase::Spinning(plan) => PhaseView::Spinning {
                target_rotation: plan.total_rotation(self.roster.len()),
                duration: spin_duration(),
            },
            SpinPhase::Resolved { target } => PhaseView::Task {
                player: self.seat_name(target),
                task: self.pending_task.clone().unwrap_or_default(),
            },
        }
    }

    /// Seat index the ring should highlight
    fn ring_selection(&self) -> Option<usize> {
        match self.spin {
            SpinPhase::Resolved { target } => Some(target),
            _ => None,
        }
    }

    /// Announces the focused element after a focus change
    fn announce_focus<T: Tunnel>(&self, tunnel: &T) {
        tunnel.send_message(&UpdateMessage::Focus(self.router.focused()).into());
    }

    /// Switches screens and announces the change
    fn go_to<T: Tunnel>(&mut self, screen: Screen, tunnel: &T) {
        self.router.go_to(screen, self.focus_context());
        tunnel.send_message(&UpdateMessage::Screen(screen).into());
        self.announce_focus(tunnel);
    }
}

impl Game {
    /// Creates a new game session
    ///
    /// The session starts on the menu with default settings; the
    /// directory drives name autocomplete and may be empty.
    ///
    /// # Arguments
    ///
    /// * `names` - The loaded name-frequency directory
    /// * `blank_names` - Policy for filling blank name slots
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flaska::game::Game;
    /// use flaska::names::NameDirectory;
    /// use flaska::roster::BlankNames;
    ///
    /// let game = Game::new(NameDirectory::default(), BlankNames::default());
    /// ```
    pub fn new(names: NameDirectory, blank_names: BlankNames) -> Self {
        Self {
            router: Router::new(FocusContext::default()),
            settings: Settings::default(),
            player_count: constants::roster::DEFAULT_PLAYER_COUNT,
            drafts: Vec::new(),
            roster: Roster::default(),
            history: History::default(),
            spin: SpinPhase::Idle,
            spin_serial: 0,
            last_selected: None,
            pending_task: None,
            outcome: None,
            names,
            blank_names,
        }
    }

    /// Handles an incoming message from the frontend
    ///
    /// All state transitions of the game happen here or in
    /// [`Self::receive_alarm`]; both run synchronously on the single
    /// logical thread of control.
    ///
    /// # Arguments
    ///
    /// * `message` - The incoming message to process
    /// * `schedule_message` - Function to schedule delayed alarms
    /// * `tunnel` - The attached frontend
    pub fn receive_message<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        message: IncomingMessage,
        mut schedule_message: S,
        tunnel: &T,
    ) {
        match message {
            IncomingMessage::Action(action) => {
                self.handle_action(action, &mut schedule_message, tunnel);
            }
            IncomingMessage::Key(key) => match key {
                KeyMessage::FocusPrevious => {
                    self.router.shift_focus(-1);
                    self.announce_focus(tunnel);
                }
                KeyMessage::FocusNext => {
                    self.router.shift_focus(1);
                    self.announce_focus(tunnel);
                }
                KeyMessage::Confirm => match self.router.focused() {
                    Some(FocusTarget::Action(action)) => {
                        self.handle_action(action, &mut schedule_message, tunnel);
                    }
                    Some(FocusTarget::NameSlot(slot)) => {
                        tunnel.send_message(&UpdateMessage::EditSlot(slot).into());
                    }
                    None => {}
                },
                KeyMessage::Back => self.go_to(Screen::Menu, tunnel),
            },
            IncomingMessage::NameInput { slot, text } => {
                if self.router.screen() == Screen::Players && slot < self.drafts.len() {
                    let matches = self.names.suggest(&text);
                    self.drafts[slot] = text;
                    tunnel.send_message(&UpdateMessage::Suggestions { slot, matches }.into());
                }
            }
            IncomingMessage::SuggestionPick { slot, name } => {
                if self.router.screen() == Screen::Players && slot < self.drafts.len() {
                    self.drafts[slot] = name;
                    tunnel.send_message(
                        &UpdateMessage::Suggestions {
                            slot,
                            matches: TruncatedVec::default(),
                        }
                        .into(),
                    );
                }
            }
        }
    }

    /// Dispatches one tagged action
    fn handle_action<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        action: Action,
        schedule_message: &mut S,
        tunnel: &T,
    ) {
        match action {
            Action::Start | Action::Restart => {
                self.go_to(Screen::Setup, tunnel);
                tunnel.send_message(&UpdateMessage::PlayerCount(self.player_count).into());
            }
            Action::OpenSettings => {
                self.go_to(Screen::Settings, tunnel);
                tunnel.send_message(&UpdateMessage::Settings(self.settings.view()).into());
            }
            Action::SettingsBack | Action::BackMenu => self.go_to(Screen::Menu, tunnel),
            Action::History => {
                tunnel.send_message(&UpdateMessage::History(self.history.recent()).into());
            }
            Action::PlayersDec => {
                self.player_count =
                    (self.player_count - 1).max(constants::roster::MIN_PLAYER_COUNT);
                tunnel.send_message(&UpdateMessage::PlayerCount(self.player_count).into());
            }
            Action::PlayersInc => {
                self.player_count =
                    (self.player_count + 1).min(constants::roster::MAX_PLAYER_COUNT);
                tunnel.send_message(&UpdateMessage::PlayerCount(self.player_count).into());
            }
            Action::ConfirmPlayers => {
                if self.router.screen() == Screen::Setup {
                    self.drafts = vec![String::new(); self.player_count];
                    self.roster = Roster::default();
                    self.spin = SpinPhase::Idle;
                    self.last_selected = None;
                    self.pending_task = None;
                    self.outcome = None;
                    self.go_to(Screen::Players, tunnel);
                }
            }
            Action::PlayersDone => {
                if self.router.screen() == Screen::Players {
                    self.roster =
                        Roster::build(&self.drafts, self.settings.lives(), &self.blank_names);
                    self.go_to(Screen::Game, tunnel);
                    tunnel.send_message(
                        &UpdateMessage::Ring(self.roster.seat_views(None)).into(),
                    );
                    tunnel.send_message(&UpdateMessage::Hud(self.hud_view()).into());
                }
            }
            Action::Spin => self.start_spin(schedule_message, tunnel),
            Action::DiffDec => {
                self.settings.lower_difficulty();
                self.announce_settings(tunnel);
            }
            Action::DiffInc => {
                self.settings.raise_difficulty();
                self.announce_settings(tunnel);
            }
            Action::LivesDec => {
                self.settings.fewer_lives();
                self.announce_settings(tunnel);
            }
            Action::LivesInc => {
                self.settings.more_lives();
                self.announce_settings(tunnel);
            }
            Action::BottleDec => {
                self.settings.prev_bottle();
                self.announce_settings(tunnel);
            }
            Action::BottleInc => {
                self.settings.next_bottle();
                self.announce_settings(tunnel);
            }
            Action::TaskDone => self.resolve_task(true, tunnel),
            Action::TaskFail => self.resolve_task(false, tunnel),
        }
    }

    /// Announces the settings and HUD after an adjustment
    fn announce_settings<T: Tunnel>(&self, tunnel: &T) {
        tunnel.send_message(&UpdateMessage::Settings(self.settings.view()).into());
        tunnel.send_message(&UpdateMessage::Hud(self.hud_view()).into());
    }

    /// Starts a spin if one can start
    ///
    /// A request is ignored while a spin is in flight or a task is open.
    /// When one player or fewer is left there is nothing to spin for and
    /// the round ends instead. The target seat is drawn uniformly over
    /// ALL seats, eliminated players included; the resolve alarm is
    /// scheduled for the end of the animation.
    fn start_spin<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        schedule_message: &mut S,
        tunnel: &T,
    ) {
        if self.router.screen() != Screen::Game {
            return;
        }
        if !matches!(self.spin, SpinPhase::Idle) {
            return;
        }
        if self.roster.survivor_count() <= 1 {
            self.end_round(tunnel);
            return;
        }

        self.spin_serial += 1;
        let plan = SpinPlan::roll(self.roster.len(), self.spin_serial);
        let target_rotation = plan.total_rotation(self.roster.len());
        self.spin = SpinPhase::Spinning(plan);

        schedule_message(
            spin::AlarmMessage::Resolve {
                serial: plan.serial,
            }
            .into(),
            spin_duration(),
        );
        tunnel.send_message(
            &UpdateMessage::SpinStarted {
                target_rotation,
                duration: spin_duration(),
            }
            .into(),
        );
    }

    /// Handles a scheduled alarm
    ///
    /// The only alarm is spin resolution. A stale alarm — wrong serial,
    /// no spin in flight, or the operator has left the game screen — is
    /// discarded; in the last case the spin resets to idle instead of
    /// presenting a task nobody can see.
    ///
    /// # Arguments
    ///
    /// * `message` - The alarm message to process
    /// * `provider` - Task provider queried for the selected player
    /// * `tunnel` - The attached frontend
    pub fn receive_alarm<T: Tunnel, G: Generate>(
        &mut self,
        message: crate::AlarmMessage,
        provider: &TaskProvider<G>,
        tunnel: &T,
    ) {
        let crate::AlarmMessage::Spin(spin::AlarmMessage::Resolve { serial }) = message;

        let SpinPhase::Spinning(plan) = self.spin else {
            return;
        };
        if plan.serial != serial {
            return;
        }
        if self.router.screen() != Screen::Game {
            self.spin = SpinPhase::Idle;
            return;
        }

        let target = plan.target;
        self.spin = SpinPhase::Resolved { target };
        self.last_selected = Some(target);
        let player = self.seat_name(target);

        tunnel.send_message(
            &UpdateMessage::Ring(self.roster.seat_views(Some(target))).into(),
        );
        tunnel.send_message(&UpdateMessage::Hud(self.hud_view()).into());
        tunnel.send_message(
            &UpdateMessage::TaskLoading {
                player: player.clone(),
            }
            .into(),
        );

        let task = provider.task_for(&player, self.settings.difficulty());
        self.pending_task = Some(task.clone());
        self.router.refresh(self.focus_context());
        tunnel.send_message(&UpdateMessage::TaskPrompt { player, task }.into());
        self.announce_focus(tunnel);
    }

    /// Applies the outcome of the presented task
    ///
    /// A failure costs the selected player a life and may eliminate
    /// them; a success changes nothing about the player. The turn is
    /// appended to the history either way, and the round ends once one
    /// player or fewer survives.
    fn resolve_task<T: Tunnel>(&mut self, success: bool, tunnel: &T) {
        let SpinPhase::Resolved { target } = self.spin else {
            return;
        };
        let Some(task) = self.pending_task.take() else {
            return;
        };

        let name = self.seat_name(target);
        if !success {
            self.roster.apply_failure(target);
        }
        self.history.record(history::Entry {
            name,
            task,
            success,
        });

        self.spin = SpinPhase::Idle;
        self.router.refresh(self.focus_context());
        tunnel.send_message(&UpdateMessage::Ring(self.roster.seat_views(None)).into());
        tunnel.send_message(&UpdateMessage::Hud(self.hud_view()).into());

        if self.roster.survivor_count() <= 1 {
            self.end_round(tunnel);
        } else {
            self.announce_focus(tunnel);
        }
    }

    /// Ends the round and announces the outcome
    ///
    /// The winner is the sole surviving player; when everyone is out
    /// there is no winner. Unreachable with more than one survivor.
    fn end_round<T: Tunnel>(&mut self, tunnel: &T) {
        let winner = self.roster.sole_survivor().map(|player| player.name.clone());
        self.outcome = Some(Outcome {
            winner: winner.clone(),
        });
        self.go_to(Screen::End, tunnel);
        tunnel.send_message(&UpdateMessage::GameOver { winner }.into());
    }

    /// Returns the message necessary to synchronize a frontend's state
    ///
    /// The sync message carries the complete view model of the active
    /// screen, so an attaching frontend can rebuild its display.
    pub fn state_message(&self) -> crate::SyncMessage {
        match self.router.screen() {
            Screen::Menu => SyncMessage::Menu,
            Screen::Setup => SyncMessage::Setup {
                player_count: self.player_count,
            },
            Screen::Players => SyncMessage::Players {
                slots: self
                    .drafts
                    .iter()
                    .enumerate()
                    .map(|(index, text)| SlotView {
                        index,
                        text: text.clone(),
                        placeholder: format!("Player {}", index + 1),
                        suggestions: self.names.suggest(text),
                    })
                    .collect(),
            },
            Screen::Game => SyncMessage::Round(RoundView {
                seats: self.roster.seat_views(self.ring_selection()),
                hud: self.hud_view(),
                phase: self.phase_view(),
            }),
            Screen::Settings => SyncMessage::Settings(self.settings.view()),
            Screen::End => SyncMessage::End(EndView {
                winner: self
                    .outcome
                    .as_ref()
                    .and_then(|outcome| outcome.winner.clone()),
                summary: self.history.summary(),
            }),
        }
        .into()
    }

    /// Synchronizes an attaching or reattaching frontend
    pub fn update_session<T: Tunnel>(&self, tunnel: &T) {
        tunnel.send_state(&self.state_message());
    }
}
