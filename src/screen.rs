//! Screen routing and keyboard focus
//!
//! This module tracks which screen is active and maintains the keyboard
//! focus ring for it. Switching screens rebuilds the focus list, and the
//! directional keys move a single focus cursor around that list with
//! wrap-around, so the whole game is playable without a pointer.

use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};

/// The screens of the game
///
/// Exactly one screen is active at a time. The router owns the active
/// screen; everything else reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum Screen {
    /// Main menu
    #[default]
    Menu,
    /// Player-count selection
    Setup,
    /// Player name entry
    Players,
    /// The active round with the bottle ring
    Game,
    /// Session settings
    Settings,
    /// Terminal screen announcing the outcome
    End,
}

/// The tagged actions a frontend can trigger
///
/// Each action corresponds to one actionable element of the UI. The
/// frontend reports activations; the engine decides what they mean in
/// the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Begin a new game from the menu
    Start,
    /// Open the settings screen
    OpenSettings,
    /// Show the turn history
    History,
    /// Decrease the player count
    PlayersDec,
    /// Increase the player count
    PlayersInc,
    /// Confirm the player count and move to name entry
    ConfirmPlayers,
    /// Finish name entry and start the round
    PlayersDone,
    /// Spin the bottle
    Spin,
    /// Lower the difficulty
    DiffDec,
    /// Raise the difficulty
    DiffInc,
    /// Remove a starting life
    LivesDec,
    /// Add a starting life
    LivesInc,
    /// Previous bottle type
    BottleDec,
    /// Next bottle type
    BottleInc,
    /// The selected player completed their task
    TaskDone,
    /// The selected player failed their task
    TaskFail,
    /// Start over from the setup screen
    Restart,
    /// Return to the main menu
    BackMenu,
    /// Leave the settings screen back to the menu
    SettingsBack,
}

/// A focusable element on the active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusTarget {
    /// A tagged action element
    Action(Action),
    /// A name-entry slot on the players screen
    NameSlot(usize),
}

/// The dynamic parts the focus lists depend on
///
/// The players screen has one focusable per name slot, and the game
/// screen swaps its focusables while a task is being presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusContext {
    /// Number of name-entry slots currently shown
    pub slots: usize,
    /// Whether the task prompt is open on the game screen
    pub task_open: bool,
}

/// Tracks the active screen and its keyboard focus ring
///
/// The focus lists are kept per screen so that switching back to a
/// screen lands on a freshly rebuilt list, the way the original UI
/// re-queried its focusable elements on every screen change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Router {
    /// The currently active screen
    screen: Screen,
    /// Focus list for every screen
    targets: EnumMap<Screen, Vec<FocusTarget>>,
    /// Position of the focus cursor within the active screen's list
    focus: usize,
}

/// Builds the focus list of a single screen for the given context
fn targets_for(screen: Screen, context: FocusContext) -> Vec<FocusTarget> {
    match screen {
        Screen::Menu => vec![
            FocusTarget::Action(Action::Start),
            FocusTarget::Action(Action::OpenSettings),
            FocusTarget::Action(Action::History),
        ],
        Screen::Setup => vec![
            FocusTarget::Action(Action::PlayersDec),
            FocusTarget::Action(Action::PlayersInc),
            FocusTarget::Action(Action::ConfirmPlayers),
        ],
        Screen::Players => (0..context.slots)
            .map(FocusTarget::NameSlot)
            .chain(std::iter::once(FocusTarget::Action(Action::PlayersDone)))
            .collect(),
        Screen::Game => {
            if context.task_open {
                vec![
                    FocusTarget::Action(Action::TaskDone),
                    FocusTarget::Action(Action::TaskFail),
                ]
            } else {
                vec![FocusTarget::Action(Action::Spin)]
            }
        }
        Screen::Settings => vec![
            FocusTarget::Action(Action::DiffDec),
            FocusTarget::Action(Action::DiffInc),
            FocusTarget::Action(Action::LivesDec),
            FocusTarget::Action(Action::LivesInc),
            FocusTarget::Action(Action::BottleDec),
            FocusTarget::Action(Action::BottleInc),
            FocusTarget::Action(Action::SettingsBack),
        ],
        Screen::End => vec![
            FocusTarget::Action(Action::Restart),
            FocusTarget::Action(Action::BackMenu),
        ],
    }
}

impl Router {
    /// Creates a router starting at the menu screen
    pub fn new(context: FocusContext) -> Self {
        let mut router = Self {
            screen: Screen::Menu,
            targets: EnumMap::default(),
            focus: 0,
        };
        router.refresh(context);
        router
    }

    /// Returns the currently active screen
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Switches to a screen and resets the focus cursor
    pub fn go_to(&mut self, screen: Screen, context: FocusContext) {
        self.screen = screen;
        self.refresh(context);
    }

    /// Rebuilds every focus list for a changed context
    ///
    /// The focus cursor returns to the first element, matching the
    /// original behavior of re-querying focusables on refresh.
    pub fn refresh(&mut self, context: FocusContext) {
        for (screen, list) in &mut self.targets {
            *list = targets_for(screen, context);
        }
        self.focus = 0;
    }

    /// Moves the focus cursor by `delta` positions with wrap-around
    ///
    /// A no-op when the active screen has no focusable elements.
    pub fn shift_focus(&mut self, delta: isize) {
        let len = self.targets[self.screen].len();
        if len == 0 {
            return;
        }
        let len = len as isize;
        self.focus = ((self.focus as isize + delta).rem_euclid(len)) as usize;
    }

    /// Returns the currently focused element of the active screen
    pub fn focused(&self) -> Option<FocusTarget> {
        self.targets[self.screen].get(self.focus).copied()
    }

    /// Returns the focus list of the active screen
    pub fn focusables(&self) -> &[FocusTarget] {
        &self.targets[self.screen]
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(FocusContext::default())
    }
}
