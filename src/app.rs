//! Application state for the terminal front-end
//!
//! Wraps the controller with a selection cursor and key handling. Network
//! loads are spawned on tokio tasks and their results come back over an mpsc
//! channel, so the interface keeps responding while a load is in flight.

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;
use tracing::error;

use userlist::clock::SystemClock;
use userlist::controller::{FetchTicket, UserListController};
use userlist::data::{LoadError, User, UsersClient};
use userlist::storage::{FileStorage, MemoryStorage, StorageError};
use userlist::view::{Action, Container};

/// Controller wired to disk, process memory, HTTP and the wall clock
pub type TerminalController =
    UserListController<FileStorage, MemoryStorage, UsersClient, SystemClock>;

/// A finished load, tagged with the ticket it was started under
type FetchResult = (FetchTicket, Result<Vec<User>, LoadError>);

/// Capacity of the fetch result channel
const FETCH_CHANNEL_CAPACITY: usize = 8;

/// What a key press asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectPrevious,
    SelectNext,
    Activate,
    DeleteSelected,
    ToggleHelp,
    Quit,
}

impl Command {
    pub fn description(self) -> &'static str {
        match self {
            Command::SelectPrevious => "Select previous control",
            Command::SelectNext => "Select next control",
            Command::Activate => "Activate selected control",
            Command::DeleteSelected => "Delete selected user",
            Command::ToggleHelp => "Toggle this help",
            Command::Quit => "Quit",
        }
    }
}

/// Every key binding, in the order the help overlay lists them
pub const KEY_BINDINGS: &[(Command, &[KeyCode])] = &[
    (Command::SelectPrevious, &[KeyCode::Up, KeyCode::Char('k')]),
    (Command::SelectNext, &[KeyCode::Down, KeyCode::Char('j')]),
    (Command::Activate, &[KeyCode::Enter]),
    (Command::DeleteSelected, &[KeyCode::Char('d'), KeyCode::Delete]),
    (Command::ToggleHelp, &[KeyCode::Char('?')]),
    (Command::Quit, &[KeyCode::Char('q'), KeyCode::Esc]),
];

/// Looks up the command bound to a key
pub fn command_for(code: KeyCode) -> Option<Command> {
    KEY_BINDINGS
        .iter()
        .find(|(_, codes)| codes.contains(&code))
        .map(|(command, _)| *command)
}

/// Main application struct
pub struct App {
    /// The user list controller
    pub controller: TerminalController,
    /// Index into the container's actionable nodes
    pub selected_index: usize,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Whether the help overlay is displayed
    pub show_help: bool,
    fetch_tx: mpsc::Sender<FetchResult>,
    fetch_rx: mpsc::Receiver<FetchResult>,
}

impl App {
    pub fn new(controller: TerminalController) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel(FETCH_CHANNEL_CAPACITY);
        Self {
            controller,
            selected_index: 0,
            should_quit: false,
            show_help: false,
            fetch_tx,
            fetch_rx,
        }
    }

    /// Renders from cache or kicks off the first load
    pub fn start(&mut self) -> Result<(), StorageError> {
        if let Some(ticket) = self.controller.start()? {
            self.spawn_fetch(ticket);
        }
        self.clamp_selection();
        Ok(())
    }

    /// Runs a load in the background
    fn spawn_fetch(&self, ticket: FetchTicket) {
        let source = self.controller.source().clone();
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            let result = source.fetch_users().await;
            if let Err(e) = tx.send((ticket, result)).await {
                error!(error = %e, "Failed to deliver fetch result - channel closed");
            }
        });
    }

    /// Applies any loads that have finished since the last call
    pub fn poll_fetches(&mut self) -> Result<(), StorageError> {
        while let Ok((ticket, result)) = self.fetch_rx.try_recv() {
            self.controller.finish_fetch(ticket, result)?;
        }
        self.clamp_selection();
        Ok(())
    }

    /// Waits for the next load to finish and applies it
    #[cfg(test)]
    async fn wait_for_fetch(&mut self) -> Result<(), StorageError> {
        if let Some((ticket, result)) = self.fetch_rx.recv().await {
            self.controller.finish_fetch(ticket, result)?;
        }
        self.clamp_selection();
        Ok(())
    }

    pub fn container(&self) -> Option<&Container> {
        self.controller.container()
    }

    /// Actions of the container's controls, in display order
    pub fn actions(&self) -> Vec<Action> {
        self.container().map(Container::actions).unwrap_or_default()
    }

    pub fn selected_action(&self) -> Option<Action> {
        self.actions().get(self.selected_index).copied()
    }

    fn clamp_selection(&mut self) {
        let count = self.actions().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    fn move_selection_down(&mut self) {
        let count = self.actions().len();
        if self.selected_index + 1 < count {
            self.selected_index += 1;
        }
    }

    fn activate(&mut self, action: Action) -> Result<(), StorageError> {
        if let Some(ticket) = self.controller.activate(action)? {
            self.spawn_fetch(ticket);
        }
        self.clamp_selection();
        Ok(())
    }

    /// Handles a key press
    ///
    /// Storage failures are returned to the caller, which treats them as fatal.
    pub fn handle_key(&mut self, key_event: KeyEvent) -> Result<(), StorageError> {
        let command = command_for(key_event.code);

        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(command, Some(Command::ToggleHelp | Command::Quit)) {
                self.show_help = false;
            }
            return Ok(());
        }

        match command {
            Some(Command::Quit) => self.should_quit = true,
            Some(Command::ToggleHelp) => self.show_help = true,
            Some(Command::SelectPrevious) => self.move_selection_up(),
            Some(Command::SelectNext) => self.move_selection_down(),
            Some(Command::Activate) => {
                if let Some(action) = self.selected_action() {
                    self.activate(action)?;
                }
            }
            Some(Command::DeleteSelected) => {
                if let Some(action @ Action::Delete(_)) = self.selected_action() {
                    self.activate(action)?;
                }
            }
            None => {}
        }
        Ok(())
    }
}
