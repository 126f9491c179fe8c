//! Interactive menu loop, modelled as an explicit state machine.

use std::{fmt, io::Write};

use inquire::{InquireError, Select, Text};
use weather_core::{FetchError, HistoryStore, Recent, StoreError, WeatherClient, WeatherRecord};

use crate::render;

/// Number of searches shown by "View last 5 searches".
pub const RECENT_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CurrentWeather,
    RecentSearches,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 3] =
        [MenuChoice::CurrentWeather, MenuChoice::RecentSearches, MenuChoice::Exit];
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuChoice::CurrentWeather => "Current weather by city",
            MenuChoice::RecentSearches => "View last 5 searches",
            MenuChoice::Exit => "Exit",
        })
    }
}

/// Source of user input for the shell.
pub trait Prompter {
    fn menu(&mut self) -> anyhow::Result<MenuChoice>;

    /// `None` means the user backed out to the menu.
    fn city(&mut self) -> anyhow::Result<Option<String>>;
}

/// Terminal prompts.
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn menu(&mut self) -> anyhow::Result<MenuChoice> {
        match Select::new("Choose:", MenuChoice::ALL.to_vec()).prompt() {
            Ok(choice) => Ok(choice),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Ok(MenuChoice::Exit)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn city(&mut self) -> anyhow::Result<Option<String>> {
        match Text::new("Enter city (e.g., London):").prompt() {
            Ok(city) => Ok(Some(city)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// What the shell is about to show.
#[derive(Debug)]
pub enum Outcome {
    Weather(WeatherRecord),
    /// Fetched fine, but the history write failed.
    WeatherUnsaved(WeatherRecord, StoreError),
    History(Recent),
    Error(FetchError),
}

#[derive(Debug)]
pub enum State {
    MainMenu,
    AwaitingCityInput,
    Displaying(Outcome),
    Exiting,
}

pub struct Shell<P, W> {
    client: WeatherClient,
    store: HistoryStore,
    prompter: P,
    out: W,
}

impl<P: Prompter, W: Write> Shell<P, W> {
    pub fn new(client: WeatherClient, store: HistoryStore, prompter: P, out: W) -> Self {
        Self { client, store, prompter, out }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut state = State::MainMenu;
        while !matches!(state, State::Exiting) {
            state = self.step(state).await?;
        }

        writeln!(self.out, "Goodbye!")?;
        Ok(())
    }

    /// Advance one transition. Lookup and history failures become
    /// [`Outcome`]s; only prompt and output failures are returned as errors.
    pub async fn step(&mut self, state: State) -> anyhow::Result<State> {
        let next = match state {
            State::MainMenu => match self.prompter.menu()? {
                MenuChoice::CurrentWeather => State::AwaitingCityInput,
                MenuChoice::RecentSearches => {
                    State::Displaying(Outcome::History(self.store.recent(RECENT_COUNT)))
                }
                MenuChoice::Exit => State::Exiting,
            },
            State::AwaitingCityInput => match self.prompter.city()? {
                Some(city) => State::Displaying(self.lookup(&city).await),
                None => State::MainMenu,
            },
            State::Displaying(outcome) => {
                self.display(&outcome)?;
                State::MainMenu
            }
            State::Exiting => State::Exiting,
        };

        Ok(next)
    }

    async fn lookup(&self, city: &str) -> Outcome {
        let record = match self.client.fetch(city).await {
            Ok(record) => record,
            Err(err) => return Outcome::Error(err),
        };

        match self.store.append(record.clone()) {
            Ok(()) => Outcome::Weather(record),
            Err(err) => Outcome::WeatherUnsaved(record, err),
        }
    }

    fn display(&mut self, outcome: &Outcome) -> std::io::Result<()> {
        match outcome {
            Outcome::Weather(record) => render::weather(&mut self.out, record),
            Outcome::WeatherUnsaved(record, err) => {
                render::weather(&mut self.out, record)?;
                render::store_error(&mut self.out, err)
            }
            Outcome::History(recent) => render::history(&mut self.out, recent),
            Outcome::Error(err) => render::fetch_error(&mut self.out, err),
        }
    }
}
