use std::str::FromStr;

use anyhow::Result;
use bpaf::Bpaf;
use indoc::indoc;
use log::debug;
use marquee_catalog::{ClientTrait, MovieId};
use marquee_core::pagination::Navigation;
use marquee_core::{BrowseSession, SessionError, SessionEvent};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::instrument;

use super::{catalog_client, resolve_pins};
use crate::config::Config;
use crate::utils::display::DisplaySections;
use crate::utils::message;

const INTERACTIVE_HELP: &str = indoc! {"
    Commands:
      n, next        next page
      p, prev        previous page
      g N            go to page N
      r, reload      load the current page again
      /TEXT          search for TEXT, '/' alone returns to popular movies
      pin ID         pin a movie of the current page
      unpin ID       unpin a movie
      h, help        show this help
      q, quit        exit"
};

// Browse page by page, reading commands from stdin
#[derive(Debug, Bpaf, Clone)]
pub struct Interactive {
    /// Start with a search instead of the popular movies
    #[bpaf(positional("QUERY"))]
    pub query: Option<String>,
}

impl Interactive {
    #[instrument(name = "interactive", skip_all)]
    pub async fn handle(self, config: Config) -> Result<()> {
        let client = catalog_client(&config)?;
        let pins = resolve_pins(client.as_ref(), &config, &[]).await?;
        let mut session = BrowseSession::with_pins(client, pins);

        match self.query.as_deref() {
            Some(query) => session.search(query)?,
            None => session.start()?,
        };

        message::plain(INTERACTIVE_HELP);
        let lines = BufReader::new(tokio::io::stdin()).lines();
        run_loop(&mut session, lines).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Next,
    Previous,
    Page(u32),
    Reload,
    Search(String),
    Pin(MovieId),
    Unpin(MovieId),
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
enum InputError {
    #[error("unknown command '{0}', type 'help' for a list of commands")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(String),
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
}

impl FromStr for Input {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(query) = s.strip_prefix('/') {
            return Ok(Input::Search(query.trim().to_string()));
        }

        let mut words = s.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Input::Empty);
        };
        let argument = words.next();

        let number = |command: &str| -> Result<u64, InputError> {
            let argument = argument.ok_or_else(|| InputError::MissingArgument(command.to_string()))?;
            argument
                .parse()
                .map_err(|_| InputError::InvalidNumber(argument.to_string()))
        };

        let input = match command {
            "n" | "next" => Input::Next,
            "p" | "prev" | "previous" => Input::Previous,
            "g" | "page" => {
                let page = number(command)?;
                let page = u32::try_from(page).map_err(|_| InputError::InvalidNumber(page.to_string()))?;
                Input::Page(page)
            },
            "r" | "reload" => Input::Reload,
            "pin" => Input::Pin(MovieId::new(number(command)?)),
            "unpin" => Input::Unpin(MovieId::new(number(command)?)),
            "h" | "help" | "?" => Input::Help,
            "q" | "quit" | "exit" => Input::Quit,
            other => return Err(InputError::Unknown(other.to_string())),
        };
        Ok(input)
    }
}

enum Step {
    Event(SessionEvent),
    Line(Option<String>),
}

/// Apply commands from `lines` until quit or end of input.
///
/// Commands are read while a page is loading,
/// so navigation attempted during a fetch is reported rather than queued.
/// At the end of input the loop waits for the pending page, `quit` does not.
async fn run_loop<C, R>(session: &mut BrowseSession<C>, mut lines: Lines<R>) -> Result<()>
where
    C: ClientTrait + Send + Sync + 'static,
    R: AsyncBufRead + Unpin,
{
    loop {
        let step = tokio::select! {
            biased;
            Some(event) = session.next_event(), if session.is_fetching() => Step::Event(event),
            line = lines.next_line() => Step::Line(line?),
        };

        match step {
            Step::Event(event) => report_event(session, event),
            Step::Line(None) => {
                debug!("end of input");
                // a page still loading is shown before leaving
                if let Some(event) = session.next_event().await {
                    report_event(session, event);
                }
                break;
            },
            Step::Line(Some(line)) => match line.parse::<Input>() {
                Ok(Input::Quit) => break,
                Ok(input) => {
                    if let Err(err) = apply_input(session, input) {
                        message::error(err);
                    }
                },
                Err(err) => message::error(err),
            },
        }
    }
    Ok(())
}

fn report_event<C>(session: &BrowseSession<C>, event: SessionEvent)
where
    C: ClientTrait + Send + Sync + 'static,
{
    match event {
        SessionEvent::Updated => print_sections(session),
        SessionEvent::Failed(err) => message::error(format!("Could not load movies: {err}")),
    }
}

fn apply_input<C>(session: &mut BrowseSession<C>, input: Input) -> Result<(), SessionError>
where
    C: ClientTrait + Send + Sync + 'static,
{
    let navigation = match input {
        Input::Next => session.next_page()?,
        Input::Previous => session.previous_page()?,
        Input::Page(page) => session.go_to_page(page)?,
        Input::Reload => session.reload()?,
        Input::Search(query) => session.search(&query)?,
        Input::Pin(id) => {
            if session.pin_by_id(id)? {
                message::updated(format!("Pinned movie {id}"));
                print_sections(session);
            } else {
                message::warning(format!("Movie {id} is already pinned"));
            }
            return Ok(());
        },
        Input::Unpin(id) => {
            match session.unpin(id) {
                Some(movie) => {
                    message::updated(format!("Unpinned '{}'", movie.title));
                    print_sections(session);
                },
                None => message::warning(format!("Movie {id} is not pinned")),
            }
            return Ok(());
        },
        Input::Help => {
            message::plain(INTERACTIVE_HELP);
            return Ok(());
        },
        Input::Quit | Input::Empty => return Ok(()),
    };

    match navigation {
        Navigation::Fetch(page) => message::plain(format!("Loading page {page}...")),
        Navigation::Unchanged => message::warning("No more pages in that direction"),
    }
    Ok(())
}

fn print_sections<C>(session: &BrowseSession<C>)
where
    C: ClientTrait + Send + Sync + 'static,
{
    if let Some(query) = session.query() {
        println!("Results for '{query}'\n");
    }
    println!(
        "{}\n",
        DisplaySections {
            sections: session.sections(),
            pagination: session.pagination(),
        }
    );
}
