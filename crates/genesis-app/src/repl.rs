//! Line commands accepted by the terminal client.

use genesis_chat::{DetailKind, Facet, FacetChoice, FilterOptions, SourceRow};

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text: a question or a continuation phrase.
    Say(String),
    More,
    Select(Facet, String),
    Detail(DetailKind, SourceRow),
    Close,
    Filters,
    Market,
    History,
    Help,
    Quit,
}

pub const HELP: &str = "\
Type a question, or \"show more\" / \"page N\" to page through results.
  /more               next page of the current results
  /city <value>       choose a city chip
  /type <value>       choose a property type chip
  /intent <value>     choose buy or rent
  /filters            show the current chip selection
  /why <row>          why the analysis decided buy or rent for a property
  /flip <row>         what would flip that decision
  /close              close the explanation
  /market             market snapshot
  /history            reprint the conversation
  /quit               exit";

/// Parse one input line. Unknown or malformed slash commands are errors.
pub fn parse_line(line: &str) -> Result<Command, String> {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Command::Say(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let need_arg = |what: &str| -> Result<String, String> {
        if arg.is_empty() {
            Err(format!("/{} needs {}", name, what))
        } else {
            Ok(arg.to_string())
        }
    };

    match name.to_lowercase().as_str() {
        "more" => Ok(Command::More),
        "city" => Ok(Command::Select(Facet::City, need_arg("a city")?)),
        "type" => Ok(Command::Select(Facet::PropertyType, need_arg("a property type")?)),
        "intent" => Ok(Command::Select(Facet::Intent, need_arg("buy or rent")?)),
        "why" => Ok(Command::Detail(DetailKind::Why, SourceRow::new(need_arg("a row")?))),
        "flip" => Ok(Command::Detail(DetailKind::Flip, SourceRow::new(need_arg("a row")?))),
        "close" => Ok(Command::Close),
        "filters" => Ok(Command::Filters),
        "market" => Ok(Command::Market),
        "history" => Ok(Command::History),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command /{} (try /help)", other)),
    }
}

/// Resolve a typed chip against the active prompt, or take it verbatim.
pub fn resolve_choice(prompt: Option<&FilterOptions>, facet: Facet, typed: &str) -> FacetChoice {
    prompt
        .and_then(|p| p.find(facet, typed))
        .cloned()
        .unwrap_or_else(|| FacetChoice::new(typed, typed))
}
