//! Plain-text rendering of session state.

use chrono::{Local, TimeZone};
use genesis_chat::market::{MarketFilters, SnapshotOutcome};
use genesis_chat::{
    DetailKind, DetailPhase, DetailRequest, Facet, FilterOptions, FilterSelection,
    PropertySummary, Role, Transcript, Turn,
};

/// Render one turn. `interactive` controls whether its filter chips are shown.
pub fn turn(turn: &Turn, interactive: bool) -> String {
    let mut out = String::new();
    let who = match turn.role {
        Role::User => "you",
        Role::Assistant => "genesis",
    };
    out.push_str(&format!("[{}] {}", clock(turn.created_at), who));
    if let Some(intent) = &turn.intent {
        out.push_str(&format!(" ({})", intent));
    }
    out.push_str(&format!(": {}\n", turn.text));

    if let Some(properties) = &turn.properties {
        for (i, p) in properties.iter().enumerate() {
            out.push_str(&format!("  {:>2}. {}\n", i + 1, property(p)));
        }
    }
    if let Some(p) = &turn.pagination {
        let more = if p.has_more { " -- /more for the next page" } else { "" };
        out.push_str(&format!(
            "  page {} of {} results{}\n",
            p.page, p.total_results, more
        ));
    }
    if interactive {
        if let Some(prompt) = &turn.filter_prompt {
            out.push_str(&chips(prompt));
        }
    }
    out
}

/// Render the whole transcript. Only the last turn's filter prompt is live.
pub fn transcript(transcript: &Transcript) -> String {
    transcript
        .turns()
        .iter()
        .enumerate()
        .map(|(i, t)| turn(t, transcript.is_filter_prompt_active(i)))
        .collect()
}

fn property(p: &PropertySummary) -> String {
    let place: Vec<&str> = [p.location.as_deref(), p.city.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    let mut line = if place.is_empty() {
        "unknown location".to_string()
    } else {
        place.join(", ")
    };

    if let Some(price) = p.price {
        line.push_str(&format!(" | price {}", inr(price)));
    }
    if let Some(rent) = p.rent {
        line.push_str(&format!(" | rent {}/mo", inr(rent)));
    }
    if let Some(area) = p.area {
        line.push_str(&format!(" | {:.0} sqft", area));
    }
    if let Some(decision) = &p.decision {
        line.push_str(&format!(" | {}", decision));
    }
    if let Some(delta) = p.wealth_difference {
        line.push_str(&format!(" | wealth delta {}", inr(delta)));
    }
    if let Some(row) = &p.source_row {
        line.push_str(&format!(" [row {}]", row));
    }
    line
}

fn chips(prompt: &FilterOptions) -> String {
    let mut out = String::new();
    for (facet, command) in [
        (Facet::City, "/city"),
        (Facet::PropertyType, "/type"),
        (Facet::Intent, "/intent"),
    ] {
        let choices = prompt.choices(facet);
        if choices.is_empty() {
            continue;
        }
        let labels: Vec<&str> = choices.iter().map(|c| c.display()).collect();
        out.push_str(&format!("  {} {}: {}\n", command, facet, labels.join(" | ")));
    }
    out
}

pub fn selection(sel: &FilterSelection) -> String {
    let show = |facet: Facet| {
        sel.get(facet)
            .map(|c| c.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let mut out = format!(
        "city: {}, property type: {}, intent: {}",
        show(Facet::City),
        show(Facet::PropertyType),
        show(Facet::Intent)
    );
    let missing = sel.missing();
    if !missing.is_empty() && !sel.is_empty() {
        let names: Vec<String> = missing.iter().map(|f| f.to_string()).collect();
        out.push_str(&format!(" (still needed: {})", names.join(", ")));
    }
    out
}

pub fn detail(state: &DetailRequest) -> String {
    if !state.open {
        return String::new();
    }
    let title = match state.kind {
        DetailKind::Why => "Why this decision",
        DetailKind::Flip => "What would flip it",
    };
    let row = state
        .source_row
        .as_ref()
        .map(|r| r.to_string())
        .unwrap_or_default();
    let body = match state.phase {
        DetailPhase::Idle => String::new(),
        DetailPhase::Loading => "loading...".to_string(),
        DetailPhase::Loaded => state.payload.clone().unwrap_or_default(),
        DetailPhase::Failed => format!(
            "error: {}",
            state.error_message.as_deref().unwrap_or_default()
        ),
    };
    format!("== {} (row {}) ==\n{}\n(/close to dismiss)\n", title, row, body)
}

pub fn market(filters: Option<&MarketFilters>, outcome: &SnapshotOutcome) -> String {
    let mut out = String::new();
    if let Some(f) = filters {
        let cities: Vec<&str> = f.cities().collect();
        out.push_str(&format!(
            "cities: {} | price {}-{} L | area {}-{} sqft\n",
            cities.join(", "),
            f.price_range.min,
            f.price_range.max,
            f.area_range.min,
            f.area_range.max
        ));
    }
    match outcome {
        SnapshotOutcome::InsufficientData => {
            out.push_str("Not enough properties match these filters.\n");
        }
        SnapshotOutcome::Data(s) => {
            out.push_str(&format!("{} properties analysed\n", s.total_filtered));
            for (city, split) in &s.buy_rent_distribution {
                out.push_str(&format!("  {}: buy {} / rent {}", city, split.buy, split.rent));
                if let Some(ppsf) = s.median_price_per_sqft.get(city) {
                    out.push_str(&format!(" | median {}/sqft", inr(*ppsf)));
                }
                if let Some(year) = s.avg_break_even_year.get(city) {
                    out.push_str(&format!(" | break-even year {:.1}", year));
                }
                out.push('\n');
            }
        }
    }
    out
}

/// Indian-style currency: lakh/crore above 1 lakh.
fn inr(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    if abs >= 1e7 {
        format!("{}\u{20b9}{:.2} Cr", sign, abs / 1e7)
    } else if abs >= 1e5 {
        format!("{}\u{20b9}{:.2} L", sign, abs / 1e5)
    } else {
        format!("{}\u{20b9}{:.0}", sign, abs)
    }
}

fn clock(epoch_secs: i64) -> String {
    Local
        .timestamp_opt(epoch_secs, 0)
        .single()
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
