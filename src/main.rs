use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use waypoint_core::{AppError, Config};
use waypoint_search::{SearchResult, SearchSession, SearchStatus, SectionState};

const HELP: &str = "\
Type to get suggestions. Commands:
  :go [text]   search the current input (or the given text)
  :pick <n>    search suggestion n
  :x           dismiss suggestions
  :q           quit";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let err = AppError::from(e);
        tracing::error!("{}", err);
        eprintln!("{}", err.user_message());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    waypoint_core::init()?;

    let (config, _) = Config::load_validated()?;
    let mut session = SearchSession::from_config(&config)?;

    tracing::info!("Waypoint started");

    // One-shot mode: `waypoint Lisbon`
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        session.on_query_committed(&args.join(" "));
        session.settle().await;
        render_result(session.result());
        return Ok(());
    }

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();

        match line.split_once(' ').unwrap_or((line, "")) {
            ("", _) => continue,
            (":q", _) | (":quit", _) => break,
            (":x", _) => session.dismiss_suggestions(),
            (":go", rest) => {
                let text = if rest.trim().is_empty() {
                    session.result().query.clone()
                } else {
                    rest.to_string()
                };
                session.on_query_committed(&text);
                session.settle().await;
                render_result(session.result());
            }
            (":pick", rest) => {
                let chosen = rest
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| session.result().suggestions.get(i).cloned());

                match chosen {
                    Some(suggestion) => {
                        session.on_suggestion_chosen(&suggestion);
                        session.settle().await;
                        render_result(session.result());
                    }
                    None => println!("No such suggestion"),
                }
            }
            (cmd, _) if cmd.starts_with(':') => println!("{HELP}"),
            _ => {
                session.on_input_changed(line);
                session.settle().await;
                render_suggestions(session.result());
            }
        }
    }

    Ok(())
}

fn render_suggestions(result: &SearchResult) {
    if let Some(error) = &result.suggestion_error {
        println!("  ({error})");
        return;
    }
    if result.suggestions.is_empty() {
        println!("  (no suggestions)");
        return;
    }
    for (i, suggestion) in result.suggestions.iter().enumerate() {
        println!("  {}. {}", i + 1, suggestion.display_name);
    }
}

fn render_result(result: &SearchResult) {
    let query = result.committed_query.as_deref().unwrap_or_default();

    match result.status {
        SearchStatus::Failed => {
            println!("\nSearch for {query} failed");
            if let Some(error) = &result.error {
                println!("  {error}");
            }
        }
        SearchStatus::Idle => return,
        _ => println!("\n{query}"),
    }

    println!("\nWeather");
    match (&result.weather_section, &result.weather) {
        (SectionState::Unavailable(message), _) => println!("  {message}"),
        (_, Some(weather)) => {
            let temperature = weather
                .temperature_c
                .map(|t| format!("{t:.1}°C"))
                .unwrap_or_else(|| "--".to_string());
            let condition = weather
                .condition
                .clone()
                .or_else(|| weather.category().map(|c| c.description().to_string()))
                .unwrap_or_default();
            let place = match &weather.country {
                Some(country) => format!("{}, {}", weather.place_name, country),
                None => weather.place_name.clone(),
            };
            println!("  {place}: {temperature} {condition}");
            if let Some(humidity) = weather.humidity_pct {
                println!("  Humidity {humidity}%");
            }
            if let Some(pressure) = weather.pressure_hpa {
                println!("  Pressure {pressure:.0} hPa");
            }
            println!("  Precipitation {:.1} mm", weather.precipitation_mm);
        }
        (_, None) => println!("  No weather found for this place"),
    }

    if result.status == SearchStatus::Failed {
        return;
    }

    println!("\nPlaces");
    if let SectionState::Unavailable(message) = &result.places_section {
        println!("  {message}");
        return;
    }
    if result.places.is_empty() {
        println!("  No places listed");
    }
    for (i, place) in result.places.iter().enumerate() {
        if place.category.is_empty() {
            println!("  {}. {}", i + 1, place.name);
        } else {
            println!("  {}. {} [{}]", i + 1, place.name, place.category);
        }
        if !place.description.is_empty() {
            println!("     {}", place.description);
        }
    }
}
