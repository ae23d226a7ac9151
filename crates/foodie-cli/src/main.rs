//! foodie — find somewhere to eat nearby.
//!
//! Line-driven front end over the discovery runtime: type a category (or
//! `search <anything>`), pick a result, or let `pick` choose for you.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use foodie_core::category::Category;
use foodie_core::config::{Config, MAX_RADIUS_KM};
use foodie_core::discovery::{Discovery, SessionEvent};
use foodie_core::place::Region;
use foodie_core::providers::estimate::GreatCircleRoutes;
use foodie_core::providers::local::{LocalSearch, PlaceBook};
use foodie_core::session::SessionSnapshot;

#[derive(Parser, Debug)]
#[command(name = "foodie", about = "Find nearby restaurants by category")]
struct Args {
    /// Path to a place dataset TOML (overrides the configured path).
    #[arg(long)]
    places: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "foodie_core=trace".
    #[arg(long, default_value = "warn")]
    log: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().context("loading config")?;
    info!("config loaded from {:?}", Config::config_path());

    let places_path = args.places.unwrap_or_else(|| config.paths.places_toml.clone());
    let book = if places_path.exists() {
        PlaceBook::load(&places_path)
            .with_context(|| format!("loading place dataset {places_path:?}"))?
    } else {
        warn!("no place dataset at {places_path:?}, using the built-in one");
        PlaceBook::builtin()?
    };
    info!("{} places loaded", book.len());

    let discovery = Discovery::new(
        LocalSearch::new(book),
        GreatCircleRoutes::default(),
        config.region(),
    );

    // Print session updates as the fire-and-forget requests resolve.
    let printer = discovery.clone();
    let mut events = discovery.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            let snap = printer.snapshot().await;
            match event {
                SessionEvent::ResultsUpdated => print_results(&snap),
                SessionEvent::SelectionChanged => print_selection(&snap),
                SessionEvent::RouteUpdated => print_route(&snap),
            }
        }
    });

    println!("foodie — type a category, `help` for commands");
    print_categories();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (cmd, rest) = match line.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match cmd {
            "" => {}
            "quit" | "exit" | "q" => break,
            "help" => print_help(),
            "show" => print_results(&discovery.snapshot().await),
            "snapshot" => {
                let snap = discovery.snapshot().await;
                println!("{}", serde_json::to_string_pretty(&snap)?);
            }
            "search" if !rest.is_empty() => discovery.start_search(rest).await,
            "select" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => {
                    let snap = discovery.snapshot().await;
                    match snap.results.get(n - 1) {
                        Some(place) => discovery.select(&place.id).await,
                        None => println!("no result #{n}"),
                    }
                }
                _ => println!("usage: select <number>"),
            },
            "back" => discovery.deselect().await,
            "pick" => {
                if discovery.snapshot().await.can_offer_random_pick {
                    discovery.choose_random().await;
                } else {
                    println!("nothing to pick from — search first");
                }
            }
            "again" => {
                if discovery.snapshot().await.can_offer_another_pick {
                    discovery.choose_another().await;
                } else {
                    println!("no other candidates left");
                }
            }
            "radius" => match rest.parse::<f64>() {
                Ok(km) if (0.0..=MAX_RADIUS_KM).contains(&km) => {
                    let region = discovery.region().await;
                    discovery
                        .set_region(Region::new(region.center, km * 1000.0))
                        .await;
                    println!("search radius set to {km} km");
                }
                _ => println!("usage: radius <0..={MAX_RADIUS_KM}>"),
            },
            other => match other.parse::<Category>() {
                Ok(category) => discovery.start_search(category.query()).await,
                Err(()) => println!("unknown command {other:?} — try `help`"),
            },
        }
    }

    Ok(())
}

fn print_categories() {
    let buttons: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("{} {}", c.label(), c.query()))
        .collect();
    println!("categories: {}", buttons.join("  "));
}

fn print_help() {
    print_categories();
    println!("  search <query>   free-text search");
    println!("  select <number>  select a result");
    println!("  back             clear the selection");
    println!("  pick             choose a restaurant for me");
    println!("  again            choose a different one");
    println!("  radius <km>      change the search radius");
    println!("  show / snapshot  current results (text / JSON)");
    println!("  quit");
}

fn print_results(snap: &SessionSnapshot) {
    if snap.results.is_empty() {
        println!("no places found");
        return;
    }
    for (i, place) in snap.results.iter().enumerate() {
        println!("{:>3}. {}", i + 1, place.name);
    }
    if snap.can_offer_random_pick {
        println!("({} places — `select <n>` or `pick`)", snap.results.len());
    }
}

fn print_selection(snap: &SessionSnapshot) {
    match &snap.selected {
        Some(place) => {
            print!("→ {}", place.name);
            if snap.can_offer_another_pick {
                print!("  (`again` for a different one)");
            }
            println!();
        }
        None => println!("selection cleared"),
    }
}

fn print_route(snap: &SessionSnapshot) {
    let (Some(place), Some(route)) = (&snap.selected, &snap.route) else {
        return;
    };
    let minutes = (route.expected_travel_time.as_secs_f64() / 60.0).ceil() as u64;
    println!(
        "  {:.1} km to {} — about {} min",
        route.distance_m / 1000.0,
        place.name,
        minutes.max(1)
    );
}
