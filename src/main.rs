use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use components::{ComponentConfig, MountContext, Registry, Services};
use core_types::{Location, PageParams, TemperatureUnit};
use html::Node;
use net::{MemoryCatalog, Reading};
use ssr::{RenderConfig, Session};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "prerender", version, about = "Server-render the weather page")]
struct Cli {
    /// Search for a location by name.
    #[arg(long, conflicts_with = "id")]
    search: Option<String>,

    /// Load a location by catalog id.
    #[arg(long)]
    id: Option<u64>,

    #[arg(long, value_enum, default_value_t = UnitChoice::Celsius)]
    unit: UnitChoice,

    /// Per-node readiness timeout; overrides PRERENDER_NODE_TIMEOUT_MS.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Simulated latency of every catalog request.
    #[arg(long, default_value_t = 120)]
    latency_ms: u64,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum UnitChoice {
    Celsius,
    Fahrenheit,
}

impl From<UnitChoice> for TemperatureUnit {
    fn from(choice: UnitChoice) -> Self {
        match choice {
            UnitChoice::Celsius => TemperatureUnit::Celsius,
            UnitChoice::Fahrenheit => TemperatureUnit::Fahrenheit,
        }
    }
}

fn place(id: u64, name: &str, country: &str, latitude: f64, longitude: f64) -> Location {
    Location {
        id,
        name: name.to_string(),
        country: country.to_string(),
        latitude,
        longitude,
        timezone: "Europe/Lisbon".to_string(),
        formatted_name: format!("{name}, {country}"),
    }
}

fn catalog(latency: Duration) -> MemoryCatalog {
    let reading = |temperature_c, apparent_c, is_day| {
        Some(Reading {
            temperature_c,
            apparent_c,
            is_day,
        })
    };
    MemoryCatalog::builder()
        .location(place(2267057, "Lisbon", "Portugal", 38.72, -9.13), reading(21.4, 20.9, true))
        .location(place(2735943, "Porto", "Portugal", 41.15, -8.61), reading(17.2, 16.0, true))
        .location(place(2268339, "Faro", "Portugal", 37.02, -7.93), reading(24.8, 25.5, true))
        .location(place(2742032, "Braga", "Portugal", 41.55, -8.42), reading(12.1, 10.7, false))
        .latency(latency)
        .build()
}

fn page() -> Node {
    let body = Node::element("body").with_children([
        Node::element("get-weather").with_child(Node::element("get-location")),
        Node::element("hr"),
        Node::element("p").with_child(Node::text("Weather data by Open-Meteo.com")),
    ]);
    let head = Node::element("head")
        .with_child(Node::element("meta").with_attr("charset", "utf-8"))
        .with_child(Node::element("title").with_child(Node::text("Weather")));
    Node::document([Node::element("html")
        .with_attr("lang", "en")
        .with_children([head, body])])
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut params = match (cli.search, cli.id) {
        (Some(search), _) => PageParams::search(search),
        (None, Some(id)) => PageParams::id(id),
        (None, None) => PageParams::default(),
    };
    params = params.with_unit(cli.unit.into());

    let mut config = RenderConfig::from_env();
    if let Some(ms) = cli.timeout_ms {
        config.per_node_timeout = Duration::from_millis(ms);
    }
    log::info!("rendering {params:?} with a {}ms node timeout", config.per_node_timeout.as_millis());

    let session = Session::new(config).context("failed to start the render session")?;
    let services = Services::from_catalog(catalog(Duration::from_millis(cli.latency_ms)));
    let context = MountContext::new(services, params).with_config(ComponentConfig::from_env());

    let mounted = session.enter(|| Registry::with_defaults(context).mount(page()));
    let rendered = session
        .render_with_report(mounted.root())
        .context("failed to render the page")?;
    for node in rendered.report.timed_out() {
        log::warn!("<{}> was emitted before it was ready", node.tag);
    }

    println!("{}", rendered.html);
    Ok(())
}
