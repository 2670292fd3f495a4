mod support;

use std::time::Duration;

use components::{ClickTarget, ComponentEvent, LocationSearch, Propagation, WeatherReport};
use core_types::{GeoPosition, PageParams, TemperatureUnit};
use html::{Component, Node};
use html_test_support::{drain, location};
use net::{FetchError, LocationQuery};
use readiness::{Outcome, ReadinessError};
use ssr::{ReadinessOutcome, RenderConfig, render_document, render_with_report};
use tokio::task::LocalSet;

use support::{Harness, conditions, page};

fn outcomes(history: Vec<readiness::OperationRecord>) -> Vec<Option<Outcome>> {
    history.into_iter().map(|r| r.outcome).collect()
}

#[tokio::test(start_paused = true)]
async fn search_params_render_once_both_fetches_land() {
    LocalSet::new()
        .run_until(async {
            let h = Harness::new();
            let mounted = h.mount(PageParams::search("Lisbon"));
            assert_eq!(
                h.locations.queries(),
                vec![LocationQuery::Search("Lisbon".into())]
            );

            let root = mounted.root().clone();
            let render = tokio::task::spawn_local(async move {
                render_document(&root, &RenderConfig::default()).await
            });
            drain().await;
            assert!(!render.is_finished(), "weather is armed until located");

            let lisbon = location(1, "Lisbon");
            assert!(h.locations.respond(0, Ok(vec![lisbon.clone()])));
            drain().await;
            assert_eq!(h.weather_queries(), vec![(1, TemperatureUnit::Celsius)]);

            assert!(h.weather.respond(0, Ok(conditions(&lisbon, TemperatureUnit::Celsius, 21.5))));
            let html = render.await.unwrap().unwrap();

            assert!(html.starts_with("<!doctype html><html><body><get-weather mode=\"day\">"));
            assert!(html.contains(r#"value="Lisbon""#));
            assert!(html.contains(r#"<li><a href="/?id=1">Lisbon, Portugal</a></li>"#));
            assert!(html.contains("<h1>Lisbon, Portugal</h1>"));
            assert!(html.contains("<strong>21.5ºC</strong>"));
            assert!(html.ends_with("</get-weather><hr></body></html>"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn slow_first_search_never_overwrites_the_newer_one() {
    LocalSet::new()
        .run_until(async {
            let h = Harness::new();
            let mounted = h.mount(PageParams::default());
            for search in ["Lis", "Porto"] {
                let stop = mounted.dispatch(
                    "get-location",
                    &ComponentEvent::Submit {
                        search: search.into(),
                    },
                );
                assert_eq!(stop, Some(Propagation::Stop));
            }
            assert_eq!(h.locations.calls(), 2);

            let porto = location(2, "Porto");
            h.locations.respond(1, Ok(vec![porto.clone()]));
            drain().await;
            h.locations.respond(0, Ok(vec![location(1, "Lisbon")]));
            drain().await;

            let search = mounted.get::<LocationSearch>().unwrap();
            assert_eq!(search.locations(), vec![porto]);
            assert_eq!(
                outcomes(search.history()),
                vec![Some(Outcome::Stale), Some(Outcome::Applied)]
            );
            assert_eq!(h.weather_queries(), vec![(2, TemperatureUnit::Celsius)]);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn detaching_mid_flight_applies_nothing() {
    LocalSet::new()
        .run_until(async {
            let h = Harness::new();
            let mut mounted = h.mount(PageParams::search("Lisbon"));
            let root = mounted.root().clone();
            let search = mounted.get::<LocationSearch>().unwrap();
            let weather = mounted.get::<WeatherReport>().unwrap();
            let waiting = weather.readiness().unwrap();
            assert!(!waiting.is_ready(), "weather is armed until located");

            mounted.detach();
            assert_eq!(
                tokio::time::timeout(Duration::from_millis(1), waiting.wait()).await,
                Ok(Err(ReadinessError::Abandoned))
            );
            drain().await;
            assert!(!h.locations.respond(0, Ok(vec![location(1, "Lisbon")])));
            drain().await;

            assert_eq!(h.weather.calls(), 0);
            assert_eq!(outcomes(search.history()), vec![Some(Outcome::Cancelled)]);

            let config = RenderConfig::default().with_timeout(Duration::from_millis(50));
            let start = tokio::time::Instant::now();
            let rendered = render_with_report(&root, &config).await.unwrap();
            assert_eq!(start.elapsed(), Duration::ZERO);
            assert_eq!(
                rendered.report.outcome_for("get-weather"),
                Some(ReadinessOutcome::Immediate)
            );
            assert!(!rendered.html.contains("data-results"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn detached_search_never_reaches_the_attached_weather() {
    LocalSet::new()
        .run_until(async {
            let h = Harness::new();
            let mounted = h.mount(PageParams::search("Lisbon"));
            let search = mounted.get::<LocationSearch>().unwrap();
            let weather = mounted.get::<WeatherReport>().unwrap();

            mounted.find("get-location").unwrap().element().disconnected();
            drain().await;
            assert!(!h.locations.respond(0, Ok(vec![location(1, "Lisbon")])));
            let stop = mounted.dispatch(
                "get-location",
                &ComponentEvent::Submit {
                    search: "Porto".into(),
                },
            );
            assert_eq!(stop, Some(Propagation::Stop));
            drain().await;

            assert_eq!(
                outcomes(search.history()),
                vec![Some(Outcome::Cancelled), Some(Outcome::Cancelled)]
            );
            assert!(search.locations().is_empty());
            assert_eq!(h.weather.calls(), 0);
            assert_eq!(weather.weather(), None);
            assert!(weather.history().is_empty());
            assert!(!weather.readiness().unwrap().is_ready(), "weather is still attached");

            let lisbon = location(1, "Lisbon");
            mounted.dispatch(
                "get-weather",
                &ComponentEvent::Located {
                    location: lisbon.clone(),
                    unit: TemperatureUnit::Celsius,
                },
            );
            drain().await;
            assert_eq!(h.weather_queries(), vec![(1, TemperatureUnit::Celsius)]);
            assert!(h.weather.respond(0, Ok(conditions(&lisbon, TemperatureUnit::Celsius, 18.0))));
            drain().await;
            assert_eq!(weather.weather().map(|w| w.temperature), Some(18.0));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn typed_input_is_debounced_and_deduplicated() {
    LocalSet::new()
        .run_until(async {
            let h = Harness::new();
            let mounted = h.mount(PageParams::default());
            let input = |value: &str| {
                mounted.dispatch(
                    "get-location",
                    &ComponentEvent::Input {
                        value: value.into(),
                    },
                )
            };

            input("Li");
            tokio::time::sleep(Duration::from_millis(300)).await;
            assert_eq!(h.locations.calls(), 0, "too short to search");

            input("Lis");
            tokio::time::sleep(Duration::from_millis(100)).await;
            input("Lisb");
            tokio::time::sleep(Duration::from_millis(300)).await;
            assert_eq!(
                h.locations.queries(),
                vec![LocationQuery::Search("Lisb".into())]
            );

            input("Lisb");
            tokio::time::sleep(Duration::from_millis(300)).await;
            assert_eq!(h.locations.calls(), 1, "same as last search");
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn id_params_fetch_by_id_without_a_search() {
    LocalSet::new()
        .run_until(async {
            let h = Harness::new();
            let params = PageParams::id(5).with_unit(TemperatureUnit::Fahrenheit);
            let mounted = h.mount(params);
            drain().await;
            assert_eq!(h.locations.queries(), vec![LocationQuery::Id(5)]);

            let faro = location(5, "Faro");
            h.locations.respond(0, Ok(vec![faro.clone()]));
            drain().await;
            assert_eq!(h.weather_queries(), vec![(5, TemperatureUnit::Fahrenheit)]);
            h.weather
                .respond(0, Ok(conditions(&faro, TemperatureUnit::Fahrenheit, 70.0)));
            drain().await;

            let html = render_document(mounted.root(), &RenderConfig::default())
                .await
                .unwrap();
            assert!(html.contains("<strong>70ºF</strong>"));
            assert!(html.contains(r#"<option selected="" value="fahrenheit">"#));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn failed_lookup_still_makes_the_node_ready() {
    LocalSet::new()
        .run_until(async {
            let h = Harness::new();
            let mounted = h.mount(PageParams::id(404));
            drain().await;
            h.locations
                .respond(0, Err(FetchError::NotFound("location 404".into())));
            drain().await;

            let report = render_with_report(mounted.root(), &RenderConfig::default())
                .await
                .unwrap()
                .report;
            assert_eq!(
                report.outcome_for("get-weather"),
                Some(ReadinessOutcome::Immediate)
            );
            let weather = mounted.get::<WeatherReport>().unwrap();
            assert_eq!(outcomes(weather.history()), vec![Some(Outcome::Failed)]);
            assert!(weather.weather().is_none());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn prerendered_results_are_kept_and_nothing_is_fetched() {
    LocalSet::new()
        .run_until(async {
            let h = Harness::new();
            let results = Node::element("div")
                .with_flag("data-results")
                .with_child(Node::text("cached"));
            let mounted = h
                .registry(PageParams::id(1))
                .mount(page(vec![results]));
            drain().await;
            assert_eq!(h.locations.calls(), 0);

            let html = render_document(mounted.root(), &RenderConfig::default())
                .await
                .unwrap();
            assert!(html.contains(r#"<div data-results="">cached</div></get-weather>"#));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn unit_change_refetches_the_chosen_location() {
    LocalSet::new()
        .run_until(async {
            let h = Harness::new();
            let mounted = h.mount(PageParams::search("Porto"));
            let porto = location(2, "Porto");
            h.locations.respond(0, Ok(vec![porto.clone()]));
            drain().await;
            h.weather
                .respond(0, Ok(conditions(&porto, TemperatureUnit::Celsius, 15.0)));
            drain().await;

            mounted.dispatch(
                "get-location",
                &ComponentEvent::UnitChange {
                    unit: TemperatureUnit::Fahrenheit,
                },
            );
            drain().await;
            assert_eq!(
                h.weather_queries(),
                vec![
                    (2, TemperatureUnit::Celsius),
                    (2, TemperatureUnit::Fahrenheit)
                ]
            );
            h.weather
                .respond(1, Ok(conditions(&porto, TemperatureUnit::Fahrenheit, 59.0)));
            drain().await;
            let weather = mounted.get::<WeatherReport>().unwrap().weather().unwrap();
            assert_eq!(weather.unit, TemperatureUnit::Fahrenheit);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn location_link_click_clears_the_list_and_loads_by_id() {
    LocalSet::new()
        .run_until(async {
            let h = Harness::new();
            let mounted = h.mount(PageParams::search("Fa"));
            h.locations
                .respond(0, Ok(vec![location(5, "Faro"), location(6, "Fafe")]));
            drain().await;

            let stop = mounted.dispatch(
                "get-location",
                &ComponentEvent::Click(ClickTarget::LocationLink(6)),
            );
            assert_eq!(stop, Some(Propagation::Stop));
            drain().await;
            let search = mounted.get::<LocationSearch>().unwrap();
            assert!(search.locations().is_empty());
            assert_eq!(search.search_value(), "");
            assert_eq!(h.locations.queries()[1], LocationQuery::Id(6));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn geo_button_reports_an_ad_hoc_location() {
    LocalSet::new()
        .run_until(async {
            let h = Harness::new();
            let mounted = h.mount(PageParams::default());
            mounted.dispatch("get-location", &ComponentEvent::Click(ClickTarget::GeoButton));
            assert_eq!(h.geolocation.calls(), 1);

            h.geolocation.respond(
                0,
                Ok(Some(GeoPosition {
                    latitude: 38.7,
                    longitude: -9.1,
                    name: "Here".into(),
                })),
            );
            drain().await;
            let queries = h.weather.queries();
            assert_eq!(queries.len(), 1);
            assert!(queries[0].location.is_ad_hoc());
            assert_eq!(queries[0].location.name, "Here");
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn disabled_search_ignores_submit_and_cascades() {
    LocalSet::new()
        .run_until(async {
            let h = Harness::new();
            let mounted = h.mount(PageParams::default());
            let search = mounted.get::<LocationSearch>().unwrap();
            search.set_disabled(true);

            mounted.dispatch(
                "get-location",
                &ComponentEvent::Submit {
                    search: "Lisbon".into(),
                },
            );
            assert_eq!(h.locations.calls(), 0);

            let html = render_document(mounted.root(), &RenderConfig::default())
                .await
                .unwrap();
            assert!(html.contains(r#"<get-location disabled="">"#));
            assert!(html.contains(r#"<button disabled="" type="submit">"#));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn params_change_is_broadcast_to_every_element() {
    LocalSet::new()
        .run_until(async {
            let h = Harness::new();
            let mounted = h.mount(PageParams::default());
            mounted.broadcast(&ComponentEvent::ParamsChange(PageParams::search("Braga")));
            assert_eq!(
                h.locations.queries(),
                vec![LocationQuery::Search("Braga".into())]
            );

            mounted.broadcast(&ComponentEvent::ParamsChange(PageParams::id(9)));
            drain().await;
            assert_eq!(h.locations.queries()[1], LocationQuery::Id(9));
        })
        .await;
}
