use core_types::{Location, TemperatureUnit, Weather};
use html::Node;

/// The serializer writes text and attribute values verbatim, so anything
/// user- or service-provided is escaped here.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn flagged(node: Node, name: &str, on: bool) -> Node {
    if on { node.with_flag(name) } else { node }
}

pub(crate) fn search_form(
    search: &str,
    unit: TemperatureUnit,
    disabled: bool,
    geolocation: bool,
) -> Node {
    let mut input = Node::element("input")
        .with_attr("type", "search")
        .with_attr("name", "search")
        .with_attr("placeholder", "Location…")
        .with_flag("autofocus");
    if !search.is_empty() {
        input = input.with_attr("value", escape(search));
    }
    let input = flagged(input, "disabled", disabled);

    let options = [TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit].map(|option| {
        flagged(
            Node::element("option").with_attr("value", option.as_str()),
            "selected",
            option == unit,
        )
        .with_child(Node::text(option.symbol()))
    });
    let select = Node::element("select")
        .with_attr("name", "unit")
        .with_children(options);

    let label = Node::element("label").with_children([
        Node::element("span").with_child(Node::text("Location:")),
        input,
        select,
    ]);
    let submit = flagged(
        Node::element("button").with_attr("type", "submit"),
        "disabled",
        disabled,
    )
    .with_child(Node::text("Search"));

    let mut row = Node::element("p").with_children([label, submit]);
    if geolocation {
        row = row.with_child(
            Node::element("button")
                .with_attr("type", "button")
                .with_flag("data-geo")
                .with_child(Node::text("Use my location")),
        );
    }
    Node::element("form").with_child(row)
}

pub(crate) fn location_list(locations: &[Location]) -> Node {
    Node::element("ul").with_children(locations.iter().map(|loc| {
        Node::element("li").with_child(
            Node::element("a")
                .with_attr("href", format!("/?id={}", loc.id))
                .with_child(Node::text(escape(&loc.formatted_name))),
        )
    }))
}

pub(crate) fn current_conditions(weather: &Weather) -> Node {
    let symbol = weather.unit.symbol();
    let place = if weather.location.country.is_empty() {
        escape(&weather.location.name)
    } else {
        escape(&format!(
            "{}, {}",
            weather.location.name, weather.location.country
        ))
    };
    let reading = |label: &str, value: f64| {
        Node::element("p").with_children([
            Node::text(format!("{label}: ")),
            Node::element("strong").with_child(Node::text(format!("{value}{symbol}"))),
        ])
    };
    Node::element("div").with_flag("data-results").with_children([
        Node::element("h1").with_child(Node::text(place)),
        Node::element("h2").with_child(Node::text("Current Conditions")),
        Node::element("div").with_attr("class", "temps").with_children([
            reading("Temp", weather.temperature),
            reading("Feels like", weather.apparent_temperature),
        ]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_significant_characters() {
        assert_eq!(escape(r#"<a href="x">&"#), "&lt;a href=&quot;x&quot;&gt;&amp;");
        assert_eq!(escape("Lisbon"), "Lisbon");
    }

    #[test]
    fn selected_option_follows_unit() {
        let form = search_form("", TemperatureUnit::Fahrenheit, false, false);
        let selected = html::traverse::find_by_attr(&form, "selected").unwrap();
        assert_eq!(html::dom_utils::node_attr(selected, "value"), Some("fahrenheit"));
        assert!(html::traverse::find_by_attr(&form, "data-geo").is_none());
        assert!(html::traverse::find_by_attr(&form, "disabled").is_none());
    }
}
