use crate::types::{Attribute, Node};

/// Replace the value of `name` in place, or append it. Names stay unique.
pub fn set_attr(attributes: &mut Vec<Attribute>, name: &str, value: Option<String>) {
    if let Some(slot) = attributes
        .iter_mut()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
    {
        slot.1 = value;
    } else {
        attributes.push((name.to_string(), value));
    }
}

pub fn remove_attr(attributes: &mut Vec<Attribute>, name: &str) -> bool {
    let before = attributes.len();
    attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    attributes.len() != before
}

/// Toggle a valueless attribute.
pub fn toggle_flag(attributes: &mut Vec<Attribute>, name: &str, on: bool) {
    if on {
        if !has_attr(attributes, name) {
            attributes.push((name.to_string(), None));
        }
    } else {
        remove_attr(attributes, name);
    }
}

pub fn has_attr(attributes: &[Attribute], name: &str) -> bool {
    attributes.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
}

/// Value of `name`; a valueless attribute reads as `""`.
pub fn get_attr<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_deref().unwrap_or(""))
}

pub fn node_attr<'a>(node: &'a Node, name: &str) -> Option<&'a str> {
    get_attr(node.attributes(), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_attr_replaces_in_place() {
        let mut attrs = vec![
            ("a".to_string(), Some("1".to_string())),
            ("b".to_string(), None),
        ];
        set_attr(&mut attrs, "A", Some("2".into()));
        set_attr(&mut attrs, "c", None);
        assert_eq!(
            attrs,
            vec![
                ("a".to_string(), Some("2".to_string())),
                ("b".to_string(), None),
                ("c".to_string(), None),
            ]
        );
    }

    #[test]
    fn flags_toggle_without_duplicates() {
        let mut attrs = Vec::new();
        toggle_flag(&mut attrs, "fetching", true);
        toggle_flag(&mut attrs, "fetching", true);
        assert_eq!(attrs.len(), 1);
        assert_eq!(get_attr(&attrs, "fetching"), Some(""));
        toggle_flag(&mut attrs, "fetching", false);
        assert!(!has_attr(&attrs, "fetching"));
        assert!(!remove_attr(&mut attrs, "fetching"));
    }
}
