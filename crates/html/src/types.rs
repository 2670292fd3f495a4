use std::fmt;
use std::rc::Rc;

use crate::component::Component;

/// `(name, value)`; `None` is a valueless attribute such as `disabled`.
pub type Attribute = (String, Option<String>);

#[derive(Clone)]
pub enum Node {
    /// The doctype is not part of the tree; the assembler writes it.
    Document {
        children: Vec<Node>,
    },
    Fragment {
        children: Vec<Node>,
    },
    Element {
        name: String,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
    /// A stateful element whose markup is produced at serialization time.
    Component(Rc<dyn Component>),
}

impl Node {
    pub fn element(name: impl Into<String>) -> Self {
        Node::Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Node::Comment { text: text.into() }
    }

    pub fn fragment(children: impl IntoIterator<Item = Node>) -> Self {
        Node::Fragment {
            children: children.into_iter().collect(),
        }
    }

    pub fn document(children: impl IntoIterator<Item = Node>) -> Self {
        Node::Document {
            children: children.into_iter().collect(),
        }
    }

    pub fn component(component: Rc<dyn Component>) -> Self {
        Node::Component(component)
    }

    /// Builder: set an attribute with a value. Only meaningful on elements.
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        if let Node::Element { attributes, .. } = &mut self {
            crate::dom_utils::set_attr(attributes, name, Some(value.into()));
        }
        self
    }

    /// Builder: set a valueless attribute.
    pub fn with_flag(mut self, name: &str) -> Self {
        if let Node::Element { attributes, .. } = &mut self {
            crate::dom_utils::set_attr(attributes, name, None);
        }
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        if let Some(children) = self.children_mut() {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, more: impl IntoIterator<Item = Node>) -> Self {
        if let Some(children) = self.children_mut() {
            children.extend(more);
        }
        self
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name),
            Node::Component(c) => Some(c.tag_name()),
            _ => None,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Node::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. }
            | Node::Fragment { children }
            | Node::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document { children, .. }
            | Node::Fragment { children }
            | Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn is_element_named(&self, tag: &str) -> bool {
        self.name().is_some_and(|n| n.eq_ignore_ascii_case(tag))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Document { children } => {
                f.debug_struct("Document").field("children", children).finish()
            }
            Node::Fragment { children } => {
                f.debug_struct("Fragment").field("children", children).finish()
            }
            Node::Element {
                name,
                attributes,
                children,
            } => f
                .debug_struct("Element")
                .field("name", name)
                .field("attributes", attributes)
                .field("children", children)
                .finish(),
            Node::Text { text } => f.debug_struct("Text").field("text", text).finish(),
            Node::Comment { text } => f.debug_struct("Comment").field("text", text).finish(),
            Node::Component(c) => f
                .debug_struct("Component")
                .field("tag", &c.tag_name())
                .finish_non_exhaustive(),
        }
    }
}
