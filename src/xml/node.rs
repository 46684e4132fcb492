//! Element and node types plus the navigation/mutation helpers the
//! document object models are built from.

/// One node in an element's child list
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    Comment(String),
}

impl XmlNode {
    /// The contained element, if this node is one
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An element with its qualified name, attributes in document order and
/// ordered children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child element
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Builder-style text child
    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(XmlNode::Text(text.to_string()));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing one of the same name
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.attrs.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value.to_string();
        } else {
            self.attrs.push((name.to_string(), value.to_string()));
        }
    }

    pub fn push_element(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    pub fn push_text(&mut self, text: &str) {
        self.children.push(XmlNode::Text(text.to_string()));
    }

    /// Child elements in order
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(XmlNode::as_element_mut)
    }

    /// First child element with the given qualified name
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|el| el.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|el| el.name == name)
    }

    /// Number of child elements with the given qualified name
    pub fn count(&self, name: &str) -> usize {
        self.elements().filter(|el| el.name == name).count()
    }

    /// Concatenated text of this element's direct text children
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let XmlNode::Text(t) = child {
                out.push_str(t);
            }
        }
        out
    }

    /// Concatenated text of every descendant element with the given name,
    /// in document order
    pub fn gather_text(&self, name: &str) -> String {
        let mut out = String::new();
        gather_text_into(self, name, &mut out);
        out
    }

    /// Visit every descendant element (self excluded) with the given name,
    /// depth-first in document order
    pub fn visit_named_mut<F>(&mut self, name: &str, f: &mut F)
    where
        F: FnMut(&mut XmlElement),
    {
        for child in self.elements_mut() {
            if child.name == name {
                f(child);
            }
            child.visit_named_mut(name, f);
        }
    }

    /// Immutable counterpart of [`visit_named_mut`](Self::visit_named_mut)
    pub fn visit_named<F>(&self, name: &str, f: &mut F)
    where
        F: FnMut(&XmlElement),
    {
        for child in self.elements() {
            if child.name == name {
                f(child);
            }
            child.visit_named(name, f);
        }
    }

    /// True when any descendant element carries the given name
    pub fn has_descendant(&self, name: &str) -> bool {
        let mut found = false;
        self.visit_named(name, &mut |_| found = true);
        found
    }
}

fn gather_text_into(el: &XmlElement, name: &str, out: &mut String) {
    for child in el.elements() {
        if child.name == name {
            out.push_str(&child.text());
        }
        gather_text_into(child, name, out);
    }
}
