use crate::ast::{Element, Node, NODE_ID_ATTR};

/// Serializer converts a tree back to markup
///
/// Output is compact (no added whitespace) so that serializing, parsing and
/// serializing again is byte-stable. The stable identifier is written first
/// as `data-node-id`, followed by the attributes in their stored order.
pub struct Serializer {
    include_ids: bool,
}

impl Serializer {
    pub fn new() -> Self {
        Self { include_ids: true }
    }

    /// Omit `data-node-id` attributes from the output
    pub fn without_ids() -> Self {
        Self { include_ids: false }
    }

    pub fn serialize_nodes(&self, nodes: &[Node]) -> String {
        let mut output = String::new();
        for node in nodes {
            self.write_node(node, &mut output);
        }
        output
    }

    pub fn serialize_element(&self, el: &Element) -> String {
        let mut output = String::new();
        self.write_element(el, &mut output);
        output
    }

    /// Markup of the element's children only
    pub fn inner_markup(&self, el: &Element) -> String {
        self.serialize_nodes(&el.children)
    }

    fn write_node(&self, node: &Node, output: &mut String) {
        match node {
            Node::Element(el) => self.write_element(el, output),
            Node::Text { content } => output.push_str(&html_escape::encode_text(content)),
        }
    }

    fn write_element(&self, el: &Element, output: &mut String) {
        output.push('<');
        output.push_str(&el.tag);

        if self.include_ids {
            if let Some(id) = &el.id {
                write_attribute(NODE_ID_ATTR, id.as_str(), output);
            }
        }
        for (name, value) in el.attributes.iter() {
            write_attribute(name, value, output);
        }
        output.push('>');

        if el.is_void() {
            return;
        }

        for child in &el.children {
            self.write_node(child, output);
        }

        output.push_str("</");
        output.push_str(&el.tag);
        output.push('>');
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

fn write_attribute(name: &str, value: &str, output: &mut String) {
    output.push(' ');
    output.push_str(name);
    output.push_str("=\"");
    output.push_str(&html_escape::encode_double_quoted_attribute(value));
    output.push('"');
}

/// Serialize nodes with identifiers included
pub fn serialize(nodes: &[Node]) -> String {
    Serializer::new().serialize_nodes(nodes)
}
