pub type NodeIndex = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub NodeIndex);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document {
        doctype: Option<String>,
    },
    Element {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        // Inline style declarations, written by property fixes.
        style: Vec<(String, String)>,
        // Raw serialized inner markup, opaque to the engine.
        content: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Arena-owned document tree. Node 0 is always the document node.
///
/// Parent links are set when a node is inserted and never reassigned;
/// reconciliation mutates content/attributes/children but does not re-parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document { doctype: None },
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0 as usize]
    }

    fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0 as usize]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn add_element(
        &mut self,
        parent: NodeId,
        name: String,
        attributes: Vec<(String, Option<String>)>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as NodeIndex);
        self.nodes.push(NodeData {
            kind: NodeKind::Element {
                name,
                attributes,
                style: Vec::new(),
                content: String::new(),
            },
            parent: Some(parent),
            children: Vec::new(),
        });
        self.get_mut(parent).children.push(id);
        id
    }

    pub fn set_doctype(&mut self, doctype: String) {
        if let NodeKind::Document { doctype: dt } = &mut self.get_mut(self.root()).kind {
            *dt = Some(doctype);
        }
    }

    pub fn doctype(&self) -> Option<&str> {
        match &self.get(self.root()).kind {
            NodeKind::Document { doctype } => doctype.as_deref(),
            _ => None,
        }
    }

    pub fn is_document(&self, id: NodeId) -> bool {
        matches!(self.get(id).kind, NodeKind::Document { .. })
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.get(id).kind, NodeKind::Element { .. })
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    /// True when the node hangs directly off the document node.
    pub fn parent_is_document(&self, id: NodeId) -> bool {
        match self.parent(id) {
            Some(p) => self.is_document(p),
            None => false,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.get(id).kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn attributes(&self, id: NodeId) -> &[(String, Option<String>)] {
        match &self.get(id).kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn set_attr(&mut self, id: NodeId, key: &str, value: String) {
        let NodeKind::Element { attributes, .. } = &mut self.get_mut(id).kind else {
            return;
        };
        if let Some(slot) = attributes.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            slot.1 = Some(value);
        } else {
            attributes.push((key.to_string(), Some(value)));
        }
    }

    pub fn content(&self, id: NodeId) -> &str {
        match &self.get(id).kind {
            NodeKind::Element { content, .. } => content,
            _ => "",
        }
    }

    pub fn set_content(&mut self, id: NodeId, new_content: String) {
        if let NodeKind::Element { content, .. } = &mut self.get_mut(id).kind {
            *content = new_content;
        }
    }

    // --- class tokens ---

    pub fn class_tokens(&self, id: NodeId) -> Vec<&str> {
        self.attr(id, "class")
            .map(|v| v.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class_token(&self, id: NodeId, token: &str) -> bool {
        self.class_tokens(id).iter().any(|t| *t == token)
    }

    /// Additive union: appends `token` to the class set unless present.
    /// Returns whether the set changed.
    pub fn add_class_token(&mut self, id: NodeId, token: &str) -> bool {
        if token.is_empty() || self.has_class_token(id, token) {
            return false;
        }
        let merged = match self.attr(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {token}"),
            _ => token.to_string(),
        };
        self.set_attr(id, "class", merged);
        true
    }

    /// Drops `token` from the class set, keeping the remaining tokens in
    /// order. Returns whether the set changed.
    pub fn remove_class_token(&mut self, id: NodeId, token: &str) -> bool {
        if !self.has_class_token(id, token) {
            return false;
        }
        let remaining = self
            .class_tokens(id)
            .into_iter()
            .filter(|t| *t != token)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(id, "class", remaining);
        true
    }

    // --- inline style ---

    pub fn style(&self, id: NodeId) -> &[(String, String)] {
        match &self.get(id).kind {
            NodeKind::Element { style, .. } => style,
            _ => &[],
        }
    }

    pub fn style_value(&self, id: NodeId, property: &str) -> Option<&str> {
        self.style(id)
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(property))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) {
        let NodeKind::Element { style, .. } = &mut self.get_mut(id).kind else {
            return;
        };
        if let Some(slot) = style.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(property)) {
            slot.1 = value.to_string();
        } else {
            style.push((property.to_string(), value.to_string()));
        }
    }

    // --- cross-tree copy ---

    /// Deep-copies a subtree out of `src` and appends it under `parent`.
    /// The source tree is left untouched; the copy gets fresh ids in this arena.
    pub fn copy_subtree(&mut self, parent: NodeId, src: &Tree, src_id: NodeId) -> Option<NodeId> {
        let NodeKind::Element {
            name,
            attributes,
            style,
            content,
        } = &src.get(src_id).kind
        else {
            return None;
        };
        let id = self.add_element(parent, name.clone(), attributes.clone());
        self.set_content(id, content.clone());
        for (k, v) in style {
            self.set_style_property(id, k, v);
        }
        for &child in src.children(src_id) {
            self.copy_subtree(id, src, child);
        }
        Some(id)
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
