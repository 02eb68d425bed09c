use std::collections::{BTreeMap, HashMap};

use anyhow::{anyhow, bail};

use crate::foundation::core::{join_plug, split_plug};
use crate::host::{AttrSpec, Scene};
use crate::host::schema::{AttrDef, NodeSchema, builtin_schemas};
use crate::provenance::value::Primitive;

/// Container bookkeeping kept by [`MemoryScene`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContainerRecord {
    /// Nodes grouped into the container, in grouping order.
    pub nodes: Vec<String>,
    /// Published plugs as `(plug, exposed name)`.
    pub published: Vec<(String, String)>,
    /// Metadata note, if one was written.
    pub notes: Option<String>,
}

#[derive(Clone, Debug)]
struct NodeRecord {
    node_type: String,
    schema: NodeSchema,
}

#[derive(Clone, Debug, PartialEq)]
enum AttrKind {
    Scalar,
    Compound(Vec<String>),
    Child { parent: String },
    /// Element of a multi attribute, or a child below one.
    Indexed { compound: Option<Vec<String>> },
}

#[derive(Clone, Debug)]
struct Resolved {
    /// Long-name attribute path.
    path: String,
    kind: AttrKind,
    default: f64,
}

/// Deterministic in-memory scene graph.
///
/// Nodes carry the attribute layouts of the built-in node types (see `host::schema`). Values are
/// stored per plug; connections are recorded but not evaluated.
#[derive(Clone, Debug)]
pub struct MemoryScene {
    schemas: HashMap<String, NodeSchema>,
    nodes: BTreeMap<String, NodeRecord>,
    creation_order: Vec<String>,
    values: HashMap<String, f64>,
    /// destination plug -> source plug
    connections: BTreeMap<String, String>,
    containers: BTreeMap<String, ContainerRecord>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScene {
    pub fn new() -> Self {
        Self {
            schemas: builtin_schemas(),
            nodes: BTreeMap::new(),
            creation_order: Vec::new(),
            values: HashMap::new(),
            connections: BTreeMap::new(),
            containers: BTreeMap::new(),
        }
    }

    /// Create a `transform` node with exactly the given name.
    pub fn add_transform(&mut self, name: &str) -> anyhow::Result<String> {
        if self.nodes.contains_key(name) {
            bail!("node '{name}' already exists");
        }
        self.create_node("transform", name)
    }

    /// Add a scalar user attribute to an existing node.
    ///
    /// Names already taken by an attribute or by a compound child (`tx`, `outputX`) are
    /// rejected, so every name keeps resolving to one plug.
    pub fn add_attribute(&mut self, node: &str, long: &str, default: f64) -> anyhow::Result<()> {
        if long.is_empty() || long.contains(['.', '[', ']']) {
            bail!("invalid attribute name '{long}'");
        }
        let record = self
            .nodes
            .get_mut(node)
            .ok_or_else(|| anyhow!("no node '{node}'"))?;
        let taken = record.schema.attr(long).is_some()
            || record.schema.attrs.iter().any(|d| d.child(long).is_some());
        if taken {
            bail!("attribute '{node}.{long}' already exists");
        }
        record
            .schema
            .attrs
            .push(AttrDef::scalar(long, None).with_default(default));
        Ok(())
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> &[String] {
        &self.creation_order
    }

    /// Nodes of a given type, in creation order.
    pub fn nodes_of_type(&self, node_type: &str) -> Vec<String> {
        self.creation_order
            .iter()
            .filter(|n| self.node_type_of(n).as_deref() == Some(node_type))
            .cloned()
            .collect()
    }

    /// All connections as `(source, destination)` long-name plugs, sorted by destination.
    pub fn connections(&self) -> Vec<(String, String)> {
        self.connections
            .iter()
            .map(|(dst, src)| (src.clone(), dst.clone()))
            .collect()
    }

    /// Source connected into `plug`, if any.
    pub fn source_of(&self, plug: &str) -> Option<String> {
        let canonical = self.canonical(plug)?;
        self.connections.get(&canonical).cloned()
    }

    /// Stored (or default) scalar value of `plug`.
    pub fn value_of(&self, plug: &str) -> Option<f64> {
        let (node, attr) = split_plug(plug)?;
        let resolved = self.resolve(node, attr)?;
        let key = join_plug(node, &resolved.path);
        Some(self.values.get(&key).copied().unwrap_or(resolved.default))
    }

    pub fn container(&self, name: &str) -> Option<&ContainerRecord> {
        self.containers.get(name)
    }

    fn canonical(&self, plug: &str) -> Option<String> {
        let (node, attr) = split_plug(plug)?;
        let resolved = self.resolve(node, attr)?;
        Some(join_plug(node, &resolved.path))
    }

    fn resolve(&self, node: &str, attr: &str) -> Option<Resolved> {
        let schema = &self.nodes.get(node)?.schema;
        let mut segments = attr.splitn(2, '.');
        let head = segments.next()?;
        let tail = segments.next();
        let (name, index) = parse_indexed(head)?;

        let Some(def) = schema.attr(name) else {
            // a bare child name (`tx`, `outputX`) addresses the child of a compound
            if index.is_some() || tail.is_some() {
                return None;
            }
            return schema.attrs.iter().find_map(|def| {
                let c = def.child(name)?;
                (!def.multi).then(|| Resolved {
                    path: c.long.clone(),
                    kind: AttrKind::Child {
                        parent: def.long.clone(),
                    },
                    default: def.default,
                })
            });
        };

        if index.is_some() && !def.multi {
            return None;
        }
        if def.multi && index.is_none() && tail.is_some() {
            return None;
        }

        let child_longs = || -> Vec<String> { def.children.iter().map(|c| c.long.clone()).collect() };

        let (path, kind) = match (index, tail) {
            (None, None) if def.is_compound() => {
                (def.long.clone(), AttrKind::Compound(child_longs()))
            }
            (None, None) => (def.long.clone(), AttrKind::Scalar),
            (None, Some(child)) => {
                let c = def.child(child)?;
                (
                    c.long.clone(),
                    AttrKind::Child {
                        parent: def.long.clone(),
                    },
                )
            }
            (Some(i), None) => (
                format!("{}[{i}]", def.long),
                AttrKind::Indexed {
                    compound: def.is_compound().then(child_longs),
                },
            ),
            (Some(i), Some(child)) => {
                let c = def.child(child)?;
                (
                    format!("{}[{i}].{}", def.long, c.long),
                    AttrKind::Indexed { compound: None },
                )
            }
        };
        Some(Resolved {
            path,
            kind,
            default: def.default,
        })
    }

    fn resolve_plug(&self, plug: &str) -> anyhow::Result<(String, Resolved)> {
        let (node, attr) = split_plug(plug).ok_or_else(|| anyhow!("malformed plug '{plug}'"))?;
        let resolved = self
            .resolve(node, attr)
            .ok_or_else(|| anyhow!("no such plug '{plug}'"))?;
        Ok((node.to_owned(), resolved))
    }

    fn channel_count(kind: &AttrKind) -> usize {
        match kind {
            AttrKind::Compound(children) => children.len(),
            AttrKind::Indexed {
                compound: Some(children),
            } => children.len(),
            _ => 1,
        }
    }

    fn unique_name(&self, name: &str) -> String {
        if !self.nodes.contains_key(name) {
            return name.to_owned();
        }
        let mut i = 1usize;
        loop {
            let candidate = format!("{name}{i}");
            if !self.nodes.contains_key(&candidate) {
                return candidate;
            }
            i += 1;
        }
    }
}

/// Split `input3D[2]` into (`input3D`, Some(2)).
fn parse_indexed(segment: &str) -> Option<(&str, Option<usize>)> {
    match segment.split_once('[') {
        None => Some((segment, None)),
        Some((name, rest)) => {
            let idx = rest.strip_suffix(']')?.parse().ok()?;
            Some((name, Some(idx)))
        }
    }
}

impl Scene for MemoryScene {
    fn object_exists(&self, path: &str) -> bool {
        match split_plug(path) {
            Some((node, attr)) => self.resolve(node, attr).is_some(),
            None => self.nodes.contains_key(path),
        }
    }

    fn attribute_children(&self, node: &str, attr: &str) -> Option<Vec<String>> {
        match self.resolve(node, attr)?.kind {
            AttrKind::Compound(children) => Some(children),
            _ => None,
        }
    }

    fn attribute_parent(&self, node: &str, attr: &str) -> Option<String> {
        match self.resolve(node, attr)?.kind {
            AttrKind::Child { parent } => Some(parent),
            _ => None,
        }
    }

    fn attribute_long_name(&self, node: &str, attr: &str) -> Option<String> {
        self.resolve(node, attr).map(|r| r.path)
    }

    fn get_attribute_value(&self, plug: &str) -> anyhow::Result<Primitive> {
        let (node, resolved) = self.resolve_plug(plug)?;
        let read = |path: &str| {
            self.values
                .get(&join_plug(&node, path))
                .copied()
                .unwrap_or(resolved.default)
        };
        Ok(match &resolved.kind {
            AttrKind::Compound(children) => {
                Primitive::List(children.iter().map(|c| read(c)).collect())
            }
            AttrKind::Indexed {
                compound: Some(children),
            } => Primitive::List(
                children
                    .iter()
                    .map(|c| read(&format!("{}.{c}", resolved.path)))
                    .collect(),
            ),
            _ => Primitive::Number(read(&resolved.path)),
        })
    }

    fn set_attribute_value(&mut self, plug: &str, value: f64) -> anyhow::Result<()> {
        let (node, resolved) = self.resolve_plug(plug)?;
        if Self::channel_count(&resolved.kind) != 1 {
            bail!("cannot set compound plug '{plug}' from a single value");
        }
        self.values.insert(join_plug(&node, &resolved.path), value);
        Ok(())
    }

    fn add_user_attribute(
        &mut self,
        node: &str,
        name: &str,
        spec: &AttrSpec,
    ) -> anyhow::Result<()> {
        self.add_attribute(node, name, spec.default)
    }

    fn connect(&mut self, source: &str, dest: &str, force: bool) -> anyhow::Result<()> {
        let (src_node, src) = self.resolve_plug(source)?;
        let (dst_node, dst) = self.resolve_plug(dest)?;
        let (src_n, dst_n) = (
            Self::channel_count(&src.kind),
            Self::channel_count(&dst.kind),
        );
        if src_n != dst_n {
            bail!("cannot connect {src_n}-channel '{source}' to {dst_n}-channel '{dest}'");
        }
        let src_plug = join_plug(&src_node, &src.path);
        let dst_plug = join_plug(&dst_node, &dst.path);
        if src_plug == dst_plug {
            bail!("cannot connect '{source}' to itself");
        }
        if let Some(existing) = self.connections.get(&dst_plug)
            && !force
        {
            bail!("'{dest}' is already connected from '{existing}'");
        }
        tracing::trace!(source = %src_plug, dest = %dst_plug, "memory scene connect");
        self.connections.insert(dst_plug, src_plug);
        Ok(())
    }

    fn create_node(&mut self, node_type: &str, name: &str) -> anyhow::Result<String> {
        let schema = self
            .schemas
            .get(node_type)
            .cloned()
            .ok_or_else(|| anyhow!("unknown node type '{node_type}'"))?;
        if name.is_empty() || name.contains('.') {
            bail!("invalid node name '{name}'");
        }
        let unique = self.unique_name(name);
        self.nodes.insert(
            unique.clone(),
            NodeRecord {
                node_type: node_type.to_owned(),
                schema,
            },
        );
        self.creation_order.push(unique.clone());
        Ok(unique)
    }

    fn node_type_of(&self, node: &str) -> Option<String> {
        self.nodes.get(node).map(|r| r.node_type.clone())
    }

    fn list_connections(&self, node: &str) -> Vec<(String, String)> {
        let on_node = |plug: &str| split_plug(plug).is_some_and(|(n, _)| n == node);
        let mut out = Vec::new();
        for (dst, src) in &self.connections {
            if on_node(dst) {
                out.push((dst.clone(), src.clone()));
            }
            if on_node(src) {
                out.push((src.clone(), dst.clone()));
            }
        }
        out
    }

    fn create_container(&mut self, name: &str) -> anyhow::Result<String> {
        let id = self.create_node("container", name)?;
        self.containers.insert(id.clone(), ContainerRecord::default());
        Ok(id)
    }

    fn group_nodes_into_container(
        &mut self,
        container: &str,
        nodes: &[String],
    ) -> anyhow::Result<()> {
        if let Some(missing) = nodes.iter().find(|n| !self.nodes.contains_key(*n)) {
            bail!("cannot group missing node '{missing}'");
        }
        let record = self
            .containers
            .get_mut(container)
            .ok_or_else(|| anyhow!("no container '{container}'"))?;
        for n in nodes {
            if !record.nodes.contains(n) {
                record.nodes.push(n.clone());
            }
        }
        Ok(())
    }

    fn expose_container_plug(
        &mut self,
        container: &str,
        plug: &str,
        exposed_name: &str,
    ) -> anyhow::Result<()> {
        if !self.object_exists(plug) {
            bail!("cannot publish missing plug '{plug}'");
        }
        let record = self
            .containers
            .get_mut(container)
            .ok_or_else(|| anyhow!("no container '{container}'"))?;
        record
            .published
            .push((plug.to_owned(), exposed_name.to_owned()));
        Ok(())
    }

    fn set_container_metadata_note(&mut self, container: &str, text: &str) -> anyhow::Result<()> {
        let record = self
            .containers
            .get_mut(container)
            .ok_or_else(|| anyhow!("no container '{container}'"))?;
        record.notes = Some(text.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/memory.rs"]
mod tests;
