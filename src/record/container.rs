use serde::Deserialize;

use crate::foundation::core::{alnum_only, split_plug};
use crate::foundation::error::NocaResult;
use crate::graph::engine::Calculator;
use crate::host::Scene;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContainerOpts {
    pub name: String,
    /// Stored as container metadata when non-empty.
    pub notes: String,
    /// With `false` the scope does nothing.
    pub create: bool,
}

impl Default for ContainerOpts {
    fn default() -> Self {
        Self {
            name: "noca_formula_container".to_owned(),
            notes: String::new(),
            create: true,
        }
    }
}

/// Groups every node created while alive into one host container.
///
/// Connections between grouped nodes and the rest of the scene are published on the
/// container. Population runs on [`ContainerScope::finish`] or on drop; a scope dropped
/// during a panic leaves its nodes ungrouped.
pub struct ContainerScope<'c, S: Scene> {
    calc: &'c Calculator<S>,
    opts: ContainerOpts,
    container: Option<String>,
    done: bool,
}

impl<S: Scene> Calculator<S> {
    pub fn container(&self, opts: ContainerOpts) -> NocaResult<ContainerScope<'_, S>> {
        self.recorder.borrow_mut().begin_container();
        let container = if opts.create {
            Some(self.scene_mut().create_container(&opts.name)?)
        } else {
            None
        };
        tracing::debug!(container = ?container, "container opened");
        Ok(ContainerScope {
            calc: self,
            opts,
            container,
            done: false,
        })
    }
}

impl<S: Scene> ContainerScope<'_, S> {
    /// Identifier of the host container, `None` when creation was skipped.
    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    /// Populate the container now and report host failures.
    pub fn finish(mut self) -> NocaResult<Option<String>> {
        self.done = true;
        self.populate()?;
        Ok(self.container.clone())
    }

    fn populate(&self) -> NocaResult<()> {
        let Some(container) = &self.container else {
            return Ok(());
        };
        let nodes = self.calc.recorder.borrow().created_nodes().to_vec();
        let mut scene = self.calc.scene_mut();
        scene.group_nodes_into_container(container, &nodes)?;

        let mut published: Vec<String> = Vec::new();
        for node in &nodes {
            for (inside, outside) in scene.list_connections(node) {
                let leaves_group = split_plug(&outside)
                    .is_some_and(|(other, _)| !nodes.iter().any(|n| n == other));
                let Some((owner, attr)) = split_plug(&inside) else {
                    continue;
                };
                if !leaves_group || attr == "message" || published.contains(&inside) {
                    continue;
                }
                let short_owner = owner.rsplit('|').next().unwrap_or(owner);
                let exposed = format!("{}_I_{}", alnum_only(short_owner), alnum_only(attr));
                scene.expose_container_plug(container, &inside, &exposed)?;
                published.push(inside);
            }
        }

        if !self.opts.notes.is_empty() {
            scene.set_container_metadata_note(container, &self.opts.notes)?;
        }
        tracing::debug!(
            container = %container,
            nodes = nodes.len(),
            published = published.len(),
            "container populated"
        );
        Ok(())
    }
}

impl<S: Scene> Drop for ContainerScope<'_, S> {
    fn drop(&mut self) {
        if !self.done {
            if std::thread::panicking() {
                tracing::warn!(container = ?self.container, "container abandoned during a panic");
            } else if let Err(err) = self.populate() {
                tracing::warn!(container = ?self.container, error = %err, "container population failed");
            }
        }
        match self.calc.recorder.try_borrow_mut() {
            Ok(mut recorder) => recorder.end_container(),
            Err(_) => tracing::warn!("container closed while the recorder was borrowed"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/container.rs"]
mod tests;
