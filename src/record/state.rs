use crate::foundation::core::split_plug;

/// Shared recording state behind the tracer and container scopes.
///
/// The calculator writes into it on every node creation, set, connect and traced read. Scopes
/// reset the parts they own on entry.
#[derive(Clone, Debug, Default)]
pub(crate) struct RecorderState {
    trace_enabled: bool,
    commands: Vec<String>,
    /// `(node, variable)` in creation order.
    traced_nodes: Vec<(String, String)>,
    traced_values: usize,
    /// Open container scopes; nodes are only collected while this is non-zero.
    containers_open: usize,
    created_nodes: Vec<String>,
}

impl RecorderState {
    pub(crate) fn begin_trace(&mut self, enabled: bool) {
        self.trace_enabled = enabled;
        self.commands.clear();
        self.traced_nodes.clear();
        self.traced_values = 0;
    }

    /// Switch tracing off and hand back what was recorded.
    pub(crate) fn end_trace(&mut self) -> Vec<String> {
        self.trace_enabled = false;
        self.commands.clone()
    }

    pub(crate) fn is_tracing(&self) -> bool {
        self.trace_enabled
    }

    pub(crate) fn commands(&self) -> &[String] {
        &self.commands
    }

    pub(crate) fn begin_container(&mut self) {
        self.containers_open += 1;
        self.created_nodes.clear();
    }

    /// Close one container scope. The node list is dropped with the last one.
    pub(crate) fn end_container(&mut self) {
        self.containers_open = self.containers_open.saturating_sub(1);
        if self.containers_open == 0 {
            self.created_nodes.clear();
        }
    }

    pub(crate) fn created_nodes(&self) -> &[String] {
        &self.created_nodes
    }

    pub(crate) fn record_create(&mut self, node: &str, node_type: &str) {
        if self.containers_open > 0 {
            self.created_nodes.push(node.to_owned());
        }
        if !self.trace_enabled {
            return;
        }
        let var = format!("var{}", self.traced_nodes.len() + 1);
        self.commands
            .push(format!("{var} = create_node('{node_type}', name='{node}')"));
        self.traced_nodes.push((node.to_owned(), var));
    }

    pub(crate) fn record_set(&mut self, plug: &str, value: &str) {
        if self.trace_enabled {
            let target = self.plug_expression(plug);
            self.commands.push(format!("set({target}, {value})"));
        }
    }

    pub(crate) fn record_connect(&mut self, source: &str, dest: &str) {
        if self.trace_enabled {
            let (source, dest) = (self.plug_expression(source), self.plug_expression(dest));
            self.commands.push(format!("connect({source}, {dest})"));
        }
    }

    pub(crate) fn record_add_attr(&mut self, node: &str, name: &str, flags: &[String]) {
        if self.trace_enabled {
            let node = self.node_expression(node);
            let mut args = vec![node, format!("long_name='{name}'")];
            args.extend(flags.iter().cloned());
            self.commands.push(format!("add_attr({})", args.join(", ")));
        }
    }

    /// Record a read and return the variable standing for its result, if tracing.
    pub(crate) fn record_get(&mut self, plug: &str) -> Option<String> {
        if !self.trace_enabled {
            return None;
        }
        self.traced_values += 1;
        let var = format!("val{}", self.traced_values);
        let target = self.plug_expression(plug);
        self.commands.push(format!("{var} = get({target})"));
        Some(var)
    }

    fn node_expression(&self, node: &str) -> String {
        self.traced_nodes
            .iter()
            .find(|(n, _)| n == node)
            .map_or_else(|| format!("'{node}'"), |(_, var)| var.clone())
    }

    /// Plug text for the trace: traced nodes are referred to through their variable.
    fn plug_expression(&self, plug: &str) -> String {
        let traced = split_plug(plug).and_then(|(node, attr)| {
            self.traced_nodes
                .iter()
                .find(|(n, _)| n == node)
                .map(|(_, var)| (var, attr))
        });
        match traced {
            Some((var, attr)) => format!("{var} + '.{attr}'"),
            None => format!("'{plug}'"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/state.rs"]
mod tests;
