use serde::Deserialize;

use crate::graph::engine::Calculator;
use crate::host::Scene;

const BANNER_OPEN: &str = "~~~~~~~~~~~~~ nodecalc command-stack: ~~~~~~~~~~~~~";
const BANNER_CLOSE: &str = "~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TracerOpts {
    /// Record commands while the scope is open.
    pub trace: bool,
    /// Print the command log as one list line when the scope closes.
    pub print_trace: bool,
    /// Print one command per line between banner rules when the scope closes.
    pub pprint_trace: bool,
}

impl Default for TracerOpts {
    fn default() -> Self {
        Self {
            trace: true,
            print_trace: false,
            pprint_trace: false,
        }
    }
}

/// Records every node creation, set, connect and read while alive.
///
/// Opening a tracer resets the command log and variable numbering. Dropping it switches
/// tracing off, also when unwinding from an error or a panic.
pub struct TracerScope<'c, S: Scene> {
    calc: &'c Calculator<S>,
    opts: TracerOpts,
}

impl<S: Scene> Calculator<S> {
    pub fn tracer(&self, opts: TracerOpts) -> TracerScope<'_, S> {
        self.recorder.borrow_mut().begin_trace(opts.trace);
        tracing::debug!(trace = opts.trace, "tracer opened");
        TracerScope { calc: self, opts }
    }

    /// Whether a tracer with recording enabled is currently open.
    pub fn is_tracing(&self) -> bool {
        self.recorder.borrow().is_tracing()
    }
}

impl<S: Scene> TracerScope<'_, S> {
    /// Commands recorded so far.
    pub fn commands(&self) -> Vec<String> {
        self.calc.recorder.borrow().commands().to_vec()
    }

    /// Close the scope and return the full log.
    pub fn finish(self) -> Vec<String> {
        self.commands()
    }
}

impl<S: Scene> Drop for TracerScope<'_, S> {
    fn drop(&mut self) {
        let Ok(mut recorder) = self.calc.recorder.try_borrow_mut() else {
            tracing::warn!("tracer closed while the recorder was borrowed");
            return;
        };
        let commands = recorder.end_trace();
        drop(recorder);

        for line in report_lines(&self.opts, &commands) {
            println!("{line}");
        }
    }
}

/// Lines printed when a scope closes. An untraced scope only gets a warning.
fn report_lines(opts: &TracerOpts, commands: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    if !(opts.print_trace || opts.pprint_trace) {
        return lines;
    }
    if !opts.trace {
        tracing::warn!("commands were not traced");
        return lines;
    }
    if opts.print_trace {
        lines.push(format!("nodecalc command-stack: {commands:?}"));
    }
    if opts.pprint_trace {
        lines.push(BANNER_OPEN.to_owned());
        lines.extend(commands.iter().cloned());
        lines.push(BANNER_CLOSE.to_owned());
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/record/tracer.rs"]
mod tests;
