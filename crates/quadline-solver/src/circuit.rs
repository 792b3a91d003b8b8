//! Minimal circuit description for driving quadline elements.
//!
//! A [`Circuit`] holds named nodes, resistors, independent voltage sources
//! and any number of [`Component`]s. Nodes `"0"` and `"gnd"` are ground.

use indexmap::IndexMap;
use quadline_core::{Component, ElementStamps};

use crate::error::{Error, Result};

/// Time dependence of a voltage source in transient analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    /// Constant at the source's DC value.
    Dc,
    /// Steps from `initial` to `final_value` at `delay` (s).
    Step {
        initial: f64,
        final_value: f64,
        delay: f64,
    },
}

impl Waveform {
    /// Value at `time`, given the source's DC value.
    pub fn value_at(&self, dc: f64, time: f64) -> f64 {
        match *self {
            Waveform::Dc => dc,
            Waveform::Step {
                initial,
                final_value,
                delay,
            } => {
                if time >= delay {
                    final_value
                } else {
                    initial
                }
            }
        }
    }
}

/// Linear resistor.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub name: String,
    pub node_pos: Option<usize>,
    pub node_neg: Option<usize>,
    pub resistance: f64,
}

/// Independent voltage source.
#[derive(Debug, Clone)]
pub struct VoltageSource {
    pub name: String,
    pub node_pos: Option<usize>,
    pub node_neg: Option<usize>,
    /// DC value (V).
    pub dc: f64,
    /// AC magnitude (V).
    pub ac: f64,
    /// Transient waveform.
    pub waveform: Waveform,
}

impl VoltageSource {
    /// Transient value at `time`.
    pub fn value_at(&self, time: f64) -> f64 {
        self.waveform.value_at(self.dc, time)
    }
}

/// A component instance: the model, its terminal nodes and its stamps.
pub(crate) struct Instance {
    pub(crate) component: Box<dyn Component>,
    pub(crate) terminals: Vec<Option<usize>>,
    pub(crate) stamps: ElementStamps,
}

/// Circuit made of resistors, voltage sources and components.
#[derive(Default)]
pub struct Circuit {
    nodes: IndexMap<String, usize>,
    pub(crate) resistors: Vec<Resistor>,
    pub(crate) sources: Vec<VoltageSource>,
    pub(crate) instances: Vec<Instance>,
}

fn is_ground(name: &str) -> bool {
    name == "0" || name.eq_ignore_ascii_case("gnd")
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-ground nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of voltage sources.
    pub fn num_sources(&self) -> usize {
        self.sources.len()
    }

    /// Number of components.
    pub fn num_components(&self) -> usize {
        self.instances.len()
    }

    /// Index of an existing node; `None` for ground.
    pub fn node(&self, name: &str) -> Result<Option<usize>> {
        if is_ground(name) {
            return Ok(None);
        }
        self.nodes
            .get(name)
            .copied()
            .map(Some)
            .ok_or_else(|| Error::UnknownNode(name.to_string()))
    }

    /// Node names in index order.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    fn node_or_insert(&mut self, name: &str) -> Option<usize> {
        if is_ground(name) {
            return None;
        }
        let next = self.nodes.len();
        Some(*self.nodes.entry(name.to_string()).or_insert(next))
    }

    /// Add a resistor between two nodes.
    pub fn add_resistor(&mut self, name: &str, pos: &str, neg: &str, resistance: f64) -> Result<()> {
        if !(resistance.is_finite() && resistance > 0.0) {
            return Err(Error::InvalidElement {
                name: name.to_string(),
                reason: format!("resistance must be positive, got {}", resistance),
            });
        }
        let node_pos = self.node_or_insert(pos);
        let node_neg = self.node_or_insert(neg);
        self.resistors.push(Resistor {
            name: name.to_string(),
            node_pos,
            node_neg,
            resistance,
        });
        Ok(())
    }

    /// Add a voltage source. Returns its branch index.
    pub fn add_voltage_source(
        &mut self,
        name: &str,
        pos: &str,
        neg: &str,
        dc: f64,
        ac: f64,
        waveform: Waveform,
    ) -> usize {
        let node_pos = self.node_or_insert(pos);
        let node_neg = self.node_or_insert(neg);
        self.sources.push(VoltageSource {
            name: name.to_string(),
            node_pos,
            node_neg,
            dc,
            ac,
            waveform,
        });
        self.sources.len() - 1
    }

    /// Add a component connected to `nodes` (one per terminal, in the
    /// component's terminal order). Returns its instance index.
    pub fn add_component(
        &mut self,
        component: impl Component + 'static,
        nodes: &[&str],
    ) -> Result<usize> {
        let expected = component.num_terminals();
        if nodes.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: nodes.len(),
            });
        }
        let terminals = nodes.iter().map(|n| self.node_or_insert(n)).collect();
        self.instances.push(Instance {
            stamps: ElementStamps::new(expected),
            component: Box::new(component),
            terminals,
        });
        Ok(self.instances.len() - 1)
    }

    /// Component at `index`.
    pub fn component(&self, index: usize) -> Option<&dyn Component> {
        self.instances.get(index).map(|inst| inst.component.as_ref())
    }
}
