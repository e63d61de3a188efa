use serde::{Deserialize, Serialize};

/// A named instant at a fractional sample index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyTimeInstance {
    pub name: String,
    pub index: f64,
}

/// A named scalar measured at a sample index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPointValue {
    pub name: String,
    pub index: f64,
    pub value: f64,
}

/// A named half-open interval `[start_edge, stop_edge)` of sample indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub start_edge: f64,
    pub stop_edge: f64,
}

impl Section {
    /// Whole samples covered by the interval, clamped to `len`.
    pub fn range(&self, len: usize) -> std::ops::Range<usize> {
        let start = (self.start_edge.ceil().max(0.0) as usize).min(len);
        let stop = (self.stop_edge.ceil().max(0.0) as usize).min(len);
        start..stop.max(start)
    }

    pub fn duration_samples(&self) -> f64 {
        self.stop_edge - self.start_edge
    }
}

/// Something positioned on a sample index, so it can be moved between time bases.
pub trait Indexed {
    fn reindex(&mut self, map: &dyn Fn(f64) -> f64);
}

impl Indexed for KeyTimeInstance {
    fn reindex(&mut self, map: &dyn Fn(f64) -> f64) {
        self.index = map(self.index);
    }
}

impl Indexed for KeyPointValue {
    fn reindex(&mut self, map: &dyn Fn(f64) -> f64) {
        self.index = map(self.index);
    }
}

impl Indexed for Section {
    fn reindex(&mut self, map: &dyn Fn(f64) -> f64) {
        self.start_edge = map(self.start_edge);
        self.stop_edge = map(self.stop_edge);
    }
}

/// Ordered collection of events produced by one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Events<T> {
    pub name: String,
    pub frequency: f64,
    pub offset: f64,
    pub items: Vec<T>,
}

pub type KeyTimeInstances = Events<KeyTimeInstance>;
pub type KeyPointValues = Events<KeyPointValue>;
pub type Sections = Events<Section>;

impl<T> Events<T> {
    pub fn new(name: impl Into<String>, frequency: f64, offset: f64) -> Self {
        Self {
            name: name.into(),
            frequency,
            offset,
            items: Vec::new(),
        }
    }

    pub fn with_items(name: impl Into<String>, frequency: f64, offset: f64, items: Vec<T>) -> Self {
        Self {
            name: name.into(),
            frequency,
            offset,
            items,
        }
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn seconds_at(&self, index: f64) -> f64 {
        index / self.frequency + self.offset
    }
}

impl<T: Indexed + Clone> Events<T> {
    /// Copy expressed in another rate/offset; indices move with physical time.
    pub fn aligned(&self, frequency: f64, offset: f64) -> Self {
        let (from_hz, from_offset) = (self.frequency, self.offset);
        let map = move |index: f64| ((index / from_hz + from_offset) - offset) * frequency;
        let items = self
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                item.reindex(&map);
                item
            })
            .collect();
        Self {
            name: self.name.clone(),
            frequency,
            offset,
            items,
        }
    }
}

impl Sections {
    pub fn push_range(&mut self, range: std::ops::Range<usize>) {
        let name = self.name.clone();
        self.items.push(Section {
            name,
            start_edge: range.start as f64,
            stop_edge: range.end as f64,
        });
    }
}

impl KeyTimeInstances {
    pub fn push_index(&mut self, index: f64) {
        let name = self.name.clone();
        self.items.push(KeyTimeInstance { name, index });
    }
}

impl KeyPointValues {
    pub fn push_value(&mut self, index: f64, value: f64) {
        let name = self.name.clone();
        self.items.push(KeyPointValue { name, index, value });
    }
}
