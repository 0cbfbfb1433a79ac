use crate::term::Term;

pub const BUCKETS: usize = 128;

struct Binding {
    name: String,
    value: Term,
}

/// Definition store: a fixed number of buckets, each a chain of bindings.
///
/// Iteration order is bucket by bucket, each chain front to back; a new name
/// enters at the front of its chain.
pub struct Env {
    buckets: Vec<Vec<Binding>>,
}

/// DJB2 over the bytes of `name`, reduced to a bucket index.
pub fn bucket_of(name: &str) -> usize {
    let hash = name
        .bytes()
        .fold(5381u32, |h, b| h.wrapping_mul(33).wrapping_add(b as u32));
    hash as usize % BUCKETS
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl Env {
    pub fn new() -> Self {
        Self {
            buckets: (0..BUCKETS).map(|_| Vec::new()).collect(),
        }
    }

    /// Binds `name` to `value`, returning the value it replaces.
    pub fn insert(&mut self, name: impl Into<String>, value: Term) -> Option<Term> {
        let name = name.into();
        let chain = &mut self.buckets[bucket_of(&name)];
        if let Some(binding) = chain.iter_mut().find(|b| b.name == name) {
            return Some(std::mem::replace(&mut binding.value, value));
        }
        chain.insert(0, Binding { name, value });
        None
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.buckets[bucket_of(name)]
            .iter()
            .find(|b| b.name == name)
            .map(|b| &b.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.buckets
            .iter()
            .flatten()
            .map(|b| (b.name.as_str(), &b.value))
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// One line per binding: `<name>    <value>`.
    pub fn listing(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{name}    {value}\n"))
            .collect()
    }
}
