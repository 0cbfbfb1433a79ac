/// Session settings. The defaults are the bounds used when a command omits one.
#[derive(Clone, Debug)]
pub struct Config {
    pub reduce_bound: usize,
    pub expand_bound: usize,
    pub contract_bound: usize,
    /// Length of a hygiene suffix, not counting the `:`.
    pub suffix_len: usize,
    /// Seed for hygiene suffixes; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reduce_bound: 100,
            expand_bound: 1000,
            contract_bound: 1000,
            suffix_len: 16,
            seed: None,
        }
    }
}
