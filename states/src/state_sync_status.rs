/// Freshness of a recorded compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateSyncStatus {
    /// Recorded but never computed.
    #[default]
    BeforeInit,
    /// An input changed since the last run.
    Dirty,
    /// Up to date with its inputs.
    Clean,
}

impl StateSyncStatus {
    pub fn needs_run(self) -> bool {
        matches!(self, Self::BeforeInit | Self::Dirty)
    }
}
