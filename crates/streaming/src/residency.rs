/// GPU texture created by the host once a fetch has been decoded and uploaded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GpuTexture {
    /// Host-assigned identifier, opaque to this crate.
    pub id: u64,
    pub width: u32,
    pub height: u32,
}

/// Lifecycle of one texture slot.
///
/// `Loading → Resident | Failed`, and every slot ends up released when its
/// owner is discarded. Failed loads are terminal; nothing retries them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResidencyState {
    Loading,
    Resident(GpuTexture),
    Failed,
}

impl ResidencyState {
    pub fn texture(&self) -> Option<GpuTexture> {
        match self {
            ResidencyState::Resident(t) => Some(*t),
            ResidencyState::Loading | ResidencyState::Failed => None,
        }
    }
}
