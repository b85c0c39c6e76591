#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load the novel list; the reply must carry the same generation.
    FetchNovels { generation: u64 },
}
