/// Errors from analyzing generated meshes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("mesh '{name}' has no triangles")]
    EmptyMesh { name: String },

    #[error("mesh '{name}': index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        name: String,
        index: u32,
        vertex_count: usize,
    },

    #[error("no {part} mesh supplied")]
    MissingPart { part: String },

    #[error("failed to serialize report: {0}")]
    Serialize(String),
}
