// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Filesystem concerns shared by the model coordinator and the
// use cases:
//
//   checkpoint.rs - deterministic artefact paths under
//                   {outf}/{model}/{dataset}/, weight records via
//                   Burn's NamedMpkFileRecorder, JSON for the
//                   run config and training history
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with thiserror)
//            Burn Book §5 (Checkpointing)

/// Checkpoint paths, weight records and JSON artefacts
pub mod checkpoint;
