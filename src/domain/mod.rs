// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust structs that describe a run. No Burn types,
// no file I/O, no tensors.
//
//   config.rs   - RunConfig: architecture widths, schedule and
//                 the bookkeeping fields that name checkpoints
//   history.rs  - TrainHistory: what a training run reports
//
// Reference: Rust Book §5 (Structs), §7 (Modules)

/// Run configuration and its invariants
pub mod config;

/// Per-epoch training history
pub mod history;
