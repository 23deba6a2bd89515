// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Workflows the CLI can run. Each one wires the ML layer and
// the checkpoint layer together; none of them does tensor math
// or printing itself.
//
//   init_use_case.rs    - build, initialise and save a generator
//   inspect_use_case.rs - reload a saved generator and report on it
//   train_use_case.rs   - run an attached Trainer, then persist
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

pub mod init_use_case;

pub mod inspect_use_case;

pub mod train_use_case;
