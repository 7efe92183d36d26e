// pagewatch test infrastructure
//
// Aggregated test modules for the diff/merge/flush core and its
// collaborators, plus shared snapshot-building helpers.

pub mod helpers; // Shared Page/Snapshot/timestamp builders


// ============================================================================
// COLLABORATOR TESTS - response parsing, rendering, config
// ============================================================================
pub mod config_tests;
