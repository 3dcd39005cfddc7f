#[path = "core/closing_move.rs"]
mod closing_move;
#[path = "core/iterators.rs"]
mod iterators;
#[path = "core/path_edits.rs"]
mod path_edits;
