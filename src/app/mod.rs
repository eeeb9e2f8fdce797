// Application layer: what the CLI does with a finished search.

pub mod compare;
pub mod presenter;
