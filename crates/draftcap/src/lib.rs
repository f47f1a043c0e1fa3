// draftcap: load a league's auction values and projections, then report the
// optimal roster and the evaluated player's draft value.

pub mod app;
pub mod cli;
pub mod config;
pub mod projections;
pub mod report;
