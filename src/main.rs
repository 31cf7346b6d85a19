use crate::cli::run;

pub mod catalog;
pub mod cli;
mod config;
pub mod controller;
pub mod domain;
pub mod favorites;
pub mod http;
pub mod playback;
pub mod render;

fn main() {
    run();
}
