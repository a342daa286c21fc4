//! # Interface Layer

pub mod commands;
